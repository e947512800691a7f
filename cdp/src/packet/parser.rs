use tracing::{debug, info};

use crate::codec::StreamReader;
use crate::error::{CdpError, Result};
use crate::packet::cluster::{ClusterManagement, CLUSTER_MANAGEMENT_OUI};
use crate::packet::poe::PoeAvailability;
use crate::packet::record::{tlv_type, Duplex, Packet};

const TLV_HEADER_LEN: usize = 4;

/// Parses one complete CDP frame out of `reader`, which must be positioned
/// at the version byte. Any structural violation inside a *known* TLV fails
/// the whole parse; unknown TLVs are logged and skipped.
pub fn parse_packet(reader: &mut StreamReader) -> Result<Packet> {
    let version = reader.get8()?;
    if version != 1 && version != 2 {
        return Err(CdpError::ProtocolRequirement(format!(
            "unsupported CDP version {version}"
        )));
    }
    let ttl_secs = reader.get8()?;
    let checksum = reader.get16()?;

    let mut packet = Packet::new(version);
    packet.ttl_secs = ttl_secs;
    packet.checksum = checksum;

    while !reader.at_end() {
        let start = reader.position();
        let tlv_type = reader.get16()?;
        let tlv_length = reader.get16()? as usize;
        if tlv_length < TLV_HEADER_LEN {
            return Err(CdpError::MalformedTlv {
                tlv_type,
                offset: start,
                reason: format!("TLV length {tlv_length} is shorter than the 4-byte header"),
            });
        }

        dispatch_tlv(reader, &mut packet, tlv_type, tlv_length, start)?;

        // Authoritative frame advance: regardless of how much the handler
        // actually consumed, the next TLV starts at the declared offset.
        reader.set_position(start + tlv_length)?;
    }

    Ok(packet)
}

fn dispatch_tlv(
    reader: &mut StreamReader,
    packet: &mut Packet,
    tlv_type: u16,
    tlv_length: usize,
    start: usize,
) -> Result<()> {
    let value_len = tlv_length - TLV_HEADER_LEN;
    match tlv_type {
        self::tlv_type::DEVICE_ID => {
            packet.device_id = Some(reader.get_string(value_len)?);
        }
        self::tlv_type::ADDRESSES => {
            packet.addresses = parse_address_list(reader, tlv_type)?;
        }
        self::tlv_type::PORT_ID => {
            packet.port_id = Some(reader.get_string(value_len)?);
        }
        self::tlv_type::CAPABILITIES => {
            packet.capabilities = Some(reader.get32()?);
        }
        self::tlv_type::SOFTWARE_VERSION => {
            packet.software_version = Some(reader.get_string(value_len)?);
        }
        self::tlv_type::PLATFORM => {
            packet.platform = Some(reader.get_string(value_len)?);
        }
        self::tlv_type::ODR_PREFIXES => {
            packet.odr_prefixes = parse_odr_prefixes(reader, value_len)?;
        }
        self::tlv_type::CLUSTER_MANAGEMENT => {
            packet.cluster_management = Some(parse_cluster_management(reader)?);
        }
        self::tlv_type::VTP_MANAGEMENT_DOMAIN => {
            packet.vtp_management_domain = Some(reader.get_string(value_len)?);
        }
        self::tlv_type::NATIVE_VLAN => {
            let vlan = reader.get16()?;
            if vlan > 4095 {
                return Err(CdpError::MalformedTlv {
                    tlv_type,
                    offset: start,
                    reason: format!("native VLAN {vlan} exceeds 4095"),
                });
            }
            packet.native_vlan = Some(vlan);
        }
        self::tlv_type::DUPLEX => {
            let byte = reader.get8()?;
            packet.duplex = Duplex::from_wire(byte);
        }
        self::tlv_type::TRUST_BITMAP => {
            packet.trust_bitmap = Some(reader.get8()?);
        }
        self::tlv_type::UNTRUSTED_PORT_COS => {
            packet.untrusted_port_cos = Some(reader.get8()?);
        }
        self::tlv_type::MANAGEMENT_ADDRESSES => {
            packet.management_addresses = parse_address_list(reader, tlv_type)?;
        }
        self::tlv_type::POE_AVAILABLE => {
            packet.poe_available = Some(parse_poe_availability(reader)?);
        }
        self::tlv_type::STARTUP_NATIVE_VLAN => {
            packet.startup_native_vlan = Some(reader.get_string(value_len)?);
        }
        other => {
            info!(tlv_type = other, tlv_length, offset = start, "skipping unknown CDP TLV");
        }
    }
    debug!(tlv_type, tlv_length, offset = start, "parsed CDP TLV");
    Ok(())
}

fn parse_address_list(
    reader: &mut StreamReader,
    tlv_type: u16,
) -> Result<Vec<crate::address::CdpAddress>> {
    let count = reader.get32()?;
    let mut addresses = Vec::with_capacity(count as usize);
    for _ in 0..count {
        addresses.push(reader.get_address().map_err(|e| retag(e, tlv_type))?);
    }
    Ok(addresses)
}

fn parse_odr_prefixes(reader: &mut StreamReader, value_len: usize) -> Result<Vec<crate::address::CdpPrefix>> {
    const ENTRY_LEN: usize = 5;
    if value_len % ENTRY_LEN != 0 {
        return Err(CdpError::MalformedTlv {
            tlv_type: tlv_type::ODR_PREFIXES,
            offset: reader.position(),
            reason: format!("ODR prefix TLV value length {value_len} is not a multiple of 5"),
        });
    }
    let count = value_len / ENTRY_LEN;
    let mut prefixes = Vec::with_capacity(count);
    for _ in 0..count {
        let addr = reader.get_inet_address()?;
        let prefix_len = reader.get8()?;
        let net = ipnet::Ipv4Net::new(addr, prefix_len).map_err(|e| CdpError::MalformedTlv {
            tlv_type: tlv_type::ODR_PREFIXES,
            offset: reader.position(),
            reason: format!("invalid ODR prefix length {prefix_len}: {e}"),
        })?;
        prefixes.push(ipnet::IpNet::V4(net));
    }
    Ok(prefixes)
}

fn parse_cluster_management(reader: &mut StreamReader) -> Result<ClusterManagement> {
    let oui = reader.get24()?;
    if oui != CLUSTER_MANAGEMENT_OUI {
        return Err(CdpError::MalformedTlv {
            tlv_type: tlv_type::CLUSTER_MANAGEMENT,
            offset: reader.position(),
            reason: format!("cluster-management OUI must be {CLUSTER_MANAGEMENT_OUI:#08x}, got {oui:#08x}"),
        });
    }
    let protocol_id = reader.get16()?;
    let cluster_master = reader.get_inet_address()?;
    let netmask = reader.get_inet_address()?;
    let version = reader.get16()?;
    let status = reader.get8()?;
    reader.skip(1)?; // reserved byte preceding the commander MAC
    let commander_bytes = reader.get_buffer(6)?;
    let local_bytes = reader.get_buffer(6)?;
    reader.skip(1)?; // two reserved bytes precede the management VLAN
    reader.skip(1)?;
    let management_vlan = reader.get16()?;

    let mut cluster_commander_mac = [0u8; 6];
    cluster_commander_mac.copy_from_slice(&commander_bytes);
    let mut local_mac = [0u8; 6];
    local_mac.copy_from_slice(&local_bytes);

    Ok(ClusterManagement {
        oui,
        protocol_id,
        cluster_master,
        netmask,
        version,
        status,
        cluster_commander_mac,
        local_mac,
        management_vlan,
    })
}

fn parse_poe_availability(reader: &mut StreamReader) -> Result<PoeAvailability> {
    Ok(PoeAvailability {
        request_id: reader.get16()?,
        management_id: reader.get16()?,
        available_milliwatts: reader.get32()?,
        power_management_level: reader.get32()? as i32,
    })
}

fn retag(err: CdpError, tlv_type: u16) -> CdpError {
    match err {
        CdpError::MalformedTlv { offset, reason, .. } => CdpError::MalformedTlv {
            tlv_type,
            offset,
            reason,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_header(version: u8, ttl: u8) -> Vec<u8> {
        vec![version, ttl, 0x00, 0x00]
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let buf = minimal_header(3, 180);
        let mut r = StreamReader::new(&buf);
        assert!(parse_packet(&mut r).is_err());
    }

    #[test]
    fn unknown_tlv_is_skipped_not_rejected() {
        let mut buf = minimal_header(2, 180);
        buf.extend_from_slice(&0xABCDu16.to_be_bytes());
        buf.extend_from_slice(&12u16.to_be_bytes());
        buf.extend_from_slice(&[0u8; 8]);
        let mut r = StreamReader::new(&buf);
        let packet = parse_packet(&mut r).unwrap();
        assert_eq!(packet.version, 2);
    }

    #[test]
    fn cluster_management_rejects_wrong_oui() {
        let mut buf = minimal_header(2, 180);
        let body_len = 3 + 2 + 4 + 4 + 2 + 1 + 1 + 6 + 6 + 2 + 2;
        buf.extend_from_slice(&tlv_type::CLUSTER_MANAGEMENT.to_be_bytes());
        buf.extend_from_slice(&((TLV_HEADER_LEN + body_len) as u16).to_be_bytes());
        buf.extend_from_slice(&[0x00, 0x00, 0x0D]); // wrong OUI
        buf.extend_from_slice(&[0u8; body_len - 3]);
        let mut r = StreamReader::new(&buf);
        assert!(parse_packet(&mut r).is_err());
    }

    #[test]
    fn native_vlan_above_4095_is_malformed() {
        let mut buf = minimal_header(2, 180);
        buf.extend_from_slice(&tlv_type::NATIVE_VLAN.to_be_bytes());
        buf.extend_from_slice(&6u16.to_be_bytes());
        buf.extend_from_slice(&5000u16.to_be_bytes());
        let mut r = StreamReader::new(&buf);
        assert!(parse_packet(&mut r).is_err());
    }
}
