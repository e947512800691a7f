use crate::address::CdpAddress;
use crate::codec::StreamWriter;
use crate::error::{CdpError, Result};
use crate::packet::record::{tlv_type, Packet};

const TLV_HEADER_LEN: u16 = 4;
const CHECKSUM_OFFSET: usize = 2;

/// Serializes `packet` into `buffer`, returning the number of bytes
/// written. Fails before writing anything if a required attribute is
/// missing or the version/duplex precondition is violated.
pub fn serialize_packet(packet: &Packet, buffer: &mut [u8]) -> Result<usize> {
    check_preconditions(packet)?;

    let mut w = StreamWriter::new(buffer);
    w.put8(packet.version)?;
    w.put8(packet.ttl_secs)?;
    w.put16(0)?; // checksum placeholder

    write_string_tlv(&mut w, tlv_type::DEVICE_ID, required(&packet.device_id, "device_id")?)?;
    write_string_tlv(
        &mut w,
        tlv_type::SOFTWARE_VERSION,
        required(&packet.software_version, "software_version")?,
    )?;
    write_string_tlv(&mut w, tlv_type::PLATFORM, required(&packet.platform, "platform")?)?;
    write_string_tlv(&mut w, tlv_type::PORT_ID, required(&packet.port_id, "port_id")?)?;

    let capabilities = packet
        .capabilities
        .ok_or_else(|| CdpError::ProtocolRequirement("capabilities is required".into()))?;
    write_tlv(&mut w, tlv_type::CAPABILITIES, 4, |w| w.put32(capabilities))?;

    if packet.addresses.is_empty() {
        return Err(CdpError::ProtocolRequirement(
            "at least one address is required".into(),
        ));
    }
    write_address_list_tlv(&mut w, tlv_type::ADDRESSES, &packet.addresses)?;

    if packet.version == 2 {
        let byte = packet
            .duplex
            .to_wire()
            .ok_or_else(|| CdpError::ProtocolRequirement("v2 frames require duplex to be set".into()))?;
        write_tlv(&mut w, tlv_type::DUPLEX, 1, |w| w.put8(byte))?;
    }

    let written = w.length();
    w.inject_checksum(CHECKSUM_OFFSET)?;
    Ok(written)
}

fn check_preconditions(packet: &Packet) -> Result<()> {
    if packet.version != 1 && packet.version != 2 {
        return Err(CdpError::ProtocolRequirement(format!(
            "unsupported CDP version {}",
            packet.version
        )));
    }
    Ok(())
}

fn required<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str> {
    field
        .as_deref()
        .ok_or_else(|| CdpError::ProtocolRequirement(format!("{name} is required")))
}

fn write_tlv(
    w: &mut StreamWriter,
    tlv_type: u16,
    value_len: u16,
    write_value: impl FnOnce(&mut StreamWriter) -> Result<()>,
) -> Result<()> {
    w.put16(tlv_type)?;
    w.put16(TLV_HEADER_LEN + value_len)?;
    write_value(w)
}

fn write_string_tlv(w: &mut StreamWriter, tlv_type: u16, value: &str) -> Result<()> {
    write_tlv(w, tlv_type, value.len() as u16, |w| w.put_string(value))
}

fn address_entry_len(addr: &CdpAddress) -> u16 {
    match addr {
        CdpAddress::V4(_) => 1 + 1 + 1 + 2 + 4,
        CdpAddress::V6(_) => 1 + 1 + 8 + 2 + 16,
    }
}

fn write_address_entry(w: &mut StreamWriter, addr: &CdpAddress) -> Result<()> {
    match addr {
        CdpAddress::V4(ip) => {
            w.put8(0x01)?; // NLPID
            w.put8(0x01)?; // protocol length
            w.put8(0xCC)?; // NLPID value: IPv4
            w.put16(4)?; // address length
            w.put_buffer(&ip.octets())
        }
        CdpAddress::V6(ip) => {
            w.put8(0x02)?; // 802.2 SNAP
            w.put8(0x08)?; // protocol length
            w.put8(0xAA)?; // DSAP
            w.put8(0xAA)?; // SSAP
            w.put8(0x03)?; // control
            w.put24(0x000000)?; // OUI
            w.put16(0x86DD)?; // PID: IPv6
            w.put16(16)?; // address length
            w.put_buffer(&ip.octets())
        }
    }
}

fn write_address_list_tlv(w: &mut StreamWriter, tlv_type: u16, addresses: &[CdpAddress]) -> Result<()> {
    let body_len: u16 = 4 + addresses.iter().map(address_entry_len).sum::<u16>();
    w.put16(tlv_type)?;
    w.put16(TLV_HEADER_LEN + body_len)?;
    w.put32(addresses.len() as u32)?;
    for addr in addresses {
        write_address_entry(w, addr)?;
    }
    Ok(())
}
