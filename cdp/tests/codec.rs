use cdp::packet::{parse_packet, serialize_packet, Duplex, Packet};
use cdp::codec::StreamReader;
use cdp::address::CdpAddress;
use std::net::{Ipv4Addr, Ipv6Addr};

fn full_v2_packet() -> Packet {
    let mut p = Packet::new(2);
    p.ttl_secs = 180;
    p.device_id = Some("MyDogIsBetterThanYourDog".into());
    p.software_version = Some("test/1.0".into());
    p.platform = Some("Linux".into());
    p.port_id = Some("eth0".into());
    p.capabilities = Some(0x30);
    p.duplex = Duplex::Full;
    p.addresses = vec![
        CdpAddress::V4(Ipv4Addr::new(10, 100, 1, 1)),
        CdpAddress::V4(Ipv4Addr::new(192, 168, 1, 1)),
        CdpAddress::V6(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 0x16)),
    ];
    p
}

#[test]
fn round_trip_preserves_all_required_attributes() {
    let p = full_v2_packet();
    let mut buf = [0u8; 1500];
    let written = serialize_packet(&p, &mut buf).unwrap();

    let mut reader = StreamReader::new(&buf[..written]);
    let parsed = parse_packet(&mut reader).unwrap();

    assert_eq!(parsed.version, p.version);
    assert_eq!(parsed.device_id, p.device_id);
    assert_eq!(parsed.software_version, p.software_version);
    assert_eq!(parsed.platform, p.platform);
    assert_eq!(parsed.port_id, p.port_id);
    assert_eq!(parsed.capabilities, p.capabilities);
    assert_eq!(parsed.duplex, p.duplex);
    assert_eq!(parsed.addresses, p.addresses);
}

#[test]
fn serialized_frame_validates_its_own_checksum() {
    let p = full_v2_packet();
    let mut buf = [0u8; 1500];
    let written = serialize_packet(&p, &mut buf).unwrap();
    assert!(StreamReader::new(&buf[..written]).validate_checksum());
}

#[test]
fn serialized_length_equals_header_plus_tlv_lengths() {
    let p = full_v2_packet();
    let mut buf = [0u8; 1500];
    let written = serialize_packet(&p, &mut buf).unwrap();

    // Walk the TLV stream ourselves and confirm the declared lengths sum
    // exactly to the written length minus the 4-byte frame header.
    let mut offset = 4usize;
    let mut tlv_total = 0usize;
    while offset < written {
        let tlv_len = u16::from_be_bytes([buf[offset + 2], buf[offset + 3]]) as usize;
        tlv_total += tlv_len;
        offset += tlv_len;
    }
    assert_eq!(offset, written);
    assert_eq!(tlv_total, written - 4);
}

#[test]
fn v2_without_duplex_fails_before_corrupting_buffer_semantics() {
    let mut p = full_v2_packet();
    p.duplex = Duplex::Unset;
    let mut buf = [0xFFu8; 1500];
    assert!(serialize_packet(&p, &mut buf).is_err());
}
