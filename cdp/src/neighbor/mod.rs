mod driver;
mod record;
mod table;

pub use driver::{FrameBuilder, PeriodicDriver};
pub use record::{NeighborKey, NeighborRecord, Timestamp};
pub use table::NeighborTable;

use crate::codec::StreamReader;
use crate::collaborators::ReceivedFrame;
use crate::error::Result;
use crate::packet::parse_packet;

/// Parses `frame.bytes` and upserts the resulting neighbor under a single
/// exclusive write guard, so a concurrent reap cannot observe a
/// half-updated record. A malformed frame is dropped without mutating the
/// table, per the propagation policy: the sender is re-learned on its next
/// valid frame.
pub fn ingest(table: &NeighborTable, frame: ReceivedFrame) -> Result<()> {
    let mut reader = StreamReader::new(frame.bytes);
    let packet = parse_packet(&mut reader)?;

    let key = NeighborKey::new(frame.link, frame.src_mac.to_vec());
    let device_type = packet.platform.clone().unwrap_or_else(|| "Ethernet".into());
    table.upsert_and_record(key, &device_type, frame.bytes, frame.received_at)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::{Duplex, Packet};
    use crate::packet::serialize_packet;
    use crate::address::CdpAddress;
    use std::net::Ipv4Addr;

    fn sample_frame() -> Vec<u8> {
        let mut p = Packet::new(2);
        p.ttl_secs = 10;
        p.device_id = Some("sw1".into());
        p.software_version = Some("1.0".into());
        p.platform = Some("Linux".into());
        p.port_id = Some("eth0".into());
        p.capabilities = Some(0x20);
        p.duplex = Duplex::Full;
        p.addresses = vec![CdpAddress::V4(Ipv4Addr::new(10, 0, 0, 1))];
        let mut buf = [0u8; 1500];
        let n = serialize_packet(&p, &mut buf).unwrap();
        buf[..n].to_vec()
    }

    #[test]
    fn ingest_creates_a_neighbor_record() {
        let table = NeighborTable::new();
        let bytes = sample_frame();
        let frame = ReceivedFrame {
            link: "eth0",
            src_mac: &[1, 2, 3, 4, 5, 6],
            bytes: &bytes,
            received_at: Timestamp::from_secs(1000),
        };
        ingest(&table, frame).unwrap();
        let snap = table.snapshot().unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].hold_time_secs(), 10);
    }

    #[test]
    fn malformed_frame_is_dropped_without_creating_a_record() {
        let table = NeighborTable::new();
        let bytes = [2u8, 10, 0, 0, 0x00, 0x08, 0x00, 0x0C]; // short cluster-mgmt TLV
        let frame = ReceivedFrame {
            link: "eth0",
            src_mac: &[1, 2, 3, 4, 5, 6],
            bytes: &bytes,
            received_at: Timestamp::from_secs(1000),
        };
        assert!(ingest(&table, frame).is_err());
        assert!(table.snapshot().unwrap().is_empty());
    }
}
