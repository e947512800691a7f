use std::time::{SystemTime, UNIX_EPOCH};

/// Identity key for a neighbor: the local link it arrived on plus the
/// remote MAC, compared byte-for-byte with no canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NeighborKey {
    pub link: String,
    pub remote_mac: Vec<u8>,
}

impl NeighborKey {
    pub fn new(link: impl Into<String>, remote_mac: impl Into<Vec<u8>>) -> Self {
        Self {
            link: link.into(),
            remote_mac: remote_mac.into(),
        }
    }
}

/// Wall-clock timestamp at whole-second plus nanosecond resolution,
/// matching the `timespec`-style field the reap formula is defined over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    pub secs: u64,
    pub nanos: u32,
}

impl Timestamp {
    pub fn now() -> Self {
        let d = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            secs: d.as_secs(),
            nanos: d.subsec_nanos(),
        }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self { secs, nanos: 0 }
    }
}

/// A learned neighbor: identity, the raw frame it was last learned from,
/// and when that frame arrived.
#[derive(Debug, Clone)]
pub struct NeighborRecord {
    pub key: NeighborKey,
    pub device_type: String,
    pub received_at: Timestamp,
    pub frame_bytes: Vec<u8>,
}

impl NeighborRecord {
    pub fn new(key: NeighborKey, device_type: impl Into<String>) -> Self {
        Self {
            key,
            device_type: device_type.into(),
            received_at: Timestamp::from_secs(0),
            frame_bytes: Vec::new(),
        }
    }

    /// The hold time advertised by the last received frame, read from byte
    /// 1 (the TTL field) of the stored raw frame. Zero if no frame has been
    /// stored yet, or the stored frame is too short to carry a TTL byte.
    pub fn hold_time_secs(&self) -> u8 {
        self.frame_bytes.get(1).copied().unwrap_or(0)
    }

    /// `now.seconds - received_at.seconds + 1 >= hold_time`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        let elapsed = now.secs.saturating_sub(self.received_at.secs);
        elapsed + 1 >= self.hold_time_secs() as u64
    }

    /// Reuses the existing buffer's storage when it is already large
    /// enough, otherwise reallocates.
    pub fn set_frame_bytes(&mut self, bytes: &[u8]) {
        self.frame_bytes.clear();
        self.frame_bytes.extend_from_slice(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(hold_time: u8, received_at_secs: u64) -> NeighborRecord {
        let mut r = NeighborRecord::new(NeighborKey::new("eth0", vec![1, 2, 3, 4, 5, 6]), "Ethernet");
        r.received_at = Timestamp::from_secs(received_at_secs);
        r.set_frame_bytes(&[2, hold_time, 0, 0]);
        r
    }

    #[test]
    fn not_yet_expired_one_second_before_hold_time() {
        let r = record_with(10, 1000);
        assert!(!r.is_expired(Timestamp::from_secs(1009)));
    }

    #[test]
    fn expired_exactly_at_hold_time_boundary() {
        let r = record_with(10, 1000);
        assert!(r.is_expired(Timestamp::from_secs(1010)));
    }

    #[test]
    fn hold_time_read_from_frame_byte_one() {
        let r = record_with(42, 0);
        assert_eq!(r.hold_time_secs(), 42);
    }
}
