use std::sync::RwLock;

use ahash::AHashMap;
use tracing::warn;

use crate::error::{CdpError, Result};
use crate::neighbor::record::{NeighborKey, NeighborRecord, Timestamp};

struct Inner {
    records: AHashMap<NeighborKey, NeighborRecord>,
    order: Vec<NeighborKey>,
}

impl Inner {
    fn new() -> Self {
        Self {
            records: AHashMap::new(),
            order: Vec::new(),
        }
    }

    fn insert_new(&mut self, record: NeighborRecord) {
        self.order.push(record.key.clone());
        self.records.insert(record.key.clone(), record);
    }

    fn remove(&mut self, key: &NeighborKey) -> Option<NeighborRecord> {
        let removed = self.records.remove(key);
        if removed.is_some() {
            self.order.retain(|k| k != key);
        }
        removed
    }
}

/// Insertion-ordered neighbor table, guarded by a single-writer /
/// many-reader lock. Packet reception and reaping take the write guard for
/// the whole transaction; inspection takes a read guard only long enough
/// to clone a snapshot.
pub struct NeighborTable {
    inner: RwLock<Inner>,
}

impl Default for NeighborTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NeighborTable {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::new()),
        }
    }

    /// Returns a clone of the record at `key`, if present.
    pub fn lookup(&self, key: &NeighborKey) -> Result<Option<NeighborRecord>> {
        let guard = self.read_guard("lookup")?;
        Ok(guard.records.get(key).cloned())
    }

    /// Inserts a new record for `key` if absent, then returns the current
    /// (pre-existing or freshly created) record. Idempotent on identity:
    /// repeated upserts for the same key never create a second record.
    pub fn upsert(&self, key: NeighborKey, device_type: &str) -> Result<NeighborRecord> {
        let mut guard = self.write_guard("upsert")?;
        if let Some(existing) = guard.records.get(&key) {
            return Ok(existing.clone());
        }
        let record = NeighborRecord::new(key.clone(), device_type);
        guard.insert_new(record.clone());
        Ok(record)
    }

    /// Overwrites the frame bytes and received-at timestamp for `key`
    /// atomically under the write lock, so observers never see the two
    /// updated separately.
    pub fn record_frame(&self, key: &NeighborKey, frame_bytes: &[u8], received_at: Timestamp) -> Result<()> {
        let mut guard = self.write_guard("record_frame")?;
        match guard.records.get_mut(key) {
            Some(record) => {
                record.set_frame_bytes(frame_bytes);
                record.received_at = received_at;
                Ok(())
            }
            None => Err(CdpError::LockContention(format!(
                "no neighbor record for link {} to record a frame against",
                key.link
            ))),
        }
    }

    /// Looks up or creates the neighbor for `key`, then records
    /// `frame_bytes`/`received_at` against it — all under one write-guard
    /// acquisition. A freshly created record is never observable without
    /// its frame: a concurrent reap can't see the placeholder zero hold
    /// time a bare insert would otherwise expose.
    pub fn upsert_and_record(
        &self,
        key: NeighborKey,
        device_type: &str,
        frame_bytes: &[u8],
        received_at: Timestamp,
    ) -> Result<NeighborRecord> {
        let mut guard = self.write_guard("upsert_and_record")?;
        if !guard.records.contains_key(&key) {
            guard.insert_new(NeighborRecord::new(key.clone(), device_type));
        }
        let record = guard
            .records
            .get_mut(&key)
            .expect("just inserted or already present");
        record.set_frame_bytes(frame_bytes);
        record.received_at = received_at;
        Ok(record.clone())
    }

    pub fn remove(&self, key: &NeighborKey) -> Result<Option<NeighborRecord>> {
        let mut guard = self.write_guard("remove")?;
        Ok(guard.remove(key))
    }

    /// Removes every record whose hold time has elapsed as of `now`,
    /// preserving the insertion order of the remainder.
    pub fn reap(&self, now: Timestamp) -> Result<usize> {
        let mut guard = self.write_guard("reap")?;
        let expired: Vec<NeighborKey> = guard
            .order
            .iter()
            .filter(|k| {
                guard
                    .records
                    .get(*k)
                    .map(|r| r.is_expired(now))
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        let count = expired.len();
        for key in expired {
            guard.remove(&key);
        }
        Ok(count)
    }

    /// A stable, insertion-ordered snapshot of all live records, taken
    /// under one read-lock acquisition for the inspection surface.
    pub fn snapshot(&self) -> Result<Vec<NeighborRecord>> {
        let guard = self.read_guard("snapshot")?;
        Ok(guard
            .order
            .iter()
            .filter_map(|k| guard.records.get(k).cloned())
            .collect())
    }

    fn read_guard(&self, op: &str) -> Result<std::sync::RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|_| {
            warn!(operation = op, "neighbor table lock poisoned");
            CdpError::LockContention(format!("{op}: neighbor table lock poisoned"))
        })
    }

    fn write_guard(&self, op: &str) -> Result<std::sync::RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|_| {
            warn!(operation = op, "neighbor table lock poisoned");
            CdpError::LockContention(format!("{op}: neighbor table lock poisoned"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(mac: u8) -> NeighborKey {
        NeighborKey::new("eth0", vec![0, 0, 0, 0, 0, mac])
    }

    #[test]
    fn upsert_is_idempotent_on_identity() {
        let table = NeighborTable::new();
        let a = table.upsert(key(1), "Ethernet").unwrap();
        let b = table.upsert(key(1), "Ethernet").unwrap();
        assert_eq!(a.key, b.key);
        assert_eq!(table.snapshot().unwrap().len(), 1);
    }

    #[test]
    fn upsert_and_record_is_visible_with_its_frame_already_attached() {
        let table = NeighborTable::new();
        let record = table
            .upsert_and_record(key(1), "Ethernet", &[2, 42, 0, 0], Timestamp::from_secs(1000))
            .unwrap();
        assert_eq!(record.hold_time_secs(), 42);

        let looked_up = table.lookup(&key(1)).unwrap().unwrap();
        assert_eq!(looked_up.hold_time_secs(), 42);
        assert_eq!(looked_up.received_at, Timestamp::from_secs(1000));
    }

    #[test]
    fn upsert_and_record_on_an_existing_key_overwrites_its_frame() {
        let table = NeighborTable::new();
        table
            .upsert_and_record(key(1), "Ethernet", &[2, 10, 0, 0], Timestamp::from_secs(1000))
            .unwrap();
        table
            .upsert_and_record(key(1), "Ethernet", &[2, 20, 0, 0], Timestamp::from_secs(1010))
            .unwrap();

        assert_eq!(table.snapshot().unwrap().len(), 1);
        let record = table.lookup(&key(1)).unwrap().unwrap();
        assert_eq!(record.hold_time_secs(), 20);
        assert_eq!(record.received_at, Timestamp::from_secs(1010));
    }

    #[test]
    fn reap_removes_only_expired_and_preserves_order() {
        let table = NeighborTable::new();
        table.upsert(key(1), "Ethernet").unwrap();
        table.upsert(key(2), "Ethernet").unwrap();
        table
            .record_frame(&key(1), &[2, 10, 0, 0], Timestamp::from_secs(1000))
            .unwrap();
        table
            .record_frame(&key(2), &[2, 10, 0, 0], Timestamp::from_secs(1005))
            .unwrap();

        let removed = table.reap(Timestamp::from_secs(1009)).unwrap();
        assert_eq!(removed, 1);
        let remaining = table.snapshot().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].key, key(2));
    }

    #[test]
    fn lookup_on_missing_key_returns_none() {
        let table = NeighborTable::new();
        assert!(table.lookup(&key(9)).unwrap().is_none());
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let table = NeighborTable::new();
        for mac in [3u8, 1, 2] {
            table.upsert(key(mac), "Ethernet").unwrap();
        }
        let keys: Vec<_> = table.snapshot().unwrap().into_iter().map(|r| r.key).collect();
        assert_eq!(keys, vec![key(3), key(1), key(2)]);
    }
}
