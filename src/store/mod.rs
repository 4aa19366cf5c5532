//! Bounded in-memory history of normalized approval records.
//!
//! Newest-first ring buffer capped at a fixed capacity; the only mutable
//! state shared between subscription tasks and API readers. History is not
//! persisted and survives stop/start cycles only within the process lifetime.

use crate::monitor::types::ApprovalRecord;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Matches the rolling window the UI expects to page through.
pub const DEFAULT_CAPACITY: usize = 5000;

/// Clonable handle over the shared buffer. All mutation goes through the
/// single mutex inside; critical sections are short and never held across
/// an await point.
#[derive(Debug, Clone)]
pub struct ApprovalStore {
    inner: Arc<Mutex<StoreInner>>,
}

#[derive(Debug)]
struct StoreInner {
    records: VecDeque<ApprovalRecord>,
    /// Ids of the records currently held, for duplicate detection.
    ids: HashSet<String>,
    capacity: usize,
}

impl Default for ApprovalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ApprovalStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                records: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
                ids: HashSet::new(),
                capacity,
            })),
        }
    }

    /// Prepend a record. The oldest entries are evicted once the buffer
    /// exceeds capacity.
    ///
    /// Panics on a duplicate id: the id is derived from (chain, tx, log
    /// index), so a collision means the same event was normalized twice —
    /// a broken invariant, not an external condition.
    pub fn insert(&self, record: ApprovalRecord) {
        let mut inner = self.inner.lock().expect("approval store mutex poisoned");

        assert!(
            inner.ids.insert(record.id.clone()),
            "duplicate approval record id: {}",
            record.id
        );

        info!(
            asset = %record.asset_symbol,
            network = %record.network_name,
            value = %record.formatted_value,
            unlimited = record.is_unlimited,
            "new approval recorded"
        );

        inner.records.push_front(record);
        while inner.records.len() > inner.capacity {
            if let Some(evicted) = inner.records.pop_back() {
                inner.ids.remove(&evicted.id);
                debug!(id = %evicted.id, "evicted oldest approval record");
            }
        }
    }

    /// Full current sequence, newest first.
    pub fn snapshot(&self) -> Vec<ApprovalRecord> {
        let inner = self.inner.lock().expect("approval store mutex poisoned");
        inner.records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.lock().expect("approval store mutex poisoned");
        inner.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    fn record(id: &str) -> ApprovalRecord {
        ApprovalRecord {
            id: id.to_string(),
            network_id: 1,
            network_name: "Ethereum".to_string(),
            explorer_url: "https://etherscan.io".to_string(),
            asset_address: "0xdAC17F958D2ee523a2206206994597C13D831ec7".to_string(),
            asset_symbol: "USDT".to_string(),
            owner: "0x1111111111111111111111111111111111111111".to_string(),
            spender: "0x2222222222222222222222222222222222222222".to_string(),
            raw_value: U256::from(1_000_000_000u64),
            formatted_value: "1000.000000".to_string(),
            is_unlimited: false,
            transaction_hash: format!("0x{id}"),
            block_number: 1,
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_newest_first_order() {
        let store = ApprovalStore::with_capacity(10);
        store.insert(record("a"));
        store.insert(record("b"));
        store.insert(record("c"));

        let snapshot = store.snapshot();
        let ids: Vec<&str> = snapshot.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_capacity_eviction() {
        let store = ApprovalStore::with_capacity(3);
        for i in 0..4 {
            store.insert(record(&format!("r{i}")));
        }

        assert_eq!(store.len(), 3);
        let ids: Vec<String> = store.snapshot().iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec!["r3", "r2", "r1"]);
    }

    #[test]
    fn test_evicted_id_can_reappear() {
        // Uniqueness is scoped to the records currently held; a record that
        // fell off the tail no longer blocks its id.
        let store = ApprovalStore::with_capacity(1);
        store.insert(record("a"));
        store.insert(record("b"));
        store.insert(record("a"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    #[should_panic(expected = "duplicate approval record id")]
    fn test_duplicate_id_is_fatal() {
        let store = ApprovalStore::with_capacity(10);
        store.insert(record("same"));
        store.insert(record("same"));
    }

    #[test]
    fn test_full_window_eviction() {
        let store = ApprovalStore::new();
        for i in 0..(DEFAULT_CAPACITY + 1) {
            store.insert(record(&format!("r{i}")));
        }

        assert_eq!(store.len(), DEFAULT_CAPACITY);
        let snapshot = store.snapshot();
        // Record #0 was evicted; the window holds #1..=#5000 newest-first.
        assert_eq!(snapshot.first().map(|r| r.id.as_str()), Some("r5000"));
        assert_eq!(snapshot.last().map(|r| r.id.as_str()), Some("r1"));
    }
}
