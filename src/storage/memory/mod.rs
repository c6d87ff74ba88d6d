//! In-memory key-value backend.
//!
//! One shared map from `"<namespace>:<id>"` keys to versioned JSON records,
//! partitioned per entity type. Queries are linear scans over the namespace
//! with typed field comparison after decoding; ids come from a monotonic
//! numeric counter per namespace. The store is owned by whoever builds
//! [`crate::storage::Stores`] and handed to the DAOs by `Arc` — there is no
//! process-global instance.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

mod accounts;
mod codec;
mod events;
mod tickets;
mod users;

pub use accounts::MemoryAccountStore;
pub use events::MemoryEventStore;
pub use tickets::MemoryTicketStore;
pub use users::MemoryUserStore;

pub(crate) const NS_EVENT: &str = "event";
pub(crate) const NS_USER: &str = "user";
pub(crate) const NS_ACCOUNT: &str = "account";
pub(crate) const NS_TICKET: &str = "ticket";

pub struct KvStore {
    entries: RwLock<HashMap<String, String>>,
    // Seeded from the namespace's max existing id on first use, then
    // strictly incremented. Numeric, never derived from key ordering.
    counters: Mutex<HashMap<&'static str, i64>>,
}

impl KvStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            counters: Mutex::new(HashMap::new()),
        }
    }

    /// Allocate the next id for a namespace. Takes the already-locked
    /// entries map so callers allocate inside their critical section, after
    /// their uniqueness checks; a rejected insert therefore never consumes
    /// an id.
    pub(crate) fn next_id(&self, ns: &'static str, map: &HashMap<String, String>) -> i64 {
        let mut counters = self.counters.lock().unwrap();
        let counter = counters.entry(ns).or_insert_with(|| max_id(map, ns));
        *counter += 1;
        *counter
    }

    pub(crate) fn with_read<R>(&self, f: impl FnOnce(&HashMap<String, String>) -> R) -> R {
        f(&self.entries.read().unwrap())
    }

    /// Run a read-modify-write sequence as one critical section. Composite
    /// operations (booking, cascade deletes) go through here so concurrent
    /// requests cannot interleave.
    pub(crate) fn with_write<R>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> R) -> R {
        f(&mut self.entries.write().unwrap())
    }
}

impl Default for KvStore {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn entry_key(ns: &str, id: i64) -> String {
    format!("{ns}:{id}")
}

/// All records in a namespace as `(id, raw)` pairs in ascending numeric id
/// order. Keys with a non-numeric suffix do not occur; they are skipped
/// rather than trusted.
pub(crate) fn ns_entries(map: &HashMap<String, String>, ns: &str) -> Vec<(i64, String)> {
    let prefix = format!("{ns}:");
    let mut rows: Vec<(i64, String)> = map
        .iter()
        .filter_map(|(key, value)| {
            let suffix = key.strip_prefix(&prefix)?;
            let id = suffix.parse::<i64>().ok()?;
            Some((id, value.clone()))
        })
        .collect();
    rows.sort_by_key(|(id, _)| *id);
    rows
}

fn max_id(map: &HashMap<String, String>, ns: &str) -> i64 {
    ns_entries(map, ns)
        .last()
        .map(|(id, _)| *id)
        .unwrap_or(0)
}
