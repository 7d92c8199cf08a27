//! Reference-data cache with immutable snapshot + ArcSwap
//!
//! Readers load the current snapshot pointer without locking and keep their
//! `Arc` for as long as they need it. Writers build a complete new snapshot
//! and swap it in with a single atomic store.

use arc_swap::ArcSwap;
use chrono::Utc;
use name_matching::NameProfile;
use screening_core::{WatchlistEntry, WatchlistStats};
use std::sync::{Arc, Mutex, PoisonError};

/// A watchlist entry with its name precomputed for scoring
#[derive(Debug, Clone)]
pub struct IndexedEntry {
    pub entry: WatchlistEntry,
    pub profile: NameProfile,
}

impl IndexedEntry {
    pub fn new(entry: WatchlistEntry) -> Self {
        let profile = NameProfile::new(&entry.display_name);
        Self { entry, profile }
    }
}

/// Point-in-time copy of both reference lists.
///
/// Never mutated after construction; entries keep feed insertion order.
#[derive(Debug, Default)]
pub struct Snapshot {
    sanctions: Vec<IndexedEntry>,
    peps: Vec<IndexedEntry>,
    loaded_at_epoch_millis: i64,
}

impl Snapshot {
    pub fn new(
        sanctions: Vec<WatchlistEntry>,
        peps: Vec<WatchlistEntry>,
        loaded_at_epoch_millis: i64,
    ) -> Self {
        Self {
            sanctions: sanctions.into_iter().map(IndexedEntry::new).collect(),
            peps: peps.into_iter().map(IndexedEntry::new).collect(),
            loaded_at_epoch_millis,
        }
    }

    /// The never-loaded snapshot: no entries, timestamp 0
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn sanctions(&self) -> &[IndexedEntry] {
        &self.sanctions
    }

    pub fn peps(&self) -> &[IndexedEntry] {
        &self.peps
    }

    pub fn loaded_at_epoch_millis(&self) -> i64 {
        self.loaded_at_epoch_millis
    }

    pub fn stats(&self) -> WatchlistStats {
        WatchlistStats {
            sanctions_count: self.sanctions.len(),
            peps_count: self.peps.len(),
            last_loaded_epoch_millis: self.loaded_at_epoch_millis,
        }
    }
}

pub struct WatchlistCache {
    current: ArcSwap<Snapshot>,
    /// Serializes writers; readers never touch it
    writer: Mutex<()>,
}

impl WatchlistCache {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(Snapshot::empty()),
            writer: Mutex::new(()),
        }
    }

    /// Lock-free load of the current snapshot
    #[inline]
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Build a snapshot from fresh lists, timestamped now, and install it.
    pub fn replace(&self, sanctions: Vec<WatchlistEntry>, peps: Vec<WatchlistEntry>) -> Arc<Snapshot> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = Arc::new(Snapshot::new(sanctions, peps, Utc::now().timestamp_millis()));
        self.current.store(Arc::clone(&snapshot));
        snapshot
    }

    /// Install a prebuilt snapshot as-is
    pub fn install(&self, snapshot: Arc<Snapshot>) {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.current.store(snapshot);
    }

    pub fn stats(&self) -> WatchlistStats {
        self.current.load().stats()
    }
}

impl Default for WatchlistCache {
    fn default() -> Self {
        Self::new()
    }
}
