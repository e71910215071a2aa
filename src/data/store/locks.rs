//! Per-asset ingest serialization.
//!
//! Within one asset at most one ingest may be in flight: the store file is
//! append-only, but concurrent merges against the same path could interleave
//! or duplicate rows. A lock map keyed by store path keeps unrelated assets
//! fully concurrent while same-asset calls queue. The async mutex is held
//! across ingest-then-compute so a compute never observes a half-merged
//! series.
//!
//! Entries are never evicted: the map holds one `Arc<Mutex>` per store path
//! ever touched, bounded by the number of distinct assets a process tracks.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct AssetLocks {
    locks: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
}

impl AssetLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock handle for one store path. Callers `.lock().await` the returned
    /// mutex for the duration of their ingest (or ingest-then-compute) call.
    pub fn lock_for(&self, path: &Path) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(
            map.entry(path.to_path_buf())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        )
    }
}
