//! Process-wide mirror write counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Outcome counters for mirror writes.
///
/// `failed` counts writes that never reached the index, so a growing value
/// means the mirror is drifting from the primary store.
#[derive(Debug, Default)]
pub struct MirrorStats {
    mirrored: AtomicU64,
    superseded: AtomicU64,
    failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MirrorStatsSnapshot {
    pub mirrored: u64,
    pub superseded: u64,
    pub failed: u64,
}

impl MirrorStats {
    pub fn record_mirrored(&self) {
        self.mirrored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_superseded(&self) {
        self.superseded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> MirrorStatsSnapshot {
        MirrorStatsSnapshot {
            mirrored: self.mirrored.load(Ordering::Relaxed),
            superseded: self.superseded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}
