//! Generator progress forwarded to the log.

use std::sync::atomic::{AtomicU64, Ordering};

use plexus_core::ProgressSink;
use tracing::{debug, info};

/// Logs every phase at `info` and progress at `debug` in steps of
/// `granularity` percent.
#[derive(Debug)]
pub(super) struct LoggedProgress {
    granularity: f64,
    last_bucket: AtomicU64,
}

impl LoggedProgress {
    pub(super) const fn new(granularity: f64) -> Self {
        Self {
            granularity,
            last_bucket: AtomicU64::new(0),
        }
    }

    fn bucket(&self, percent: f64) -> u64 {
        let clamped = percent.clamp(0.0, 100.0);
        (clamped / self.granularity).floor() as u64
    }
}

impl ProgressSink for LoggedProgress {
    fn on_progress(&self, percent: f64) {
        let bucket = self.bucket(percent);
        if self.last_bucket.fetch_max(bucket, Ordering::Relaxed) < bucket {
            debug!(percent, "generation progress");
        }
    }

    fn on_phase(&self, name: &str) {
        info!(phase = name, "generation phase");
    }
}
