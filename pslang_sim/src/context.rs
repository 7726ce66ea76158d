//! Reproducible run context.

use pslang_env::{RunContext, RunId};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Default epoch for reproducible runs: 2024-01-01 00:00:00 UTC.
pub const DEFAULT_EPOCH_SECS: u64 = 1_704_067_200;

/// Context backed by a fixed clock and digest-derived run ids.
///
/// This implements `RunContext` so that every field of a result, including
/// its run id and timestamp, is a pure function of the parameters:
/// - The clock always reads the configured epoch
/// - Run ids are the first 16 bytes of the attestation digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedContext {
    /// Time every run is stamped with
    epoch: SystemTime,
}

impl FixedContext {
    /// Creates a context stamped at the default epoch.
    pub fn new() -> Self {
        Self::at_secs(DEFAULT_EPOCH_SECS)
    }

    /// Creates a context stamped at `secs` after the Unix epoch.
    pub fn at_secs(secs: u64) -> Self {
        Self {
            epoch: UNIX_EPOCH + Duration::from_secs(secs),
        }
    }

    /// Creates an Arc-wrapped context for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Default for FixedContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RunContext for FixedContext {
    fn system_time(&self) -> SystemTime {
        self.epoch
    }

    fn run_id(&self, full_digest: &[u8]) -> RunId {
        RunId::from_digest(full_digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_context_time() {
        let ctx = FixedContext::new();
        assert_eq!(ctx.timestamp_ms(), DEFAULT_EPOCH_SECS * 1000);
        assert_eq!(FixedContext::at_secs(1).timestamp_ms(), 1000);
    }

    #[test]
    fn test_fixed_context_deterministic_run_ids() {
        let ctx1 = FixedContext::new();
        let ctx2 = FixedContext::new();
        let digest = [9u8; 32];

        // Same digest = same run id
        assert_eq!(ctx1.run_id(&digest), ctx2.run_id(&digest));

        // Different digest = different run id
        assert_ne!(ctx1.run_id(&digest), ctx1.run_id(&[8u8; 32]));
    }
}
