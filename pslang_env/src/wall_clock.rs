//! Live implementation of RunContext.

use crate::{RunContext, RunId};
use std::sync::Arc;
use std::time::SystemTime;

/// Context backed by the system clock and random run ids.
///
/// Results stamped by this context carry a real timestamp, so two runs with
/// identical parameters differ in `run_id`/`timestamp` but still share the
/// same attestation digest.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClockContext;

impl WallClockContext {
    /// Creates a new WallClockContext.
    pub fn new() -> Self {
        Self
    }

    /// Creates an Arc-wrapped context for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl RunContext for WallClockContext {
    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }

    fn run_id(&self, _full_digest: &[u8]) -> RunId {
        RunId::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_clock_timestamp_is_recent() {
        let ctx = WallClockContext::new();
        // 2024-01-01T00:00:00Z
        assert!(ctx.timestamp_ms() > 1_704_067_200_000);
    }

    #[test]
    fn test_wall_clock_run_ids_are_random() {
        let ctx = WallClockContext::new();
        let digest = [7u8; 32];
        assert_ne!(ctx.run_id(&digest), ctx.run_id(&digest));
    }
}
