//! Run context trait: the only source of wall-clock time and run identity.

use crate::types::RunId;
use std::time::{SystemTime, UNIX_EPOCH};

/// Abstracts the parts of a simulation run that come from "outside".
///
/// The engine itself is a pure function of its parameters. The timestamp and
/// run id stamped onto a result are supplied by the context instead, so that
/// a caller can choose between a reproducible run and a live one.
///
/// # Implementations
///
/// - **Live**: `WallClockContext` - system clock, random v4 run ids
/// - **Reproducible**: `FixedContext` (in `pslang_sim`) - fixed epoch,
///   run ids derived from the attestation digest
pub trait RunContext: Send + Sync {
    /// Returns the wall-clock time to stamp on the result.
    fn system_time(&self) -> SystemTime;

    /// Returns the run id for a result with the given attestation digest.
    fn run_id(&self, full_digest: &[u8]) -> RunId;

    /// Milliseconds since the Unix epoch, saturating at zero for pre-epoch clocks.
    fn timestamp_ms(&self) -> u64 {
        self.system_time()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
