//! Common types for the PS-Lang environment abstraction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a single simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Creates a new random RunId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a RunId from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Creates a deterministic RunId from digest bytes.
    ///
    /// Only the first 16 bytes are used; shorter input is zero padded.
    pub fn from_digest(digest: &[u8]) -> Self {
        let mut bytes = [0u8; 16];
        let n = digest.len().min(16);
        bytes[..n].copy_from_slice(&digest[..n]);
        Self(Uuid::from_bytes(bytes))
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// First 8 hex characters, for log lines.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_from_digest_is_deterministic() {
        let digest = [0xabu8; 32];
        assert_eq!(RunId::from_digest(&digest), RunId::from_digest(&digest));
        assert_eq!(RunId::from_digest(&digest).short(), "abababab");
    }

    #[test]
    fn test_run_id_from_short_digest_pads() {
        let id = RunId::from_digest(&[1, 2]);
        assert_eq!(&id.as_uuid().as_bytes()[..3], &[1, 2, 0]);
    }

    #[test]
    fn test_random_run_ids_differ() {
        assert_ne!(RunId::new(), RunId::new());
    }
}
