//! Attestation digests for simulation results.
//!
//! A digest lets two people confirm they reproduced the same run without
//! re-running it. It covers the inputs and every published number, but not
//! the run id, the timestamp or the disclosure profile: those vary with the
//! context a run was made in, not with what was computed.

use crate::engine::{Deltas, Metrics};
use crate::error::Result;
use crate::models::ModelId;
use crate::osm::OsmBand;
use crate::scenarios::ScenarioId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Hex characters kept in the short digest.
pub const SHORT_DIGEST_LEN: usize = 12;

/// Short and full fingerprint of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    /// First 12 hex characters of `full_digest`
    pub digest: String,
    /// SHA-256 of the canonical payload, lowercase hex
    pub full_digest: String,
}

/// Everything an attestation commits to.
#[derive(Debug, Clone, Serialize)]
pub struct AttestationPayload<'a> {
    pub seed: u64,
    pub model: ModelId,
    pub scenario: ScenarioId,
    pub pslang: bool,
    pub metrics: &'a Metrics,
    pub deltas: &'a Deltas,
    pub osm_score: f64,
    pub osm_band: OsmBand,
}

/// Recursively sorts object keys.
fn sort_keys(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().collect();
            keys.sort();
            let mut sorted = serde_json::Map::new();
            for key in keys {
                if let Some(v) = map.get(key) {
                    sorted.insert(key.clone(), sort_keys(v));
                }
            }
            serde_json::Value::Object(sorted)
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(sort_keys).collect())
        }
        other => other.clone(),
    }
}

/// Compact JSON with sorted keys.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value)?;
    Ok(serde_json::to_string(&sort_keys(&value))?)
}

/// Raw SHA-256 of the canonical payload.
pub fn digest_bytes(payload: &AttestationPayload<'_>) -> Result<[u8; 32]> {
    let canonical = canonical_json(payload)?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    Ok(out)
}

impl Attestation {
    /// Builds the attestation from raw digest bytes.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        let full_digest = hex::encode(bytes);
        Self {
            digest: full_digest[..SHORT_DIGEST_LEN].to_string(),
            full_digest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload<'a>(metrics: &'a Metrics, deltas: &'a Deltas, seed: u64) -> AttestationPayload<'a> {
        AttestationPayload {
            seed,
            model: ModelId::Gpt4o,
            scenario: ScenarioId::RagQa,
            pslang: true,
            metrics,
            deltas,
            osm_score: 12.5,
            osm_band: OsmBand::Marginal,
        }
    }

    #[test]
    fn test_canonical_json_sorts_keys() {
        let value = serde_json::json!({ "b": 1, "a": { "d": 2, "c": 3 } });
        assert_eq!(canonical_json(&value).unwrap(), r#"{"a":{"c":3,"d":2},"b":1}"#);
    }

    #[test]
    fn test_digest_is_stable_and_sensitive() {
        let metrics = Metrics::default();
        let deltas = Deltas::default();
        let a = digest_bytes(&payload(&metrics, &deltas, 1)).unwrap();
        let b = digest_bytes(&payload(&metrics, &deltas, 1)).unwrap();
        let c = digest_bytes(&payload(&metrics, &deltas, 2)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_attestation_shapes() {
        let att = Attestation::from_bytes(&[0x0f; 32]);
        assert_eq!(att.full_digest.len(), 64);
        assert_eq!(att.digest, "0f0f0f0f0f0f");
        assert!(att.full_digest.starts_with(&att.digest));
    }
}
