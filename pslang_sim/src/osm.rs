//! OSM score: a single comparable number for a simulation run.
//!
//! # Formula
//! ```text
//! score = Σ(w_i × Δ_i) × Q − λ × P
//! ```
//!
//! Where:
//! - `Δ_i` is the relative change on metric `i` (negative when PS-Lang
//!   reduced it); only tokens, latency and rounds are weighted
//! - `Q` is the quality gate, `λ × P` the fixed penalty
//!
//! Reductions make the score more negative, so lower is better. The score
//! is not rounded; bands are derived from the exact value.
//!
//! The disclosure level controls which of these internals are attached to
//! the result. It never changes the score.

use crate::engine::Deltas;
use crate::params::DisclosureLevel;
use serde::{Deserialize, Serialize};

/// Quality gate multiplier.
pub const QUALITY_GATE: f64 = 0.94;

/// Penalty coefficient (λ).
pub const PENALTY_LAMBDA: f64 = 0.08;

/// Penalty magnitude (P).
pub const PENALTY_MAGNITUDE: f64 = 0.22;

/// Weight vector over the publicly disclosable deltas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OsmWeights {
    pub tokens: f64,
    pub latency: f64,
    pub rounds: f64,
}

impl Default for OsmWeights {
    fn default() -> Self {
        Self {
            tokens: 0.5,
            latency: 0.3,
            rounds: 0.2,
        }
    }
}

/// Qualitative band for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsmBand {
    Negligible,
    Marginal,
    Moderate,
    Strong,
    Exceptional,
}

impl OsmBand {
    /// Maps a score onto its band (inclusive upper bounds, lower is better).
    pub fn from_score(score: f64) -> Self {
        if score <= -0.35 {
            OsmBand::Exceptional
        } else if score <= -0.25 {
            OsmBand::Strong
        } else if score <= -0.15 {
            OsmBand::Moderate
        } else if score <= -0.05 {
            OsmBand::Marginal
        } else {
            OsmBand::Negligible
        }
    }

    /// Returns the band name.
    pub fn name(&self) -> &'static str {
        match self {
            OsmBand::Negligible => "negligible",
            OsmBand::Marginal => "marginal",
            OsmBand::Moderate => "moderate",
            OsmBand::Strong => "strong",
            OsmBand::Exceptional => "exceptional",
        }
    }
}

impl std::fmt::Display for OsmBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Penalty terms, shown at `private_demo`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OsmPenalty {
    pub lambda: f64,
    pub magnitude: f64,
}

/// One metric's share of the score, shown at `private_demo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsmTerm {
    pub metric: String,
    pub delta: f64,
    pub weight: f64,
    /// `weight × delta × Q`, in score units
    pub contribution: f64,
}

/// Disclosure-dependent view of the scoring internals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsmProfile {
    pub disclosure: DisclosureLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<OsmWeights>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_gate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty: Option<OsmPenalty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<Vec<OsmTerm>>,
}

impl OsmProfile {
    /// Names of the fields this profile reveals.
    pub fn revealed_fields(&self) -> Vec<&'static str> {
        let mut fields = vec!["disclosure"];
        if self.weights.is_some() {
            fields.push("weights");
        }
        if self.quality_gate.is_some() {
            fields.push("quality_gate");
        }
        if self.penalty.is_some() {
            fields.push("penalty");
        }
        if self.terms.is_some() {
            fields.push("terms");
        }
        fields
    }
}

/// Score, band and disclosed internals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Osm {
    pub score_public: f64,
    pub band: OsmBand,
    pub profile: OsmProfile,
}

/// Scores a set of deltas.
pub fn score(deltas: &Deltas, disclosure: DisclosureLevel) -> Osm {
    let w = OsmWeights::default();
    let weighted = w.tokens * deltas.tokens + w.latency * deltas.latency + w.rounds * deltas.rounds;
    let score_public = weighted * QUALITY_GATE - PENALTY_LAMBDA * PENALTY_MAGNITUDE;

    let mut profile = OsmProfile {
        disclosure,
        weights: None,
        quality_gate: None,
        penalty: None,
        terms: None,
    };

    if disclosure.reveals(DisclosureLevel::PassThrough) {
        profile.weights = Some(w);
        profile.quality_gate = Some(QUALITY_GATE);
    }

    if disclosure.reveals(DisclosureLevel::PrivateDemo) {
        profile.penalty = Some(OsmPenalty {
            lambda: PENALTY_LAMBDA,
            magnitude: PENALTY_MAGNITUDE,
        });
        let term = |metric: &str, delta: f64, weight: f64| OsmTerm {
            metric: metric.to_string(),
            delta,
            weight,
            contribution: weight * delta * QUALITY_GATE,
        };
        profile.terms = Some(vec![
            term("tokens", deltas.tokens, w.tokens),
            term("latency", deltas.latency, w.latency),
            term("rounds", deltas.rounds, w.rounds),
            term("cost", deltas.cost, 0.0),
        ]);
    }

    Osm {
        score_public,
        band: OsmBand::from_score(score_public),
        profile,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn deltas(tokens: f64, latency: f64, rounds: f64) -> Deltas {
        Deltas {
            tokens,
            latency,
            rounds,
            cost: tokens,
        }
    }

    #[test]
    fn test_zero_deltas_leave_only_penalty() {
        let osm = score(&Deltas::default(), DisclosureLevel::Public);
        assert_relative_eq!(osm.score_public, -0.0176, epsilon = 1e-12);
        assert_eq!(osm.band, OsmBand::Negligible);
    }

    #[test]
    fn test_score_formula() {
        // 0.5*-0.3 + 0.3*-0.2 + 0.2*-0.1 = -0.23; -0.23*0.94 - 0.0176 = -0.2338
        let osm = score(&deltas(-0.3, -0.2, -0.1), DisclosureLevel::Public);
        assert_relative_eq!(osm.score_public, -0.2338, epsilon = 1e-12);
        assert_eq!(osm.band, OsmBand::Moderate);
    }

    #[test]
    fn test_band_thresholds() {
        assert_eq!(OsmBand::from_score(-0.35), OsmBand::Exceptional);
        assert_eq!(OsmBand::from_score(-0.3499), OsmBand::Strong);
        assert_eq!(OsmBand::from_score(-0.15), OsmBand::Moderate);
        assert_eq!(OsmBand::from_score(-0.05), OsmBand::Marginal);
        assert_eq!(OsmBand::from_score(-0.0499), OsmBand::Negligible);
        assert_eq!(OsmBand::from_score(0.3), OsmBand::Negligible);
    }

    #[test]
    fn test_disclosure_reveals_superset_with_same_score() {
        let d = deltas(-0.31, -0.22, -0.14);
        let public = score(&d, DisclosureLevel::Public);
        let pass = score(&d, DisclosureLevel::PassThrough);
        let private = score(&d, DisclosureLevel::PrivateDemo);

        assert_eq!(public.score_public.to_bits(), pass.score_public.to_bits());
        assert_eq!(pass.score_public.to_bits(), private.score_public.to_bits());

        let pf = public.profile.revealed_fields();
        let tf = pass.profile.revealed_fields();
        let vf = private.profile.revealed_fields();
        assert!(pf.iter().all(|f| tf.contains(f)));
        assert!(tf.iter().all(|f| vf.contains(f)));
        assert!(pf.len() < tf.len() && tf.len() < vf.len());
    }

    #[test]
    fn test_private_terms_sum_to_weighted_part() {
        let d = deltas(-0.31, -0.22, -0.14);
        let osm = score(&d, DisclosureLevel::PrivateDemo);
        let terms = osm.profile.terms.unwrap();
        let sum: f64 = terms.iter().map(|t| t.contribution).sum();
        let expected = osm.score_public + PENALTY_LAMBDA * PENALTY_MAGNITUDE;
        assert_relative_eq!(sum, expected, epsilon = 1e-12);
        assert_eq!(terms.last().unwrap().weight, 0.0);
    }

    #[test]
    fn test_public_profile_serializes_minimal() {
        let osm = score(&Deltas::default(), DisclosureLevel::Public);
        let json = serde_json::to_value(&osm.profile).unwrap();
        assert_eq!(json, serde_json::json!({ "disclosure": "public" }));
    }
}
