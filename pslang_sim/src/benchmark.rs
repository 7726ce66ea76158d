//! Benchmark series generator.
//!
//! Produces a chartable series of token counts and improvement percentages
//! across `n` iterations. Each dataset profile fixes a curve shape, a start
//! and end improvement, a noise amplitude, and its own RNG seed, so a
//! `(n, profile)` pair always regenerates the same series.
//!
//! ```text
//! t      = (i − 1) / (n − 1)
//! base   = start + (end − start) × curve(t)
//! tokens = base × (1 + ε₁)          ε ~ N(0, (noise/2)²), clamped to ±noise
//! time   = 0.8  × base × (1 + ε₂)
//! cost   = 0.95 × base × (1 + ε₃)
//! ```

use pslang_env::ConfigError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Smallest accepted iteration count.
pub const MIN_ITERATIONS: usize = 1;

/// Largest accepted iteration count.
pub const MAX_ITERATIONS: usize = 100;

/// Time improvement relative to token improvement.
const TIME_FACTOR: f64 = 0.8;

/// Cost improvement relative to token improvement.
const COST_FACTOR: f64 = 0.95;

/// Steepness of the sigmoid curve.
const SIGMOID_K: f64 = 10.0;

/// How the base improvement moves from start to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurveShape {
    Linear,
    EaseOut,
    Sigmoid,
    Logarithmic,
}

impl CurveShape {
    /// Maps `t` in `[0, 1]` onto `[0, 1]`. Every shape is monotone with
    /// `f(0) = 0` and `f(1) = 1`.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            CurveShape::Linear => t,
            CurveShape::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            CurveShape::Sigmoid => {
                let logistic = |x: f64| 1.0 / (1.0 + (-SIGMOID_K * (x - 0.5)).exp());
                let lo = logistic(0.0);
                let hi = logistic(1.0);
                (logistic(t) - lo) / (hi - lo)
            }
            CurveShape::Logarithmic => (1.0 + 9.0 * t).ln() / 10f64.ln(),
        }
    }
}

/// Shape parameters of a dataset profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileShape {
    /// Token count of an unannotated run
    pub regular_tokens: f64,
    /// Token improvement at the first iteration
    pub start: f64,
    /// Token improvement at the last iteration
    pub end: f64,
    pub curve: CurveShape,
    /// Maximum relative noise
    pub noise: f64,
    /// Seed of the noise stream
    pub seed: u64,
}

/// Named dataset profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatasetProfile {
    #[default]
    Baseline,
    HeavyZones,
    BenchmarkZones,
    PrivateZones,
    MinimalZones,
}

impl DatasetProfile {
    /// Returns a list of all profiles.
    pub fn all() -> Vec<DatasetProfile> {
        vec![
            DatasetProfile::Baseline,
            DatasetProfile::HeavyZones,
            DatasetProfile::BenchmarkZones,
            DatasetProfile::PrivateZones,
            DatasetProfile::MinimalZones,
        ]
    }

    /// Returns the profile name.
    pub fn name(&self) -> &'static str {
        match self {
            DatasetProfile::Baseline => "baseline",
            DatasetProfile::HeavyZones => "heavy-zones",
            DatasetProfile::BenchmarkZones => "benchmark-zones",
            DatasetProfile::PrivateZones => "private-zones",
            DatasetProfile::MinimalZones => "minimal-zones",
        }
    }

    /// Returns the profile's curve parameters.
    pub fn shape(&self) -> ProfileShape {
        match self {
            DatasetProfile::Baseline => ProfileShape {
                regular_tokens: 12_000.0,
                start: 0.05,
                end: 0.18,
                curve: CurveShape::Linear,
                noise: 0.02,
                seed: 0xB45E_0001,
            },
            DatasetProfile::HeavyZones => ProfileShape {
                regular_tokens: 18_000.0,
                start: 0.15,
                end: 0.42,
                curve: CurveShape::EaseOut,
                noise: 0.04,
                seed: 0xB45E_0002,
            },
            DatasetProfile::BenchmarkZones => ProfileShape {
                regular_tokens: 15_000.0,
                start: 0.10,
                end: 0.35,
                curve: CurveShape::Sigmoid,
                noise: 0.03,
                seed: 0xB45E_0003,
            },
            DatasetProfile::PrivateZones => ProfileShape {
                regular_tokens: 14_000.0,
                start: 0.12,
                end: 0.30,
                curve: CurveShape::Logarithmic,
                noise: 0.03,
                seed: 0xB45E_0004,
            },
            DatasetProfile::MinimalZones => ProfileShape {
                regular_tokens: 8_000.0,
                start: 0.02,
                end: 0.08,
                curve: CurveShape::Linear,
                noise: 0.05,
                seed: 0xB45E_0005,
            },
        }
    }
}

impl std::fmt::Display for DatasetProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DatasetProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "baseline" => Ok(DatasetProfile::Baseline),
            "heavy-zones" | "heavy" => Ok(DatasetProfile::HeavyZones),
            "benchmark-zones" | "benchmark" => Ok(DatasetProfile::BenchmarkZones),
            "private-zones" | "private" => Ok(DatasetProfile::PrivateZones),
            "minimal-zones" | "minimal" => Ok(DatasetProfile::MinimalZones),
            _ => Err(ConfigError::UnknownProfile(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCount {
    pub tokens: u64,
}

/// Improvements in percent, positive when PS-Lang is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    pub tokens: f64,
    pub time: f64,
    pub cost: f64,
}

/// One iteration of a benchmark series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkDataPoint {
    /// 1-based
    pub iteration: usize,
    pub regular: TokenCount,
    pub ps_lang: TokenCount,
    pub improvement: Improvement,
}

/// Mean and final improvements of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub iterations: usize,
    pub mean_tokens: f64,
    pub mean_time: f64,
    pub mean_cost: f64,
    pub final_tokens: f64,
    pub tokens_saved: u64,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn noise(rng: &mut ChaCha8Rng, amplitude: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    (z * amplitude / 2.0).clamp(-amplitude, amplitude)
}

/// Generates `iterations` data points for `profile`.
pub fn generate_series(
    iterations: usize,
    profile: DatasetProfile,
) -> Result<Vec<BenchmarkDataPoint>, ConfigError> {
    if !(MIN_ITERATIONS..=MAX_ITERATIONS).contains(&iterations) {
        return Err(ConfigError::out_of_bounds(
            "iteration count",
            MIN_ITERATIONS as u64,
            MAX_ITERATIONS as u64,
            iterations as u64,
        ));
    }

    let shape = profile.shape();
    let mut rng = ChaCha8Rng::seed_from_u64(shape.seed);
    debug!("Generating {} iterations of {}", iterations, profile);

    let series = (1..=iterations)
        .map(|i| {
            let t = if iterations == 1 {
                1.0
            } else {
                (i - 1) as f64 / (iterations - 1) as f64
            };
            let base = shape.start + (shape.end - shape.start) * shape.curve.apply(t);

            // Draw order is fixed: tokens, time, cost, regular count.
            let tokens = base * (1.0 + noise(&mut rng, shape.noise));
            let time = TIME_FACTOR * base * (1.0 + noise(&mut rng, shape.noise));
            let cost = COST_FACTOR * base * (1.0 + noise(&mut rng, shape.noise));
            let regular = (shape.regular_tokens * (1.0 + noise(&mut rng, shape.noise))).round();
            let ps_lang = (regular * (1.0 - tokens)).round();

            BenchmarkDataPoint {
                iteration: i,
                regular: TokenCount {
                    tokens: regular as u64,
                },
                ps_lang: TokenCount {
                    tokens: ps_lang as u64,
                },
                improvement: Improvement {
                    tokens: round2(100.0 * tokens),
                    time: round2(100.0 * time),
                    cost: round2(100.0 * cost),
                },
            }
        })
        .collect();

    Ok(series)
}

/// Summarizes a series. Returns `None` for an empty one.
pub fn summarize(series: &[BenchmarkDataPoint]) -> Option<SeriesSummary> {
    let last = series.last()?;
    let n = series.len() as f64;
    let mean = |f: fn(&Improvement) -> f64| series.iter().map(|p| f(&p.improvement)).sum::<f64>() / n;

    Some(SeriesSummary {
        iterations: series.len(),
        mean_tokens: round2(mean(|i| i.tokens)),
        mean_time: round2(mean(|i| i.time)),
        mean_cost: round2(mean(|i| i.cost)),
        final_tokens: last.improvement.tokens,
        tokens_saved: series
            .iter()
            .map(|p| p.regular.tokens.saturating_sub(p.ps_lang.tokens))
            .sum(),
    })
}
