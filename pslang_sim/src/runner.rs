//! Sweep runner - executes one configuration across consecutive seeds.

use crate::context::FixedContext;
use crate::engine::{run_simulation_with, Deltas, SimulationResult};
use crate::error::Result;
use crate::params::SimulationParams;
use pslang_env::{ConfigError, RunContext};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Maximum number of seeds in one sweep.
pub const MAX_SWEEP_SEEDS: u64 = 10_000;

/// Mean, minimum and maximum of one delta across a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl DeltaStats {
    fn from_values(values: impl Iterator<Item = f64>) -> Self {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            count += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        if count == 0 {
            return Self { mean: 0.0, min: 0.0, max: 0.0 };
        }
        Self {
            mean: sum / count as f64,
            min,
            max,
        }
    }
}

/// Aggregate over every run of a sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSummary {
    /// Configuration every run shared, seed set to the first one
    pub params: SimulationParams,

    /// Number of runs
    pub runs: usize,

    pub tokens: DeltaStats,
    pub latency: DeltaStats,
    pub rounds: DeltaStats,
    pub cost: DeltaStats,

    /// Mean OSM score
    pub mean_score: f64,

    /// Individual results, in seed order
    pub results: Vec<SimulationResult>,
}

/// Runs a configuration across `count` consecutive seeds.
pub struct SweepRunner {
    /// Base configuration
    params: SimulationParams,

    /// Number of seeds
    count: u64,

    /// Source of run ids and timestamps
    context: Arc<dyn RunContext>,
}

impl SweepRunner {
    /// Creates a runner over `count` seeds starting at `params.seed`.
    ///
    /// Fails if `count` is zero, too large, or would step past the last valid seed.
    pub fn new(params: SimulationParams, count: u64) -> std::result::Result<Self, ConfigError> {
        if count == 0 || count > MAX_SWEEP_SEEDS {
            return Err(ConfigError::out_of_bounds("seed count", 1, MAX_SWEEP_SEEDS, count));
        }
        params.seed.offset(count - 1)?;
        Ok(Self {
            params,
            count,
            context: Arc::new(FixedContext::new()),
        })
    }

    /// Sets the run context.
    pub fn with_context(mut self, context: Arc<dyn RunContext>) -> Self {
        self.context = context;
        self
    }

    /// Runs every seed and summarizes.
    pub fn run(&self) -> Result<SweepSummary> {
        info!(
            "Sweeping {} seeds from {} ({} / {})",
            self.count, self.params.seed, self.params.model, self.params.scenario
        );

        let mut results = Vec::with_capacity(self.count as usize);
        for i in 0..self.count {
            let params = self.params.with_seed(self.params.seed.offset(i)?);
            let result = run_simulation_with(self.context.as_ref(), &params)?;
            debug!("  seed={} score={}", result.seed, result.osm.score_public);
            results.push(result);
        }

        Ok(summarize(self.params, results))
    }
}

fn summarize(params: SimulationParams, results: Vec<SimulationResult>) -> SweepSummary {
    let deltas: Vec<Deltas> = results.iter().map(|r| r.deltas_vs_no_ps).collect();
    let mean_score = if results.is_empty() {
        0.0
    } else {
        results.iter().map(|r| r.osm.score_public).sum::<f64>() / results.len() as f64
    };

    SweepSummary {
        params,
        runs: results.len(),
        tokens: DeltaStats::from_values(deltas.iter().map(|d| d.tokens)),
        latency: DeltaStats::from_values(deltas.iter().map(|d| d.latency)),
        rounds: DeltaStats::from_values(deltas.iter().map(|d| d.rounds)),
        cost: DeltaStats::from_values(deltas.iter().map(|d| d.cost)),
        mean_score,
        results,
    }
}
