//! The simulation engine.
//!
//! Turns a [`SimulationParams`] into a [`SimulationResult`] with closed-form
//! arithmetic over the rate tables. Every pseudo-random quantity is a
//! `next_value(seed, channel)` draw, so a result is reproducible from its
//! parameters alone.
//!
//! # Algorithm
//!
//! 1. Baseline (zone filtering off): rounds drawn from the scenario's range,
//!    then tokens, tool calls and latency from per-round rates, each with
//!    its own ±2% noise channel.
//! 2. With filtering on: a token reduction `r` is drawn from the scenario's
//!    range; tokens shrink by `r`, rounds by `r/2`, tool calls with rounds,
//!    and latency is recomputed with the same noise.
//! 3. Cost, deltas vs. the same-seed baseline, OSM score, attestation.

use crate::attest::{self, Attestation, AttestationPayload};
use crate::context::FixedContext;
use crate::error::Result;
use crate::models::{ModelId, ModelProfile};
use crate::osm::{self, Osm};
use crate::params::{DisclosureLevel, SimulationParams};
use crate::scenarios::{ScenarioId, ScenarioProfile};
use pslang_env::{next_in_range, next_int_inclusive, noise_factor, RunContext, RunId, Seed};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Amplitude of per-metric noise.
pub const NOISE_AMPLITUDE: f64 = 0.02;

/// Fraction of the token reduction that carries over to round count.
pub const ROUND_REDUCTION_SHARE: f64 = 0.5;

/// Measured quantities of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub tokens_in: u64,
    pub tokens_out: u64,
    pub latency_ms: u64,
    pub rounds: u32,
    pub tool_calls: u32,
    pub cost_usd: f64,
}

impl Metrics {
    /// Prompt plus completion tokens.
    pub fn total_tokens(&self) -> u64 {
        self.tokens_in + self.tokens_out
    }
}

/// Relative change vs. the same-seed run without zone filtering.
///
/// Negative values are reductions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Deltas {
    pub tokens: f64,
    pub latency: f64,
    pub rounds: f64,
    pub cost: f64,
}

impl Deltas {
    /// Deltas of `with` relative to `without`.
    pub fn between(without: &Metrics, with: &Metrics) -> Self {
        Self {
            tokens: relative(with.total_tokens() as f64, without.total_tokens() as f64),
            latency: relative(with.latency_ms as f64, without.latency_ms as f64),
            rounds: relative(f64::from(with.rounds), f64::from(without.rounds)),
            cost: relative(with.cost_usd, without.cost_usd),
        }
    }
}

fn relative(new: f64, old: f64) -> f64 {
    if old == 0.0 {
        0.0
    } else {
        (new - old) / old
    }
}

/// Output of one simulation run. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub run_id: RunId,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub seed: u64,
    pub model: ModelId,
    pub scenario: ScenarioId,
    pub pslang: bool,
    pub metrics: Metrics,
    pub deltas_vs_no_ps: Deltas,
    pub osm: Osm,
    pub attest: Attestation,
}

impl SimulationResult {
    /// Disclosure level the result was rendered at.
    pub fn disclosure(&self) -> DisclosureLevel {
        self.osm.profile.disclosure
    }

    /// Recomputes the attestation from the published fields.
    ///
    /// Returns false if any attested field was altered after the run.
    pub fn verify(&self) -> Result<bool> {
        let bytes = attest::digest_bytes(&self.payload())?;
        Ok(Attestation::from_bytes(&bytes) == self.attest)
    }

    fn payload(&self) -> AttestationPayload<'_> {
        AttestationPayload {
            seed: self.seed,
            model: self.model,
            scenario: self.scenario,
            pslang: self.pslang,
            metrics: &self.metrics,
            deltas: &self.deltas_vs_no_ps,
            osm_score: self.osm.score_public,
            osm_band: self.osm.band,
        }
    }
}

/// Baseline and filtered runs of the same seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub baseline: SimulationResult,
    pub pslang: SimulationResult,
}

fn latency_ms(model: &ModelProfile, rounds: u32, tokens_in: u64, tokens_out: u64, noise: f64) -> u64 {
    (model.latency_ms(rounds, tokens_in, tokens_out) * noise).round() as u64
}

/// Metrics with zone filtering off.
pub fn baseline_metrics(seed: Seed, model: ModelId, scenario: ScenarioId) -> Metrics {
    let sp: ScenarioProfile = scenario.profile();
    let mp = model.profile();

    let rounds = next_int_inclusive(seed, "rounds", sp.rounds.0, sp.rounds.1);
    let r = f64::from(rounds);

    let tokens_in = (sp.input_tokens_per_round
        * r
        * noise_factor(seed, "noise:tokens_in", NOISE_AMPLITUDE))
    .round() as u64;
    let tokens_out = (sp.output_tokens_per_round
        * r
        * mp.verbosity
        * noise_factor(seed, "noise:tokens_out", NOISE_AMPLITUDE))
    .round() as u64;
    let tool_calls = (sp.tool_calls_per_round
        * r
        * noise_factor(seed, "noise:tool_calls", NOISE_AMPLITUDE))
    .round() as u32;
    let latency = latency_ms(
        &mp,
        rounds,
        tokens_in,
        tokens_out,
        noise_factor(seed, "noise:latency_ms", NOISE_AMPLITUDE),
    );

    Metrics {
        tokens_in,
        tokens_out,
        latency_ms: latency,
        rounds,
        tool_calls,
        cost_usd: mp.cost_usd(tokens_in, tokens_out),
    }
}

/// Token reduction fraction drawn for `seed` within the scenario's range.
pub fn token_reduction(seed: Seed, scenario: ScenarioId) -> f64 {
    let (lo, hi) = scenario.profile().token_reduction;
    next_in_range(seed, "reduction:tokens", lo, hi)
}

/// Metrics with zone filtering on, derived from the same-seed baseline.
pub fn filtered_metrics(seed: Seed, model: ModelId, scenario: ScenarioId, base: &Metrics) -> Metrics {
    let mp = model.profile();
    let r = token_reduction(seed, scenario);
    let keep = 1.0 - r;

    let tokens_in = (base.tokens_in as f64 * keep).round() as u64;
    let tokens_out = (base.tokens_out as f64 * keep).round() as u64;
    let rounds = ((f64::from(base.rounds) * (1.0 - r * ROUND_REDUCTION_SHARE)).round() as u32).max(1);
    let tool_calls =
        (f64::from(base.tool_calls) * f64::from(rounds) / f64::from(base.rounds)).round() as u32;
    let latency = latency_ms(
        &mp,
        rounds,
        tokens_in,
        tokens_out,
        noise_factor(seed, "noise:latency_ms", NOISE_AMPLITUDE),
    );

    Metrics {
        tokens_in,
        tokens_out,
        latency_ms: latency,
        rounds,
        tool_calls,
        cost_usd: mp.cost_usd(tokens_in, tokens_out),
    }
}

/// Runs one simulation with the reproducible [`FixedContext`].
pub fn run_simulation(params: &SimulationParams) -> Result<SimulationResult> {
    run_simulation_with(&FixedContext::new(), params)
}

/// Runs one simulation, taking run id and timestamp from `ctx`.
pub fn run_simulation_with(ctx: &dyn RunContext, params: &SimulationParams) -> Result<SimulationResult> {
    let seed = params.seed;
    let base = baseline_metrics(seed, params.model, params.scenario);

    let (metrics, deltas) = if params.pslang_enabled {
        let filtered = filtered_metrics(seed, params.model, params.scenario, &base);
        (filtered, Deltas::between(&base, &filtered))
    } else {
        (base, Deltas::default())
    };

    let osm = osm::score(&deltas, params.disclosure_level);

    let digest = attest::digest_bytes(&AttestationPayload {
        seed: seed.get(),
        model: params.model,
        scenario: params.scenario,
        pslang: params.pslang_enabled,
        metrics: &metrics,
        deltas: &deltas,
        osm_score: osm.score_public,
        osm_band: osm.band,
    })?;
    let attest = Attestation::from_bytes(&digest);

    debug!(
        "seed={} model={} scenario={} pslang={} tokens={} score={} digest={}",
        seed,
        params.model,
        params.scenario,
        params.pslang_enabled,
        metrics.total_tokens(),
        osm.score_public,
        attest.digest
    );

    Ok(SimulationResult {
        run_id: ctx.run_id(&digest),
        timestamp: ctx.timestamp_ms(),
        seed: seed.get(),
        model: params.model,
        scenario: params.scenario,
        pslang: params.pslang_enabled,
        metrics,
        deltas_vs_no_ps: deltas,
        osm,
        attest,
    })
}

/// Runs the same seed with filtering off and on.
pub fn compare(params: &SimulationParams) -> Result<Comparison> {
    compare_with(&FixedContext::new(), params)
}

/// [`compare`] with an explicit context.
pub fn compare_with(ctx: &dyn RunContext, params: &SimulationParams) -> Result<Comparison> {
    Ok(Comparison {
        baseline: run_simulation_with(ctx, &params.with_pslang(false))?,
        pslang: run_simulation_with(ctx, &params.with_pslang(true))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pslang_env::WallClockContext;
    use proptest::prelude::*;

    fn params(seed: u64) -> SimulationParams {
        SimulationParams::new(seed).unwrap()
    }

    #[test]
    fn test_run_is_deterministic() {
        let p = params(42);
        let a = run_simulation(&p).unwrap();
        let b = run_simulation(&p).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.attest.digest, b.attest.digest);
    }

    #[test]
    fn test_disabled_run_has_zero_deltas() {
        let result = run_simulation(&params(42).with_pslang(false)).unwrap();
        assert_eq!(result.deltas_vs_no_ps, Deltas::default());
        assert_eq!(result.metrics, baseline_metrics(params(42).seed, result.model, result.scenario));
    }

    #[test]
    fn test_enabled_run_reduces_everything() {
        for scenario in ScenarioId::all() {
            let result = run_simulation(&params(7).with_scenario(scenario)).unwrap();
            let d = result.deltas_vs_no_ps;
            assert!(d.tokens < 0.0, "{}: tokens {}", scenario, d.tokens);
            assert!(d.latency < 0.0, "{}: latency {}", scenario, d.latency);
            assert!(d.rounds <= 0.0, "{}: rounds {}", scenario, d.rounds);
            assert!(d.cost < 0.0, "{}: cost {}", scenario, d.cost);
        }
    }

    #[test]
    fn test_token_delta_within_scenario_range() {
        for raw in 0..200 {
            let p = params(raw).with_scenario(ScenarioId::RagQa);
            let (lo, hi) = ScenarioId::RagQa.profile().token_reduction;
            let result = run_simulation(&p).unwrap();
            // Rounding to whole tokens moves the ratio by well under 0.1%.
            assert!(-result.deltas_vs_no_ps.tokens > lo - 1e-3);
            assert!(-result.deltas_vs_no_ps.tokens < hi + 1e-3);
        }
    }

    #[test]
    fn test_baseline_rounds_in_range() {
        for raw in 0..200 {
            for scenario in ScenarioId::all() {
                let m = baseline_metrics(params(raw).seed, ModelId::Gpt4o, scenario);
                let (lo, hi) = scenario.profile().rounds;
                assert!(m.rounds >= lo && m.rounds <= hi);
            }
        }
    }

    #[test]
    fn test_long_context_chat_has_no_tool_calls() {
        let result = run_simulation(&params(3).with_scenario(ScenarioId::LongContextChat)).unwrap();
        assert_eq!(result.metrics.tool_calls, 0);
    }

    #[test]
    fn test_digest_independent_of_disclosure_and_context() {
        let p = params(99);
        let public = run_simulation(&p).unwrap();
        let private = run_simulation(&p.with_disclosure(DisclosureLevel::PrivateDemo)).unwrap();
        let live = run_simulation_with(&WallClockContext::new(), &p).unwrap();

        assert_eq!(public.attest, private.attest);
        assert_eq!(public.attest, live.attest);
        assert_eq!(public.osm.score_public.to_bits(), private.osm.score_public.to_bits());
        assert_ne!(public.run_id, live.run_id);
    }

    #[test]
    fn test_verify_detects_tampering() {
        let mut result = run_simulation(&params(5)).unwrap();
        assert!(result.verify().unwrap());
        result.metrics.tokens_in += 1;
        assert!(!result.verify().unwrap());
    }

    #[test]
    fn test_compare_pairs_same_seed() {
        let cmp = compare(&params(11)).unwrap();
        assert!(!cmp.baseline.pslang);
        assert!(cmp.pslang.pslang);
        assert!(cmp.pslang.metrics.total_tokens() < cmp.baseline.metrics.total_tokens());
        assert_ne!(cmp.baseline.attest, cmp.pslang.attest);
    }

    #[test]
    fn test_result_json_round_trip() {
        let result = run_simulation(&params(8).with_disclosure(DisclosureLevel::PrivateDemo)).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let back: SimulationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.attest, result.attest);
        assert_eq!(back.run_id, result.run_id);
        assert_eq!(back.metrics.total_tokens(), result.metrics.total_tokens());
    }

    proptest! {
        #[test]
        fn prop_costs_are_non_negative(
            raw in 0u64..=Seed::MAX,
            model in prop::sample::select(ModelId::all()),
            scenario in prop::sample::select(ScenarioId::all()),
            pslang in any::<bool>(),
        ) {
            let p = params(raw).with_model(model).with_scenario(scenario).with_pslang(pslang);
            let result = run_simulation(&p).unwrap();
            prop_assert!(result.metrics.cost_usd >= 0.0);
            prop_assert!(result.metrics.rounds >= 1);
            prop_assert!(result.deltas_vs_no_ps.tokens <= 0.0);
        }
    }
}
