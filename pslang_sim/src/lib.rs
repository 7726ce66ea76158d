//! PS-Lang Deterministic Benchmark Simulation
//!
//! This crate turns a seed and a handful of parameters into reproducible
//! performance metrics for prompts with and without zone filtering.
//!
//! # Core Principle: Everything From The Seed
//!
//! No number in a result depends on anything but its parameters:
//! - **Randomness**: every draw is `next_value(seed, channel)`
//! - **Time and run ids**: supplied by a [`RunContext`]; the default
//!   [`FixedContext`] stamps a fixed epoch and derives the id from the digest
//! - **Attestation**: a SHA-256 digest over the canonical result lets anyone
//!   confirm a reproduction without re-running it
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐
//! │ SimulationParams │────►│      engine      │◄──── RunContext
//! └──────────────────┘     └────────┬─────────┘
//!                                   │ metrics, deltas
//!                          ┌────────▼─────────┐
//!                          │   osm::score     │  disclosure-gated profile
//!                          └────────┬─────────┘
//!                          ┌────────▼─────────┐
//!                          │  attest digest   │
//!                          └────────┬─────────┘
//!              ┌────────────────────┼────────────────────┐
//!         RunHistory           SweepRunner            exporter
//! ```
//!
//! # Usage
//!
//! ```
//! use pslang_sim::{run_simulation, ModelId, ScenarioId, SimulationParams};
//!
//! let params = SimulationParams::new(42)
//!     .unwrap()
//!     .with_model(ModelId::ClaudeSonnet45)
//!     .with_scenario(ScenarioId::MultiToolAgent);
//!
//! let result = run_simulation(&params).unwrap();
//! assert_eq!(result.attest.digest.len(), 12);
//! assert_eq!(result, run_simulation(&params).unwrap());
//! ```

pub mod attest;
pub mod benchmark;
mod context;
pub mod engine;
mod error;
pub mod exporter;
mod history;
pub mod models;
pub mod osm;
pub mod params;
pub mod runner;
pub mod scenarios;

pub use attest::Attestation;
pub use benchmark::{generate_series, BenchmarkDataPoint, DatasetProfile};
pub use context::FixedContext;
pub use engine::{compare, run_simulation, run_simulation_with, Deltas, Metrics, SimulationResult};
pub use error::{Result, SimError};
pub use history::RunHistory;
pub use models::ModelId;
pub use osm::{Osm, OsmBand};
pub use params::{DisclosureLevel, SimulationParams};
pub use runner::{SweepRunner, SweepSummary};
pub use scenarios::ScenarioId;

pub use pslang_env::{ConfigError, RunContext, RunId, Seed, WallClockContext};
