//! Simulation input parameters.

use crate::models::ModelId;
use crate::scenarios::ScenarioId;
use pslang_env::{ConfigError, Seed};
use serde::{Deserialize, Serialize};

/// How much of the scoring internals a result reveals.
///
/// Levels are ordered: each one shows everything the previous one shows.
/// The score itself never changes between levels.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum DisclosureLevel {
    /// Score and band only
    #[default]
    #[serde(rename = "public")]
    Public,
    /// Adds the weight vector and quality gate
    #[serde(rename = "pass-through")]
    PassThrough,
    /// Adds penalty terms and per-metric contributions
    #[serde(rename = "private_demo")]
    PrivateDemo,
}

impl DisclosureLevel {
    /// Returns a list of all levels, least revealing first.
    pub fn all() -> Vec<DisclosureLevel> {
        vec![
            DisclosureLevel::Public,
            DisclosureLevel::PassThrough,
            DisclosureLevel::PrivateDemo,
        ]
    }

    /// Returns the level name.
    pub fn name(&self) -> &'static str {
        match self {
            DisclosureLevel::Public => "public",
            DisclosureLevel::PassThrough => "pass-through",
            DisclosureLevel::PrivateDemo => "private_demo",
        }
    }

    /// True if this level shows everything `other` shows.
    pub fn reveals(&self, other: DisclosureLevel) -> bool {
        *self >= other
    }
}

impl std::fmt::Display for DisclosureLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DisclosureLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(DisclosureLevel::Public),
            "pass-through" | "pass_through" | "passthrough" => Ok(DisclosureLevel::PassThrough),
            "private_demo" | "private-demo" | "privatedemo" => Ok(DisclosureLevel::PrivateDemo),
            _ => Err(ConfigError::UnknownDisclosure(s.to_string())),
        }
    }
}

/// Immutable input to one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationParams {
    pub seed: Seed,
    pub model: ModelId,
    pub scenario: ScenarioId,
    pub pslang_enabled: bool,
    pub disclosure_level: DisclosureLevel,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            seed: Seed::default(),
            model: ModelId::default(),
            scenario: ScenarioId::default(),
            pslang_enabled: true,
            disclosure_level: DisclosureLevel::default(),
        }
    }
}

impl SimulationParams {
    /// Creates parameters for `seed` with default model, scenario and disclosure.
    ///
    /// Out-of-range seeds are rejected, never clamped.
    pub fn new(seed: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            seed: Seed::new(seed)?,
            ..Default::default()
        })
    }

    /// Sets the model.
    pub fn with_model(mut self, model: ModelId) -> Self {
        self.model = model;
        self
    }

    /// Sets the scenario.
    pub fn with_scenario(mut self, scenario: ScenarioId) -> Self {
        self.scenario = scenario;
        self
    }

    /// Enables or disables zone filtering.
    pub fn with_pslang(mut self, enabled: bool) -> Self {
        self.pslang_enabled = enabled;
        self
    }

    /// Sets the disclosure level.
    pub fn with_disclosure(mut self, level: DisclosureLevel) -> Self {
        self.disclosure_level = level;
        self
    }

    /// Same parameters with a different seed.
    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = seed;
        self
    }
}
