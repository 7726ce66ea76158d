//! Model rate tables.

use pslang_env::ConfigError;
use serde::{Deserialize, Serialize};

/// Supported model identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModelId {
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    #[serde(rename = "claude-sonnet-4.5")]
    ClaudeSonnet45,
    #[serde(rename = "claude-haiku-4.5")]
    ClaudeHaiku45,
    #[serde(rename = "gemini-2.5-pro")]
    Gemini25Pro,
    #[serde(rename = "llama-3.1-70b")]
    Llama70b,
}

/// Pricing and speed of one model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelProfile {
    /// USD per million prompt tokens
    pub rate_in: f64,
    /// USD per million completion tokens
    pub rate_out: f64,
    /// Fixed per-round overhead (ms)
    pub round_overhead_ms: f64,
    pub ms_per_input_token: f64,
    pub ms_per_output_token: f64,
    /// Completion length multiplier relative to the scenario baseline
    pub verbosity: f64,
}

impl ModelProfile {
    /// `tokens_in/1e6 × rate_in + tokens_out/1e6 × rate_out`
    pub fn cost_usd(&self, tokens_in: u64, tokens_out: u64) -> f64 {
        tokens_in as f64 / 1e6 * self.rate_in + tokens_out as f64 / 1e6 * self.rate_out
    }

    /// Unperturbed latency of a run, in milliseconds.
    pub fn latency_ms(&self, rounds: u32, tokens_in: u64, tokens_out: u64) -> f64 {
        self.round_overhead_ms * f64::from(rounds)
            + tokens_in as f64 * self.ms_per_input_token
            + tokens_out as f64 * self.ms_per_output_token
    }
}

impl ModelId {
    /// Returns a list of all models.
    pub fn all() -> Vec<ModelId> {
        vec![
            ModelId::Gpt4o,
            ModelId::Gpt4oMini,
            ModelId::ClaudeSonnet45,
            ModelId::ClaudeHaiku45,
            ModelId::Gemini25Pro,
            ModelId::Llama70b,
        ]
    }

    /// Returns the model name.
    pub fn name(&self) -> &'static str {
        match self {
            ModelId::Gpt4o => "gpt-4o",
            ModelId::Gpt4oMini => "gpt-4o-mini",
            ModelId::ClaudeSonnet45 => "claude-sonnet-4.5",
            ModelId::ClaudeHaiku45 => "claude-haiku-4.5",
            ModelId::Gemini25Pro => "gemini-2.5-pro",
            ModelId::Llama70b => "llama-3.1-70b",
        }
    }

    /// Returns the rate table entry.
    pub fn profile(&self) -> ModelProfile {
        let (rate_in, rate_out, round_overhead_ms, ms_in, ms_out, verbosity) = match self {
            ModelId::Gpt4o => (2.50, 10.00, 320.0, 0.020, 11.0, 1.00),
            ModelId::Gpt4oMini => (0.15, 0.60, 240.0, 0.012, 7.0, 0.90),
            ModelId::ClaudeSonnet45 => (3.00, 15.00, 380.0, 0.022, 12.5, 1.10),
            ModelId::ClaudeHaiku45 => (1.00, 5.00, 220.0, 0.010, 6.5, 0.95),
            ModelId::Gemini25Pro => (1.25, 10.00, 350.0, 0.018, 10.0, 1.05),
            ModelId::Llama70b => (0.88, 0.88, 280.0, 0.015, 9.0, 1.00),
        };
        ModelProfile {
            rate_in,
            rate_out,
            round_overhead_ms,
            ms_per_input_token: ms_in,
            ms_per_output_token: ms_out,
            verbosity,
        }
    }
}

impl Default for ModelId {
    fn default() -> Self {
        ModelId::ClaudeSonnet45
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ModelId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ModelId::all()
            .into_iter()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownModel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_model_round_trip_names() {
        for model in ModelId::all() {
            assert_eq!(model.name().parse::<ModelId>().unwrap(), model);
        }
    }

    #[test]
    fn test_unknown_model_is_config_error() {
        assert!(matches!(
            "gpt-2".parse::<ModelId>(),
            Err(ConfigError::UnknownModel(_))
        ));
    }

    #[test]
    fn test_cost_formula() {
        let sonnet = ModelId::ClaudeSonnet45.profile();
        // 1M in at $3 + 100k out at $15
        assert_relative_eq!(sonnet.cost_usd(1_000_000, 100_000), 4.5, epsilon = 1e-12);
        assert_eq!(sonnet.cost_usd(0, 0), 0.0);
    }

    #[test]
    fn test_latency_formula() {
        let mini = ModelId::Gpt4oMini.profile();
        assert_relative_eq!(mini.latency_ms(2, 1_000, 100), 480.0 + 12.0 + 700.0, epsilon = 1e-9);
    }
}
