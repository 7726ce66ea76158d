//! Workload scenarios for the simulation engine.

use pslang_env::ConfigError;
use serde::{Deserialize, Serialize};

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScenarioId {
    /// Retrieval-augmented question answering: few rounds, large retrieved context
    #[serde(rename = "rag-qa")]
    RagQa,

    /// Agent loop with several tool invocations per round
    #[serde(rename = "multi-tool-agent")]
    MultiToolAgent,

    /// One or two turns over a very long conversation history
    #[serde(rename = "long-context-chat")]
    LongContextChat,
}

/// Static workload profile of a scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioProfile {
    /// Baseline round count range (inclusive)
    pub rounds: (u32, u32),

    /// Token reduction range achieved with zone filtering, as fractions
    pub token_reduction: (f64, f64),

    /// Prompt tokens sent per round
    pub input_tokens_per_round: f64,

    /// Completion tokens received per round (before model verbosity)
    pub output_tokens_per_round: f64,

    /// Tool invocations per round
    pub tool_calls_per_round: f64,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::RagQa,
            ScenarioId::MultiToolAgent,
            ScenarioId::LongContextChat,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::RagQa => "rag-qa",
            ScenarioId::MultiToolAgent => "multi-tool-agent",
            ScenarioId::LongContextChat => "long-context-chat",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::RagQa => "Retrieval QA: 2-3 rounds over ~6k tokens of retrieved passages",
            ScenarioId::MultiToolAgent => "Tool-using agent: 4-7 rounds, ~2.5 tool calls per round",
            ScenarioId::LongContextChat => "Long chat: 1-2 turns over ~42k tokens of history",
        }
    }

    /// Returns the workload profile.
    pub fn profile(&self) -> ScenarioProfile {
        match self {
            ScenarioId::RagQa => ScenarioProfile {
                rounds: (2, 3),
                token_reduction: (0.18, 0.28),
                input_tokens_per_round: 6_000.0,
                output_tokens_per_round: 650.0,
                tool_calls_per_round: 1.0,
            },
            ScenarioId::MultiToolAgent => ScenarioProfile {
                rounds: (4, 7),
                token_reduction: (0.25, 0.40),
                input_tokens_per_round: 3_800.0,
                output_tokens_per_round: 420.0,
                tool_calls_per_round: 2.5,
            },
            ScenarioId::LongContextChat => ScenarioProfile {
                rounds: (1, 2),
                token_reduction: (0.30, 0.45),
                input_tokens_per_round: 42_000.0,
                output_tokens_per_round: 1_100.0,
                tool_calls_per_round: 0.0,
            },
        }
    }
}

impl Default for ScenarioId {
    fn default() -> Self {
        ScenarioId::MultiToolAgent
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rag-qa" | "rag_qa" | "ragqa" => Ok(ScenarioId::RagQa),
            "multi-tool-agent" | "multi_tool_agent" | "multitoolagent" => {
                Ok(ScenarioId::MultiToolAgent)
            }
            "long-context-chat" | "long_context_chat" | "longcontextchat" => {
                Ok(ScenarioId::LongContextChat)
            }
            _ => Err(ConfigError::UnknownScenario(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_round_trip_names() {
        for scenario in ScenarioId::all() {
            assert_eq!(scenario.name().parse::<ScenarioId>().unwrap(), scenario);
        }
    }

    #[test]
    fn test_scenario_aliases() {
        assert_eq!("RAG_QA".parse::<ScenarioId>().unwrap(), ScenarioId::RagQa);
    }

    #[test]
    fn test_unknown_scenario_is_config_error() {
        assert_eq!(
            "chatbot".parse::<ScenarioId>(),
            Err(ConfigError::UnknownScenario("chatbot".to_string()))
        );
    }

    #[test]
    fn test_profiles_are_well_formed() {
        for scenario in ScenarioId::all() {
            let p = scenario.profile();
            assert!(p.rounds.0 >= 1 && p.rounds.0 <= p.rounds.1);
            assert!(p.token_reduction.0 < p.token_reduction.1);
            assert!(p.token_reduction.1 < 1.0);
        }
    }

    #[test]
    fn test_scenario_serde_name() {
        let json = serde_json::to_string(&ScenarioId::MultiToolAgent).unwrap();
        assert_eq!(json, "\"multi-tool-agent\"");
    }
}
