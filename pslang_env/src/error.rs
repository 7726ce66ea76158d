//! Error types for the PS-Lang environment abstraction.

use thiserror::Error;

/// Errors raised when caller-supplied configuration cannot be honoured.
///
/// None of these are ever papered over with a fallback value: substituting a
/// different seed or profile would silently break reproducibility.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Seed outside the portable integer range
    #[error("Seed {seed} out of range (max {max})")]
    SeedOutOfRange { seed: u64, max: u64 },

    /// Seed string that is not an unsigned integer
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    /// Unknown model identifier
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// Unknown scenario identifier
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    /// Unknown disclosure level
    #[error("Unknown disclosure level: {0}")]
    UnknownDisclosure(String),

    /// Unknown benchmark dataset profile
    #[error("Unknown dataset profile: {0}")]
    UnknownProfile(String),

    /// Iteration or seed count outside the accepted bounds
    #[error("{what} must be between {min} and {max}, got {got}")]
    OutOfBounds {
        what: &'static str,
        min: u64,
        max: u64,
        got: u64,
    },
}

impl ConfigError {
    /// Creates a bounds error.
    pub fn out_of_bounds(what: &'static str, min: u64, max: u64, got: u64) -> Self {
        Self::OutOfBounds { what, min, max, got }
    }
}
