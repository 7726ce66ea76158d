//! PS-Lang Environment Abstraction Layer
//!
//! Everything that could make a simulation run non-reproducible lives behind
//! this crate:
//! - Randomness: every draw is `next_value(seed, channel)`, a pure mixing
//!   function of a validated 64-bit seed
//! - Time and identity: supplied through a [`RunContext`]
//! - Configuration failures: a single [`ConfigError`] type
//!
//! By deriving all entropy from one seed, any reported number can be
//! reproduced from the seed alone.
//!
//! # Example
//!
//! ```
//! use pslang_env::{next_value, Seed};
//!
//! let seed = Seed::new(42).unwrap();
//! let a = next_value(seed, "noise:latency_ms");
//! assert_eq!(a, next_value(seed, "noise:latency_ms"));
//! ```

mod context;
mod error;
mod seed;
mod types;
mod wall_clock;

pub use context::RunContext;
pub use error::ConfigError;
pub use seed::{mix, next_in_range, next_int_inclusive, next_value, noise_factor, Seed};
pub use types::RunId;
pub use wall_clock::WallClockContext;
