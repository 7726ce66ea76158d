//! Seeded value generator.
//!
//! Every pseudo-random draw in a simulation is a pure function of
//! `(seed, channel)`. There is no generator state to thread around and no
//! dependence on a platform RNG, so any reimplementation that follows the
//! mixing function below reproduces the same values bit for bit.
//!
//! # Mixing function
//!
//! ```text
//! h = FNV-1a-64(channel)            basis 0xcbf29ce484222325, prime 0x100000001b3
//! z = (seed ^ h) + 0x9e3779b97f4a7c15
//! z = (z ^ (z >> 30)) * 0xbf58476d1ce4e5b9
//! z = (z ^ (z >> 27)) * 0x94d049bb133111eb
//! z = z ^ (z >> 31)
//! value = (z >> 11) * 2^-53                 in [0, 1)
//! ```
//!
//! All arithmetic wraps modulo 2^64.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// 2^-53, the spacing of doubles in [0.5, 1).
const UNIT_SCALE: f64 = 1.0 / (1u64 << 53) as f64;

/// A validated simulation seed.
///
/// Seeds are limited to integers exactly representable as an IEEE double
/// (`0..=2^53-1`) so the same seed can round-trip through JSON consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Seed(u64);

impl Seed {
    /// Largest accepted seed.
    pub const MAX: u64 = (1u64 << 53) - 1;

    /// Validates a raw seed.
    pub fn new(raw: u64) -> Result<Self, ConfigError> {
        if raw > Self::MAX {
            return Err(ConfigError::SeedOutOfRange {
                seed: raw,
                max: Self::MAX,
            });
        }
        Ok(Self(raw))
    }

    /// Returns the raw seed value.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Returns the seed `offset` positions after this one.
    pub fn offset(self, offset: u64) -> Result<Self, ConfigError> {
        match self.0.checked_add(offset) {
            Some(raw) => Self::new(raw),
            None => Err(ConfigError::SeedOutOfRange {
                seed: u64::MAX,
                max: Self::MAX,
            }),
        }
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self(42)
    }
}

impl TryFrom<u64> for Seed {
    type Error = ConfigError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<Seed> for u64 {
    fn from(seed: Seed) -> Self {
        seed.0
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Seed {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u64 = s
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidSeed(s.to_string()))?;
        Self::new(raw)
    }
}

/// FNV-1a over the channel name.
fn fnv1a(channel: &str) -> u64 {
    channel.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// SplitMix64 finalizer.
fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Returns the 64-bit mixed word for `(seed, channel)`.
pub fn mix(seed: Seed, channel: &str) -> u64 {
    splitmix64(seed.get() ^ fnv1a(channel))
}

/// Returns a value in `[0, 1)` determined only by `(seed, channel)`.
///
/// Distinct channels decorrelate draws, so e.g. latency noise and cost noise
/// taken from the same seed do not move together.
pub fn next_value(seed: Seed, channel: &str) -> f64 {
    (mix(seed, channel) >> 11) as f64 * UNIT_SCALE
}

/// Returns a value in `[lo, hi)`.
pub fn next_in_range(seed: Seed, channel: &str, lo: f64, hi: f64) -> f64 {
    lo + next_value(seed, channel) * (hi - lo)
}

/// Returns an integer in `lo..=hi`.
pub fn next_int_inclusive(seed: Seed, channel: &str, lo: u32, hi: u32) -> u32 {
    debug_assert!(lo <= hi);
    let span = f64::from(hi - lo) + 1.0;
    let pick = (next_value(seed, channel) * span).floor() as u32;
    lo + pick.min(hi - lo)
}

/// Returns a multiplicative noise factor in `[1 - amplitude, 1 + amplitude)`.
pub fn noise_factor(seed: Seed, channel: &str, amplitude: f64) -> f64 {
    1.0 + (2.0 * next_value(seed, channel) - 1.0) * amplitude
}
