use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::spawn_table::SpawnTable;
use crate::ParseSeedError;

/// Seed for deterministic piece generation.
///
/// A 128-bit value written as up to 32 hex digits. Two games built from the
/// same rule set and seed, fed the same commands, evolve identically.
///
/// # Example
///
/// ```
/// use cylindris_engine::PieceSeed;
///
/// let seed: PieceSeed = "2a".parse().unwrap();
/// assert_eq!(seed, PieceSeed::from(42));
/// assert_eq!(seed.to_string(), "0000000000000000000000000000002a");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    /// Raw big-endian bytes, e.g. for seeding other generators.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl From<u128> for PieceSeed {
    fn from(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() > 32 {
            return Err(ParseSeedError::InvalidLength { len: s.len() });
        }
        if let Some(ch) = s.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ParseSeedError::InvalidDigit { ch });
        }
        let num = u128::from_str_radix(s, 16)
            .map_err(|_| ParseSeedError::InvalidLength { len: s.len() })?;
        Ok(Self::from(num))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows `rng.random::<PieceSeed>()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Random source for piece selection and spawn columns.
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: Pcg32,
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceGenerator {
    /// Creates a generator from a fresh random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// Rolls a number in `[0, 100)` and returns the template index it selects.
    pub fn next_template(&mut self, table: &SpawnTable) -> usize {
        let roll = self.rng.random_range(0.0..SpawnTable::TOTAL);
        table.pick(roll)
    }

    /// Returns a column uniformly drawn from `[0, upper)`, or 0 when `upper`
    /// is 0.
    pub fn spawn_x(&mut self, upper: u16) -> i32 {
        if upper == 0 {
            return 0;
        }
        i32::from(self.rng.random_range(0..upper))
    }
}
