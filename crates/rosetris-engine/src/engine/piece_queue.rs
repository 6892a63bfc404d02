use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Number of upcoming pieces visible to the player.
pub const QUEUE_LEN: usize = 3;

/// The lookahead window of upcoming pieces.
///
/// Every entry is an independent uniform draw over the 7 kinds; popping the
/// head shifts the window and draws a fresh tail entry, so the window always
/// holds exactly [`QUEUE_LEN`] pieces. There is no bag fairness - droughts
/// and repeats are part of the rule set, not a defect.
#[derive(Debug, Clone)]
pub struct PieceQueue {
    rng: Pcg32,
    upcoming: [PieceKind; QUEUE_LEN],
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceQueue {
    /// Creates a queue with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for a deterministic
    /// piece sequence.
    #[must_use]
    pub fn with_seed(seed: QueueSeed) -> Self {
        let mut rng = Pcg32::from_seed(seed.0);
        let upcoming: [PieceKind; QUEUE_LEN] = [(); QUEUE_LEN].map(|()| rng.random());
        Self { rng, upcoming }
    }

    /// Pops the head of the queue, shifting the window and drawing a fresh
    /// entry onto the tail.
    pub fn pop_next(&mut self) -> PieceKind {
        let head = self.upcoming[0];
        self.upcoming.rotate_left(1);
        self.upcoming[QUEUE_LEN - 1] = self.rng.random();
        head
    }

    /// The upcoming pieces, head first.
    #[must_use]
    pub fn preview(&self) -> [PieceKind; QUEUE_LEN] {
        self.upcoming
    }
}

/// Seed for deterministic piece generation.
///
/// 128 bits, displayed and serialized as a 32-character hex string. The same
/// seed yields the same piece sequence, which the tests and the CLI `--seed`
/// flag rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSeed([u8; 16]);

impl fmt::Display for QueueSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for QueueSeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(format!(
                "invalid seed: expected 32 hex characters, got {}",
                s.len()
            ));
        }
        let num =
            u128::from_str_radix(s, 16).map_err(|e| format!("invalid seed: {s} ({e})"))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for QueueSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QueueSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random seeds with `rng.random()`.
impl Distribution<QueueSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> QueueSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        QueueSeed(seed)
    }
}
