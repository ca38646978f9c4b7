//! Random sources driving every probability gate
//!
//! The engine is generic over [`RandomSource`] so tests can pin rolls to
//! fixed values while real runs use a seeded ChaCha stream.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Supplies uniform rolls in `[0, 1)` and uniform picks from a list
pub trait RandomSource {
    /// Next uniform roll in `[0, 1)`
    fn roll(&mut self) -> f64;

    /// Uniform index in `0..len`
    ///
    /// The default derives the index from one roll, so a fixed roll always
    /// picks the same slot.
    fn pick(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        let idx = (self.roll() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }

    /// Seed that reproduces this stream, if there is one
    fn seed(&self) -> Option<u64> {
        None
    }
}

/// Deterministic ChaCha8 stream
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
    seed: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed from entropy, remembering the drawn seed for replay
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }
}

impl RandomSource for SeededRandom {
    fn roll(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn seed(&self) -> Option<u64> {
        Some(self.seed)
    }
}

/// Always returns the same roll
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn roll(&mut self) -> f64 {
        self.0
    }
}

/// Plays back queued rolls, then falls back to a constant
///
/// Picks consume a roll like any other gate, so a script lists rolls and
/// picks in the exact order the engine asks for them.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    rolls: VecDeque<f64>,
    fallback: f64,
    consumed: usize,
}

impl ScriptedRandom {
    pub fn new(rolls: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            fallback,
            consumed: 0,
        }
    }

    /// Roll that selects `index` out of `len` through the default `pick`
    pub fn pick_roll(index: usize, len: usize) -> f64 {
        (index as f64 + 0.5) / len as f64
    }

    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl RandomSource for ScriptedRandom {
    fn roll(&mut self) -> f64 {
        self.consumed += 1;
        self.rolls.pop_front().unwrap_or(self.fallback)
    }
}
