//! Random draws for the simulation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use savanna_core::Coord;

/// The randomness the rules consume: per-phase probability draws, uniform
/// picks among candidate coordinates, and uniform cells for placement.
///
/// Every draw is one-shot; rules never retry a failed draw within a tick.
pub trait RandomSource: Send {
    /// True with the given probability in `[0, 1]`.
    fn chance(&mut self, probability: f64) -> bool;

    /// Uniform index in `[0, len)`. `len` must be nonzero.
    fn pick(&mut self, len: usize) -> usize;

    /// Uniform cell on a `size` x `size` grid.
    fn cell(&mut self, size: usize) -> Coord;
}

/// ChaCha8-backed source, reproducible from a seed.
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seeded from the OS, for runs that need no reproducibility.
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }
}

impl RandomSource for SeededRandom {
    fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn cell(&mut self, size: usize) -> Coord {
        Coord::new(self.rng.gen_range(0..size), self.rng.gen_range(0..size))
    }
}

/// Uniform choice among candidate coordinates; `None` when there are none.
pub(crate) fn choose(rng: &mut dyn RandomSource, candidates: &[Coord]) -> Option<Coord> {
    if candidates.is_empty() {
        None
    } else {
        Some(candidates[rng.pick(candidates.len())])
    }
}
