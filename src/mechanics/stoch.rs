//! Stochastic mechanics: the coin behind bonus-package rolls.
//! Stores take any `Coin`, so tests can pin the outcome while production
//! code flips a seeded `bevy_prng::WyRand`.

use std::fmt;

use bevy_prng::WyRand;
use rand_core::{RngCore, SeedableRng};

/// Bernoulli(p) from any RNG core.
#[inline]
pub fn bernoulli<R: RngCore + ?Sized>(rng: &mut R, p: f64) -> bool {
    let u = ((rng.next_u64() >> 11) as f64) / ((1u64 << 53) as f64);
    u < p.clamp(0.0, 1.0)
}

/// Source of yes/no outcomes with a given success probability.
pub trait Coin {
    fn flip(&mut self, p: f64) -> bool;
}

/// WyRand-backed coin.
pub struct SeededCoin {
    rng: WyRand,
}

impl fmt::Debug for SeededCoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeededCoin").finish_non_exhaustive()
    }
}

impl SeededCoin {
    pub fn new(seed: u64) -> Self {
        Self { rng: WyRand::from_seed(seed.to_le_bytes()) }
    }

    /// Seeded from the wall clock.
    pub fn from_clock() -> Self {
        let now = chrono::Utc::now();
        let seed = now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp()) as u64;
        Self::new(seed)
    }
}

impl Coin for SeededCoin {
    #[inline]
    fn flip(&mut self, p: f64) -> bool {
        bernoulli(&mut self.rng, p)
    }
}

/// Always lands the same way; counts how often it was flipped.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedCoin {
    pub outcome: bool,
    pub flips: usize,
}

impl FixedCoin {
    pub fn heads() -> Self {
        Self { outcome: true, flips: 0 }
    }

    pub fn tails() -> Self {
        Self { outcome: false, flips: 0 }
    }
}

impl Coin for FixedCoin {
    fn flip(&mut self, _p: f64) -> bool {
        self.flips += 1;
        self.outcome
    }
}

impl<C: Coin + ?Sized> Coin for &mut C {
    fn flip(&mut self, p: f64) -> bool {
        (**self).flip(p)
    }
}
