//! Energy model and noise sources
//!
//! `energy(n) = target + exp(-n / decay) + u * (noise_scale / n)` with `u`
//! drawn uniformly from `[-0.5, 0.5)`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Default convergence target
pub const DEFAULT_TARGET: f64 = -1.137;

/// Default decay constant of the exponential error term
pub const DEFAULT_DECAY_CONSTANT: f64 = 5.0;

/// Default numerator of the `noise_scale / n` damping factor
pub const DEFAULT_NOISE_SCALE: f64 = 0.5;

/// One (iteration, energy, target) record produced per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationSample {
    pub iteration: u32,
    pub energy: f64,
    pub target: f64,
}

/// Deterministic part of the simulated objective
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyModel {
    pub target: f64,
    pub decay_constant: f64,
    pub noise_scale: f64,
}

impl Default for EnergyModel {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET,
            decay_constant: DEFAULT_DECAY_CONSTANT,
            noise_scale: DEFAULT_NOISE_SCALE,
        }
    }
}

impl EnergyModel {
    /// Noise-free energy at an iteration
    pub fn baseline(&self, iteration: u32) -> f64 {
        self.target + (-(iteration as f64) / self.decay_constant).exp()
    }

    /// Damped noise term for a raw draw in `[-0.5, 0.5)`
    ///
    /// `iteration` is always at least 1, so the division is defined.
    pub fn noise_term(&self, iteration: u32, raw: f64) -> f64 {
        raw * (self.noise_scale / iteration as f64)
    }

    /// Energy at an iteration for a raw noise draw
    pub fn energy(&self, iteration: u32, raw: f64) -> f64 {
        self.baseline(iteration) + self.noise_term(iteration, raw)
    }

    /// Build the sample for an iteration
    pub fn sample(&self, iteration: u32, raw: f64) -> SimulationSample {
        SimulationSample {
            iteration,
            energy: self.energy(iteration, raw),
            target: self.target,
        }
    }
}

/// Source of raw noise draws, expected in `[-0.5, 0.5)`
pub trait NoiseSource: Send {
    fn draw(&mut self) -> f64;
}

/// Uniform noise backed by a seedable RNG
pub struct UniformNoise {
    rng: StdRng,
}

impl UniformNoise {
    /// Seed from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for UniformNoise {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl NoiseSource for UniformNoise {
    fn draw(&mut self) -> f64 {
        self.rng.gen_range(-0.5..0.5)
    }
}

/// Always returns zero; yields the noiseless curve
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroNoise;

impl NoiseSource for ZeroNoise {
    fn draw(&mut self) -> f64 {
        0.0
    }
}

/// Replays a fixed list of draws, then repeats the last one
#[derive(Debug, Clone)]
pub struct ScriptedNoise {
    draws: Vec<f64>,
    next: usize,
}

impl ScriptedNoise {
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, next: 0 }
    }
}

impl NoiseSource for ScriptedNoise {
    fn draw(&mut self) -> f64 {
        let value = self
            .draws
            .get(self.next)
            .or_else(|| self.draws.last())
            .copied()
            .unwrap_or(0.0);
        self.next += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_at_cap() {
        let model = EnergyModel::default();
        let energy = model.baseline(20);
        assert!((energy - (-1.137 + (-4.0f64).exp())).abs() < 1e-12);
        assert!((energy - (-1.118_597)).abs() < 1e-6);
    }

    #[test]
    fn test_noise_amplitude_decays() {
        let model = EnergyModel::default();
        assert!((model.noise_term(1, 0.5) - 0.25).abs() < 1e-12);
        assert!((model.noise_term(10, 0.5) - 0.025).abs() < 1e-12);
        assert!((model.noise_term(1, -0.5) + 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_sample_carries_target() {
        let model = EnergyModel::default();
        let sample = model.sample(3, 0.1);
        assert_eq!(sample.iteration, 3);
        assert_eq!(sample.target, -1.137);
        assert!((sample.energy - model.energy(3, 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_noise_range() {
        let mut noise = UniformNoise::seeded(7);
        for _ in 0..10_000 {
            let draw = noise.draw();
            assert!((-0.5..0.5).contains(&draw), "draw out of range: {}", draw);
        }
    }

    #[test]
    fn test_seeded_noise_is_reproducible() {
        let mut a = UniformNoise::seeded(42);
        let mut b = UniformNoise::seeded(42);
        for _ in 0..16 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_scripted_noise_repeats_last() {
        let mut noise = ScriptedNoise::new(vec![0.1, -0.2]);
        assert_eq!(noise.draw(), 0.1);
        assert_eq!(noise.draw(), -0.2);
        assert_eq!(noise.draw(), -0.2);
        assert_eq!(ScriptedNoise::new(vec![]).draw(), 0.0);
    }
}
