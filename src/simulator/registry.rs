//! Named noise sources
//!
//! Maps a name to a factory producing a fresh `NoiseSource` per simulator.
//! Built in:
//! - uniform: entropy-seeded uniform draws, or seeded when a seed is given
//! - seeded: uniform draws from a fixed seed (0 unless one is given)
//! - zero: no noise

use crate::simulator::model::{NoiseSource, UniformNoise, ZeroNoise};
use std::collections::HashMap;

/// Name used when none is given or the requested one is unknown
pub const DEFAULT_NOISE: &str = "uniform";

/// Builds a noise source from an optional seed
pub type NoiseFactory = fn(Option<u64>) -> Box<dyn NoiseSource>;

/// Noise source registry
#[derive(Clone)]
pub struct NoiseRegistry {
    factories: HashMap<String, NoiseFactory>,
}

fn uniform(seed: Option<u64>) -> Box<dyn NoiseSource> {
    match seed {
        Some(seed) => Box::new(UniformNoise::seeded(seed)),
        None => Box::new(UniformNoise::from_entropy()),
    }
}

fn seeded(seed: Option<u64>) -> Box<dyn NoiseSource> {
    Box::new(UniformNoise::seeded(seed.unwrap_or(0)))
}

fn zero(_seed: Option<u64>) -> Box<dyn NoiseSource> {
    Box::new(ZeroNoise)
}

impl NoiseRegistry {
    /// Create a registry with the built-in sources
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register(DEFAULT_NOISE, uniform);
        registry.register("seeded", seeded);
        registry.register("zero", zero);
        registry
    }

    /// Add or replace a named source
    pub fn register(&mut self, name: &str, factory: NoiseFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    /// Check if a source exists
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Build the named source, falling back to the default for unknown names
    pub fn create(&self, name: &str, seed: Option<u64>) -> Box<dyn NoiseSource> {
        match self.factories.get(name) {
            Some(factory) => factory(seed),
            None => {
                tracing::warn!(name, fallback = DEFAULT_NOISE, "unknown noise source");
                uniform(seed)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for NoiseRegistry {
    fn default() -> Self {
        Self::new()
    }
}
