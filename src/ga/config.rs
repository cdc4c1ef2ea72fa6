//! Engine configuration.
//!
//! [`EngineConfig`] holds all parameters that control the evolutionary
//! loop. Values are validated as a whole by [`EngineConfig::validate`],
//! which the engine calls before any generation runs.

use serde::{Deserialize, Serialize};

use super::operators::CrossoverStrategy;
use crate::error::GaError;

/// Configuration for one evolution run.
///
/// # Defaults
///
/// ```
/// use timetable_ga::ga::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.population_size, 250);
/// assert_eq!(config.min_generations, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use timetable_ga::ga::{CrossoverStrategy, EngineConfig};
///
/// let config = EngineConfig::default()
///     .with_population_size(500)
///     .with_crossover(CrossoverStrategy::Uniform)
///     .with_mutation_rate(0.05)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of schedules in the population, constant across the run.
    pub population_size: usize,

    /// Generations that must complete before convergence can terminate
    /// the run.
    pub min_generations: usize,

    /// Hard cap on generations regardless of convergence.
    pub max_generations: usize,

    /// Relative average-fitness improvement (as a fraction) below which
    /// the run counts as converged once `min_generations` is reached.
    pub improvement_threshold: f64,

    /// Probability of redrawing each activity's assignment during
    /// mutation (0.0–1.0).
    pub mutation_rate: f64,

    /// Crossover strategy for recombining parent pairs.
    pub crossover: CrossoverStrategy,

    /// Number of top schedules carried unchanged into the next generation.
    pub elitism: usize,

    /// Whether one schedule may serve as both parents of a pair.
    ///
    /// Off by default: with-replacement sampling would otherwise
    /// self-pair silently, which collapses crossover into cloning.
    pub allow_self_pairing: bool,

    /// Whether to evaluate schedules in parallel using rayon.
    ///
    /// Does not affect reproducibility: selection and reproduction stay
    /// on the single seeded RNG either way.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` draws a fresh seed.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            population_size: 250,
            min_generations: 100,
            max_generations: 500,
            improvement_threshold: 0.01,
            mutation_rate: 0.01,
            crossover: CrossoverStrategy::default(),
            elitism: 1,
            allow_self_pairing: false,
            parallel: true,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the minimum generation count.
    pub fn with_min_generations(mut self, n: usize) -> Self {
        self.min_generations = n;
        self
    }

    /// Sets the maximum generation count.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the convergence improvement threshold (a fraction, e.g. 0.01
    /// for 1%).
    pub fn with_improvement_threshold(mut self, threshold: f64) -> Self {
        self.improvement_threshold = threshold;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the crossover strategy.
    pub fn with_crossover(mut self, strategy: CrossoverStrategy) -> Self {
        self.crossover = strategy;
        self
    }

    /// Sets the elitism count.
    pub fn with_elitism(mut self, k: usize) -> Self {
        self.elitism = k;
        self
    }

    /// Enables or disables self-pairing in parent selection.
    pub fn with_self_pairing(mut self, allow: bool) -> Self {
        self.allow_self_pairing = allow;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Builders do not clamp, so every out-of-range value surfaces here
    /// as [`GaError::InvalidConfiguration`] before a run starts.
    pub fn validate(&self) -> Result<(), GaError> {
        if self.population_size < 1 {
            return Err(GaError::InvalidConfiguration(
                "population_size must be at least 1".into(),
            ));
        }
        if self.min_generations < 1 {
            return Err(GaError::InvalidConfiguration(
                "min_generations must be at least 1".into(),
            ));
        }
        if self.max_generations < self.min_generations {
            return Err(GaError::InvalidConfiguration(format!(
                "max_generations ({}) must be >= min_generations ({})",
                self.max_generations, self.min_generations
            )));
        }
        if !self.mutation_rate.is_finite() || !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(GaError::InvalidConfiguration(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if !self.improvement_threshold.is_finite() || self.improvement_threshold < 0.0 {
            return Err(GaError::InvalidConfiguration(format!(
                "improvement_threshold must be a non-negative fraction, got {}",
                self.improvement_threshold
            )));
        }
        if self.elitism >= self.population_size {
            return Err(GaError::InvalidConfiguration(format!(
                "elitism ({}) leaves no room for offspring in a population of {}",
                self.elitism, self.population_size
            )));
        }
        Ok(())
    }
}
