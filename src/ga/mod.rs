//! The genetic algorithm engine.
//!
//! Orchestrates the generational evolutionary loop over candidate
//! schedules: random initialization, softmax parent selection, crossover,
//! mutation, elitism, and convergence detection.
//!
//! # Key Types
//!
//! - [`EngineConfig`]: Run parameters (population size, rates, termination)
//! - [`EvolutionEngine`]: Executes the evolutionary loop
//! - [`GaResult`]: Best schedule found plus the per-generation [`FitnessTrace`]
//!
//! # Submodules
//!
//! - [`population`]: Uniform random initial population
//! - [`selection`]: Softmax parent-pair selection
//! - [`operators`]: Single-point/uniform crossover and random-reset mutation
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
pub mod operators;
pub mod population;
mod runner;
pub mod selection;

pub use config::EngineConfig;
pub use operators::CrossoverStrategy;
pub use runner::{should_stop, EvolutionEngine, FitnessTrace, GaResult, GenerationStats};
