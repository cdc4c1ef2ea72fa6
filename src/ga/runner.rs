//! Evolutionary loop execution.
//!
//! [`EvolutionEngine`] orchestrates the generational cycle:
//! evaluate → select → recombine → mutate → apply elitism → check the
//! stopping condition → repeat. Each generation replaces the population
//! wholesale; individual schedules are never mutated after creation, so
//! a computed fitness stays valid for a schedule's lifetime.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use super::config::EngineConfig;
use super::operators::mutate;
use super::population::initial_population;
use super::selection::{select_pairs, softmax_weights};
use crate::catalog::Catalog;
use crate::error::GaError;
use crate::fitness::{FitnessEvaluator, RuleConfig};
use crate::schedule::{Schedule, ScoredSchedule};

/// Fitness summary for one completed generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationStats {
    /// Zero-based generation index.
    pub generation: usize,
    /// Best fitness in the population.
    pub best: f64,
    /// Average fitness across the population.
    pub average: f64,
    /// Worst fitness in the population.
    pub worst: f64,
}

/// Per-generation fitness statistics, one entry per completed generation.
pub type FitnessTrace = Vec<GenerationStats>;

/// Result of an evolution run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// The best schedule found across all generations, not just the last.
    pub best: Schedule,

    /// Fitness of the best schedule.
    pub best_fitness: f64,

    /// Number of generations completed.
    pub generations: usize,

    /// Whether the run terminated via the convergence condition
    /// (as opposed to the generation cap or cancellation).
    pub converged: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// The full fitness trace.
    pub trace: FitnessTrace,
}

/// Runs the generational genetic algorithm for one timetabling instance.
///
/// # Usage
///
/// ```
/// use timetable_ga::catalog::Catalog;
/// use timetable_ga::fitness::RuleConfig;
/// use timetable_ga::ga::{EngineConfig, EvolutionEngine};
///
/// let catalog = Catalog::sample();
/// let rules = RuleConfig::default();
/// let config = EngineConfig::default()
///     .with_population_size(40)
///     .with_min_generations(5)
///     .with_max_generations(10)
///     .with_seed(42);
/// let engine = EvolutionEngine::new(&catalog, &rules, config).unwrap();
/// let result = engine.run().unwrap();
/// assert!(result.trace.len() >= 5);
/// ```
pub struct EvolutionEngine<'a> {
    catalog: &'a Catalog,
    rules: &'a RuleConfig,
    config: EngineConfig,
}

impl<'a> EvolutionEngine<'a> {
    /// Creates an engine, validating the configuration and catalog before
    /// any generation runs.
    pub fn new(
        catalog: &'a Catalog,
        rules: &'a RuleConfig,
        config: EngineConfig,
    ) -> Result<Self, GaError> {
        config.validate()?;
        catalog.validate()?;
        Ok(Self {
            catalog,
            rules,
            config,
        })
    }

    /// Runs the evolution to termination.
    pub fn run(&self) -> Result<GaResult, GaError> {
        self.run_with_cancel(None)
    }

    /// Runs the evolution with an optional cancellation flag.
    ///
    /// The flag is checked only at the generation boundary, never
    /// mid-generation, so the returned trace always covers whole
    /// generations.
    pub fn run_with_cancel(&self, cancel: Option<Arc<AtomicBool>>) -> Result<GaResult, GaError> {
        let config = &self.config;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);

        info!(
            population_size = config.population_size,
            seed, "starting evolution run"
        );

        let evaluator = FitnessEvaluator::new(self.catalog, self.rules);
        let mut population = initial_population(self.catalog, config.population_size, &mut rng)?;

        let mut trace: FitnessTrace = Vec::new();
        let mut best: Option<ScoredSchedule> = None;
        let mut converged = false;
        let mut cancelled = false;

        loop {
            // Evaluating
            let fitness = evaluator.evaluate_all(&population, config.parallel)?;
            let stats = summarize(trace.len(), &fitness);
            trace.push(stats);
            debug!(
                generation = stats.generation,
                best = stats.best,
                average = stats.average,
                worst = stats.worst,
                "generation evaluated"
            );

            if best.as_ref().map_or(true, |b| stats.best > b.fitness()) {
                let idx = index_of_best(&fitness);
                best = Some(ScoredSchedule::new(population[idx].clone(), fitness[idx]));
            }

            // CheckStop
            if should_stop(&trace, config.min_generations, config.improvement_threshold) {
                converged = true;
                break;
            }
            if trace.len() >= config.max_generations {
                break;
            }
            if let Some(flag) = &cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            // Selecting
            let weights = softmax_weights(&fitness);
            let offspring_needed = config.population_size - config.elitism;
            let pairs = select_pairs(
                &weights,
                offspring_needed.div_ceil(2),
                config.allow_self_pairing,
                &mut rng,
            );

            // Reproducing
            let mut offspring = Vec::with_capacity(offspring_needed + 1);
            for (ia, ib) in pairs {
                let (c1, c2) =
                    config
                        .crossover
                        .recombine(&population[ia], &population[ib], self.catalog, &mut rng);
                offspring.push(mutate(&c1, self.catalog, config.mutation_rate, &mut rng));
                offspring.push(mutate(&c2, self.catalog, config.mutation_rate, &mut rng));
            }
            offspring.truncate(offspring_needed);

            // Replacing: elite clones plus offspring, exactly N.
            let mut next = Vec::with_capacity(config.population_size);
            for idx in top_indices(&fitness, config.elitism) {
                next.push(population[idx].clone());
            }
            next.append(&mut offspring);
            while next.len() < config.population_size {
                let idx = rng.random_range(0..population.len());
                next.push(population[idx].clone());
            }
            next.truncate(config.population_size);
            population = next;
        }

        let best = best.expect("at least one generation is always evaluated");
        info!(
            generations = trace.len(),
            best_fitness = best.fitness(),
            converged,
            cancelled,
            "evolution run finished"
        );

        Ok(GaResult {
            best_fitness: best.fitness(),
            best: best.into_schedule(),
            generations: trace.len(),
            converged,
            cancelled,
            trace,
        })
    }
}

/// The convergence condition: true once at least `min_generations` have
/// completed and the relative improvement of average fitness over the
/// previous generation falls below `threshold`.
///
/// Pure over the trace, so synthetic traces can pin down exactly when a
/// run terminates.
pub fn should_stop(trace: &[GenerationStats], min_generations: usize, threshold: f64) -> bool {
    let n = trace.len();
    if n < min_generations || n < 2 {
        return false;
    }
    let prev = trace[n - 2].average;
    let cur = trace[n - 1].average;
    let improvement = (cur - prev) / prev.abs().max(1e-9);
    improvement < threshold
}

fn summarize(generation: usize, fitness: &[f64]) -> GenerationStats {
    let mut best = f64::NEG_INFINITY;
    let mut worst = f64::INFINITY;
    let mut sum = 0.0;
    for &f in fitness {
        best = best.max(f);
        worst = worst.min(f);
        sum += f;
    }
    GenerationStats {
        generation,
        best,
        average: sum / fitness.len() as f64,
        worst,
    }
}

fn index_of_best(fitness: &[f64]) -> usize {
    let mut idx = 0;
    for (i, &f) in fitness.iter().enumerate() {
        if f > fitness[idx] {
            idx = i;
        }
    }
    idx
}

/// Indices of the `k` highest fitness values, best first.
fn top_indices(fitness: &[f64], k: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..fitness.len()).collect();
    indices.sort_by(|&a, &b| {
        fitness[b]
            .partial_cmp(&fitness[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    indices.truncate(k);
    indices
}
