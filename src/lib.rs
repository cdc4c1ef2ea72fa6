//! Genetic algorithm engine for activity timetabling.
//!
//! Searches for a near-optimal assignment of activities to
//! (room, time slot, facilitator) triples under a fixed rule catalog.
//! The crate is the optimization core only: a presentation layer (forms,
//! charts, CSV writing) calls [`ga::EvolutionEngine`] with an
//! [`ga::EngineConfig`] and reads back a [`ga::GaResult`].
//!
//! # Modules
//!
//! - **`catalog`**: Static reference data — activities, rooms, time slots,
//!   facilitators. Immutable for the duration of a run.
//! - **`schedule`**: Candidate solutions — `Schedule`, `Assignment`,
//!   `ScoredSchedule`, and the stable tabular export.
//! - **`fitness`**: The constraint-based evaluator and its
//!   [`RuleConfig`](fitness::RuleConfig) weight tables.
//! - **`ga`**: The evolutionary loop — population, selection, operators,
//!   engine.
//! - **`error`**: [`GaError`](error::GaError).
//!
//! # Example
//!
//! ```
//! use timetable_ga::catalog::Catalog;
//! use timetable_ga::fitness::RuleConfig;
//! use timetable_ga::ga::{EngineConfig, EvolutionEngine};
//!
//! let catalog = Catalog::sample();
//! let rules = RuleConfig::default();
//! let config = EngineConfig::default()
//!     .with_population_size(50)
//!     .with_min_generations(5)
//!     .with_max_generations(20)
//!     .with_seed(42);
//!
//! let engine = EvolutionEngine::new(&catalog, &rules, config)?;
//! let result = engine.run()?;
//! let rows = result.best.export_rows(&catalog)?;
//! assert_eq!(rows.len(), catalog.activities.len());
//! # Ok::<(), timetable_ga::error::GaError>(())
//! ```
//!
//! # Determinism
//!
//! All randomness flows through one seedable RNG passed explicitly to
//! every operator; fitness evaluation is a pure function. A fixed
//! [`seed`](ga::EngineConfig::seed) reproduces a run exactly, with or
//! without parallel evaluation.

pub mod catalog;
pub mod error;
pub mod fitness;
pub mod ga;
pub mod schedule;
