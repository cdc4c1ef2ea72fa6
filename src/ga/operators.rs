//! Genetic operators: crossover and mutation over schedules.
//!
//! Both operators preserve the coverage invariant: every offspring
//! assigns each catalog activity exactly once, and (for crossover) every
//! assignment originates from one of the two parents at that activity's
//! position. Operators never edit a schedule in place — they build new
//! ones. Gene order is the catalog's activity order.
//!
//! A structurally broken parent (missing an activity) produces an equally
//! broken child; the defect is surfaced as `IncompleteSchedule` at the
//! next evaluation rather than repaired here.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::population::random_assignment;
use crate::catalog::Catalog;
use crate::schedule::{Assignment, Schedule};

/// Crossover strategy, selectable by configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverStrategy {
    /// One cut index over the activity order; assignments before the cut
    /// come from one parent, the rest from the other.
    #[default]
    SinglePoint,
    /// Each activity independently takes its assignment from either
    /// parent with equal probability.
    Uniform,
}

impl CrossoverStrategy {
    /// Produces two complementary offspring from a parent pair.
    pub fn recombine<R: Rng>(
        &self,
        parent_a: &Schedule,
        parent_b: &Schedule,
        catalog: &Catalog,
        rng: &mut R,
    ) -> (Schedule, Schedule) {
        match self {
            CrossoverStrategy::SinglePoint => {
                single_point_crossover(parent_a, parent_b, catalog, rng)
            }
            CrossoverStrategy::Uniform => uniform_crossover(parent_a, parent_b, catalog, rng),
        }
    }
}

/// Single-point crossover over the catalog's activity order.
///
/// The first offspring copies parent A before the cut and parent B from
/// the cut on; the second is the mirror image.
pub fn single_point_crossover<R: Rng>(
    parent_a: &Schedule,
    parent_b: &Schedule,
    catalog: &Catalog,
    rng: &mut R,
) -> (Schedule, Schedule) {
    let n = catalog.activities.len();
    let cut = rng.random_range(0..n.max(1));
    build_offspring(parent_a, parent_b, catalog, |i| i < cut)
}

/// Uniform crossover: a fair coin per activity decides the source parent.
pub fn uniform_crossover<R: Rng>(
    parent_a: &Schedule,
    parent_b: &Schedule,
    catalog: &Catalog,
    rng: &mut R,
) -> (Schedule, Schedule) {
    let picks: Vec<bool> = (0..catalog.activities.len())
        .map(|_| rng.random_range(0.0..1.0) < 0.5)
        .collect();
    build_offspring(parent_a, parent_b, catalog, |i| picks[i])
}

/// Assembles the complementary offspring pair from a per-gene source mask
/// (`true` = first offspring takes parent A's gene at that position).
fn build_offspring(
    parent_a: &Schedule,
    parent_b: &Schedule,
    catalog: &Catalog,
    from_a: impl Fn(usize) -> bool,
) -> (Schedule, Schedule) {
    let mut first: Vec<(String, Assignment)> = Vec::with_capacity(catalog.activities.len());
    let mut second: Vec<(String, Assignment)> = Vec::with_capacity(catalog.activities.len());
    for (i, activity) in catalog.activities.iter().enumerate() {
        let a = parent_a.assignment(&activity.name);
        let b = parent_b.assignment(&activity.name);
        let (to_first, to_second) = if from_a(i) { (a, b) } else { (b, a) };
        if let Some(assignment) = to_first {
            first.push((activity.name.clone(), assignment.clone()));
        }
        if let Some(assignment) = to_second {
            second.push((activity.name.clone(), assignment.clone()));
        }
    }
    (
        Schedule::from_assignments(first),
        Schedule::from_assignments(second),
    )
}

/// Mutates a schedule at rate `rate`, returning a new schedule.
///
/// Each activity's whole assignment is independently replaced with a
/// fresh uniform random triple with probability `rate`, otherwise copied
/// unchanged. `rate` 0 reproduces the input; `rate` 1 redraws everything.
pub fn mutate<R: Rng>(
    schedule: &Schedule,
    catalog: &Catalog,
    rate: f64,
    rng: &mut R,
) -> Schedule {
    Schedule::from_assignments(catalog.activities.iter().filter_map(|activity| {
        let current = schedule.assignment(&activity.name)?;
        let assignment = if rng.random_range(0.0..1.0) < rate {
            random_assignment(catalog, rng)
        } else {
            current.clone()
        };
        Some((activity.name.clone(), assignment))
    }))
}
