//! Initial population generation.
//!
//! Random schedules are drawn uniformly from the full Cartesian
//! (room × time slot × facilitator) space with no constraint pruning —
//! infeasible placements are penalized by the fitness evaluator, never
//! prevented here. Collisions between activities are likewise allowed.

use rand::Rng;

use crate::catalog::Catalog;
use crate::error::GaError;
use crate::schedule::{Assignment, Schedule};

/// Draws one uniform random (room, time slot, facilitator) triple.
///
/// The catalog must have non-empty tables; [`initial_population`]
/// validates this once up front.
pub fn random_assignment<R: Rng>(catalog: &Catalog, rng: &mut R) -> Assignment {
    let room = &catalog.rooms[rng.random_range(0..catalog.rooms.len())];
    let slot = &catalog.time_slots[rng.random_range(0..catalog.time_slots.len())];
    let facilitator = &catalog.facilitators[rng.random_range(0..catalog.facilitators.len())];
    Assignment::new(&room.name, &slot.label, &facilitator.name)
}

/// Builds one schedule assigning every catalog activity a random triple.
pub fn random_schedule<R: Rng>(catalog: &Catalog, rng: &mut R) -> Schedule {
    Schedule::from_assignments(
        catalog
            .activities
            .iter()
            .map(|a| (a.name.clone(), random_assignment(catalog, rng))),
    )
}

/// Builds `size` independently drawn random schedules.
///
/// Fails with [`GaError::EmptyCatalog`] when any catalog table is empty.
pub fn initial_population<R: Rng>(
    catalog: &Catalog,
    size: usize,
    rng: &mut R,
) -> Result<Vec<Schedule>, GaError> {
    catalog.validate()?;
    Ok((0..size).map(|_| random_schedule(catalog, rng)).collect())
}
