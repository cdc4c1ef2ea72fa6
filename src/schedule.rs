//! Candidate schedule representation.
//!
//! A [`Schedule`] is one candidate solution: a total mapping from every
//! catalog activity to one [`Assignment`] of (room, time slot,
//! facilitator). Schedules are immutable after construction — the genetic
//! operators produce new schedules rather than editing existing ones, so
//! a fitness score computed for a schedule stays valid for its lifetime.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::GaError;

/// One activity's placement: a (room, time slot, facilitator) triple.
///
/// References catalog entries by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned room name.
    pub room: String,
    /// Assigned time slot label.
    pub time_slot: String,
    /// Assigned facilitator name.
    pub facilitator: String,
}

impl Assignment {
    /// Creates an assignment.
    pub fn new(
        room: impl Into<String>,
        time_slot: impl Into<String>,
        facilitator: impl Into<String>,
    ) -> Self {
        Self {
            room: room.into(),
            time_slot: time_slot.into(),
            facilitator: facilitator.into(),
        }
    }
}

/// A complete candidate schedule: activity name → assignment.
///
/// Invariant: every catalog activity appears exactly once. The invariant
/// is checked via [`validate_coverage`](Schedule::validate_coverage);
/// a failure indicates an operator bug and is surfaced as
/// [`GaError::IncompleteSchedule`], never silently repaired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    assignments: BTreeMap<String, Assignment>,
}

/// One row of the tabular schedule export.
///
/// Field names and declaration order are a stable contract: downstream
/// tabular consumers (CSV export) depend on exactly
/// `activity, room, time_slot, facilitator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Activity name.
    pub activity: String,
    /// Assigned room name.
    pub room: String,
    /// Assigned time slot label.
    pub time_slot: String,
    /// Assigned facilitator name.
    pub facilitator: String,
}

impl Schedule {
    /// Builds a schedule from (activity, assignment) pairs.
    pub fn from_assignments<I>(assignments: I) -> Self
    where
        I: IntoIterator<Item = (String, Assignment)>,
    {
        Self {
            assignments: assignments.into_iter().collect(),
        }
    }

    /// The assignment for an activity, if present.
    pub fn assignment(&self, activity: &str) -> Option<&Assignment> {
        self.assignments.get(activity)
    }

    /// Iterates (activity name, assignment) in activity-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Assignment)> {
        self.assignments.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of assigned activities.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the schedule holds no assignments.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Checks the coverage invariant against a catalog: every catalog
    /// activity present exactly once, no unknown activities.
    pub fn validate_coverage(&self, catalog: &Catalog) -> Result<(), GaError> {
        for activity in &catalog.activities {
            if !self.assignments.contains_key(&activity.name) {
                return Err(GaError::IncompleteSchedule(format!(
                    "missing activity {}",
                    activity.name
                )));
            }
        }
        if self.assignments.len() != catalog.activities.len() {
            let unknown = self
                .assignments
                .keys()
                .find(|name| catalog.activity(name).is_none())
                .cloned()
                .unwrap_or_default();
            return Err(GaError::IncompleteSchedule(format!(
                "unknown activity {unknown}"
            )));
        }
        Ok(())
    }

    /// Exports the schedule as table rows, one per activity, in catalog
    /// activity order.
    ///
    /// Fails with [`GaError::IncompleteSchedule`] if the coverage
    /// invariant does not hold.
    pub fn export_rows(&self, catalog: &Catalog) -> Result<Vec<ScheduleRow>, GaError> {
        self.validate_coverage(catalog)?;
        Ok(catalog
            .activities
            .iter()
            .map(|activity| {
                let a = &self.assignments[&activity.name];
                ScheduleRow {
                    activity: activity.name.clone(),
                    room: a.room.clone(),
                    time_slot: a.time_slot.clone(),
                    facilitator: a.facilitator.clone(),
                }
            })
            .collect())
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (activity, a) in &self.assignments {
            writeln!(
                f,
                "{activity:10} | room: {:12} | time: {:6} | facilitator: {}",
                a.room, a.time_slot, a.facilitator
            )?;
        }
        Ok(())
    }
}

/// A schedule paired with its computed fitness.
///
/// Built by the fitness evaluator and never mutated — any change to the
/// underlying assignments requires re-scoring.
#[derive(Debug, Clone)]
pub struct ScoredSchedule {
    schedule: Schedule,
    fitness: f64,
}

impl ScoredSchedule {
    /// Pairs a schedule with its fitness.
    pub fn new(schedule: Schedule, fitness: f64) -> Self {
        Self { schedule, fitness }
    }

    /// The scored schedule.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// The fitness value (higher is better).
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Consumes the pair, returning the schedule.
    pub fn into_schedule(self) -> Schedule {
        self.schedule
    }
}
