//! Domain catalog: the static reference data for one timetabling instance.
//!
//! A [`Catalog`] holds the activities to be scheduled, the rooms (with
//! capacities), the ordered time slots, and the facilitator roster. It is
//! loaded once and read-only for the duration of a run — candidate
//! schedules reference catalog entries by name, never by copy.

use serde::{Deserialize, Serialize};

use crate::error::GaError;

/// An activity (course section) to be scheduled.
///
/// Carries its expected enrollment and facilitator preference lists.
/// Preference lists are ordered but matched by membership only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Unique activity name (e.g., `"SLA101A"`).
    pub name: String,
    /// Expected enrollment (seats needed).
    pub enrollment: u32,
    /// Facilitators preferred for this activity.
    pub preferred: Vec<String>,
    /// Acceptable but non-preferred facilitators.
    pub other: Vec<String>,
}

impl Activity {
    /// Creates an activity with empty preference lists.
    pub fn new(name: impl Into<String>, enrollment: u32) -> Self {
        Self {
            name: name.into(),
            enrollment,
            preferred: Vec::new(),
            other: Vec::new(),
        }
    }

    /// Sets the preferred facilitator list.
    pub fn with_preferred(mut self, preferred: &[&str]) -> Self {
        self.preferred = preferred.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Sets the acceptable-but-not-preferred facilitator list.
    pub fn with_other(mut self, other: &[&str]) -> Self {
        self.other = other.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// A room with a fixed seating capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room name (e.g., `"Beach 201"`).
    pub name: String,
    /// Seating capacity.
    pub capacity: u32,
}

impl Room {
    /// Creates a room.
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }
}

/// A time slot. Ordering is positional: a slot's index within
/// [`Catalog::time_slots`] defines adjacency and spacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Display label (e.g., `"10 AM"`).
    pub label: String,
}

impl TimeSlot {
    /// Creates a time slot.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// A facilitator, identified by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facilitator {
    /// Unique facilitator name.
    pub name: String,
}

impl Facilitator {
    /// Creates a facilitator.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The static reference data for one timetabling problem instance.
///
/// Immutable for the duration of a run. Activity order is significant:
/// it defines the gene order used by single-point crossover and the row
/// order of exported schedules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Activities to schedule, in gene/export order.
    pub activities: Vec<Activity>,
    /// Available rooms.
    pub rooms: Vec<Room>,
    /// Time slots in chronological order.
    pub time_slots: Vec<TimeSlot>,
    /// Facilitator roster.
    pub facilitators: Vec<Facilitator>,
}

impl Catalog {
    /// Creates an empty catalog. Populate via the field vectors or use
    /// [`Catalog::sample`] for the production dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks that every table is non-empty and activity names are unique.
    pub fn validate(&self) -> Result<(), GaError> {
        if self.activities.is_empty() {
            return Err(GaError::EmptyCatalog("activities"));
        }
        if self.rooms.is_empty() {
            return Err(GaError::EmptyCatalog("rooms"));
        }
        if self.time_slots.is_empty() {
            return Err(GaError::EmptyCatalog("time slots"));
        }
        if self.facilitators.is_empty() {
            return Err(GaError::EmptyCatalog("facilitators"));
        }
        for (i, a) in self.activities.iter().enumerate() {
            if self.activities[..i].iter().any(|b| b.name == a.name) {
                return Err(GaError::InvalidConfiguration(format!(
                    "duplicate activity name: {}",
                    a.name
                )));
            }
        }
        Ok(())
    }

    /// Looks up an activity by name.
    pub fn activity(&self, name: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.name == name)
    }

    /// Looks up a room by name.
    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.name == name)
    }

    /// Positional index of a time slot, for spacing arithmetic.
    pub fn slot_index(&self, label: &str) -> Option<usize> {
        self.time_slots.iter().position(|t| t.label == label)
    }

    /// Absolute slot distance between two time slots, in slot steps.
    ///
    /// Returns `None` if either label is unknown.
    pub fn slot_distance(&self, a: &str, b: &str) -> Option<usize> {
        let ia = self.slot_index(a)?;
        let ib = self.slot_index(b)?;
        Some(ia.abs_diff(ib))
    }

    /// The production dataset: 11 SLA course sections, 9 rooms, 6 hourly
    /// slots, and 10 facilitators.
    ///
    /// Useful for demos, benchmarks, and realistic tests. The matching
    /// pairing/exemption tables live in
    /// [`RuleConfig::default`](crate::fitness::RuleConfig::default).
    pub fn sample() -> Self {
        let facilitators = [
            "Lock", "Glen", "Banks", "Richards", "Shaw", "Singer", "Uther", "Tyler", "Numen",
            "Zeldin",
        ]
        .iter()
        .map(|n| Facilitator::new(*n))
        .collect();

        let time_slots = ["10 AM", "11 AM", "12 PM", "1 PM", "2 PM", "3 PM"]
            .iter()
            .map(|t| TimeSlot::new(*t))
            .collect();

        let rooms = vec![
            Room::new("Beach 201", 18),
            Room::new("Beach 301", 25),
            Room::new("Frank 119", 95),
            Room::new("Loft 206", 55),
            Room::new("Loft 310", 48),
            Room::new("James 325", 110),
            Room::new("Roman 201", 40),
            Room::new("Roman 216", 80),
            Room::new("Slater 003", 32),
        ];

        let intro_preferred = ["Glen", "Lock", "Banks"];
        let intro_other = ["Numen", "Richards", "Shaw", "Singer"];
        let mid_preferred = ["Glen", "Banks", "Zeldin", "Lock", "Singer"];
        let mid_other = ["Richards", "Uther", "Shaw"];

        let activities = vec![
            Activity::new("SLA101A", 40)
                .with_preferred(&intro_preferred)
                .with_other(&intro_other),
            Activity::new("SLA101B", 35)
                .with_preferred(&intro_preferred)
                .with_other(&intro_other),
            Activity::new("SLA191A", 45)
                .with_preferred(&intro_preferred)
                .with_other(&intro_other),
            Activity::new("SLA191B", 40)
                .with_preferred(&intro_preferred)
                .with_other(&intro_other),
            Activity::new("SLA201", 60)
                .with_preferred(&mid_preferred)
                .with_other(&mid_other),
            Activity::new("SLA291", 50)
                .with_preferred(&mid_preferred)
                .with_other(&mid_other),
            Activity::new("SLA303", 25)
                .with_preferred(&["Glen", "Zeldin"])
                .with_other(&["Banks"]),
            Activity::new("SLA304", 20)
                .with_preferred(&["Singer", "Uther"])
                .with_other(&["Richards"]),
            Activity::new("SLA394", 15)
                .with_preferred(&["Tyler", "Singer"])
                .with_other(&["Richards", "Zeldin"]),
            Activity::new("SLA449", 30)
                .with_preferred(&["Tyler", "Zeldin", "Uther"])
                .with_other(&["Zeldin", "Shaw"]),
            Activity::new("SLA451", 90)
                .with_preferred(&["Lock", "Banks", "Zeldin"])
                .with_other(&["Tyler", "Singer", "Shaw", "Glen"]),
        ];

        Self {
            activities,
            rooms,
            time_slots,
            facilitators,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_is_valid() {
        let catalog = Catalog::sample();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.activities.len(), 11);
        assert_eq!(catalog.rooms.len(), 9);
        assert_eq!(catalog.time_slots.len(), 6);
        assert_eq!(catalog.facilitators.len(), 10);
    }

    #[test]
    fn test_empty_catalog_fails_validation() {
        let catalog = Catalog::new();
        assert!(matches!(
            catalog.validate(),
            Err(GaError::EmptyCatalog("activities"))
        ));
    }

    #[test]
    fn test_partial_catalog_names_missing_table() {
        let mut catalog = Catalog::new();
        catalog.activities.push(Activity::new("A", 10));
        assert!(matches!(
            catalog.validate(),
            Err(GaError::EmptyCatalog("rooms"))
        ));
    }

    #[test]
    fn test_duplicate_activity_rejected() {
        let mut catalog = Catalog::sample();
        catalog.activities.push(Activity::new("SLA101A", 40));
        assert!(matches!(
            catalog.validate(),
            Err(GaError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_slot_distance() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.slot_distance("10 AM", "10 AM"), Some(0));
        assert_eq!(catalog.slot_distance("10 AM", "11 AM"), Some(1));
        assert_eq!(catalog.slot_distance("3 PM", "10 AM"), Some(5));
        assert_eq!(catalog.slot_distance("10 AM", "4 PM"), None);
    }

    #[test]
    fn test_lookups() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.activity("SLA451").map(|a| a.enrollment), Some(90));
        assert_eq!(catalog.room("James 325").map(|r| r.capacity), Some(110));
        assert!(catalog.activity("SLA999").is_none());
    }
}
