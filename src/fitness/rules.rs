//! The scoring rule catalog as explicit configuration data.
//!
//! Every weight, threshold, pairing, and exemption used by the fitness
//! evaluator lives in [`RuleConfig`], so the evaluator is a pure function
//! of (schedule, catalog, rules) and test scenarios can be built with
//! extreme values without touching the production dataset.
//!
//! Penalties are negative weights, bonuses positive; the evaluator sums
//! them as-is.

use serde::{Deserialize, Serialize};

/// Weights, thresholds, and pairing tables for fitness scoring.
///
/// [`RuleConfig::default`] carries the production rule catalog matching
/// [`Catalog::sample`](crate::catalog::Catalog::sample).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Penalty when a room's capacity is below the activity's enrollment.
    pub room_too_small_penalty: f64,
    /// Capacity/enrollment ratio above which a room counts as oversized.
    pub room_oversize_factor: f64,
    /// Penalty for an oversized room.
    pub room_oversize_penalty: f64,
    /// Capacity/enrollment ratio above which a room counts as grossly oversized.
    pub room_gross_oversize_factor: f64,
    /// Penalty for a grossly oversized room.
    pub room_gross_oversize_penalty: f64,
    /// Bonus when capacity is adequate and within the oversize band.
    pub room_fit_bonus: f64,

    /// Bonus when the assigned facilitator is in the activity's preferred list.
    pub preferred_facilitator_bonus: f64,
    /// Bonus when the assigned facilitator is in the activity's "other" list.
    pub other_facilitator_bonus: f64,
    /// Penalty when the assigned facilitator is in neither list.
    pub facilitator_mismatch_penalty: f64,

    /// Penalty per extra booking of the same (room, time slot) cell.
    pub room_conflict_penalty: f64,
    /// Penalty per extra activity a facilitator holds in one time slot.
    pub facilitator_conflict_penalty: f64,
    /// Bonus when a facilitator holds exactly one activity in a time slot.
    pub facilitator_single_booking_bonus: f64,

    /// Section count above which a facilitator is overloaded.
    pub overload_threshold: u32,
    /// Penalty per section over the overload threshold.
    pub overload_penalty: f64,
    /// Section count at or below which a facilitator is underloaded.
    pub underload_threshold: u32,
    /// Penalty for an underloaded facilitator.
    pub underload_penalty: f64,
    /// Facilitators exempt from the underload penalty.
    pub underload_exempt: Vec<String>,

    /// Designated section pairs (e.g., the A/B sections of one course).
    pub section_pairs: Vec<(String, String)>,
    /// Penalty when both sections of a pair share a time slot.
    pub pair_same_slot_penalty: f64,
    /// Bonus when the sections of a pair sit in consecutive time slots.
    pub pair_adjacent_bonus: f64,

    /// Designated activity family pairs checked against each other
    /// (every member of the first family against every member of the second).
    pub cross_families: Vec<(Vec<String>, Vec<String>)>,
    /// Penalty when a cross-family pair shares a time slot.
    pub cross_same_slot_penalty: f64,
    /// Bonus when a cross-family pair sits in consecutive time slots.
    pub cross_adjacent_bonus: f64,
    /// Penalty replacing the adjacency bonus when exactly one of the two
    /// rooms is in the remote campus group.
    pub cross_travel_penalty: f64,
    /// Rooms on the far side of campus.
    pub remote_rooms: Vec<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        let families = (
            vec!["SLA101A".to_string(), "SLA101B".to_string()],
            vec!["SLA191A".to_string(), "SLA191B".to_string()],
        );
        Self {
            room_too_small_penalty: -0.5,
            room_oversize_factor: 3.0,
            room_oversize_penalty: -0.2,
            room_gross_oversize_factor: 6.0,
            room_gross_oversize_penalty: -0.4,
            room_fit_bonus: 0.3,

            preferred_facilitator_bonus: 0.5,
            other_facilitator_bonus: 0.2,
            facilitator_mismatch_penalty: -0.1,

            room_conflict_penalty: -0.5,
            facilitator_conflict_penalty: -0.2,
            facilitator_single_booking_bonus: 0.2,

            overload_threshold: 4,
            overload_penalty: -0.5,
            underload_threshold: 2,
            underload_penalty: -0.4,
            underload_exempt: vec!["Tyler".to_string()],

            section_pairs: vec![
                ("SLA101A".to_string(), "SLA101B".to_string()),
                ("SLA191A".to_string(), "SLA191B".to_string()),
            ],
            pair_same_slot_penalty: -0.5,
            pair_adjacent_bonus: 0.5,

            cross_families: vec![families],
            cross_same_slot_penalty: -0.25,
            cross_adjacent_bonus: 0.5,
            cross_travel_penalty: -0.4,
            remote_rooms: vec![
                "Beach 201".to_string(),
                "Beach 301".to_string(),
                "Roman 201".to_string(),
                "Roman 216".to_string(),
            ],
        }
    }
}

impl RuleConfig {
    /// A rule set with all pairing tables and exemptions cleared.
    ///
    /// Keeps the default weights but removes every reference to the
    /// production activity names, for synthetic test catalogs.
    pub fn bare() -> Self {
        Self {
            underload_exempt: Vec::new(),
            section_pairs: Vec::new(),
            cross_families: Vec::new(),
            remote_rooms: Vec::new(),
            ..Self::default()
        }
    }

    /// Whether a room belongs to the remote campus group.
    pub fn is_remote(&self, room: &str) -> bool {
        self.remote_rooms.iter().any(|r| r == room)
    }

    /// Whether a facilitator is exempt from the underload penalty.
    pub fn is_underload_exempt(&self, facilitator: &str) -> bool {
        self.underload_exempt.iter().any(|f| f == facilitator)
    }
}
