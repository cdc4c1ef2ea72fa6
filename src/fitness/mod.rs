//! Constraint-based fitness evaluation.
//!
//! Scores one [`Schedule`] against the rule catalog in two passes:
//! per-activity local terms (room size, facilitator preference) and
//! cross-activity terms (booking collisions, facilitator load, paired
//! sections, cross-family spacing). Higher fitness is better; penalties
//! are negative rule weights, bonuses positive.
//!
//! Evaluation is a pure function of (schedule, catalog, rules): the same
//! schedule always scores identically. Counters use ordered maps so that
//! floating-point summation order is stable across calls and runs.
//!
//! # Submodules
//!
//! - [`rules`]: [`RuleConfig`] — every weight, threshold, and pairing as data

pub mod rules;

pub use rules::RuleConfig;

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::catalog::{Activity, Catalog};
use crate::error::GaError;
use crate::schedule::{Assignment, Schedule};

/// Scores schedules against an immutable catalog and rule set.
///
/// Holds only shared references, so one evaluator can score many
/// schedules in parallel with no shared mutable state.
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator<'a> {
    catalog: &'a Catalog,
    rules: &'a RuleConfig,
}

/// Per-rule violation counts for one schedule.
///
/// Mirrors the scoring terms exactly: every counted violation corresponds
/// to a penalty in [`FitnessEvaluator::evaluate`], which makes the report
/// useful for explaining a score to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViolationReport {
    /// Extra bookings of an already-occupied (room, time slot) cell.
    pub room_conflicts: u32,
    /// Activities placed in rooms smaller than their enrollment.
    pub rooms_too_small: u32,
    /// Activities in oversized rooms (above the oversize factor).
    pub rooms_oversized: u32,
    /// Activities in grossly oversized rooms (above the gross factor).
    pub rooms_grossly_oversized: u32,
    /// Activities not led by a preferred or acceptable facilitator.
    pub facilitator_mismatches: u32,
    /// Extra same-slot activities per facilitator.
    pub facilitator_conflicts: u32,
    /// Facilitators over the load threshold.
    pub overloaded_facilitators: u32,
    /// Facilitators at or under the underload threshold (non-exempt).
    pub underloaded_facilitators: u32,
    /// Section pairs sharing a time slot.
    pub pairs_same_slot: u32,
    /// Cross-family activity pairs sharing a time slot.
    pub cross_family_same_slot: u32,
    /// Adjacent cross-family pairs split across the campus.
    pub cross_family_travel: u32,
}

/// Slot-occupancy counters shared by scoring and violation reporting.
struct Occupancy<'s> {
    room_slot: BTreeMap<(&'s str, &'s str), u32>,
    facilitator_slot: BTreeMap<(&'s str, &'s str), u32>,
    facilitator_total: BTreeMap<&'s str, u32>,
}

impl<'s> Occupancy<'s> {
    fn count(schedule: &'s Schedule) -> Self {
        let mut room_slot = BTreeMap::new();
        let mut facilitator_slot = BTreeMap::new();
        let mut facilitator_total = BTreeMap::new();
        for (_, a) in schedule.iter() {
            *room_slot
                .entry((a.room.as_str(), a.time_slot.as_str()))
                .or_insert(0) += 1;
            *facilitator_slot
                .entry((a.facilitator.as_str(), a.time_slot.as_str()))
                .or_insert(0) += 1;
            *facilitator_total.entry(a.facilitator.as_str()).or_insert(0) += 1;
        }
        Self {
            room_slot,
            facilitator_slot,
            facilitator_total,
        }
    }
}

impl<'a> FitnessEvaluator<'a> {
    /// Creates an evaluator over a catalog and rule set.
    pub fn new(catalog: &'a Catalog, rules: &'a RuleConfig) -> Self {
        Self { catalog, rules }
    }

    /// Scores one schedule. Higher is better; may be negative.
    ///
    /// Fails with [`GaError::IncompleteSchedule`] if the schedule does not
    /// cover the catalog's activities exactly once — a caller/operator
    /// bug, never scored as zero.
    pub fn evaluate(&self, schedule: &Schedule) -> Result<f64, GaError> {
        schedule.validate_coverage(self.catalog)?;

        let occ = Occupancy::count(schedule);
        let mut total = 0.0;

        for activity in &self.catalog.activities {
            // Coverage was just validated, so the lookup cannot fail.
            if let Some(a) = schedule.assignment(&activity.name) {
                total += self.room_size_term(activity, a);
                total += self.facilitator_match_term(activity, a);
            }
        }

        total += self.booking_terms(&occ);
        total += self.load_terms(&occ);
        total += self.pair_terms(schedule);
        total += self.cross_family_terms(schedule);

        Ok(total)
    }

    /// Scores every schedule in a population.
    ///
    /// Evaluation of distinct schedules is independent; with `parallel`
    /// the work fans out over rayon and results merge back in input order.
    pub fn evaluate_all(
        &self,
        population: &[Schedule],
        parallel: bool,
    ) -> Result<Vec<f64>, GaError> {
        if parallel {
            population.par_iter().map(|s| self.evaluate(s)).collect()
        } else {
            population.iter().map(|s| self.evaluate(s)).collect()
        }
    }

    /// Counts per-rule violations for one schedule.
    ///
    /// Same coverage contract as [`evaluate`](Self::evaluate).
    pub fn violations(&self, schedule: &Schedule) -> Result<ViolationReport, GaError> {
        schedule.validate_coverage(self.catalog)?;

        let rules = self.rules;
        let occ = Occupancy::count(schedule);
        let mut report = ViolationReport::default();

        for activity in &self.catalog.activities {
            let Some(a) = schedule.assignment(&activity.name) else {
                continue;
            };
            if let Some(room) = self.catalog.room(&a.room) {
                if activity.enrollment > 0 {
                    let ratio = f64::from(room.capacity) / f64::from(activity.enrollment);
                    if room.capacity < activity.enrollment {
                        report.rooms_too_small += 1;
                    } else if ratio > rules.room_gross_oversize_factor {
                        report.rooms_grossly_oversized += 1;
                    } else if ratio > rules.room_oversize_factor {
                        report.rooms_oversized += 1;
                    }
                }
            }
            if !activity.preferred.contains(&a.facilitator)
                && !activity.other.contains(&a.facilitator)
            {
                report.facilitator_mismatches += 1;
            }
        }

        for count in occ.room_slot.values() {
            report.room_conflicts += count.saturating_sub(1);
        }
        for count in occ.facilitator_slot.values() {
            report.facilitator_conflicts += count.saturating_sub(1);
        }
        for (facilitator, &total) in &occ.facilitator_total {
            if total > rules.overload_threshold {
                report.overloaded_facilitators += 1;
            } else if total <= rules.underload_threshold
                && !rules.is_underload_exempt(facilitator)
            {
                report.underloaded_facilitators += 1;
            }
        }

        for (first, second) in &rules.section_pairs {
            if let Some(0) = self.pair_distance(schedule, first, second) {
                report.pairs_same_slot += 1;
            }
        }

        for (family_a, family_b) in &rules.cross_families {
            for a in family_a {
                for b in family_b {
                    match self.pair_distance(schedule, a, b) {
                        Some(0) => report.cross_family_same_slot += 1,
                        Some(1) if self.splits_campus(schedule, a, b) => {
                            report.cross_family_travel += 1;
                        }
                        _ => {}
                    }
                }
            }
        }

        Ok(report)
    }

    fn room_size_term(&self, activity: &Activity, a: &Assignment) -> f64 {
        let rules = self.rules;
        let Some(room) = self.catalog.room(&a.room) else {
            return 0.0;
        };
        if activity.enrollment == 0 {
            return 0.0;
        }
        if room.capacity < activity.enrollment {
            return rules.room_too_small_penalty;
        }
        let ratio = f64::from(room.capacity) / f64::from(activity.enrollment);
        if ratio > rules.room_gross_oversize_factor {
            rules.room_gross_oversize_penalty
        } else if ratio > rules.room_oversize_factor {
            rules.room_oversize_penalty
        } else {
            rules.room_fit_bonus
        }
    }

    fn facilitator_match_term(&self, activity: &Activity, a: &Assignment) -> f64 {
        let rules = self.rules;
        if activity.preferred.contains(&a.facilitator) {
            rules.preferred_facilitator_bonus
        } else if activity.other.contains(&a.facilitator) {
            rules.other_facilitator_bonus
        } else {
            rules.facilitator_mismatch_penalty
        }
    }

    fn booking_terms(&self, occ: &Occupancy<'_>) -> f64 {
        let rules = self.rules;
        let mut total = 0.0;
        for &count in occ.room_slot.values() {
            if count > 1 {
                total += rules.room_conflict_penalty * f64::from(count - 1);
            }
        }
        for &count in occ.facilitator_slot.values() {
            if count == 1 {
                total += rules.facilitator_single_booking_bonus;
            } else {
                total += rules.facilitator_conflict_penalty * f64::from(count - 1);
            }
        }
        total
    }

    fn load_terms(&self, occ: &Occupancy<'_>) -> f64 {
        let rules = self.rules;
        let mut total = 0.0;
        for (facilitator, &count) in &occ.facilitator_total {
            if count > rules.overload_threshold {
                total += rules.overload_penalty * f64::from(count - rules.overload_threshold);
            } else if count <= rules.underload_threshold
                && !rules.is_underload_exempt(facilitator)
            {
                total += rules.underload_penalty;
            }
        }
        total
    }

    fn pair_terms(&self, schedule: &Schedule) -> f64 {
        let rules = self.rules;
        let mut total = 0.0;
        for (first, second) in &rules.section_pairs {
            match self.pair_distance(schedule, first, second) {
                Some(0) => total += rules.pair_same_slot_penalty,
                Some(1) => total += rules.pair_adjacent_bonus,
                _ => {}
            }
        }
        total
    }

    fn cross_family_terms(&self, schedule: &Schedule) -> f64 {
        let rules = self.rules;
        let mut total = 0.0;
        for (family_a, family_b) in &rules.cross_families {
            for a in family_a {
                for b in family_b {
                    match self.pair_distance(schedule, a, b) {
                        Some(0) => total += rules.cross_same_slot_penalty,
                        Some(1) => {
                            if self.splits_campus(schedule, a, b) {
                                total += rules.cross_travel_penalty;
                            } else {
                                total += rules.cross_adjacent_bonus;
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
        total
    }

    /// Slot distance between two named activities, or `None` when either
    /// is unassigned or in an unknown slot. Pairings referencing activities
    /// outside the catalog are inert, not errors.
    fn pair_distance(&self, schedule: &Schedule, a: &str, b: &str) -> Option<usize> {
        let sa = schedule.assignment(a)?;
        let sb = schedule.assignment(b)?;
        self.catalog.slot_distance(&sa.time_slot, &sb.time_slot)
    }

    /// Whether exactly one of the two activities sits in a remote room.
    fn splits_campus(&self, schedule: &Schedule, a: &str, b: &str) -> bool {
        match (schedule.assignment(a), schedule.assignment(b)) {
            (Some(sa), Some(sb)) => {
                self.rules.is_remote(&sa.room) != self.rules.is_remote(&sb.room)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Facilitator, Room, TimeSlot};

    fn catalog_two() -> Catalog {
        Catalog {
            activities: vec![Activity::new("A", 10), Activity::new("B", 10)],
            rooms: vec![
                Room::new("R1", 10),
                Room::new("R2", 10),
                Room::new("R3", 10),
            ],
            time_slots: vec![
                TimeSlot::new("S1"),
                TimeSlot::new("S2"),
                TimeSlot::new("S3"),
            ],
            facilitators: vec![Facilitator::new("F"), Facilitator::new("G")],
        }
    }

    fn schedule_two(slot_a: &str, slot_b: &str) -> Schedule {
        Schedule::from_assignments([
            ("A".to_string(), Assignment::new("R1", slot_a, "F")),
            ("B".to_string(), Assignment::new("R2", slot_b, "G")),
        ])
    }

    // Baseline for catalog_two/schedule_two("S1", "S2") under bare rules:
    // two fit rooms (+0.6), two mismatched facilitators (-0.2), two single
    // bookings (+0.4), two underloads (-0.8) = 0.0.

    #[test]
    fn test_baseline_score() {
        let catalog = catalog_two();
        let rules = RuleConfig::bare();
        let eval = FitnessEvaluator::new(&catalog, &rules);
        let f = eval.evaluate(&schedule_two("S1", "S2")).unwrap();
        assert!((f - 0.0).abs() < 1e-12, "got {f}");
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let catalog = Catalog::sample();
        let rules = RuleConfig::default();
        let eval = FitnessEvaluator::new(&catalog, &rules);
        let schedule = Schedule::from_assignments(catalog.activities.iter().map(|a| {
            (
                a.name.clone(),
                Assignment::new("Roman 216", "11 AM", "Glen"),
            )
        }));
        let f1 = eval.evaluate(&schedule).unwrap();
        let f2 = eval.evaluate(&schedule).unwrap();
        assert_eq!(f1, f2);
    }

    #[test]
    fn test_room_too_small() {
        let mut catalog = catalog_two();
        catalog.rooms[0].capacity = 5; // R1 below A's enrollment of 10
        let rules = RuleConfig::bare();
        let eval = FitnessEvaluator::new(&catalog, &rules);
        let f = eval.evaluate(&schedule_two("S1", "S2")).unwrap();
        // Baseline 0.0 with R1's fit bonus replaced by the too-small penalty.
        let expected = rules.room_too_small_penalty - rules.room_fit_bonus;
        assert!((f - expected).abs() < 1e-12, "got {f}");
    }

    #[test]
    fn test_room_oversize_tiers() {
        let mut catalog = catalog_two();
        let rules = RuleConfig::bare();

        // Ratio 3.5 -> oversized.
        catalog.rooms[0].capacity = 35;
        let eval = FitnessEvaluator::new(&catalog, &rules);
        let f = eval.evaluate(&schedule_two("S1", "S2")).unwrap();
        let expected = rules.room_oversize_penalty - rules.room_fit_bonus;
        assert!((f - expected).abs() < 1e-12, "oversized: got {f}");

        // Ratio 10 -> grossly oversized.
        catalog.rooms[0].capacity = 100;
        let eval = FitnessEvaluator::new(&catalog, &rules);
        let f = eval.evaluate(&schedule_two("S1", "S2")).unwrap();
        let expected = rules.room_gross_oversize_penalty - rules.room_fit_bonus;
        assert!((f - expected).abs() < 1e-12, "gross: got {f}");

        // Ratio exactly at the oversize factor still counts as a fit.
        catalog.rooms[0].capacity = 30;
        let eval = FitnessEvaluator::new(&catalog, &rules);
        let f = eval.evaluate(&schedule_two("S1", "S2")).unwrap();
        assert!((f - 0.0).abs() < 1e-12, "boundary: got {f}");
    }

    #[test]
    fn test_facilitator_preference_terms() {
        let mut catalog = catalog_two();
        catalog.activities[0] = Activity::new("A", 10).with_preferred(&["F"]);
        catalog.activities[1] = Activity::new("B", 10).with_other(&["G"]);
        let rules = RuleConfig::bare();
        let eval = FitnessEvaluator::new(&catalog, &rules);
        let f = eval.evaluate(&schedule_two("S1", "S2")).unwrap();
        // Both mismatch penalties replaced by preferred/other bonuses.
        let expected = rules.preferred_facilitator_bonus + rules.other_facilitator_bonus
            - 2.0 * rules.facilitator_mismatch_penalty;
        assert!((f - expected).abs() < 1e-12, "got {f}");
    }

    #[test]
    fn test_double_booked_room_and_facilitator() {
        let catalog = catalog_two();
        let rules = RuleConfig::bare();
        let eval = FitnessEvaluator::new(&catalog, &rules);
        let schedule = Schedule::from_assignments([
            ("A".to_string(), Assignment::new("R1", "S1", "F")),
            ("B".to_string(), Assignment::new("R1", "S1", "F")),
        ]);
        // Fit bonuses +0.6, mismatches -0.2, room conflict -0.5, facilitator
        // conflict -0.2 (no single bonuses), one underload -0.4.
        let f = eval.evaluate(&schedule).unwrap();
        assert!((f - (-0.7)).abs() < 1e-12, "got {f}");

        let report = eval.violations(&schedule).unwrap();
        assert_eq!(report.room_conflicts, 1);
        assert_eq!(report.facilitator_conflicts, 1);
        assert_eq!(report.underloaded_facilitators, 1);
    }

    #[test]
    fn test_underload_exemption() {
        let catalog = catalog_two();
        let mut rules = RuleConfig::bare();
        rules.underload_exempt = vec!["F".to_string()];
        let eval = FitnessEvaluator::new(&catalog, &rules);
        let f = eval.evaluate(&schedule_two("S1", "S2")).unwrap();
        // Baseline 0.0 minus F's underload penalty (G still pays it).
        assert!((f - (-rules.underload_penalty)).abs() < 1e-12, "got {f}");
    }

    #[test]
    fn test_overload_scales_with_excess() {
        let n = 6u32;
        let catalog = Catalog {
            activities: (0..n).map(|i| Activity::new(format!("A{i}"), 10)).collect(),
            rooms: (0..n).map(|i| Room::new(format!("R{i}"), 10)).collect(),
            time_slots: (0..n).map(|i| TimeSlot::new(format!("S{i}"))).collect(),
            facilitators: vec![Facilitator::new("F")],
        };
        let rules = RuleConfig::bare();
        let eval = FitnessEvaluator::new(&catalog, &rules);
        let schedule = Schedule::from_assignments((0..n).map(|i| {
            (
                format!("A{i}"),
                Assignment::new(format!("R{i}"), format!("S{i}"), "F"),
            )
        }));
        let f = eval.evaluate(&schedule).unwrap();
        // 6 fits, 6 mismatches, 6 single bookings, overload excess of 2.
        let expected = 6.0 * (rules.room_fit_bonus
            + rules.facilitator_mismatch_penalty
            + rules.facilitator_single_booking_bonus)
            + 2.0 * rules.overload_penalty;
        assert!((f - expected).abs() < 1e-12, "got {f}");

        let report = eval.violations(&schedule).unwrap();
        assert_eq!(report.overloaded_facilitators, 1);
        assert_eq!(report.underloaded_facilitators, 0);
    }

    #[test]
    fn test_section_pair_spacing() {
        let catalog = catalog_two();
        let mut rules = RuleConfig::bare();
        rules.section_pairs = vec![("A".to_string(), "B".to_string())];
        let eval = FitnessEvaluator::new(&catalog, &rules);

        // Adjacent slots: bonus on top of the 0.0 baseline.
        let f = eval.evaluate(&schedule_two("S1", "S2")).unwrap();
        assert!((f - rules.pair_adjacent_bonus).abs() < 1e-12, "got {f}");

        // Two slots apart: neutral.
        let f = eval.evaluate(&schedule_two("S1", "S3")).unwrap();
        assert!((f - 0.0).abs() < 1e-12, "got {f}");

        // Same slot: penalty (single bonuses unchanged, distinct rooms).
        let f = eval.evaluate(&schedule_two("S1", "S1")).unwrap();
        assert!((f - rules.pair_same_slot_penalty).abs() < 1e-12, "got {f}");
    }

    #[test]
    fn test_cross_family_spacing_and_travel() {
        let catalog = catalog_two();
        let mut rules = RuleConfig::bare();
        rules.cross_families = vec![(vec!["A".to_string()], vec!["B".to_string()])];

        // Adjacent, same side of campus: bonus.
        let eval = FitnessEvaluator::new(&catalog, &rules);
        let f = eval.evaluate(&schedule_two("S1", "S2")).unwrap();
        assert!((f - rules.cross_adjacent_bonus).abs() < 1e-12, "got {f}");

        // Adjacent but split across campus: travel penalty replaces the bonus.
        rules.remote_rooms = vec!["R2".to_string()];
        let eval = FitnessEvaluator::new(&catalog, &rules);
        let f = eval.evaluate(&schedule_two("S1", "S2")).unwrap();
        assert!((f - rules.cross_travel_penalty).abs() < 1e-12, "got {f}");
        let report = eval.violations(&schedule_two("S1", "S2")).unwrap();
        assert_eq!(report.cross_family_travel, 1);

        // Same slot: penalty regardless of rooms.
        let f = eval.evaluate(&schedule_two("S1", "S1")).unwrap();
        assert!((f - rules.cross_same_slot_penalty).abs() < 1e-12, "got {f}");

        // Two apart: neutral.
        let f = eval.evaluate(&schedule_two("S1", "S3")).unwrap();
        assert!((f - 0.0).abs() < 1e-12, "got {f}");
    }

    #[test]
    fn test_incomplete_schedule_is_an_error() {
        let catalog = catalog_two();
        let rules = RuleConfig::bare();
        let eval = FitnessEvaluator::new(&catalog, &rules);
        let s = Schedule::from_assignments([(
            "A".to_string(),
            Assignment::new("R1", "S1", "F"),
        )]);
        assert!(matches!(
            eval.evaluate(&s),
            Err(GaError::IncompleteSchedule(_))
        ));
        assert!(matches!(
            eval.violations(&s),
            Err(GaError::IncompleteSchedule(_))
        ));
    }

    #[test]
    fn test_evaluate_all_matches_sequential() {
        let catalog = catalog_two();
        let rules = RuleConfig::bare();
        let eval = FitnessEvaluator::new(&catalog, &rules);
        let population = vec![
            schedule_two("S1", "S2"),
            schedule_two("S1", "S1"),
            schedule_two("S2", "S3"),
        ];
        let seq = eval.evaluate_all(&population, false).unwrap();
        let par = eval.evaluate_all(&population, true).unwrap();
        assert_eq!(seq, par);
        assert_eq!(seq.len(), 3);
    }
}
