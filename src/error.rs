//! Crate error types.
//!
//! Fatal errors abort a run before any partial result is produced.
//! Degenerate selection weights are not an error: the selector recovers
//! locally by falling back to uniform sampling.

use thiserror::Error;

/// Errors produced by the timetabling GA engine.
#[derive(Debug, Error)]
pub enum GaError {
    /// The catalog is missing one of its required tables.
    ///
    /// A run cannot start without at least one activity, room, time slot,
    /// and facilitator.
    #[error("empty catalog: no {0} defined")]
    EmptyCatalog(&'static str),

    /// An engine parameter is out of range.
    ///
    /// Surfaced by [`EngineConfig::validate`](crate::ga::EngineConfig::validate)
    /// before any generation runs.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A schedule does not cover the catalog's activities exactly once.
    ///
    /// This is an internal invariant violation (an operator bug), never
    /// silently repaired.
    #[error("incomplete schedule: {0}")]
    IncompleteSchedule(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = GaError::EmptyCatalog("rooms");
        assert_eq!(e.to_string(), "empty catalog: no rooms defined");

        let e = GaError::InvalidConfiguration("population_size must be at least 1".into());
        assert!(e.to_string().contains("invalid configuration"));

        let e = GaError::IncompleteSchedule("missing activity SLA101A".into());
        assert!(e.to_string().contains("incomplete schedule"));
    }
}
