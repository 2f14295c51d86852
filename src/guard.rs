use std::fmt;

use tracing::warn;

use crate::calculator::parse_field;
use crate::error::EntryWarning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Total,
    Attended,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Total => f.write_str("Total Classes"),
            Field::Attended => f.write_str("Attended Classes"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardOutcome {
    pub accepted: bool,
    pub warning: Option<EntryWarning>,
}

/// Screens a value as it is typed. Only negative numbers are blocked; blanks
/// and non-numbers pass through and are left to the calculator.
pub fn accept(field: Field, candidate: &str) -> GuardOutcome {
    if parse_field(candidate) < 0.0 {
        warn!(%field, candidate, "blocked negative entry");
        return GuardOutcome {
            accepted: false,
            warning: Some(EntryWarning::Negative(field)),
        };
    }

    GuardOutcome {
        accepted: true,
        warning: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_values_are_blocked_with_field_name() {
        let outcome = accept(Field::Total, "-3");
        assert!(!outcome.accepted);
        assert_eq!(
            outcome.warning.map(|w| w.to_string()),
            Some("⚠️ Total Classes cannot be negative".to_string())
        );

        let outcome = accept(Field::Attended, " -0.5 ");
        assert!(!outcome.accepted);
        assert_eq!(
            outcome.warning.map(|w| w.to_string()),
            Some("⚠️ Attended Classes cannot be negative".to_string())
        );
    }

    #[test]
    fn everything_else_passes() {
        for candidate in ["", "0", "-0", "12", "4.5", "abc", "-"] {
            let outcome = accept(Field::Attended, candidate);
            assert!(outcome.accepted, "{candidate:?} should pass");
            assert!(outcome.warning.is_none());
        }
    }
}
