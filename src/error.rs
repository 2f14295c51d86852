use serde::Serialize;
use thiserror::Error;

use crate::guard::Field;

/// Why the calculator refused its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidReason {
    #[error("Please enter valid numbers")]
    NotANumber,
    #[error("Total classes must be greater than 0")]
    NonPositiveTotal,
    #[error("Attended classes cannot exceed total classes")]
    AttendedExceedsTotal,
    #[error("Attended classes cannot be negative")]
    NegativeAttended,
}

/// Raised by the input guard while a value is being entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EntryWarning {
    #[error("⚠️ {0} cannot be negative")]
    Negative(Field),
}
