use serde::Serialize;

use crate::error::InvalidReason;

/// Minimum attendance ratio, as a fraction.
pub const THRESHOLD_RATIO: f64 = 0.75;
/// Minimum attendance, as a percentage. Also the chart reference line.
pub const THRESHOLD_PERCENT: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttendanceInput {
    pub total_classes: f64,
    pub attended_classes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum AttendanceResult {
    InvalidInput {
        reason: InvalidReason,
    },
    // Counts are whole numbers held as f64 so very large totals keep their value.
    BelowThreshold {
        percentage: f64,
        additional_classes_needed: f64,
    },
    AtOrAboveThreshold {
        percentage: f64,
        allowable_additional_absences: f64,
    },
}

impl AttendanceResult {
    pub fn percentage(&self) -> Option<f64> {
        match self {
            AttendanceResult::InvalidInput { .. } => None,
            AttendanceResult::BelowThreshold { percentage, .. }
            | AttendanceResult::AtOrAboveThreshold { percentage, .. } => Some(*percentage),
        }
    }

    pub fn status(&self) -> Status {
        match self {
            AttendanceResult::AtOrAboveThreshold { .. } => Status::Good,
            _ => Status::Bad,
        }
    }
}

/// Styling category for the rendered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Good,
    Bad,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDatum {
    pub label: String,
    pub value: f64,
}

impl ChartDatum {
    pub fn new(label: &str, value: f64) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// Everything the presentation layer needs after one calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub input: AttendanceInput,
    pub result: AttendanceResult,
    pub message: String,
    pub status: Status,
    pub chart: Vec<ChartDatum>,
    pub reference_line: f64,
}
