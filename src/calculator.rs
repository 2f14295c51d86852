use tracing::{debug, warn};

use crate::error::InvalidReason;
use crate::models::{
    AttendanceInput, AttendanceResult, ChartDatum, Evaluation, THRESHOLD_PERCENT, THRESHOLD_RATIO,
};
use crate::report;

pub const LABEL_TOTAL: &str = "Total Classes";
pub const LABEL_ATTENDED: &str = "Attended";
pub const LABEL_REQUIRED: &str = "Required for 75%";
pub const LABEL_MAX_LEAVES: &str = "Max Leaves";

/// Coerces a raw entry field to a number. Blank is zero, garbage is NaN.
pub fn parse_field(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

pub fn compute(total_classes: f64, attended_classes: f64) -> AttendanceResult {
    if let Err(reason) = validate(total_classes, attended_classes) {
        warn!(total_classes, attended_classes, %reason, "rejected attendance input");
        return AttendanceResult::InvalidInput { reason };
    }

    let percentage = (attended_classes / total_classes) * 100.0;
    let result = if percentage < THRESHOLD_PERCENT {
        // (attended + x) / (total + x) >= r  =>  x >= (r * total - attended) / (1 - r)
        let needed = ((THRESHOLD_RATIO * total_classes - attended_classes)
            / (1.0 - THRESHOLD_RATIO))
            .ceil();
        AttendanceResult::BelowThreshold {
            percentage,
            additional_classes_needed: whole_count(needed),
        }
    } else {
        // attended / (total + y) >= r  =>  y <= (attended - r * total) / r
        let allowed =
            ((attended_classes - THRESHOLD_RATIO * total_classes) / THRESHOLD_RATIO).floor();
        AttendanceResult::AtOrAboveThreshold {
            percentage,
            allowable_additional_absences: whole_count(allowed),
        }
    };

    debug!(total_classes, attended_classes, ?result, "computed attendance");
    result
}

/// Clamps rounding slack below zero, including `-0.0`, to zero.
fn whole_count(count: f64) -> f64 {
    if count > 0.0 {
        count
    } else {
        0.0
    }
}

fn validate(total_classes: f64, attended_classes: f64) -> Result<(), InvalidReason> {
    if !total_classes.is_finite() || !attended_classes.is_finite() {
        return Err(InvalidReason::NotANumber);
    }
    if total_classes <= 0.0 {
        return Err(InvalidReason::NonPositiveTotal);
    }
    if attended_classes > total_classes {
        return Err(InvalidReason::AttendedExceedsTotal);
    }
    if attended_classes < 0.0 {
        return Err(InvalidReason::NegativeAttended);
    }
    Ok(())
}

/// The four bars shown under a successful result.
pub fn chart_data(
    total_classes: f64,
    attended_classes: f64,
    result: &AttendanceResult,
) -> Option<Vec<ChartDatum>> {
    let (required, max_leaves) = match result {
        AttendanceResult::InvalidInput { .. } => return None,
        AttendanceResult::BelowThreshold {
            additional_classes_needed,
            ..
        } => (*additional_classes_needed, 0.0),
        AttendanceResult::AtOrAboveThreshold {
            allowable_additional_absences,
            ..
        } => (0.0, *allowable_additional_absences),
    };

    Some(vec![
        ChartDatum::new(LABEL_TOTAL, total_classes),
        ChartDatum::new(LABEL_ATTENDED, attended_classes),
        ChartDatum::new(LABEL_REQUIRED, required),
        ChartDatum::new(LABEL_MAX_LEAVES, max_leaves),
    ])
}

pub fn evaluate(total_classes: f64, attended_classes: f64) -> Evaluation {
    let result = compute(total_classes, attended_classes);
    let chart = chart_data(total_classes, attended_classes, &result).unwrap_or_default();

    Evaluation {
        input: AttendanceInput {
            total_classes,
            attended_classes,
        },
        message: report::status_message(&result),
        status: result.status(),
        result,
        chart,
        reference_line: THRESHOLD_PERCENT,
    }
}
