use std::fmt::Write;
use std::io;

use chrono::NaiveDate;

use crate::models::{AttendanceResult, ChartDatum, Evaluation, THRESHOLD_PERCENT};

const LABEL_WIDTH: usize = 18;

fn plural(count: f64, one: &'static str, many: &'static str) -> &'static str {
    if count == 1.0 {
        one
    } else {
        many
    }
}

pub fn status_message(result: &AttendanceResult) -> String {
    match result {
        AttendanceResult::InvalidInput { reason } => format!("⚠️ {reason}"),
        AttendanceResult::BelowThreshold {
            percentage,
            additional_classes_needed,
        } => format!(
            "⚠️ Your attendance is {:.2}%. You need to attend {} more {} to reach {}%.",
            percentage,
            format_value(*additional_classes_needed),
            plural(*additional_classes_needed, "class", "classes"),
            THRESHOLD_PERCENT
        ),
        AttendanceResult::AtOrAboveThreshold {
            percentage,
            allowable_additional_absences,
        } => format!(
            "✅ Your attendance is {:.2}%. You can take {} more {} and still maintain {}%.",
            percentage,
            format_value(*allowable_additional_absences),
            plural(*allowable_additional_absences, "leave", "leaves"),
            THRESHOLD_PERCENT
        ),
    }
}

/// Horizontal bar chart with a marker column at the reference value.
pub fn render_chart(chart: &[ChartDatum], reference: f64, width: usize) -> String {
    let width = width.max(1);
    let scale = chart.iter().map(|d| d.value).fold(0.0_f64, f64::max);
    let column = |value: f64| -> usize {
        if scale <= 0.0 {
            0
        } else {
            ((value / scale) * width as f64).round() as usize
        }
    };
    let reference_column = (scale > 0.0 && reference <= scale).then(|| column(reference));

    let mut output = String::new();
    for datum in chart {
        let filled = column(datum.value);
        let mut bar = String::with_capacity(width * 3);
        for index in 0..=width {
            if index < filled {
                bar.push('█');
            } else if Some(index) == reference_column {
                bar.push('┆');
            } else {
                bar.push(' ');
            }
        }
        let _ = writeln!(
            output,
            "{:<LABEL_WIDTH$} |{} {}",
            datum.label,
            bar,
            format_value(datum.value)
        );
    }

    match reference_column {
        Some(_) => {
            let _ = writeln!(output, "{:<LABEL_WIDTH$}  ┆ = {}%", "", reference);
        }
        None => {
            let _ = writeln!(output, "{:<LABEL_WIDTH$}  ({}% line off scale)", "", reference);
        }
    }
    output
}

/// Shortest form that round-trips; whole numbers print without a fraction.
fn format_value(value: f64) -> String {
    value.to_string()
}

pub fn build_report(evaluation: &Evaluation, generated_on: NaiveDate) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Attendance Report");
    let _ = writeln!(output, "Generated on {generated_on}");
    let _ = writeln!(output);
    let _ = writeln!(output, "## Inputs");
    let _ = writeln!(
        output,
        "- Total classes held: {}",
        format_value(evaluation.input.total_classes)
    );
    let _ = writeln!(
        output,
        "- Classes attended: {}",
        format_value(evaluation.input.attended_classes)
    );
    if let Some(percentage) = evaluation.result.percentage() {
        let _ = writeln!(output, "- Attendance: {percentage:.2}%");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Status");
    let _ = writeln!(output, "{}", evaluation.message);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Chart Data");
    if evaluation.chart.is_empty() {
        let _ = writeln!(output, "No chart for invalid input.");
    } else {
        let _ = writeln!(output, "| Label | Value |");
        let _ = writeln!(output, "| --- | --- |");
        for datum in evaluation.chart.iter() {
            let _ = writeln!(output, "| {} | {} |", datum.label, format_value(datum.value));
        }
        let _ = writeln!(output);
        let _ = writeln!(output, "Reference line: {}%", evaluation.reference_line);
    }

    output
}

pub fn write_chart_csv<W: io::Write>(writer: W, chart: &[ChartDatum]) -> anyhow::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for datum in chart {
        csv_writer.serialize(datum)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn to_json(evaluation: &Evaluation) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(evaluation)?)
}
