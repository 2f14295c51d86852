use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod calculator;
mod error;
mod guard;
mod models;
mod report;
mod session;

use guard::Field;
use models::Evaluation;
use session::Session;

#[derive(Parser)]
#[command(name = "attendance-threshold")]
#[command(about = "Attendance calculator for the 75% attendance rule", long_about = None)]
struct Cli {
    /// Output format for calculation results
    #[arg(long, global = true, value_enum, env = "ATTENDANCE_FORMAT", default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Width of the text bar chart, in cells
    #[arg(long, global = true, env = "ATTENDANCE_CHART_WIDTH", default_value_t = 40)]
    chart_width: usize,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate attendance once and print the result
    Calculate {
        #[arg(long, allow_hyphen_values = true)]
        total: String,
        #[arg(long, allow_hyphen_values = true)]
        attended: String,
        /// Also write the chart data as CSV
        #[arg(long)]
        chart_csv: Option<PathBuf>,
    },
    /// Start an interactive session on stdin
    Session,
    /// Write a markdown report for one calculation
    Report {
        #[arg(long, allow_hyphen_values = true)]
        total: String,
        #[arg(long, allow_hyphen_values = true)]
        attended: String,
        #[arg(long, default_value = "attendance-report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Calculate {
            total,
            attended,
            chart_csv,
        } => {
            let evaluation = guarded_evaluation(&total, &attended)?;
            write_calculation(
                io::stdout().lock(),
                &evaluation,
                cli.format,
                cli.chart_width,
                chart_csv.as_deref(),
            )?;
        }
        Commands::Session => {
            let stdin = io::stdin();
            session::run(stdin.lock(), io::stdout().lock(), cli.chart_width)?;
        }
        Commands::Report {
            total,
            attended,
            out,
        } => {
            let evaluation = guarded_evaluation(&total, &attended)?;
            let generated_on = chrono::Local::now().date_naive();
            let report = report::build_report(&evaluation, generated_on);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!(path = %out.display(), "wrote report");
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

/// Feeds both values through the entry guard before calculating.
fn guarded_evaluation(total: &str, attended: &str) -> anyhow::Result<Evaluation> {
    let mut session = Session::default();
    for (field, raw) in [(Field::Total, total), (Field::Attended, attended)] {
        if !session.enter(field, raw) {
            if let Some(warning) = session.warning {
                anyhow::bail!(warning);
            }
        }
    }
    Ok(session.calculate().clone())
}

/// Prints one calculation to `out`. Notices about side files go to stderr so
/// `out` holds only the rendered result.
fn write_calculation<W: Write>(
    mut out: W,
    evaluation: &Evaluation,
    format: OutputFormat,
    chart_width: usize,
    chart_csv: Option<&Path>,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", report::to_json(evaluation)?)?,
        OutputFormat::Text => {
            writeln!(out, "{}", evaluation.message)?;
            if !evaluation.chart.is_empty() {
                writeln!(out)?;
                write!(
                    out,
                    "{}",
                    report::render_chart(&evaluation.chart, evaluation.reference_line, chart_width)
                )?;
            }
        }
    }
    out.flush()?;

    if let Some(path) = chart_csv {
        if evaluation.chart.is_empty() {
            eprintln!("No chart data to write.");
        } else {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            report::write_chart_csv(file, &evaluation.chart)?;
            info!(path = %path.display(), "wrote chart data");
            eprintln!("Chart data written to {}.", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendanceResult;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("attendance-threshold-{}-{name}", std::process::id()))
    }

    #[test]
    fn negative_total_stops_with_guard_warning() {
        let err = guarded_evaluation("-1", "3").expect_err("negative total is blocked");
        assert_eq!(err.to_string(), "⚠️ Total Classes cannot be negative");

        let err = guarded_evaluation("10", "-3").expect_err("negative attended is blocked");
        assert_eq!(err.to_string(), "⚠️ Attended Classes cannot be negative");
    }

    #[test]
    fn calculator_rejection_is_still_a_result() {
        let evaluation = guarded_evaluation("10", "11").expect("displayable result");
        assert!(matches!(
            evaluation.result,
            AttendanceResult::InvalidInput { .. }
        ));
    }

    #[test]
    fn json_output_stays_parseable_with_chart_csv() {
        let path = scratch_path("chart.csv");
        let evaluation = guarded_evaluation("10", "7").expect("valid input");
        let mut output = Vec::new();
        write_calculation(&mut output, &evaluation, OutputFormat::Json, 40, Some(&path))
            .expect("calculation written");

        let value: serde_json::Value =
            serde_json::from_slice(&output).expect("stdout is a single JSON document");
        assert_eq!(value["result"]["status"], "below-threshold");

        let csv = std::fs::read_to_string(&path).expect("csv written");
        assert!(csv.starts_with("label,value\n"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn json_output_stays_parseable_without_chart_data() {
        let path = scratch_path("empty.csv");
        let evaluation = guarded_evaluation("0", "0").expect("displayable result");
        let mut output = Vec::new();
        write_calculation(&mut output, &evaluation, OutputFormat::Json, 40, Some(&path))
            .expect("calculation written");

        let value: serde_json::Value =
            serde_json::from_slice(&output).expect("stdout is a single JSON document");
        assert_eq!(value["result"]["reason"], "non-positive-total");
        assert!(!path.exists());
    }
}
