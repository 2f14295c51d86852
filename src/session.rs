use std::io::{BufRead, Write};

use anyhow::Context;
use tracing::debug;

use crate::calculator;
use crate::error::EntryWarning;
use crate::guard::{self, Field};
use crate::models::Evaluation;
use crate::report;

/// State held by the caller between calculations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub total_raw: String,
    pub attended_raw: String,
    pub warning: Option<EntryWarning>,
    pub evaluation: Option<Evaluation>,
}

impl Session {
    /// Applies a keystroke-level edit. Returns whether the value was taken.
    pub fn enter(&mut self, field: Field, raw: &str) -> bool {
        let outcome = guard::accept(field, raw);
        self.warning = outcome.warning;
        if outcome.accepted {
            match field {
                Field::Total => self.total_raw = raw.trim().to_string(),
                Field::Attended => self.attended_raw = raw.trim().to_string(),
            }
        }
        outcome.accepted
    }

    pub fn calculate(&mut self) -> &Evaluation {
        let total = calculator::parse_field(&self.total_raw);
        let attended = calculator::parse_field(&self.attended_raw);
        self.evaluation
            .insert(calculator::evaluate(total, attended))
    }

    pub fn reset(&mut self) {
        debug!("session reset");
        *self = Session::default();
    }
}

const HELP: &str = "Commands:
  total <n>      set total classes held
  attended <n>   set classes attended
  calc           calculate attendance
  show           show current inputs
  reset          clear everything
  help           show this help
  quit           leave the session";

/// Drives a line-oriented session until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(reader: R, mut writer: W, chart_width: usize) -> anyhow::Result<()> {
    let mut session = Session::default();
    writeln!(writer, "🎓 Attendance Tracker (type `help` for commands)")?;

    for line in reader.lines() {
        let line = line.context("failed to read from input")?;
        let mut parts = line.trim().splitn(2, char::is_whitespace);
        let command = parts.next().unwrap_or_default();
        let argument = parts.next().unwrap_or_default().trim();

        match command {
            "" => continue,
            "total" | "attended" => {
                let field = if command == "total" {
                    Field::Total
                } else {
                    Field::Attended
                };
                session.enter(field, argument);
                if let Some(warning) = &session.warning {
                    writeln!(writer, "{warning}")?;
                }
            }
            "calc" | "calculate" => {
                let evaluation = session.calculate();
                writeln!(writer, "{}", evaluation.message)?;
                if !evaluation.chart.is_empty() {
                    write!(
                        writer,
                        "{}",
                        report::render_chart(&evaluation.chart, evaluation.reference_line, chart_width)
                    )?;
                }
            }
            "show" => {
                writeln!(
                    writer,
                    "Total Classes Held: {}\nClasses Attended: {}",
                    display_raw(&session.total_raw),
                    display_raw(&session.attended_raw)
                )?;
            }
            "reset" => {
                session.reset();
                writeln!(writer, "Cleared.")?;
            }
            "help" => writeln!(writer, "{HELP}")?,
            "quit" | "exit" => break,
            other => writeln!(writer, "Unknown command `{other}`. Type `help` for commands.")?,
        }
    }

    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn display_raw(raw: &str) -> &str {
    if raw.is_empty() {
        "(blank)"
    } else {
        raw
    }
}
