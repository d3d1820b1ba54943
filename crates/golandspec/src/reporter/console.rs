//! Default reporter: colored, indented tree output.
//!
//! ```text
//! Calculator
//!   ✓ adds two numbers
//!   when negative
//!     ✓ handles negatives
//!     ✗ fails on overflow
//!       Error: attempt to add with overflow
//! ```

use std::io::{self, IsTerminal, Write};

use owo_colors::{OwoColorize, Style};

use super::Reporter;
use crate::error::ReportError;
use crate::summary::{SetupKind, SetupSummary, SpecState, SpecSummary, SuiteSummary};

// ============================================================================
// ANSI color helpers
// ============================================================================

fn use_color() -> bool {
    // Respect NO_COLOR env var (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    io::stdout().is_terminal()
}

struct Palette {
    enabled: bool,
}

impl Palette {
    fn paint(&self, s: &str, style: Style) -> String {
        if self.enabled {
            s.style(style).to_string()
        } else {
            s.to_string()
        }
    }

    fn green(&self, s: &str) -> String {
        self.paint(s, Style::new().green())
    }

    fn red(&self, s: &str) -> String {
        self.paint(s, Style::new().red())
    }

    fn yellow(&self, s: &str) -> String {
        self.paint(s, Style::new().yellow())
    }

    fn bold(&self, s: &str) -> String {
        self.paint(s, Style::new().bold())
    }

    fn dim(&self, s: &str) -> String {
        self.paint(s, Style::new().dimmed())
    }
}

// ============================================================================
// Reporter
// ============================================================================

/// Prints each spec as it completes, grouped under its describe blocks, then
/// a PASS/FAIL summary.
pub struct ConsoleReporter<W: Write = io::Stdout> {
    out: W,
    palette: Palette,
    /// Group headings currently open, outermost first.
    groups: Vec<String>,
    failures: Vec<String>,
}

impl ConsoleReporter {
    /// Reporter writing to stdout, colored when stdout is a terminal.
    pub fn new() -> Self {
        ConsoleReporter::with_writer(io::stdout(), use_color())
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn with_writer(out: W, color: bool) -> Self {
        ConsoleReporter {
            out,
            palette: Palette { enabled: color },
            groups: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Prints headings for the groups of `spec` that are not already open.
    fn open_groups(&mut self, groups: &[String]) -> io::Result<()> {
        let shared = self
            .groups
            .iter()
            .zip(groups)
            .take_while(|(a, b)| a == b)
            .count();
        self.groups.truncate(shared);

        for (depth, name) in groups.iter().enumerate().skip(shared) {
            let indent = "  ".repeat(depth);
            writeln!(self.out, "{indent}{}", self.palette.bold(name))?;
            self.groups.push(name.clone());
        }
        Ok(())
    }

    fn report_setup_failure(&mut self, setup: &SetupSummary) -> io::Result<()> {
        let Some(failure) = setup.failure.as_ref().filter(|_| setup.state.is_failure()) else {
            return Ok(());
        };
        let label = match setup.component_type {
            SetupKind::BeforeSuite => "before_suite",
            SetupKind::AfterSuite => "after_suite",
        };
        writeln!(
            self.out,
            "{} {}",
            self.palette.red("✗"),
            self.palette.red(&format!("{label} failed: {}", failure.message))
        )?;
        self.failures.push(format!("{label}: {}", failure.message));
        Ok(())
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn suite_will_begin(&mut self, summary: &SuiteSummary) -> Result<(), ReportError> {
        self.groups.clear();
        self.failures.clear();
        writeln!(self.out)?;
        if !summary.suite_description.is_empty() {
            let header = format!("--- {} ---", summary.suite_description);
            writeln!(self.out, "{}", self.palette.dim(&header))?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn before_suite_did_run(&mut self, setup: &SetupSummary) -> Result<(), ReportError> {
        Ok(self.report_setup_failure(setup)?)
    }

    fn spec_will_run(&mut self, _spec: &SpecSummary) -> Result<(), ReportError> {
        Ok(())
    }

    fn spec_did_complete(&mut self, spec: &SpecSummary) -> Result<(), ReportError> {
        let Some((name, groups)) = spec.path().split_last() else {
            return Ok(());
        };
        // Specs skipped by focus or filter stay silent.
        if spec.state == SpecState::Skipped && spec.failure.is_none() {
            return Ok(());
        }

        self.open_groups(groups)?;
        let indent = "  ".repeat(groups.len());
        let ms = spec.run_time.as_millis();
        let time_str = if ms > 100 {
            format!(" {}", self.palette.dim(&format!("({ms}ms)")))
        } else {
            String::new()
        };

        match spec.state {
            SpecState::Passed => {
                writeln!(self.out, "{indent}{} {}{}", self.palette.green("✓"), name, time_str)?;
            }
            SpecState::Pending => {
                writeln!(self.out, "{indent}{} {}", self.palette.yellow("-"), self.palette.dim(name))?;
            }
            SpecState::Skipped => {
                let reason = spec.failure.as_ref().map(|f| f.message.as_str()).unwrap_or_default();
                writeln!(
                    self.out,
                    "{indent}{} {} {}",
                    self.palette.yellow("○"),
                    self.palette.dim(name),
                    self.palette.dim(&format!("(skipped: {reason})"))
                )?;
            }
            state if state.is_failure() => {
                let msg = spec
                    .failure
                    .as_ref()
                    .map(|f| f.message.clone())
                    .unwrap_or_else(|| "unknown failure".to_string());
                writeln!(
                    self.out,
                    "{indent}{} {}{}",
                    self.palette.red("✗"),
                    self.palette.red(name),
                    time_str
                )?;
                writeln!(
                    self.out,
                    "{indent}  {}",
                    self.palette.red(&format!("Error: {msg}"))
                )?;
                self.failures.push(format!("{}: {msg}", spec.display_path()));
            }
            state => {
                return Err(ReportError::UnknownOutcome {
                    path: spec.display_path(),
                    state,
                });
            }
        }
        Ok(())
    }

    fn after_suite_did_run(&mut self, setup: &SetupSummary) -> Result<(), ReportError> {
        Ok(self.report_setup_failure(setup)?)
    }

    fn suite_did_end(&mut self, summary: &SuiteSummary) -> Result<(), ReportError> {
        let p = &self.palette;
        let elapsed_str = format!("{:.3}s", summary.run_time.as_secs_f64());

        let parts: Vec<String> = [
            (summary.number_of_passed_specs > 0)
                .then(|| p.green(&format!("{} passed", summary.number_of_passed_specs))),
            (summary.number_of_failed_specs > 0)
                .then(|| p.red(&format!("{} failed", summary.number_of_failed_specs))),
            (summary.number_of_pending_specs > 0)
                .then(|| p.yellow(&format!("{} pending", summary.number_of_pending_specs))),
            (summary.number_of_skipped_specs > 0)
                .then(|| p.dim(&format!("{} skipped", summary.number_of_skipped_specs))),
        ]
        .into_iter()
        .flatten()
        .collect();

        let summary_line = format!("{} ({})", parts.join(", "), p.dim(&elapsed_str));

        writeln!(self.out)?;
        if summary.suite_succeeded {
            writeln!(self.out, "{}", p.green("PASS"))?;
            writeln!(self.out, "{summary_line}")?;
        } else {
            writeln!(self.out, "{}", p.red("FAIL"))?;
            writeln!(self.out, "{summary_line}")?;
            writeln!(self.out)?;
            writeln!(self.out, "Failures:")?;
            for (i, failure) in self.failures.iter().enumerate() {
                writeln!(self.out, "  {}. {}", i + 1, failure)?;
            }
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(())
    }
}
