//! Reporter producing `go test -v` output that GoLand renders as a test tree.

use std::io::{self, Write};

use super::Reporter;
use crate::error::ReportError;
use crate::summary::{SetupSummary, SpecSummary, SuiteSummary};
use crate::tree::{ResultTree, Status};

/// Builds a [`ResultTree`] from spec events and prints it after the
/// before-suite hooks, after the after-suite hooks and at suite end.
///
/// Each print is the whole tree so far; the IDE keeps the last one.
pub struct GolandReporter<W: Write = io::Stdout> {
    tree: ResultTree,
    out: W,
    verbose: bool,
}

impl GolandReporter {
    /// Reporter writing to stdout.
    pub fn new(verbose: bool) -> Self {
        GolandReporter::with_writer(io::stdout(), verbose)
    }
}

impl<W: Write> GolandReporter<W> {
    pub fn with_writer(out: W, verbose: bool) -> Self {
        GolandReporter {
            tree: ResultTree::default(),
            out,
            verbose,
        }
    }

    pub fn tree(&self) -> &ResultTree {
        &self.tree
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print(&mut self) -> Result<(), ReportError> {
        self.out.write_all(self.tree.render(self.verbose).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Reporter for GolandReporter<W> {
    fn suite_will_begin(&mut self, summary: &SuiteSummary) -> Result<(), ReportError> {
        self.tree.reset(summary.suite_description.as_str());
        Ok(())
    }

    fn before_suite_did_run(&mut self, _setup: &SetupSummary) -> Result<(), ReportError> {
        self.print()
    }

    fn spec_will_run(&mut self, spec: &SpecSummary) -> Result<(), ReportError> {
        self.tree.insert(spec.path());
        Ok(())
    }

    fn spec_did_complete(&mut self, spec: &SpecSummary) -> Result<(), ReportError> {
        let outcome = if spec.passed() {
            Status::Pass
        } else if spec.has_failure_state() {
            Status::Fail
        } else if spec.skipped() || spec.pending() {
            Status::Skip
        } else {
            return Err(ReportError::UnknownOutcome {
                path: spec.path().join("/"),
                state: spec.state,
            });
        };

        self.tree.record_outcome(spec.path(), spec.run_time, outcome)?;
        if outcome == Status::Fail {
            if let Some(failure) = &spec.failure {
                self.tree.attach_failure(spec.path(), failure.clone());
            }
        }
        Ok(())
    }

    fn after_suite_did_run(&mut self, _setup: &SetupSummary) -> Result<(), ReportError> {
        self.print()
    }

    fn suite_did_end(&mut self, _summary: &SuiteSummary) -> Result<(), ReportError> {
        self.print()
    }
}
