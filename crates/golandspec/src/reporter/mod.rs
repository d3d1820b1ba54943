//! Reporters receive the runner's lifecycle events and render them.

pub mod console;
pub mod goland;
pub mod select;

pub use console::ConsoleReporter;
pub use goland::GolandReporter;
pub use select::{is_goland_environment, new_auto_reporter};

use crate::error::ReportError;
use crate::summary::{SetupSummary, SpecSummary, SuiteSummary};

/// Lifecycle callbacks, invoked strictly in order from a single thread.
///
/// For every spec `spec_will_run` comes before `spec_did_complete`. An `Err`
/// aborts the run.
pub trait Reporter {
    fn suite_will_begin(&mut self, summary: &SuiteSummary) -> Result<(), ReportError>;

    fn before_suite_did_run(&mut self, setup: &SetupSummary) -> Result<(), ReportError>;

    fn spec_will_run(&mut self, spec: &SpecSummary) -> Result<(), ReportError>;

    fn spec_did_complete(&mut self, spec: &SpecSummary) -> Result<(), ReportError>;

    fn after_suite_did_run(&mut self, setup: &SetupSummary) -> Result<(), ReportError>;

    fn suite_did_end(&mut self, summary: &SuiteSummary) -> Result<(), ReportError>;
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn suite_will_begin(&mut self, summary: &SuiteSummary) -> Result<(), ReportError> {
        (**self).suite_will_begin(summary)
    }

    fn before_suite_did_run(&mut self, setup: &SetupSummary) -> Result<(), ReportError> {
        (**self).before_suite_did_run(setup)
    }

    fn spec_will_run(&mut self, spec: &SpecSummary) -> Result<(), ReportError> {
        (**self).spec_will_run(spec)
    }

    fn spec_did_complete(&mut self, spec: &SpecSummary) -> Result<(), ReportError> {
        (**self).spec_did_complete(spec)
    }

    fn after_suite_did_run(&mut self, setup: &SetupSummary) -> Result<(), ReportError> {
        (**self).after_suite_did_run(setup)
    }

    fn suite_did_end(&mut self, summary: &SuiteSummary) -> Result<(), ReportError> {
        (**self).suite_did_end(summary)
    }
}
