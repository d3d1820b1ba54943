//! Data handed to reporters by the runner.

use std::fmt;
use std::time::Duration;

/// Label of the implicit scope every spec path starts with.
pub const TOP_LEVEL: &str = "[Top Level]";

/// Where a failure happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeLocation {
    pub file_name: String,
    pub line_number: u32,
    pub full_stack_trace: String,
}

impl CodeLocation {
    pub fn new(file_name: impl Into<String>, line_number: u32) -> Self {
        CodeLocation {
            file_name: file_name.into(),
            line_number,
            full_stack_trace: String::new(),
        }
    }

    pub fn with_stack_trace(mut self, trace: impl Into<String>) -> Self {
        self.full_stack_trace = trace.into();
        self
    }
}

impl fmt::Display for CodeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file_name, self.line_number)
    }
}

/// Why a spec did not pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecFailure {
    pub message: String,
    pub location: CodeLocation,
}

/// Final state of a spec or setup node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpecState {
    #[default]
    Invalid,
    Pending,
    Skipped,
    Passed,
    Failed,
    Panicked,
}

impl SpecState {
    pub fn is_failure(self) -> bool {
        matches!(self, SpecState::Failed | SpecState::Panicked)
    }
}

/// One spec as seen by a reporter.
#[derive(Debug, Clone, Default)]
pub struct SpecSummary {
    /// `[TOP_LEVEL, describe..., it]`.
    pub component_texts: Vec<String>,
    pub run_time: Duration,
    pub state: SpecState,
    pub failure: Option<SpecFailure>,
}

impl SpecSummary {
    pub fn new<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        SpecSummary {
            component_texts: texts.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn passed(&self) -> bool {
        self.state == SpecState::Passed
    }

    pub fn has_failure_state(&self) -> bool {
        self.state.is_failure()
    }

    pub fn skipped(&self) -> bool {
        self.state == SpecState::Skipped
    }

    pub fn pending(&self) -> bool {
        self.state == SpecState::Pending
    }

    /// Component texts below the implicit top-level scope.
    pub fn path(&self) -> &[String] {
        self.component_texts.get(1..).unwrap_or(&[])
    }

    /// `a > b > c`, the form used for filtering and failure lists.
    pub fn display_path(&self) -> String {
        self.path().join(" > ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupKind {
    BeforeSuite,
    AfterSuite,
}

/// Result of the suite-level hooks.
#[derive(Debug, Clone)]
pub struct SetupSummary {
    pub component_type: SetupKind,
    pub state: SpecState,
    pub run_time: Duration,
    pub failure: Option<SpecFailure>,
}

/// Totals for a whole suite run.
#[derive(Debug, Clone, Default)]
pub struct SuiteSummary {
    pub suite_description: String,
    pub suite_succeeded: bool,
    pub number_of_total_specs: usize,
    pub number_of_specs_that_will_be_run: usize,
    pub number_of_passed_specs: usize,
    pub number_of_failed_specs: usize,
    pub number_of_pending_specs: usize,
    pub number_of_skipped_specs: usize,
    pub run_time: Duration,
}
