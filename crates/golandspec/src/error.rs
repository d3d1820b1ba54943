//! Errors raised while feeding lifecycle events to a reporter.

use crate::summary::SpecState;

/// A reporter failure.
///
/// `UnregisteredPath` and `UnknownOutcome` mean the runner broke its
/// contract with the reporter; they are never retried and abort the run.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// An outcome arrived for a spec that was never announced.
    #[error("no spec registered at `{path}`")]
    UnregisteredPath { path: String },

    /// A completed spec carried a state that is neither passed, failed,
    /// skipped nor pending.
    #[error("unknown outcome {state:?} for `{path}`")]
    UnknownOutcome { path: String, state: SpecState },

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
