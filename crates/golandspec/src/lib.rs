//! # golandspec — BDD specs with GoLand-compatible reporting
//!
//! Write structured tests with `describe`, `context`, `it` and lifecycle
//! hooks. Results are reported either as a colored console tree or, when
//! the run is started from GoLand, as `go test -v` output that the IDE turns
//! into its test tree.
//!
//! ## Quick example
//!
//! ```rust,no_run
//! fn main() {
//!     golandspec::run("calculator", |ctx| {
//!         ctx.describe("Calculator", |ctx| {
//!             ctx.it("adds two numbers", || {
//!                 assert_eq!(2 + 3, 5);
//!             });
//!
//!             ctx.context("with negative numbers", |ctx| {
//!                 ctx.it("handles negatives", || {
//!                     assert_eq!(-1 + 1, 0);
//!                 });
//!             });
//!         });
//!     });
//! }
//! ```
//!
//! Under GoLand this prints:
//!
//! ```text
//! === RUN
//! === RUN   Calculator
//! === RUN   Calculator/adds_two_numbers
//! --- PASS: Calculator/adds_two_numbers (0.000s)
//! === RUN   Calculator/with_negative_numbers
//! === RUN   Calculator/with_negative_numbers/handles_negatives
//! --- PASS: Calculator/with_negative_numbers/handles_negatives (0.000s)
//! --- PASS: Calculator/with_negative_numbers (0.000s)
//! --- PASS: Calculator (0.000s)
//! --- :  (0.000s)
//! ```
//!
//! ## Configuration
//!
//! - `--reporter=goland|console` or `GOLANDSPEC_REPORTER` forces a reporter.
//! - `-v` / `--verbose` or `GOLANDSPEC_VERBOSE=1` adds stack traces.
//! - `GOLANDSPEC_LOG` sets the `tracing` filter for diagnostics on stderr.
//!
//! ## Features
//!
//! - `googletest` — re-exports `googletest` matchers via `golandspec::matchers`

mod context;
pub mod config;
pub mod error;
pub mod logging;
mod panics;
pub mod reporter;
pub mod runner;
pub mod summary;
pub mod tree;

pub use config::{ReporterKind, RunConfig};
pub use context::{build, run, Context};
pub use error::ReportError;
pub use reporter::{ConsoleReporter, GolandReporter, Reporter};
pub use tree::ResultTree;

/// Re-export of the [`googletest`] crate. Available with the `googletest` feature.
#[cfg(feature = "googletest")]
pub use googletest;

/// Composable matchers re-exported from [`googletest::prelude`].
#[cfg(feature = "googletest")]
pub mod matchers {
    pub use googletest::prelude::*;
}

/// Fail the current spec with `message`.
///
/// Unlike a plain panic, the spec is reported as failed rather than panicked.
#[track_caller]
pub fn fail(message: impl Into<String>) -> ! {
    std::panic::panic_any(panics::FailSignal(message.into()))
}

/// Skip the current spec at runtime with a reason.
#[track_caller]
pub fn skip(reason: impl Into<String>) -> ! {
    std::panic::panic_any(panics::SkipSignal(reason.into()))
}
