//! Picks a reporter based on configuration and the environment.

use super::{ConsoleReporter, GolandReporter, Reporter};
use crate::config::{ReporterKind, RunConfig};

/// Environment variables that mention the IDE when a run is launched from it.
const IDE_HINTS: [&str; 2] = ["OLDPWD", "SNAP_NAME"];

/// Whether the process looks like it was started by GoLand.
pub fn is_goland_environment() -> bool {
    detect_goland(|key| std::env::var(key).ok())
}

fn detect_goland(lookup: impl Fn(&str) -> Option<String>) -> bool {
    IDE_HINTS.iter().any(|key| {
        lookup(key).is_some_and(|value| value.to_ascii_lowercase().contains("goland"))
    })
}

fn choose(config: &RunConfig, lookup: impl Fn(&str) -> Option<String>) -> ReporterKind {
    match config.reporter {
        Some(kind) => kind,
        None if detect_goland(lookup) => ReporterKind::Goland,
        None => ReporterKind::Console,
    }
}

/// The GoLand reporter when running under the IDE (or when asked for),
/// otherwise the colored console reporter.
pub fn new_auto_reporter(config: &RunConfig) -> Box<dyn Reporter> {
    let kind = choose(config, |key| std::env::var(key).ok());
    tracing::debug!(?kind, "selected reporter");
    match kind {
        ReporterKind::Goland => Box::new(GolandReporter::new(config.verbose)),
        ReporterKind::Console => Box::new(ConsoleReporter::new()),
    }
}
