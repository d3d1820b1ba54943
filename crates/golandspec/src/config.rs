//! Run configuration from the command line and environment.

use std::str::FromStr;

/// Which reporter renders the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReporterKind {
    /// `go test -v` style tree for IDE consoles.
    Goland,
    /// Colored, indented console output.
    Console,
}

impl FromStr for ReporterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "goland" | "ide" => Ok(ReporterKind::Goland),
            "console" | "default" => Ok(ReporterKind::Console),
            other => Err(format!("unknown reporter `{other}`")),
        }
    }
}

/// Configuration parsed from command-line args.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Filter string — only run tests whose full path contains this.
    pub filter: Option<String>,
    /// Only list tests, don't run them.
    pub list: bool,
    /// Run non-focused tests even when some tests are focused.
    pub include_ignored: bool,
    /// Print full stack traces for failures.
    pub verbose: bool,
    /// Reporter forced by `--reporter` or `GOLANDSPEC_REPORTER`.
    pub reporter: Option<ReporterKind>,
    /// Reporter values that did not parse. Logged by
    /// [`RunConfig::warn_rejected`] once logging is up.
    pub rejected: Vec<String>,
}

impl RunConfig {
    /// Parse from the process args (compatible with `cargo test -- <args>`)
    /// and apply environment overrides.
    pub fn from_args() -> Self {
        let mut config = Self::parse(std::env::args().skip(1));
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Parse arguments, excluding the binary name.
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = RunConfig::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--list" => config.list = true,
                "--include-ignored" | "--ignored" => config.include_ignored = true,
                "-v" | "--verbose" => config.verbose = true,
                "--reporter" => {
                    if let Some(value) = args.next() {
                        config.set_reporter(&value);
                    }
                }
                arg if arg.starts_with("--reporter=") => {
                    config.set_reporter(&arg["--reporter=".len()..]);
                }
                arg if !arg.starts_with('-') => {
                    config.filter = Some(arg.to_string());
                }
                _ => {} // ignore unknown flags
            }
        }

        config
    }

    /// Overlay `GOLANDSPEC_VERBOSE` and `GOLANDSPEC_REPORTER`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("GOLANDSPEC_VERBOSE") {
            if val == "1" || val.eq_ignore_ascii_case("true") {
                self.verbose = true;
            }
        }
        if self.reporter.is_none() {
            if let Some(val) = lookup("GOLANDSPEC_REPORTER") {
                self.set_reporter(&val);
            }
        }
    }

    fn set_reporter(&mut self, value: &str) {
        match value.parse() {
            Ok(kind) => self.reporter = Some(kind),
            Err(err) => self.rejected.push(err),
        }
    }

    /// Logs every rejected value. Call after [`crate::logging::init`].
    pub fn warn_rejected(&self) {
        for err in &self.rejected {
            tracing::warn!("ignoring reporter choice: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn test_parse_defaults() {
        assert_eq!(RunConfig::parse(Vec::<String>::new()), RunConfig::default());
    }

    #[test]
    fn test_parse_flags_and_filter() {
        let config = RunConfig::parse(["--list", "--ignored", "-v", "calc", "--nocapture"]);
        assert!(config.list);
        assert!(config.include_ignored);
        assert!(config.verbose);
        assert_eq!(config.filter.as_deref(), Some("calc"));
    }

    #[test]
    fn test_parse_reporter() {
        let config = RunConfig::parse(["--reporter=goland"]);
        assert_eq!(config.reporter, Some(ReporterKind::Goland));

        let config = RunConfig::parse(["--reporter", "Console"]);
        assert_eq!(config.reporter, Some(ReporterKind::Console));

        let config = RunConfig::parse(["--reporter=junit"]);
        assert_eq!(config.reporter, None);
        assert_eq!(config.rejected, vec!["unknown reporter `junit`"]);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;
        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_rejected_reporter_is_logged() {
        let mut config = RunConfig::parse(["--reporter=golnd"]);
        config.apply_env(|key| (key == "GOLANDSPEC_REPORTER").then(|| "idee".into()));
        assert_eq!(config.reporter, None);

        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || config.warn_rejected());

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("WARN"));
        assert!(logs.contains("ignoring reporter choice: unknown reporter `golnd`"));
        assert!(logs.contains("unknown reporter `idee`"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RunConfig::default();
        config.apply_env(|key| match key {
            "GOLANDSPEC_VERBOSE" => Some("true".into()),
            "GOLANDSPEC_REPORTER" => Some("goland".into()),
            _ => None,
        });
        assert!(config.verbose);
        assert_eq!(config.reporter, Some(ReporterKind::Goland));
    }

    #[test]
    fn test_flag_beats_env_reporter() {
        let mut config = RunConfig::parse(["--reporter=console"]);
        config.apply_env(|key| (key == "GOLANDSPEC_REPORTER").then(|| "goland".into()));
        assert_eq!(config.reporter, Some(ReporterKind::Console));
    }
}
