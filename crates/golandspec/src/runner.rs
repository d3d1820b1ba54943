//! BDD runner that executes a test tree and reports each step to a
//! [`Reporter`].
//!
//! Used with `harness = false` test targets. The runner flattens the tree
//! into specs, announces and runs them in order, and hands every outcome to
//! the reporter.

use std::time::{Duration, Instant};

use crate::config::RunConfig;
use crate::error::ReportError;
use crate::panics;
use crate::reporter::Reporter;
use crate::summary::{
    SetupKind, SetupSummary, SpecFailure, SpecState, SpecSummary, SuiteSummary, TOP_LEVEL,
};

pub type TestFn = Box<dyn Fn()>;

// ============================================================================
// Test tree types
// ============================================================================

/// A node in the BDD test tree.
pub enum TestNode {
    /// A describe/context/when container.
    Describe {
        name: String,
        focused: bool,
        pending: bool,
        before_each: Vec<TestFn>,
        after_each: Vec<TestFn>,
        children: Vec<TestNode>,
    },
    /// An individual test case.
    It {
        name: String,
        focused: bool,
        pending: bool,
        test_fn: TestFn,
    },
}

impl TestNode {
    pub fn describe(name: impl Into<String>, children: Vec<TestNode>) -> Self {
        TestNode::Describe {
            name: name.into(),
            focused: false,
            pending: false,
            before_each: Vec::new(),
            after_each: Vec::new(),
            children,
        }
    }

    pub fn it(name: impl Into<String>, f: impl Fn() + 'static) -> Self {
        TestNode::It {
            name: name.into(),
            focused: false,
            pending: false,
            test_fn: Box::new(f),
        }
    }

    pub fn fit(name: impl Into<String>, f: impl Fn() + 'static) -> Self {
        TestNode::It {
            name: name.into(),
            focused: true,
            pending: false,
            test_fn: Box::new(f),
        }
    }

    pub fn xit(name: impl Into<String>, f: impl Fn() + 'static) -> Self {
        TestNode::It {
            name: name.into(),
            focused: false,
            pending: true,
            test_fn: Box::new(f),
        }
    }
}

/// A named suite: the test tree plus suite-level hooks.
pub struct Suite {
    pub description: String,
    pub nodes: Vec<TestNode>,
    pub before_suite: Vec<TestFn>,
    pub after_suite: Vec<TestFn>,
}

impl Suite {
    pub fn new(description: impl Into<String>, nodes: Vec<TestNode>) -> Self {
        Suite {
            description: description.into(),
            nodes,
            before_suite: Vec::new(),
            after_suite: Vec::new(),
        }
    }

    pub fn before_suite(mut self, f: impl Fn() + 'static) -> Self {
        self.before_suite.push(Box::new(f));
        self
    }

    pub fn after_suite(mut self, f: impl Fn() + 'static) -> Self {
        self.after_suite.push(Box::new(f));
        self
    }
}

/// Results from running a suite.
#[derive(Debug, Default)]
pub struct RunResult {
    pub passed: usize,
    pub failed: usize,
    pub pending: usize,
    pub skipped: usize,
    pub failures: Vec<String>,
}

// ============================================================================
// Flattening
// ============================================================================

/// A runnable spec with the hooks of every enclosing describe.
struct FlatSpec<'a> {
    texts: Vec<String>,
    focused: bool,
    pending: bool,
    /// Outermost first.
    before_each: Vec<&'a TestFn>,
    /// Innermost first.
    after_each: Vec<&'a TestFn>,
    test_fn: &'a TestFn,
}

#[derive(Clone, Default)]
struct Scope<'a> {
    texts: Vec<String>,
    focused: bool,
    pending: bool,
    before_each: Vec<&'a TestFn>,
    after_each: Vec<&'a TestFn>,
}

fn flatten<'a>(nodes: &'a [TestNode], scope: &Scope<'a>, out: &mut Vec<FlatSpec<'a>>) {
    for node in nodes {
        match node {
            TestNode::Describe {
                name,
                focused,
                pending,
                before_each,
                after_each,
                children,
            } => {
                let mut inner = scope.clone();
                inner.texts.push(name.clone());
                inner.focused |= *focused;
                inner.pending |= *pending;
                inner.before_each.extend(before_each.iter());
                inner.after_each = after_each
                    .iter()
                    .chain(scope.after_each.iter().copied())
                    .collect();
                flatten(children, &inner, out);
            }
            TestNode::It {
                name,
                focused,
                pending,
                test_fn,
            } => {
                let mut texts = scope.texts.clone();
                texts.push(name.clone());
                out.push(FlatSpec {
                    texts,
                    focused: scope.focused || *focused,
                    pending: scope.pending || *pending,
                    before_each: scope.before_each.clone(),
                    after_each: scope.after_each.clone(),
                    test_fn,
                });
            }
        }
    }
}

fn collect_specs(nodes: &[TestNode]) -> Vec<FlatSpec<'_>> {
    let mut specs = Vec::new();
    let root = Scope {
        texts: vec![TOP_LEVEL.to_string()],
        ..Default::default()
    };
    flatten(nodes, &root, &mut specs);
    specs
}

fn matches_filter(path: &[String], config: &RunConfig) -> bool {
    match &config.filter {
        Some(f) => path[1..]
            .join(" > ")
            .to_lowercase()
            .contains(&f.to_lowercase()),
        None => true,
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Print every spec path instead of running. Honors the name filter.
pub fn list_suite(suite: &Suite, config: &RunConfig) {
    for spec in collect_specs(&suite.nodes) {
        if !matches_filter(&spec.texts, config) {
            continue;
        }
        let full_path = spec.texts[1..].join(" > ");
        if spec.pending {
            println!("{full_path} (pending)");
        } else {
            println!("{full_path}");
        }
    }
}

/// Run a suite, feeding every lifecycle event to `reporter`.
///
/// A reporter error stops the run immediately and is returned as is.
pub fn run_suite(
    suite: &Suite,
    config: &RunConfig,
    reporter: &mut dyn Reporter,
) -> Result<RunResult, ReportError> {
    let specs = collect_specs(&suite.nodes);
    let focus_mode = specs.iter().any(|s| s.focused);
    let will_run = |spec: &FlatSpec<'_>| {
        !spec.pending
            && matches_filter(&spec.texts, config)
            && (!focus_mode || spec.focused || config.include_ignored)
    };

    let mut summary = SuiteSummary {
        suite_description: suite.description.clone(),
        number_of_total_specs: specs.len(),
        number_of_specs_that_will_be_run: specs.iter().filter(|s| will_run(s)).count(),
        ..Default::default()
    };
    let mut result = RunResult::default();
    let start = Instant::now();

    tracing::debug!(suite = %suite.description, specs = specs.len(), focus_mode, "suite will begin");
    reporter.suite_will_begin(&summary)?;

    let mut suite_ok = true;
    if !suite.before_suite.is_empty() {
        let setup = run_setup(SetupKind::BeforeSuite, &suite.before_suite);
        suite_ok = !setup.state.is_failure();
        if let Some(failure) = setup.failure.as_ref().filter(|_| !suite_ok) {
            result.failures.push(format!("before_suite: {}", failure.message));
        }
        reporter.before_suite_did_run(&setup)?;
    }

    if suite_ok {
        for spec in &specs {
            let mut summary = SpecSummary {
                component_texts: spec.texts.clone(),
                ..Default::default()
            };
            tracing::debug!(spec = %summary.display_path(), "spec will run");
            reporter.spec_will_run(&summary)?;

            if spec.pending {
                summary.state = SpecState::Pending;
            } else if !will_run(spec) {
                summary.state = SpecState::Skipped;
            } else {
                let (state, failure, run_time) = run_spec(spec);
                summary.state = state;
                summary.failure = failure;
                summary.run_time = run_time;
            }

            match summary.state {
                SpecState::Passed => result.passed += 1,
                SpecState::Pending => result.pending += 1,
                SpecState::Skipped => result.skipped += 1,
                _ => {
                    result.failed += 1;
                    let msg = summary
                        .failure
                        .as_ref()
                        .map(|f| f.message.as_str())
                        .unwrap_or("unknown failure");
                    result.failures.push(format!("{}: {msg}", summary.display_path()));
                }
            }
            tracing::debug!(spec = %summary.display_path(), state = ?summary.state, "spec did complete");
            reporter.spec_did_complete(&summary)?;
        }
    }

    if !suite.after_suite.is_empty() {
        let setup = run_setup(SetupKind::AfterSuite, &suite.after_suite);
        if let Some(failure) = setup.failure.as_ref().filter(|_| setup.state.is_failure()) {
            result.failures.push(format!("after_suite: {}", failure.message));
        }
        reporter.after_suite_did_run(&setup)?;
    }

    summary.number_of_passed_specs = result.passed;
    summary.number_of_failed_specs = result.failed;
    summary.number_of_pending_specs = result.pending;
    summary.number_of_skipped_specs = result.skipped;
    summary.suite_succeeded = result.failures.is_empty();
    summary.run_time = start.elapsed();
    reporter.suite_did_end(&summary)?;

    Ok(result)
}

fn run_setup(kind: SetupKind, hooks: &[TestFn]) -> SetupSummary {
    let start = Instant::now();
    let failure = hooks.iter().find_map(|hook| panics::run_guarded(hook));
    let (state, failure) = match failure {
        Some((state, failure)) => (state, Some(failure)),
        None => (SpecState::Passed, None),
    };
    SetupSummary {
        component_type: kind,
        state,
        run_time: start.elapsed(),
        failure,
    }
}

/// Runs before hooks, the body and after hooks. The first failure wins and
/// after hooks always run.
fn run_spec(spec: &FlatSpec<'_>) -> (SpecState, Option<SpecFailure>, Duration) {
    let start = Instant::now();
    let mut outcome = None;

    for hook in &spec.before_each {
        outcome = panics::run_guarded(hook);
        if outcome.is_some() {
            break;
        }
    }
    if outcome.is_none() {
        outcome = panics::run_guarded(spec.test_fn);
    }
    for hook in &spec.after_each {
        let after = panics::run_guarded(hook);
        if outcome.is_none() {
            outcome = after;
        }
    }

    let elapsed = start.elapsed();
    match outcome {
        Some((state, failure)) => (state, Some(failure), elapsed),
        None => (SpecState::Passed, None, elapsed),
    }
}
