//! Closure-based BDD API — Context, SuiteBuilder, and `run()`.

use crate::config::RunConfig;
use crate::reporter::new_auto_reporter;
use crate::runner::{self, Suite, TestFn, TestNode};
use std::cell::RefCell;

// ============================================================================
// Thread-local suite builder
// ============================================================================

thread_local! {
    static BUILDER: RefCell<Option<SuiteBuilder>> = const { RefCell::new(None) };
}

struct SuiteBuilder {
    stack: Vec<GroupFrame>,
    before_suite: Vec<TestFn>,
    after_suite: Vec<TestFn>,
}

struct GroupFrame {
    name: String,
    focused: bool,
    pending: bool,
    before_each: Vec<TestFn>,
    after_each: Vec<TestFn>,
    children: Vec<TestNode>,
}

impl GroupFrame {
    fn new(name: String, focused: bool, pending: bool) -> Self {
        GroupFrame {
            name,
            focused,
            pending,
            before_each: Vec::new(),
            after_each: Vec::new(),
            children: Vec::new(),
        }
    }
}

impl SuiteBuilder {
    fn new() -> Self {
        SuiteBuilder {
            stack: vec![GroupFrame::new(String::new(), false, false)],
            before_suite: Vec::new(),
            after_suite: Vec::new(),
        }
    }

    fn push_group(&mut self, name: String, focused: bool, pending: bool) {
        self.stack.push(GroupFrame::new(name, focused, pending));
    }

    fn pop_group(&mut self) {
        assert!(self.stack.len() > 1, "golandspec: unbalanced group push/pop");
        if let Some(frame) = self.stack.pop() {
            let node = TestNode::Describe {
                name: frame.name,
                focused: frame.focused,
                pending: frame.pending,
                before_each: frame.before_each,
                after_each: frame.after_each,
                children: frame.children,
            };
            self.current_frame_mut().children.push(node);
        }
    }

    fn current_frame_mut(&mut self) -> &mut GroupFrame {
        self.stack.last_mut().expect("golandspec: empty builder stack")
    }

    fn into_suite(mut self, description: &str) -> Suite {
        assert_eq!(
            self.stack.len(),
            1,
            "golandspec: unbalanced group push/pop at finalization"
        );
        let root = self.stack.pop().expect("golandspec: empty builder stack");
        let mut suite = Suite::new(description, root.children);
        suite.before_suite = self.before_suite;
        suite.after_suite = self.after_suite;
        suite
    }
}

fn with_builder<R>(f: impl FnOnce(&mut SuiteBuilder) -> R) -> R {
    BUILDER.with(|cell| {
        let mut opt = cell.borrow_mut();
        let builder = opt
            .as_mut()
            .expect("golandspec: Context used outside of golandspec::run()");
        f(builder)
    })
}

// ============================================================================
// Context — the user-facing handle
// ============================================================================

/// A lightweight handle for defining BDD test structure.
///
/// All methods delegate to a thread-local builder. `Context` is `Copy` so it
/// can be passed into nested closures without ceremony.
///
/// # Example
/// ```rust,no_run
/// fn main() {
///     golandspec::run("calculator", |ctx| {
///         ctx.describe("Calculator", |ctx| {
///             ctx.it("adds", || { assert_eq!(2 + 3, 5); });
///         });
///     });
/// }
/// ```
#[derive(Copy, Clone)]
pub struct Context;

impl Context {
    // ---- Describe / Context / When -------------------------------------------

    pub fn describe(&self, name: &str, body: impl FnOnce(Context)) {
        self.describe_impl(name, false, false, body);
    }

    pub fn fdescribe(&self, name: &str, body: impl FnOnce(Context)) {
        self.describe_impl(name, true, false, body);
    }

    pub fn xdescribe(&self, name: &str, body: impl FnOnce(Context)) {
        self.describe_impl(name, false, true, body);
    }

    pub fn context(&self, name: &str, body: impl FnOnce(Context)) {
        self.describe(name, body);
    }

    pub fn fcontext(&self, name: &str, body: impl FnOnce(Context)) {
        self.fdescribe(name, body);
    }

    pub fn xcontext(&self, name: &str, body: impl FnOnce(Context)) {
        self.xdescribe(name, body);
    }

    pub fn when(&self, name: &str, body: impl FnOnce(Context)) {
        self.describe(name, body);
    }

    fn describe_impl(&self, name: &str, focused: bool, pending: bool, body: impl FnOnce(Context)) {
        with_builder(|b| b.push_group(name.to_string(), focused, pending));
        body(Context);
        with_builder(|b| b.pop_group());
    }

    // ---- It / Specify --------------------------------------------------------

    pub fn it(&self, name: &str, body: impl Fn() + 'static) {
        with_builder(|b| b.current_frame_mut().children.push(TestNode::it(name, body)));
    }

    pub fn fit(&self, name: &str, body: impl Fn() + 'static) {
        with_builder(|b| b.current_frame_mut().children.push(TestNode::fit(name, body)));
    }

    pub fn xit(&self, name: &str, body: impl Fn() + 'static) {
        with_builder(|b| b.current_frame_mut().children.push(TestNode::xit(name, body)));
    }

    pub fn specify(&self, name: &str, body: impl Fn() + 'static) {
        self.it(name, body)
    }

    // ---- Hooks ---------------------------------------------------------------

    pub fn before_each(&self, hook: impl Fn() + 'static) {
        with_builder(|b| b.current_frame_mut().before_each.push(Box::new(hook)));
    }

    pub fn after_each(&self, hook: impl Fn() + 'static) {
        with_builder(|b| b.current_frame_mut().after_each.push(Box::new(hook)));
    }

    /// Runs once before any spec. If it fails, no spec runs.
    pub fn before_suite(&self, hook: impl Fn() + 'static) {
        with_builder(|b| b.before_suite.push(Box::new(hook)));
    }

    /// Runs once after every spec, even when specs failed.
    pub fn after_suite(&self, hook: impl Fn() + 'static) {
        with_builder(|b| b.after_suite.push(Box::new(hook)));
    }
}

// ============================================================================
// run() — entry point
// ============================================================================

/// Build the suite defined by `body` without running it.
pub fn build(description: &str, body: impl FnOnce(Context)) -> Suite {
    BUILDER.with(|cell| {
        *cell.borrow_mut() = Some(SuiteBuilder::new());
    });

    body(Context);

    BUILDER.with(|cell| {
        cell.borrow_mut()
            .take()
            .expect("golandspec: builder missing after run")
            .into_suite(description)
    })
}

/// Build and run a BDD test suite.
///
/// Call it from `fn main()` in a test target with `harness = false`. The
/// reporter is picked by [`new_auto_reporter`]; the process exits with
/// status 1 if anything failed.
///
/// # Panics
///
/// If the reporter reports a broken event contract.
pub fn run(description: &str, body: impl FnOnce(Context)) {
    let suite = build(description, body);

    let config = RunConfig::from_args();
    crate::logging::init(config.verbose);
    config.warn_rejected();

    if config.list {
        runner::list_suite(&suite, &config);
        return;
    }

    let mut reporter = new_auto_reporter(&config);
    let result = match runner::run_suite(&suite, &config, reporter.as_mut()) {
        Ok(result) => result,
        Err(err) => {
            tracing::error!(%err, "aborting run");
            panic!("golandspec: {err}");
        }
    };

    if !result.failures.is_empty() {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(nodes: &[TestNode]) -> Vec<&str> {
        nodes
            .iter()
            .map(|n| match n {
                TestNode::Describe { name, .. } | TestNode::It { name, .. } => name.as_str(),
            })
            .collect()
    }

    #[test]
    fn test_build_nests_groups() {
        let suite = build("suite", |ctx| {
            ctx.describe("outer", |ctx| {
                ctx.before_each(|| {});
                ctx.it("a", || {});
                ctx.xcontext("inner", |ctx| {
                    ctx.it("b", || {});
                });
            });
            ctx.fit("top", || {});
            ctx.before_suite(|| {});
        });

        assert_eq!(suite.description, "suite");
        assert_eq!(names(&suite.nodes), vec!["outer", "top"]);
        assert_eq!(suite.before_suite.len(), 1);
        assert!(suite.after_suite.is_empty());

        let TestNode::Describe {
            children,
            before_each,
            ..
        } = &suite.nodes[0]
        else {
            panic!("expected a describe");
        };
        assert_eq!(names(children), vec!["a", "inner"]);
        assert_eq!(before_each.len(), 1);
        assert!(matches!(children[1], TestNode::Describe { pending: true, .. }));
        assert!(matches!(suite.nodes[1], TestNode::It { focused: true, .. }));
    }

    #[test]
    #[should_panic(expected = "outside of golandspec::run()")]
    fn test_context_outside_run_panics() {
        Context.it("orphan", || {});
    }
}
