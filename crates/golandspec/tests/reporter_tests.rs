//! Runner → reporter event contract.

use std::cell::RefCell;
use std::rc::Rc;

use golandspec::runner::{self, Suite, TestNode};
use golandspec::summary::{SetupSummary, SpecState, SpecSummary, SuiteSummary};
use golandspec::{ReportError, Reporter, RunConfig};

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
    completed: Vec<SpecSummary>,
    end: Option<SuiteSummary>,
}

impl Reporter for Recorder {
    fn suite_will_begin(&mut self, summary: &SuiteSummary) -> Result<(), ReportError> {
        self.events.push(format!("begin {}", summary.suite_description));
        Ok(())
    }

    fn before_suite_did_run(&mut self, setup: &SetupSummary) -> Result<(), ReportError> {
        self.events.push(format!("before_suite {:?}", setup.state));
        Ok(())
    }

    fn spec_will_run(&mut self, spec: &SpecSummary) -> Result<(), ReportError> {
        self.events.push(format!("will {}", spec.display_path()));
        Ok(())
    }

    fn spec_did_complete(&mut self, spec: &SpecSummary) -> Result<(), ReportError> {
        self.events.push(format!("did {} {:?}", spec.display_path(), spec.state));
        self.completed.push(spec.clone());
        Ok(())
    }

    fn after_suite_did_run(&mut self, setup: &SetupSummary) -> Result<(), ReportError> {
        self.events.push(format!("after_suite {:?}", setup.state));
        Ok(())
    }

    fn suite_did_end(&mut self, summary: &SuiteSummary) -> Result<(), ReportError> {
        self.events.push("end".to_string());
        self.end = Some(summary.clone());
        Ok(())
    }
}

fn calculator() -> Vec<TestNode> {
    vec![TestNode::describe(
        "Calc",
        vec![
            TestNode::it("adds", || assert_eq!(1 + 1, 2)),
            TestNode::it("breaks", || assert_eq!(1 + 1, 3)),
            TestNode::xit("later", || {}),
        ],
    )]
}

fn run(suite: &Suite, config: &RunConfig) -> Recorder {
    let mut recorder = Recorder::default();
    runner::run_suite(suite, config, &mut recorder).unwrap();
    recorder
}

#[test]
fn events_arrive_in_lifecycle_order() {
    let suite = Suite::new("calc", calculator())
        .before_suite(|| {})
        .after_suite(|| {});
    let recorder = run(&suite, &RunConfig::default());
    assert_eq!(
        recorder.events,
        vec![
            "begin calc",
            "before_suite Passed",
            "will Calc > adds",
            "did Calc > adds Passed",
            "will Calc > breaks",
            "did Calc > breaks Panicked",
            "will Calc > later",
            "did Calc > later Pending",
            "after_suite Passed",
            "end",
        ]
    );
}

#[test]
fn setup_events_only_when_hooks_exist() {
    let recorder = run(&Suite::new("calc", calculator()), &RunConfig::default());
    assert!(!recorder.events.iter().any(|e| e.contains("suite ")));
}

#[test]
fn suite_summary_counts() {
    let recorder = run(&Suite::new("calc", calculator()), &RunConfig::default());
    let end = recorder.end.unwrap();
    assert!(!end.suite_succeeded);
    assert_eq!(end.number_of_total_specs, 3);
    assert_eq!(end.number_of_specs_that_will_be_run, 2);
    assert_eq!(
        (
            end.number_of_passed_specs,
            end.number_of_failed_specs,
            end.number_of_pending_specs,
            end.number_of_skipped_specs
        ),
        (1, 1, 1, 0)
    );
}

#[test]
fn failure_location_points_at_the_spec() {
    let recorder = run(&Suite::new("calc", calculator()), &RunConfig::default());
    let failed = &recorder.completed[1];
    let failure = failed.failure.as_ref().unwrap();
    assert!(failure.message.contains("left == right"));
    assert!(failure.location.file_name.ends_with("reporter_tests.rs"));
    assert!(!failure.location.full_stack_trace.is_empty());
}

#[test]
fn focus_skips_everything_else() {
    let nodes = vec![
        TestNode::describe("A", vec![TestNode::it("a", || {}), TestNode::fit("b", || {})]),
    ];
    let recorder = run(&Suite::new("focus", nodes), &RunConfig::default());
    let states: Vec<_> = recorder.completed.iter().map(|s| s.state).collect();
    assert_eq!(states, vec![SpecState::Skipped, SpecState::Passed]);

    let nodes = vec![
        TestNode::describe("A", vec![TestNode::it("a", || {}), TestNode::fit("b", || {})]),
    ];
    let config = RunConfig {
        include_ignored: true,
        ..Default::default()
    };
    let recorder = run(&Suite::new("focus", nodes), &config);
    assert!(recorder.completed.iter().all(|s| s.passed()));
}

#[test]
fn filter_skips_non_matching() {
    let config = RunConfig {
        filter: Some("adds".into()),
        ..Default::default()
    };
    let recorder = run(&Suite::new("calc", calculator()), &config);
    let states: Vec<_> = recorder.completed.iter().map(|s| s.state).collect();
    assert_eq!(
        states,
        vec![SpecState::Passed, SpecState::Skipped, SpecState::Pending]
    );
}

#[test]
fn before_suite_failure_skips_specs() {
    let ran = Rc::new(RefCell::new(false));
    let flag = ran.clone();
    let nodes = vec![TestNode::it("never", move || *flag.borrow_mut() = true)];
    let suite = Suite::new("broken", nodes).before_suite(|| panic!("no database"));

    let mut recorder = Recorder::default();
    let result = runner::run_suite(&suite, &RunConfig::default(), &mut recorder).unwrap();
    assert!(!*ran.borrow());
    assert_eq!(recorder.events, vec!["begin broken", "before_suite Panicked", "end"]);
    assert_eq!(result.failures, vec!["before_suite: no database"]);
    assert!(!recorder.end.unwrap().suite_succeeded);
}

#[test]
fn after_each_runs_when_spec_fails() {
    let cleaned = Rc::new(RefCell::new(0));
    let counter = cleaned.clone();
    let nodes = vec![TestNode::Describe {
        name: "cleanup".into(),
        focused: false,
        pending: false,
        before_each: Vec::new(),
        after_each: vec![Box::new(move || *counter.borrow_mut() += 1)],
        children: vec![TestNode::it("fails", || golandspec::fail("nope"))],
    }];
    let recorder = run(&Suite::new("cleanup", nodes), &RunConfig::default());
    assert_eq!(*cleaned.borrow(), 1);
    assert_eq!(recorder.completed[0].state, SpecState::Failed);
    assert_eq!(recorder.completed[0].failure.as_ref().unwrap().message, "nope");
}

struct Broken;

impl Reporter for Broken {
    fn suite_will_begin(&mut self, _: &SuiteSummary) -> Result<(), ReportError> {
        Ok(())
    }
    fn before_suite_did_run(&mut self, _: &SetupSummary) -> Result<(), ReportError> {
        Ok(())
    }
    fn spec_will_run(&mut self, _: &SpecSummary) -> Result<(), ReportError> {
        Ok(())
    }
    fn spec_did_complete(&mut self, spec: &SpecSummary) -> Result<(), ReportError> {
        Err(ReportError::UnregisteredPath {
            path: spec.path().join("/"),
        })
    }
    fn after_suite_did_run(&mut self, _: &SetupSummary) -> Result<(), ReportError> {
        Ok(())
    }
    fn suite_did_end(&mut self, _: &SuiteSummary) -> Result<(), ReportError> {
        panic!("run should stop at the first reporter error");
    }
}

#[test]
fn reporter_error_stops_the_run() {
    let err = runner::run_suite(&Suite::new("calc", calculator()), &RunConfig::default(), &mut Broken)
        .unwrap_err();
    assert_eq!(err.to_string(), "no spec registered at `Calc/adds`");
}
