//! Result tree behind the GoLand reporter.
//!
//! Specs arrive as flat lists of group names. The tree folds them into one
//! node per distinct path prefix so status and time can be aggregated per
//! group and printed in `go test -v` form:
//!
//! ```text
//! === RUN   Calculator
//! === RUN   Calculator/adds
//! --- PASS: Calculator/adds (0.001s)
//! --- PASS: Calculator (0.001s)
//! ```

use std::fmt;
use std::time::Duration;

use crate::error::ReportError;
use crate::summary::{SpecFailure, TOP_LEVEL};

/// Aggregated outcome of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Unset,
    Pass,
    Fail,
    Skip,
}

impl Status {
    /// Token printed after `--- `. Unset nodes print an empty token.
    pub fn token(self) -> &'static str {
        match self {
            Status::Unset => "",
            Status::Pass => "PASS",
            Status::Fail => "FAIL",
            Status::Skip => "SKIP",
        }
    }
}

/// Index of a node inside its [`ResultTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
pub struct Node {
    parent: Option<NodeId>,
    name: String,
    children: Vec<NodeId>,
    status: Status,
    elapsed: Duration,
    failure: Option<SpecFailure>,
}

impl Node {
    fn new(parent: Option<NodeId>, name: String) -> Self {
        Node {
            parent,
            name,
            children: Vec::new(),
            status: Status::Unset,
            elapsed: Duration::ZERO,
            failure: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in the order they were first inserted.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn failure(&self) -> Option<&SpecFailure> {
        self.failure.as_ref()
    }
}

/// Replaces spaces so a group name is a single path segment.
pub fn sanitize(segment: &str) -> String {
    segment.replace(' ', "_")
}

/// Tree of spec groups for a single suite run.
///
/// Nodes live in an arena owned by the tree; `parent` is a plain index and
/// only used to rebuild display paths.
#[derive(Debug)]
pub struct ResultTree {
    suite: String,
    nodes: Vec<Node>,
}

impl Default for ResultTree {
    fn default() -> Self {
        ResultTree::new("")
    }
}

impl ResultTree {
    pub fn new(suite: impl Into<String>) -> Self {
        ResultTree {
            suite: suite.into(),
            nodes: vec![Node::new(None, TOP_LEVEL.to_string())],
        }
    }

    /// Drops every node and starts over with a fresh root.
    pub fn reset(&mut self, suite: impl Into<String>) {
        *self = ResultTree::new(suite);
    }

    pub fn suite(&self) -> &str {
        &self.suite
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether anything was inserted below the root.
    pub fn has_specs(&self) -> bool {
        self.nodes.len() > 1
    }

    /// Adds every missing node along `path`. Re-inserting a path is a no-op.
    pub fn insert<S: AsRef<str>>(&mut self, path: &[S]) -> NodeId {
        let mut current = self.root();
        for segment in path {
            let name = sanitize(segment.as_ref());
            current = match self.child(current, &name) {
                Some(child) => child,
                None => {
                    let child = NodeId(self.nodes.len());
                    tracing::debug!(parent = %self.full_name(current), %name, "adding node");
                    self.nodes.push(Node::new(Some(current), name));
                    self.nodes[current.0].children.push(child);
                    child
                }
            };
        }
        current
    }

    /// Resolves `path` from the root. The empty path is the root itself.
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
        path.iter().try_fold(self.root(), |current, segment| {
            self.child(current, &sanitize(segment.as_ref()))
        })
    }

    fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|id| self.nodes[id.0].name == name)
    }

    /// Credits `runtime` and `outcome` to every node from the first segment
    /// of `path` down to its leaf.
    ///
    /// A node that already failed keeps `Fail`. Nothing is touched when any
    /// prefix of `path` is missing.
    pub fn record_outcome<S: AsRef<str>>(
        &mut self,
        path: &[S],
        runtime: Duration,
        outcome: Status,
    ) -> Result<(), ReportError> {
        let mut chain = Vec::with_capacity(path.len());
        let mut current = self.root();
        for segment in path {
            current = self
                .child(current, &sanitize(segment.as_ref()))
                .ok_or_else(|| ReportError::UnregisteredPath {
                    path: join_path(path),
                })?;
            chain.push(current);
        }

        for id in chain {
            let node = &mut self.nodes[id.0];
            node.elapsed += runtime;
            if node.status != Status::Fail {
                node.status = outcome;
            }
        }
        Ok(())
    }

    /// Attaches `failure` to the leaf at `path`. Returns `false` if there is
    /// no such node.
    pub fn attach_failure<S: AsRef<str>>(&mut self, path: &[S], failure: SpecFailure) -> bool {
        match self.find(path) {
            Some(id) => {
                self.nodes[id.0].failure = Some(failure);
                true
            }
            None => {
                tracing::warn!(path = %join_path(path), "cannot attach failure to unknown spec");
                false
            }
        }
    }

    /// `/`-joined names from the first real segment down to `id`.
    pub fn full_name(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(id) = current {
            let node = &self.nodes[id.0];
            if node.parent.is_some() {
                names.push(node.name.as_str());
            }
            current = node.parent;
        }
        names.reverse();
        names.join("/")
    }

    /// Renders the whole tree. Stack traces are only included when `verbose`.
    pub fn render(&self, verbose: bool) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.render_node(&mut out, self.root(), verbose);
        out
    }

    fn render_node(&self, out: &mut impl fmt::Write, id: NodeId, verbose: bool) -> fmt::Result {
        let node = &self.nodes[id.0];
        let name = self.full_name(id);

        writeln!(out, "=== RUN   {name}")?;
        for &child in &node.children {
            self.render_node(out, child, verbose)?;
        }
        if let Some(failure) = &node.failure {
            writeln!(out, "{}", failure.location)?;
            writeln!(out, "{}\n", failure.message)?;
            if verbose {
                writeln!(out, "{}\n", failure.location.full_stack_trace)?;
            }
        }
        writeln!(
            out,
            "--- {}: {} ({:.3}s)",
            node.status.token(),
            name,
            node.elapsed.as_secs_f64()
        )
    }
}

fn join_path<S: AsRef<str>>(path: &[S]) -> String {
    path.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("/")
}
