//! Mock backend for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use git_replant::backend::{Backend, CommitWalk};
use git_replant::error::{Error, Result};
use git_replant::types::{Commit, Identity, LogLine, ReplayStatus};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

/// One recorded mutating call, for "performs no mutation" assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// `apply_single_parent` was called.
    ApplySingle {
        commit_id: String,
        commit_directly: bool,
    },
    /// `apply_with_mainline` was called.
    ApplyMainline {
        commit_id: String,
        mainline: usize,
        commit_directly: bool,
    },
    /// `amend_head_message` was called with this full message.
    AmendHeadMessage(String),
    /// `append_pending_merge_message` was called with this text.
    AppendPendingMergeMessage(String),
}

/// In-memory [`Backend`] over a hand-built commit DAG.
///
/// Implemented manually rather than with a mocking crate so walks can do
/// real reachability and merge-base computation over the test graph.
///
/// Features:
/// - insertion-order topological walks (newest-first)
/// - real merge-base over the DAG
/// - configurable identity and replay results
/// - call tracking and a mutation log
pub struct MockBackend {
    commits: HashMap<String, Commit>,
    order: HashMap<String, usize>,
    refs: HashMap<String, String>,
    identity: Identity,
    apply_status: ReplayStatus,
    head_message: Mutex<String>,
    // Call tracking
    identity_calls: Mutex<usize>,
    walk_calls: Mutex<Vec<(String, Option<String>)>>,
    mutations: Mutex<Vec<Mutation>>,
}

impl MockBackend {
    /// Create an empty mock repository.
    pub fn new() -> Self {
        Self {
            commits: HashMap::new(),
            order: HashMap::new(),
            refs: HashMap::new(),
            identity: Identity::default(),
            apply_status: ReplayStatus::Applied,
            head_message: Mutex::new(String::new()),
            identity_calls: Mutex::new(0),
            walk_calls: Mutex::new(Vec::new()),
            mutations: Mutex::new(Vec::new()),
        }
    }

    // === Graph building ===

    /// Add a commit. Parents must already exist; insertion order doubles as
    /// topological order (children after parents).
    pub fn commit(
        mut self,
        id: &str,
        parents: &[&str],
        author: (&str, &str),
        message: &str,
    ) -> Self {
        for parent in parents {
            assert!(
                self.commits.contains_key(*parent),
                "parent {parent} must be added before {id}"
            );
        }
        let seq = self.order.len();
        let commit = Commit {
            id: id.to_string(),
            author_name: author.0.to_string(),
            author_email: author.1.to_string(),
            authored_at: DateTime::<Utc>::from_timestamp(1_700_000_000 + seq as i64, 0)
                .expect("valid timestamp"),
            parents: parents.iter().map(ToString::to_string).collect(),
            summary: message.lines().next().unwrap_or_default().to_string(),
            message: message.to_string(),
        };
        self.order.insert(id.to_string(), seq);
        self.commits.insert(id.to_string(), commit);
        self
    }

    /// Register a ref name pointing at a commit.
    pub fn reference(mut self, name: &str, id: &str) -> Self {
        assert!(self.commits.contains_key(id), "unknown commit {id}");
        self.refs.insert(name.to_string(), id.to_string());
        self
    }

    /// Configure the committer identity.
    pub fn identity_config(mut self, names: &[&str], emails: &[&str]) -> Self {
        self.identity = Identity {
            names: names.iter().map(ToString::to_string).collect::<BTreeSet<_>>(),
            emails: emails.iter().map(ToString::to_string).collect::<BTreeSet<_>>(),
        };
        self
    }

    /// Configure the status every replay application returns.
    pub fn apply_result(mut self, status: ReplayStatus) -> Self {
        self.apply_status = status;
        self
    }

    /// Configure the message `read_head_message` returns (what git left on
    /// the freshly created commit).
    pub fn head_message(self, message: &str) -> Self {
        *self.head_message.lock().unwrap() = message.to_string();
        self
    }

    // === Call verification ===

    /// All recorded mutations, in order.
    pub fn mutations(&self) -> Vec<Mutation> {
        self.mutations.lock().unwrap().clone()
    }

    /// Assert no mutating backend call happened.
    pub fn assert_no_mutations(&self) {
        let mutations = self.mutations();
        assert!(
            mutations.is_empty(),
            "expected no mutations but got: {mutations:?}"
        );
    }

    /// How many times `identity()` was consulted.
    pub fn identity_call_count(&self) -> usize {
        *self.identity_calls.lock().unwrap()
    }

    /// How many ancestry walks were started.
    pub fn walk_call_count(&self) -> usize {
        self.walk_calls.lock().unwrap().len()
    }

    /// The message of the last `amend_head_message` call, if any.
    pub fn amended_message(&self) -> Option<String> {
        self.mutations().into_iter().rev().find_map(|m| match m {
            Mutation::AmendHeadMessage(msg) => Some(msg),
            _ => None,
        })
    }

    /// Every `append_pending_merge_message` payload, in order.
    pub fn pending_appends(&self) -> Vec<String> {
        self.mutations()
            .into_iter()
            .filter_map(|m| match m {
                Mutation::AppendPendingMergeMessage(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    // === Graph queries ===

    fn lookup(&self, name: &str) -> Option<&Commit> {
        if let Some(id) = self.refs.get(name) {
            return self.commits.get(id);
        }
        if let Some(commit) = self.commits.get(name) {
            return Some(commit);
        }
        // Abbreviated id: unique prefix match.
        let mut matches = self
            .commits
            .values()
            .filter(|commit| commit.id.starts_with(name));
        match (matches.next(), matches.next()) {
            (Some(commit), None) => Some(commit),
            _ => None,
        }
    }

    /// Every commit reachable from `id`, inclusive.
    fn reachable(&self, id: &str) -> HashSet<String> {
        let mut seen = HashSet::new();
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(commit) = self.commits.get(&current) {
                stack.extend(commit.parents.iter().cloned());
            }
        }
        seen
    }

    /// Newest-first topological order over a reachable set.
    fn topo_newest_first(&self, set: &HashSet<String>) -> Vec<String> {
        let mut ids: Vec<String> = set.iter().cloned().collect();
        ids.sort_by_key(|id| std::cmp::Reverse(self.order[id]));
        ids
    }

    fn range(&self, from_exclusive: Option<&str>, to_inclusive: &str) -> Vec<String> {
        let mut included = self.reachable(to_inclusive);
        if let Some(base) = from_exclusive {
            for excluded in self.reachable(base) {
                included.remove(&excluded);
            }
        }
        self.topo_newest_first(&included)
    }
}

impl Backend for MockBackend {
    fn resolve_ref(&self, name: &str) -> Result<Commit> {
        self.lookup(name)
            .cloned()
            .ok_or_else(|| Error::InvalidRef(name.to_string()))
    }

    fn merge_base(&self, a: &str, b: &str) -> Result<Option<String>> {
        let reachable_a = self.reachable(a);
        let reachable_b = self.reachable(b);
        Ok(reachable_a
            .intersection(&reachable_b)
            .max_by_key(|id| self.order[*id])
            .cloned())
    }

    fn walk_ancestors(&self, start: &str, stop_before: Option<&str>) -> Result<CommitWalk<'_>> {
        self.walk_calls
            .lock()
            .unwrap()
            .push((start.to_string(), stop_before.map(String::from)));

        let commits: Vec<Result<Commit>> = self
            .range(stop_before, start)
            .into_iter()
            .map(|id| Ok(self.commits[&id].clone()))
            .collect();
        Ok(Box::new(commits.into_iter()))
    }

    fn identity(&self) -> Result<Identity> {
        *self.identity_calls.lock().unwrap() += 1;
        Ok(self.identity.clone())
    }

    fn log_range(&self, from_exclusive: &str, to_inclusive: &str) -> Result<Vec<LogLine>> {
        Ok(self
            .range(Some(from_exclusive), to_inclusive)
            .into_iter()
            .map(|id| LogLine {
                subject: self.commits[&id].summary.clone(),
                id,
            })
            .collect())
    }

    fn diff_range(&self, from_exclusive: &str, to_inclusive: &str) -> Result<String> {
        Ok(format!("diff {from_exclusive}..{to_inclusive}"))
    }

    fn graph_range(&self, from_exclusive: &str, to_inclusive: &str) -> Result<String> {
        Ok(format!("graph {from_exclusive}..{to_inclusive}"))
    }

    fn apply_single_parent(&self, commit_id: &str, commit_directly: bool) -> Result<ReplayStatus> {
        self.mutations.lock().unwrap().push(Mutation::ApplySingle {
            commit_id: commit_id.to_string(),
            commit_directly,
        });
        Ok(self.apply_status)
    }

    fn apply_with_mainline(
        &self,
        commit_id: &str,
        mainline: usize,
        commit_directly: bool,
    ) -> Result<ReplayStatus> {
        self.mutations.lock().unwrap().push(Mutation::ApplyMainline {
            commit_id: commit_id.to_string(),
            mainline,
            commit_directly,
        });
        Ok(self.apply_status)
    }

    fn read_head_message(&self) -> Result<String> {
        Ok(self.head_message.lock().unwrap().clone())
    }

    fn amend_head_message(&self, message: &str) -> Result<()> {
        self.mutations
            .lock()
            .unwrap()
            .push(Mutation::AmendHeadMessage(message.to_string()));
        Ok(())
    }

    fn append_pending_merge_message(&self, text: &str) -> Result<()> {
        self.mutations
            .lock()
            .unwrap()
            .push(Mutation::AppendPendingMergeMessage(text.to_string()));
        Ok(())
    }
}
