//! Eligibility analysis: which commits on a source branch have not yet been
//! ported to a target branch.
//!
//! "Ported" means the target's history (back to the merge-base) contains a
//! provenance trailer naming the commit — either git's own
//! `cherry picked from commit` marker or the resolver's `with child` marker.
//! The analysis itself never mutates the repository.

use crate::backend::{Backend, CommitWalk};
use crate::error::{Error, Result};
use crate::trailer;
use crate::types::{Commit, Identity};
use std::collections::HashSet;
use tracing::debug;

/// Options for [`find_unpicked`].
#[derive(Debug, Clone, Default)]
pub struct EligibilityOptions {
    /// Inclusive lower bound: stop the source walk after this commit.
    pub since: Option<String>,
    /// Yield commits from every author instead of only the configured
    /// identity's.
    pub all_authors: bool,
}

/// Authorship filter applied to the source walk.
#[derive(Debug, Clone)]
enum AuthorFilter {
    /// `--all`: no filtering.
    Everyone,
    /// Only commits written by the configured identity.
    Only(Identity),
}

impl AuthorFilter {
    fn accepts(&self, commit: &Commit) -> bool {
        match self {
            Self::Everyone => true,
            Self::Only(identity) => identity.wrote(commit),
        }
    }
}

/// Lazy sequence of eligible commits, newest-first.
///
/// Produced by [`find_unpicked`]. Consuming it drives the underlying source
/// walk on demand; dropping it early abandons the walk. Not restartable —
/// each analysis performs a fresh walk.
pub struct EligibleCommits<'a> {
    walk: CommitWalk<'a>,
    ported: HashSet<String>,
    filter: AuthorFilter,
    since: Option<String>,
    exhausted: bool,
    skipped_as_ported: usize,
}

impl std::fmt::Debug for EligibleCommits<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EligibleCommits")
            .field("walk", &"<commit walk>")
            .field("ported", &self.ported)
            .field("filter", &self.filter)
            .field("since", &self.since)
            .field("exhausted", &self.exhausted)
            .field("skipped_as_ported", &self.skipped_as_ported)
            .finish()
    }
}

impl EligibleCommits<'_> {
    /// How many commits were skipped because the target already carries
    /// their provenance. Meaningful once iteration has finished (or
    /// stopped).
    pub const fn skipped_as_ported(&self) -> usize {
        self.skipped_as_ported
    }
}

impl Iterator for EligibleCommits<'_> {
    type Item = Result<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.exhausted {
            let commit = match self.walk.next() {
                Some(Ok(commit)) => commit,
                Some(Err(e)) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
                None => {
                    self.exhausted = true;
                    return None;
                }
            };

            // The `since` bound is inclusive: this commit is still
            // considered, but the walk ends with it.
            if self.since.as_deref() == Some(commit.id.as_str()) {
                self.exhausted = true;
            }

            if self.ported.contains(&commit.id) {
                self.skipped_as_ported += 1;
                continue;
            }

            if self.filter.accepts(&commit) {
                return Some(Ok(commit));
            }
        }
        None
    }
}

/// Find commits present on `source` but absent (by provenance) from
/// `target`, filtered by authorship and ordered newest-first.
///
/// Fatal conditions are checked up front, in a fixed order: ref resolution
/// (`InvalidRef`), common ancestry (`NoCommonAncestor`), then identity
/// configuration (`NoIdentityConfigured`, unless `all_authors`). Only after
/// all of them pass is any history walked.
pub fn find_unpicked<'a>(
    backend: &'a dyn Backend,
    source: &str,
    target: &str,
    options: &EligibilityOptions,
) -> Result<EligibleCommits<'a>> {
    let source_commit = backend.resolve_ref(source)?;
    let target_commit = backend.resolve_ref(target)?;

    let base = backend
        .merge_base(&source_commit.id, &target_commit.id)?
        .ok_or_else(|| Error::NoCommonAncestor {
            source_ref: source.to_string(),
            target_ref: target.to_string(),
        })?;

    let filter = if options.all_authors {
        AuthorFilter::Everyone
    } else {
        let identity = backend.identity()?;
        if identity.is_empty() {
            return Err(Error::NoIdentityConfigured);
        }
        AuthorFilter::Only(identity)
    };

    // Resolve the bound up front so the inclusive-stop comparison is always
    // full id against full id, whatever abbreviation the caller typed.
    let since = options
        .since
        .as_deref()
        .map(|bound| backend.resolve_ref(bound).map(|c| c.id))
        .transpose()?;

    let ported = collect_ported_ids(backend, &target_commit.id, &base)?;
    debug!(
        base = %base,
        ported = ported.len(),
        "cherrypicked set built from target history"
    );

    let walk = backend.walk_ancestors(&source_commit.id, Some(&base))?;

    Ok(EligibleCommits {
        walk,
        ported,
        filter,
        since,
        exhausted: false,
        skipped_as_ported: 0,
    })
}

/// Union of every provenance-marker target in `base..target`.
///
/// Built eagerly, once per analysis, before the source walk starts.
fn collect_ported_ids(
    backend: &dyn Backend,
    target_id: &str,
    base: &str,
) -> Result<HashSet<String>> {
    let mut ported = HashSet::new();
    for commit in backend.walk_ancestors(target_id, Some(base))? {
        let commit = commit?;
        ported.extend(trailer::referenced_ids(&commit.message));
    }
    Ok(ported)
}
