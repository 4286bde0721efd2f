//! Parent classification — pure functions deciding how a commit replays.
//!
//! No I/O happens here: the caller resolves the commit and the merge-base of
//! its parent pair beforehand, making every branch of the classification
//! unit-testable.

use crate::error::{Error, Result};
use crate::types::Commit;

/// One of the two parents of a merge commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentSlot {
    /// The first parent (index 1 in backend terms).
    First,
    /// The second parent (index 2 in backend terms).
    Second,
}

impl ParentSlot {
    /// 1-based parent index, as the backend's mainline option expects it.
    pub const fn index(self) -> usize {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }

    /// The opposite slot.
    pub const fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

impl std::fmt::Display for ParentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// The two parents of a merge commit, plus their pairwise merge-base.
///
/// `common` is the merge-base of the parent *pair* — deliberately narrower
/// than the merge-base of any larger range, because equality against it is
/// what detects "this merge fast-forwarded one side".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeParents {
    /// First parent id.
    pub first: String,
    /// Second parent id.
    pub second: String,
    /// Merge-base of the pair, when one exists.
    pub common: Option<String>,
}

impl MergeParents {
    /// Id of the parent in the given slot.
    pub fn id(&self, slot: ParentSlot) -> &str {
        match slot {
            ParentSlot::First => &self.first,
            ParentSlot::Second => &self.second,
        }
    }
}

/// A fully decided merge replay: which parent is trunk, which side is
/// replayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResolution {
    /// The mainline (trunk) parent's slot; its index goes to the backend.
    pub mainline: ParentSlot,
    /// The mainline parent's id.
    pub mainline_id: String,
    /// The replayed (branch) parent's id: its diff is what gets applied.
    pub branch_id: String,
    /// Exclusive lower bound of the branch side's private segment. The pair
    /// merge-base when one exists, otherwise the mainline parent (the same
    /// commit set either way).
    pub segment_base: String,
}

/// Outcome of classifying a commit's parents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// One parent: an ordinary single-parent replay.
    Linear {
        /// An explicit parent selection was supplied but has no meaning
        /// here; the caller should surface a warning.
        selection_ignored: bool,
    },
    /// Two parents, mainline decided (automatically or by selection).
    Merge(MergeResolution),
    /// Two parents, neither detectable as mainline and no selection given:
    /// the operator must choose.
    NeedsChoice(MergeParents),
}

/// A resolution with the ambiguity removed — ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Single-parent replay.
    Linear,
    /// Merge replay with a decided mainline.
    Merge(MergeResolution),
}

/// Classify a commit's parents and, for merges, decide the mainline.
///
/// `common_of_pair` is `merge_base(parent1, parent2)` and is only consulted
/// for two-parent commits. Decision order follows the replay state machine:
/// automatic detection (a parent equal to the pair merge-base is the unique
/// mainline), then the explicit selection, then the interactive fallback.
pub fn resolve_parents(
    commit: &Commit,
    common_of_pair: Option<&str>,
    selection: Option<&str>,
) -> Result<Resolution> {
    match commit.parents.as_slice() {
        [_] => Ok(Resolution::Linear {
            selection_ignored: selection.is_some(),
        }),
        [first, second] => {
            let parents = MergeParents {
                first: first.clone(),
                second: second.clone(),
                common: common_of_pair.map(String::from),
            };

            if let Some(common) = common_of_pair {
                // At most one parent can equal the merge-base of the pair;
                // when one does, the merge fast-forwarded that side and the
                // mainline is unambiguous.
                if first == common {
                    return Ok(Resolution::Merge(choose(&parents, ParentSlot::Second)));
                }
                if second == common {
                    return Ok(Resolution::Merge(choose(&parents, ParentSlot::First)));
                }
            }

            if let Some(selection) = selection {
                let slot = match_selection(&parents, selection).ok_or_else(|| {
                    Error::SelectionNotAParent {
                        selection: selection.to_string(),
                        id: commit.short_id().to_string(),
                    }
                })?;
                return Ok(Resolution::Merge(choose(&parents, slot)));
            }

            Ok(Resolution::NeedsChoice(parents))
        }
        other => Err(Error::UnsupportedParentCount {
            id: commit.short_id().to_string(),
            count: other.len(),
        }),
    }
}

/// Build the resolution for replaying the chosen parent's changes.
///
/// The chosen slot is the *branch* side (the diff that gets applied); the
/// other parent becomes the mainline.
pub fn choose(parents: &MergeParents, branch: ParentSlot) -> MergeResolution {
    let mainline = branch.other();
    let mainline_id = parents.id(mainline).to_string();
    let segment_base = parents
        .common
        .clone()
        .unwrap_or_else(|| mainline_id.clone());
    MergeResolution {
        mainline,
        mainline_id,
        branch_id: parents.id(branch).to_string(),
        segment_base,
    }
}

/// Match an explicit selection against the parent pair, full id or prefix.
/// Parent order breaks the (practically impossible) tie of a prefix
/// matching both.
fn match_selection(parents: &MergeParents, selection: &str) -> Option<ParentSlot> {
    if selection.is_empty() {
        return None;
    }
    if parents.first.starts_with(selection) {
        Some(ParentSlot::First)
    } else if parents.second.starts_with(selection) {
        Some(ParentSlot::Second)
    } else {
        None
    }
}
