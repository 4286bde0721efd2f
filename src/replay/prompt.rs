//! The interactive merge-disambiguation protocol, as pure functions.
//!
//! The prompt loop has one state — awaiting a choice — and each round of
//! input either requests information, decides the replay, aborts, or asks
//! for help. [`parse_action`] and [`advance`] carry the whole decision so
//! the protocol is testable without a terminal; the CLI merely reads lines
//! and renders what [`PromptStep`] asks for.

use crate::replay::plan::ParentSlot;

/// Short input hint shown with the prompt.
pub const HINT: &str = "[1,2,l1,l2,d1,d2,g,?,q]";

/// Help text for the `?` action.
pub const HELP: &str = "\
  1, 2    replay that parent's changes (the other parent becomes mainline)
  l1, l2  show that parent's commits not on the common ancestor
  d1, d2  show that parent's diff against the common ancestor
  g       show the commit graph between the common ancestor and the merge
  ?       show this help
  q       abort without touching the repository";

/// One round of operator input, parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    /// Replay the given parent's changes.
    Choose(ParentSlot),
    /// Show one parent's private commit log.
    ShowLog(ParentSlot),
    /// Show one parent's diff against the common ancestor.
    ShowDiff(ParentSlot),
    /// Show the commit graph up to the merge.
    ShowGraph,
    /// Show the help text.
    Help,
    /// Abort the replay.
    Abort,
}

/// Information the CLI should render before prompting again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoRequest {
    /// The commit graph between the common ancestor and the merge.
    Graph,
    /// One parent's private log.
    Log(ParentSlot),
    /// One parent's diff against the common ancestor.
    Diff(ParentSlot),
}

/// The next step of the loop after one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStep {
    /// Render the requested information, then prompt again.
    Show(InfoRequest),
    /// Terminal: the operator chose a branch side to replay.
    Chosen(ParentSlot),
    /// Terminal: the operator aborted.
    Aborted,
    /// Print the help text, then prompt again.
    ShowHelp,
}

/// Parse one line of operator input. `None` means unrecognized; the caller
/// reprints the hint and asks again.
pub fn parse_action(input: &str) -> Option<PromptAction> {
    match input.trim().to_ascii_lowercase().as_str() {
        "1" => Some(PromptAction::Choose(ParentSlot::First)),
        "2" => Some(PromptAction::Choose(ParentSlot::Second)),
        "l1" => Some(PromptAction::ShowLog(ParentSlot::First)),
        "l2" => Some(PromptAction::ShowLog(ParentSlot::Second)),
        "d1" => Some(PromptAction::ShowDiff(ParentSlot::First)),
        "d2" => Some(PromptAction::ShowDiff(ParentSlot::Second)),
        "g" => Some(PromptAction::ShowGraph),
        "?" | "h" | "help" => Some(PromptAction::Help),
        "q" | "quit" | "abort" => Some(PromptAction::Abort),
        _ => None,
    }
}

/// The pure decision function: one action in, the next step out.
pub const fn advance(action: PromptAction) -> PromptStep {
    match action {
        PromptAction::Choose(slot) => PromptStep::Chosen(slot),
        PromptAction::ShowLog(slot) => PromptStep::Show(InfoRequest::Log(slot)),
        PromptAction::ShowDiff(slot) => PromptStep::Show(InfoRequest::Diff(slot)),
        PromptAction::ShowGraph => PromptStep::Show(InfoRequest::Graph),
        PromptAction::Help => PromptStep::ShowHelp,
        PromptAction::Abort => PromptStep::Aborted,
    }
}
