//! Explicit merge strategy state machine.
//!
//! The best-effort fallback chain is small but load-bearing, so it is
//! modeled as tagged states with pure transition functions instead of
//! nested branching. The chain is:
//!
//! ```text
//! MobileOrigin:  TryDirect --fail--> TryRepair --fail--> Failed
//! DesktopOrigin:             TryRepair --fail--> Failed
//! either:        Try* --success--> Done(strategy)
//! ```
//!
//! Mobile fragments are sometimes consumable without repair, so the
//! cheaper direct merge is tried first; desktop fragments always need
//! header repair, so there is no direct attempt for them.

use crate::models::{LayoutKind, MergeStrategy};

/// State of the merge attempt chain for one folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeState {
    /// Attempt a direct merge of the raw fragments.
    TryDirect,
    /// Attempt repair-then-merge. `is_fallback` records whether a direct
    /// attempt already failed.
    TryRepair { is_fallback: bool },
    /// A merge attempt succeeded with the recorded strategy.
    Done(MergeStrategy),
    /// All applicable strategies failed.
    Failed,
}

impl MergeState {
    /// Initial state for a detected layout; `None` for unknown layouts,
    /// which never reach the merge chain.
    pub fn initial(kind: LayoutKind) -> Option<Self> {
        match kind {
            LayoutKind::MobileOrigin => Some(MergeState::TryDirect),
            LayoutKind::DesktopOrigin => Some(MergeState::TryRepair { is_fallback: false }),
            LayoutKind::Unknown => None,
        }
    }

    /// Strategy to attempt in this state, if it is an attempt state.
    pub fn strategy(&self) -> Option<MergeStrategy> {
        match self {
            MergeState::TryDirect => Some(MergeStrategy::Direct),
            MergeState::TryRepair { .. } => Some(MergeStrategy::RepairFirst),
            MergeState::Done(_) | MergeState::Failed => None,
        }
    }

    /// Transition after a successful attempt.
    pub fn on_success(self) -> Self {
        match self.strategy() {
            Some(strategy) => MergeState::Done(strategy),
            None => self,
        }
    }

    /// Transition after a failed attempt.
    pub fn on_failure(self) -> Self {
        match self {
            MergeState::TryDirect => MergeState::TryRepair { is_fallback: true },
            MergeState::TryRepair { .. } => MergeState::Failed,
            terminal => terminal,
        }
    }

    /// Whether this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MergeState::Done(_) | MergeState::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_tries_direct_then_repair_exactly_once() {
        let state = MergeState::initial(LayoutKind::MobileOrigin).unwrap();
        assert_eq!(state.strategy(), Some(MergeStrategy::Direct));

        let state = state.on_failure();
        assert_eq!(state, MergeState::TryRepair { is_fallback: true });
        assert_eq!(state.strategy(), Some(MergeStrategy::RepairFirst));

        let state = state.on_failure();
        assert_eq!(state, MergeState::Failed);
        assert!(state.is_terminal());
        assert_eq!(state.strategy(), None);
    }

    #[test]
    fn desktop_never_tries_direct() {
        let state = MergeState::initial(LayoutKind::DesktopOrigin).unwrap();
        assert_eq!(state, MergeState::TryRepair { is_fallback: false });
        assert_eq!(state.strategy(), Some(MergeStrategy::RepairFirst));

        assert_eq!(state.on_failure(), MergeState::Failed);
    }

    #[test]
    fn success_records_the_strategy_used() {
        let direct = MergeState::TryDirect.on_success();
        assert_eq!(direct, MergeState::Done(MergeStrategy::Direct));

        let repaired = MergeState::TryRepair { is_fallback: true }.on_success();
        assert_eq!(repaired, MergeState::Done(MergeStrategy::RepairFirst));
    }

    #[test]
    fn unknown_layout_has_no_chain() {
        assert_eq!(MergeState::initial(LayoutKind::Unknown), None);
    }

    #[test]
    fn terminal_states_are_stable() {
        let done = MergeState::Done(MergeStrategy::Direct);
        assert_eq!(done.on_failure(), done);
        assert_eq!(done.on_success(), done);
        assert_eq!(MergeState::Failed.on_failure(), MergeState::Failed);
    }
}
