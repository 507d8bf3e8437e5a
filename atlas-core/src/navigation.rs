//! Drill-down state machine
//!
//! Three stages, no terminal state:
//!
//! ```text
//!   Coarse --SelectCoarse(c)--> Fine --SelectFine(f)--> Results
//!     ^                          |  ^                      |
//!     +---------- Back ----------+  +-------- Back --------+
//!     ^                                                    |
//!     +----------------------- Reset ----------------------+
//! ```
//!
//! `Results` is only entered through `SelectFine`, which always writes the
//! fine selection, so a stale fine value left behind by `Back` can never be
//! displayed.

use serde::{Deserialize, Serialize};

use crate::aggregate::rows_in_coarse;
use crate::data::Dataset;

/// Navigation stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Pick a coarse cluster (top level)
    #[default]
    Coarse,

    /// Pick a fine cluster inside the selected coarse cluster
    Fine,

    /// Rows matching the selected (coarse, fine) pair
    Results,
}

impl Stage {
    pub fn is_top_level(self) -> bool {
        matches!(self, Stage::Coarse)
    }

    pub fn description(self) -> &'static str {
        match self {
            Stage::Coarse => "Coarse Clusters",
            Stage::Fine => "Fine Clusters",
            Stage::Results => "Results",
        }
    }
}

/// User actions that drive the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    SelectCoarse(String),
    SelectFine(String),
    Back,
    Reset,
}

/// What a transition did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Stage (and possibly selections) changed.
    Moved { from: Stage, to: Stage },
    /// A fine selection was attempted but the coarse cluster has no rows.
    /// The machine stays in `Fine`.
    NoFineClusters,
    /// The action does not apply to the current stage.
    Ignored,
}

/// Current stage plus the selected coarse and fine values.
///
/// `selected_coarse` is meaningful in `Fine` and `Results`; `selected_fine`
/// only in `Results`. Use [`NavigationState::active_coarse`] and
/// [`NavigationState::active_fine`] to read them with that rule applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    stage: Stage,
    selected_coarse: Option<String>,
    selected_fine: Option<String>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Stored coarse selection, regardless of stage.
    pub fn selected_coarse(&self) -> Option<&str> {
        self.selected_coarse.as_deref()
    }

    /// Stored fine selection, regardless of stage. May be stale outside `Results`.
    pub fn selected_fine(&self) -> Option<&str> {
        self.selected_fine.as_deref()
    }

    /// Coarse selection if the current stage uses it.
    pub fn active_coarse(&self) -> Option<&str> {
        match self.stage {
            Stage::Coarse => None,
            Stage::Fine | Stage::Results => self.selected_coarse(),
        }
    }

    /// Fine selection if the current stage uses it.
    pub fn active_fine(&self) -> Option<&str> {
        match self.stage {
            Stage::Results => self.selected_fine(),
            Stage::Coarse | Stage::Fine => None,
        }
    }

    /// Whether the stored selections satisfy the stage invariants.
    pub fn is_consistent(&self) -> bool {
        match self.stage {
            Stage::Coarse => true,
            Stage::Fine => self.selected_coarse.is_some(),
            Stage::Results => self.selected_coarse.is_some() && self.selected_fine.is_some(),
        }
    }

    /// Reset to the initial state if the invariants do not hold (e.g. after
    /// deserializing a hand-edited file).
    pub fn normalized(self) -> Self {
        if self.is_consistent() {
            self
        } else {
            Self::default()
        }
    }

    /// Apply a user action.
    pub fn apply(&mut self, action: NavAction, dataset: &Dataset) -> TransitionOutcome {
        let from = self.stage;
        let outcome = match action {
            NavAction::SelectCoarse(coarse) => self.select_coarse(coarse),
            NavAction::SelectFine(fine) => self.select_fine(fine, dataset),
            NavAction::Back => self.back(),
            NavAction::Reset => self.reset(),
        };
        match outcome {
            TransitionOutcome::Moved { to, .. } => {
                tracing::debug!(?from, ?to, "navigation transition");
            }
            TransitionOutcome::NoFineClusters => {
                tracing::debug!(coarse = ?self.selected_coarse, "no fine clusters under coarse");
            }
            TransitionOutcome::Ignored => {}
        }
        outcome
    }

    /// `Coarse → Fine`, recording the coarse value.
    pub fn select_coarse(&mut self, coarse: String) -> TransitionOutcome {
        if self.stage != Stage::Coarse {
            return TransitionOutcome::Ignored;
        }
        self.selected_coarse = Some(coarse);
        self.move_to(Stage::Fine)
    }

    /// `Fine → Results`, recording the fine value.
    ///
    /// Stays in `Fine` when the selected coarse cluster has no rows. A fine
    /// value with zero matching rows still moves to `Results`.
    pub fn select_fine(&mut self, fine: String, dataset: &Dataset) -> TransitionOutcome {
        if self.stage != Stage::Fine {
            return TransitionOutcome::Ignored;
        }
        let Some(coarse) = self.selected_coarse.as_deref() else {
            return TransitionOutcome::Ignored;
        };
        if rows_in_coarse(dataset, coarse) == 0 {
            return TransitionOutcome::NoFineClusters;
        }
        self.selected_fine = Some(fine);
        self.move_to(Stage::Results)
    }

    /// `Fine → Coarse` or `Results → Fine`. Selections are left in place.
    pub fn back(&mut self) -> TransitionOutcome {
        match self.stage {
            Stage::Coarse => TransitionOutcome::Ignored,
            Stage::Fine => self.move_to(Stage::Coarse),
            Stage::Results => self.move_to(Stage::Fine),
        }
    }

    /// Back to `Coarse` with both selections cleared.
    pub fn reset(&mut self) -> TransitionOutcome {
        let from = self.stage;
        self.selected_coarse = None;
        self.selected_fine = None;
        self.stage = Stage::Coarse;
        TransitionOutcome::Moved {
            from,
            to: Stage::Coarse,
        }
    }

    fn move_to(&mut self, to: Stage) -> TransitionOutcome {
        let from = self.stage;
        self.stage = to;
        TransitionOutcome::Moved { from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    fn dataset() -> Dataset {
        Dataset::new(
            vec!["coarse_label".into(), "fine_label".into(), "name".into()],
            vec![
                Record::from_iter(["Tech", "AI", "A"]),
                Record::from_iter(["Tech", "AI", "B"]),
                Record::from_iter(["Tech", "Cloud", "C"]),
                Record::from_iter(["Health", "General", "D"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_initial_state() {
        let state = NavigationState::new();
        assert_eq!(state.stage(), Stage::Coarse);
        assert_eq!(state.selected_coarse(), None);
        assert_eq!(state.selected_fine(), None);
        assert!(state.stage().is_top_level());
    }

    #[test]
    fn test_full_drill_down() {
        let ds = dataset();
        let mut state = NavigationState::new();

        let out = state.apply(NavAction::SelectCoarse("Tech".into()), &ds);
        assert_eq!(
            out,
            TransitionOutcome::Moved {
                from: Stage::Coarse,
                to: Stage::Fine
            }
        );
        assert_eq!(state.active_coarse(), Some("Tech"));
        assert_eq!(state.active_fine(), None);

        state.apply(NavAction::SelectFine("AI".into()), &ds);
        assert_eq!(state.stage(), Stage::Results);
        assert_eq!(state.active_fine(), Some("AI"));
    }

    #[test]
    fn test_fine_back_keeps_coarse() {
        let ds = dataset();
        let mut state = NavigationState::new();
        state.apply(NavAction::SelectCoarse("Tech".into()), &ds);
        state.apply(NavAction::Back, &ds);

        assert_eq!(state.stage(), Stage::Coarse);
        assert_eq!(state.selected_coarse(), Some("Tech"));
        assert_eq!(state.active_coarse(), None);
    }

    #[test]
    fn test_results_back_leaves_fine_stale() {
        let ds = dataset();
        let mut state = NavigationState::new();
        state.apply(NavAction::SelectCoarse("Tech".into()), &ds);
        state.apply(NavAction::SelectFine("AI".into()), &ds);
        state.apply(NavAction::Back, &ds);

        assert_eq!(state.stage(), Stage::Fine);
        assert_eq!(state.selected_fine(), Some("AI"));
        assert_eq!(state.active_fine(), None);
    }

    #[test]
    fn test_reset_clears_selections() {
        let ds = dataset();
        let mut state = NavigationState::new();
        state.apply(NavAction::SelectCoarse("Tech".into()), &ds);
        state.apply(NavAction::SelectFine("AI".into()), &ds);
        let out = state.apply(NavAction::Reset, &ds);

        assert_eq!(
            out,
            TransitionOutcome::Moved {
                from: Stage::Results,
                to: Stage::Coarse
            }
        );
        assert_eq!(state, NavigationState::new());
    }

    #[test]
    fn test_select_fine_with_empty_coarse_stays_in_fine() {
        let ds = dataset();
        let mut state = NavigationState::new();
        state.apply(NavAction::SelectCoarse("Retail".into()), &ds);
        let out = state.apply(NavAction::SelectFine("Shops".into()), &ds);

        assert_eq!(out, TransitionOutcome::NoFineClusters);
        assert_eq!(state.stage(), Stage::Fine);
        assert_eq!(state.selected_fine(), None);
    }

    #[test]
    fn test_select_fine_with_no_matching_rows_reaches_results() {
        let ds = dataset();
        let mut state = NavigationState::new();
        state.apply(NavAction::SelectCoarse("Health".into()), &ds);
        state.apply(NavAction::SelectFine("AI".into()), &ds);
        assert_eq!(state.stage(), Stage::Results);
    }

    #[test]
    fn test_out_of_stage_actions_are_ignored() {
        let ds = dataset();
        let mut state = NavigationState::new();
        assert_eq!(
            state.apply(NavAction::SelectFine("AI".into()), &ds),
            TransitionOutcome::Ignored
        );
        assert_eq!(state.apply(NavAction::Back, &ds), TransitionOutcome::Ignored);

        state.apply(NavAction::SelectCoarse("Tech".into()), &ds);
        assert_eq!(
            state.apply(NavAction::SelectCoarse("Health".into()), &ds),
            TransitionOutcome::Ignored
        );
        assert_eq!(state.selected_coarse(), Some("Tech"));
    }

    #[test]
    fn test_normalized_repairs_inconsistent_state() {
        let broken: NavigationState =
            serde_json::from_str(r#"{"stage":"Results","selected_coarse":"Tech","selected_fine":null}"#)
                .unwrap();
        assert!(!broken.is_consistent());
        assert_eq!(broken.normalized(), NavigationState::new());
    }

    #[test]
    fn test_serde_roundtrip() {
        let ds = dataset();
        let mut state = NavigationState::new();
        state.apply(NavAction::SelectCoarse("Tech".into()), &ds);
        let json = serde_json::to_string(&state).unwrap();
        let back: NavigationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
