//! Transition policy: which state changes are legal, and what "back" means.

use std::fmt;

use crate::common::state::GameFlowState;

/// How a transition was requested.
///
/// `Restart` is the only way back into `Loading` from a running game; plain
/// requests for that edge are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionKind {
    #[default]
    Normal,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowError {
    NotAllowed {
        from: GameFlowState,
        to: GameFlowState,
        kind: TransitionKind,
    },
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::NotAllowed { from, to, kind: TransitionKind::Normal } => {
                write!(f, "transition {from} -> {to} is not allowed")
            }
            FlowError::NotAllowed { from, to, kind: TransitionKind::Restart } => {
                write!(f, "restart {from} -> {to} is not allowed")
            }
        }
    }
}

impl std::error::Error for FlowError {}

pub fn check(
    from: GameFlowState,
    to: GameFlowState,
    kind: TransitionKind,
) -> Result<(), FlowError> {
    use GameFlowState::*;

    let allowed = match kind {
        TransitionKind::Restart => {
            to == Loading && matches!(from, Playing | Paused | GameOver)
        }
        TransitionKind::Normal => matches!(
            (from, to),
            (_, MainMenu)
                | (MainMenu, Loading)
                | (MainMenu, Settings)
                | (Loading, Playing)
                | (Playing, Paused)
                | (Playing, GameOver)
                | (Paused, Playing)
        ),
    };

    if allowed {
        Ok(())
    } else {
        Err(FlowError::NotAllowed { from, to, kind })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    Goto(GameFlowState),
    Quit,
    Ignore,
}

pub fn back_action(state: GameFlowState) -> BackAction {
    match state {
        GameFlowState::Playing => BackAction::Goto(GameFlowState::Paused),
        GameFlowState::Paused => BackAction::Goto(GameFlowState::Playing),
        GameFlowState::Settings | GameFlowState::GameOver => {
            BackAction::Goto(GameFlowState::MainMenu)
        }
        GameFlowState::MainMenu => BackAction::Quit,
        GameFlowState::Loading => BackAction::Ignore,
    }
}
