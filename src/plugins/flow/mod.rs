//! Game flow state machine.
//!
//! Every state change goes through here. Callers send a `FlowCommand` (or
//! `BackPressed`); `drive_flow` turns it into a queued request, validates the
//! oldest request against the transition policy and hands it to Bevy's
//! `NextState`. One request is applied per tick, in `PreUpdate`, so it lands in
//! the same tick's `StateTransition`.
//!
//! ```text
//! PreUpdate:  poll_tasks -> drive_flow (commands, back, LoadingComplete) -> NextState
//! StateTransition: OnExit / OnTransition / OnEnter side effects
//! ```

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::common::state::GameFlowState;
use crate::plugins::tasks::TaskPolling;

pub mod policy;
mod systems;

pub use policy::{BackAction, FlowError, TransitionKind};
pub use systems::{loading_sequence, restart_sequence};

/// Entry points into the flow machine.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowCommand {
    StartNewGame,
    Resume,
    Restart,
    ReturnToMainMenu,
    OpenSettings,
    Quit,
    DismissWarning,
    Transition(GameFlowState),
}

/// The platform back button (Escape on desktop).
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackPressed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowRequest {
    pub to: GameFlowState,
    pub kind: TransitionKind,
}

#[derive(Resource, Debug, Default)]
pub struct FlowMachine {
    pending: VecDeque<FlowRequest>,
    paused: bool,
    game_over: bool,
    /// Kind of the most recently applied transition.
    entering: TransitionKind,
    last_rejection: Option<FlowError>,
}

impl FlowMachine {
    pub fn request_transition(&mut self, to: GameFlowState) {
        self.pending.push_back(FlowRequest { to, kind: TransitionKind::Normal });
    }

    pub fn request_restart(&mut self) {
        self.pending.push_back(FlowRequest {
            to: GameFlowState::Loading,
            kind: TransitionKind::Restart,
        });
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn entering(&self) -> TransitionKind {
        self.entering
    }

    pub fn last_rejection(&self) -> Option<FlowError> {
        self.last_rejection
    }

    /// Pop the oldest request and validate it against `current`.
    ///
    /// Rejections are logged and remembered; the request is dropped.
    pub fn step(&mut self, current: GameFlowState) -> Option<Result<FlowRequest, FlowError>> {
        let request = self.pending.pop_front()?;
        let result = policy::check(current, request.to, request.kind).map(|()| request);
        match result {
            Ok(req) => self.entering = req.kind,
            Err(e) => {
                warn!("{e}");
                self.last_rejection = Some(e);
            }
        }
        Some(result)
    }

    fn clear_flags(&mut self) {
        self.paused = false;
        self.game_over = false;
    }
}

pub const AR_WARNING_TEXT: &str = "This device does not report AR support. \
The game will try to run anyway, but plane detection may not work.";

/// What the device said about AR, and whether the player chose to continue anyway.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArSupport {
    pub supported: bool,
    pub override_accepted: bool,
}

impl Default for ArSupport {
    fn default() -> Self {
        Self { supported: true, override_accepted: false }
    }
}

impl ArSupport {
    pub fn needs_warning(&self) -> bool {
        !self.supported && !self.override_accepted
    }
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlowDriving;

pub fn plugin(app: &mut App) {
    use GameFlowState::*;

    app.init_resource::<FlowMachine>()
        .init_resource::<ArSupport>()
        .add_message::<FlowCommand>()
        .add_message::<BackPressed>()
        .add_systems(
            PreUpdate,
            systems::drive_flow.in_set(FlowDriving).after(TaskPolling),
        )
        .add_systems(OnEnter(MainMenu), systems::enter_main_menu)
        .add_systems(OnEnter(Loading), systems::enter_loading)
        .add_systems(OnEnter(Playing), systems::enter_playing)
        .add_systems(OnEnter(Paused), systems::enter_paused)
        .add_systems(OnEnter(GameOver), systems::enter_game_over)
        .add_systems(OnEnter(Settings), systems::enter_settings)
        .add_systems(OnExit(Settings), systems::exit_settings);
}

#[cfg(test)]
mod tests;
