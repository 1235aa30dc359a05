//! Global flow state.
//!
//! `GameFlowState` is the single top-level state of the app. Only the flow plugin
//! writes `NextState<GameFlowState>`; everything else asks for a transition with a
//! `FlowCommand` (or `BackPressed`) message.

use std::fmt;

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameFlowState {
    #[default]
    MainMenu,
    Loading,
    Playing,
    Paused,
    GameOver,
    Settings,
}

impl GameFlowState {
    pub const ALL: [GameFlowState; 6] = [
        GameFlowState::MainMenu,
        GameFlowState::Loading,
        GameFlowState::Playing,
        GameFlowState::Paused,
        GameFlowState::GameOver,
        GameFlowState::Settings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GameFlowState::MainMenu => "MainMenu",
            GameFlowState::Loading => "Loading",
            GameFlowState::Playing => "Playing",
            GameFlowState::Paused => "Paused",
            GameFlowState::GameOver => "GameOver",
            GameFlowState::Settings => "Settings",
        }
    }

    /// Resolve a state coming from an untyped source (UI binding, save data).
    ///
    /// An index with no variant behind it can only come from a bug in the caller,
    /// so it is not recoverable.
    pub fn from_index(index: u8) -> Self {
        match Self::try_from(index) {
            Ok(state) => state,
            Err(e) => panic!("{e}"),
        }
    }
}

impl fmt::Display for GameFlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when an untyped value does not name a flow state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFlowState(pub String);

impl fmt::Display for UnknownFlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unmodeled game flow state: {}", self.0)
    }
}

impl std::error::Error for UnknownFlowState {}

impl TryFrom<u8> for GameFlowState {
    type Error = UnknownFlowState;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| UnknownFlowState(value.to_string()))
    }
}

impl TryFrom<&str> for GameFlowState {
    type Error = UnknownFlowState;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownFlowState(value.to_owned()))
    }
}
