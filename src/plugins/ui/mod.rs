//! HUD model.
//!
//! Presentation is out of scope for the simulation, so the HUD is a plain
//! resource: which panels are visible and what their text fields say. Rendering
//! layers (or tests) read it; gameplay systems write it.

use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::plugins::tasks::{TaskEvent, TaskOutput, TaskPolling, TaskSignal, TweenChannel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    MainMenu,
    Loading,
    /// In-game container (always up while a round can be played).
    Gameplay,
    PauseMenu,
    GameOver,
    Settings,
    CompatibilityWarning,
    PlaneSearching,
    SelectPlane,
    StartButton,
    /// Score and ammo readout.
    RoundHud,
    PlayAgainButton,
    LeaderboardButton,
    Leaderboard,
}

impl Panel {
    /// Panels owned by the flow state machine; each state shows exactly one of them.
    pub const FLOW: [Panel; 5] = [
        Panel::MainMenu,
        Panel::Loading,
        Panel::Gameplay,
        Panel::PauseMenu,
        Panel::GameOver,
    ];

    /// Panels owned by a session; hidden whenever a session is torn down.
    pub const SESSION: [Panel; 7] = [
        Panel::PlaneSearching,
        Panel::SelectPlane,
        Panel::StartButton,
        Panel::RoundHud,
        Panel::PlayAgainButton,
        Panel::LeaderboardButton,
        Panel::Leaderboard,
    ];
}

#[derive(Resource, Debug, Default, Clone)]
pub struct Hud {
    visible: HashSet<Panel>,
    pub score_text: String,
    pub ammo_text: String,
    pub loading_status: String,
    pub loading_progress: f32,
    pub final_score_text: String,
    pub high_score_text: String,
    pub title_text: String,
    pub warning_text: String,
    pub leaderboard_lines: Vec<String>,
}

impl Hud {
    pub fn show(&mut self, panel: Panel) {
        self.visible.insert(panel);
    }

    pub fn hide(&mut self, panel: Panel) {
        self.visible.remove(&panel);
    }

    pub fn set_visible(&mut self, panel: Panel, visible: bool) {
        if visible {
            self.show(panel);
        } else {
            self.hide(panel);
        }
    }

    pub fn is_visible(&self, panel: Panel) -> bool {
        self.visible.contains(&panel)
    }

    /// Show `panel` and hide every other flow-owned panel.
    pub fn show_only_flow(&mut self, panel: Panel) {
        for p in Panel::FLOW {
            self.set_visible(p, p == panel);
        }
    }

    pub fn hide_session_panels(&mut self) {
        for p in Panel::SESSION {
            self.hide(p);
        }
    }

    pub fn set_score(&mut self, points: u32) {
        self.score_text = format!("Score: {points}");
    }

    pub fn set_ammo(&mut self, ammo: u32) {
        self.ammo_text = format!("Ammo: {ammo}");
    }
}

/// Mirror loading-task output into the HUD.
pub fn apply_loading_feedback(mut reader: MessageReader<TaskEvent>, mut hud: ResMut<Hud>) {
    for ev in reader.read() {
        match ev.output {
            TaskOutput::Signal(TaskSignal::LoadingStatus(text)) => {
                hud.loading_status = text.to_owned();
            }
            TaskOutput::Sample { channel: TweenChannel::LoadingProgress, value } => {
                hud.loading_progress = value;
            }
            TaskOutput::Signal(_) => {}
        }
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Hud>()
        .add_systems(PreUpdate, apply_loading_feedback.after(TaskPolling));
}
