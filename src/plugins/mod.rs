//! Feature plugins.

use bevy::prelude::*;

pub mod audio;
pub mod core;
pub mod flow;
pub mod input;
pub mod leaderboard;
pub mod physics;
pub mod projectiles;
pub mod session;
pub mod storage;
pub mod surfaces;
pub mod targets;
pub mod tasks;
pub mod ui;

// Render-only
pub mod camera;

/// Per-tick ordering of gameplay work in `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    Input,
    Surfaces,
    Session,
    Fire,
    Targets,
    Reconcile,
    Present,
}

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    app.configure_sets(
        Update,
        (
            GameSet::Input,
            GameSet::Surfaces,
            GameSet::Session,
            GameSet::Fire,
            GameSet::Targets,
            GameSet::Reconcile,
            GameSet::Present,
        )
            .chain(),
    );

    core::plugin(app);
    physics::plugin(app);
    storage::plugin(app);
    leaderboard::plugin(app);
    ui::plugin(app);
    audio::plugin(app);
    tasks::plugin(app);
    flow::plugin(app);
    input::plugin(app);
    surfaces::plugin(app);
    targets::plugin(app);
    projectiles::plugin(app);
    session::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    camera::plugin(app);
}

/// Register all plugins (full app).
pub fn register_all(app: &mut App) {
    register_gameplay(app);
    register_render(app);
}
