//! Game composition root.
//!
//! Provides two public configuration functions:
//! - `configure_full`: includes DefaultPlugins (window/render) + game plugins.
//! - `configure_headless`: minimal configuration for integration tests.
//!
//! Collaborators that touch the outside world (preference file, surface
//! tracking) are constructed here and handed to the plugins as resources.

use bevy::prelude::*;
use bevy::window::WindowResolution;

use crate::common::state::GameFlowState;
use crate::plugins;
use crate::plugins::storage::KeyValueStore;
use crate::plugins::surfaces::{ArSurfaces, SimulatedSurfaces};

pub const PREFERENCES_FILE: &str = "alien_hunter_prefs.json";

pub fn run() {
    App::new().add_plugins(configure_full).run();
}

/// Full configuration for `cargo run`.
pub fn configure_full(app: &mut App) {
    let viewport = SimulatedSurfaces::DEFAULT_VIEWPORT;
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Alien Hunter AR".into(),
            resolution: WindowResolution::new(viewport.x as u32, viewport.y as u32),
            ..default()
        }),
        ..default()
    }));

    match KeyValueStore::open(PREFERENCES_FILE) {
        Ok(store) => {
            app.insert_resource(store);
        }
        Err(e) => warn!("preferences unavailable, using defaults: {e:#}"),
    }
    app.insert_resource(ArSurfaces::new(SimulatedSurfaces::living_room()));

    configure_game(app);
    plugins::register_render(app);
}

/// Headless configuration for integration tests.
///
/// Notes:
/// - Do NOT add DefaultPlugins.
/// - Do NOT add render-only plugins (camera, debug gizmos).
/// - No surface provider is installed; tests insert their own.
pub fn configure_headless(app: &mut App) {
    configure_game(app);
}

/// Configuration shared by both full and headless apps.
fn configure_game(app: &mut App) {
    app.init_state::<GameFlowState>();
    plugins::register_gameplay(app);
}
