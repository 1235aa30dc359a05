//! Core plugin: shared resources and global settings.

use crate::common::rng::GameRng;
use crate::common::tunables::Tunables;
use bevy::prelude::*;

/// Installs defaults only where nothing was provided, so tests and the binary
/// can insert their own `Tunables` before the plugins run.
pub fn plugin(app: &mut App) {
    app.init_resource::<Tunables>();
    let seed = app.world().resource::<Tunables>().rng_seed;
    if !app.world().contains_resource::<GameRng>() {
        app.insert_resource(GameRng::new(seed));
    }
    app.insert_resource(ClearColor(Color::srgb(0.02, 0.03, 0.05)));
}
