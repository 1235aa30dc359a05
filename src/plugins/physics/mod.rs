//! Physics in the surface plane: avian2d with no gravity (targets hover, shots fly straight).

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::tunables::Tunables;

pub fn plugin(app: &mut App) {
    let unit = app.world().resource::<Tunables>().length_unit;
    app.add_plugins(PhysicsPlugins::default().with_length_unit(unit));
    app.insert_resource(Gravity(Vec2::ZERO));
}
