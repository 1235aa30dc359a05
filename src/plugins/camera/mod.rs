//! Desktop view of the simulated AR scene.
//!
//! Render-only: an orthographic camera looking down on the surface plane with the
//! same pixels-per-meter as the simulated surface provider, plus avian's debug
//! gizmos so targets and projectiles are visible without any art.

use avian2d::prelude::*;
use bevy::prelude::*;

#[derive(Component)]
pub struct MainCamera;

/// Screen pixels per world meter.
#[derive(Resource, Debug, Clone, Copy)]
pub struct ViewScale(pub f32);

impl Default for ViewScale {
    fn default() -> Self {
        Self(200.0)
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<ViewScale>()
        .add_plugins(PhysicsDebugPlugin)
        .add_systems(Startup, spawn_camera);
}

fn spawn_camera(mut commands: Commands, scale: Res<ViewScale>) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera2d,
        MainCamera,
        Projection::Orthographic(OrthographicProjection {
            scale: 1.0 / scale.0,
            ..OrthographicProjection::default_2d()
        }),
        Transform::from_xyz(0.0, 0.0, 999.0),
    ));
}
