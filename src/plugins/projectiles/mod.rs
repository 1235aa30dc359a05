//! Projectiles: slingshot ammo, firing, lifetime and hit detection.
//!
//! # Data flow
//! ```text
//!   Update (Fire)
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │ fire_on_contact                                              │
//!   │   reads: ContactBegan, Slingshot, ArSurfaces (aim)            │
//!   │   writes: AmmoChanged (Shot, then Reload), Projectile entity │
//!   └──────────────────────────────────────────────────────────────┘
//!                │
//!                v
//!   FixedPostUpdate
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │ Avian emits CollisionStart (projectiles opt in)              │
//!   │ process_projectile_hits -> TargetHit, projectile despawned   │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything physical stops with virtual time, so a paused game keeps its
//! projectiles frozen mid-flight. A projectile lives until it hits, its lifetime
//! runs out or the session is torn down; the end of a round leaves shots in
//! flight alone.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::prelude::*;

use crate::common::state::GameFlowState;
use crate::plugins::GameSet;

mod slingshot;
pub mod systems;

pub use slingshot::{AmmoCause, AmmoChanged, Slingshot};

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Projectile;

#[derive(Component, Deref, DerefMut)]
pub struct Lifetime(pub Timer);

pub fn plugin(app: &mut App) {
    app.init_resource::<Slingshot>()
        .add_message::<AmmoChanged>()
        .add_systems(
            Update,
            systems::fire_on_contact
                .in_set(GameSet::Fire)
                .run_if(in_state(GameFlowState::Playing)),
        )
        .add_systems(OnEnter(GameFlowState::MainMenu), systems::retire_projectiles)
        .add_systems(OnEnter(GameFlowState::Loading), systems::retire_projectiles)
        .add_systems(FixedUpdate, systems::projectile_lifetime)
        .add_systems(
            FixedPostUpdate,
            systems::process_projectile_hits
                .after(CollisionEventSystems)
                .run_if(in_state(GameFlowState::Playing)),
        );
}
