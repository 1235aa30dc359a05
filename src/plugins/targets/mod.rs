//! Targets: the live set, the per-target handle, hit application and motion.
//!
//! ```text
//! FixedPostUpdate: projectiles -> TargetHit
//! Update (Targets): apply_target_hits -> TargetDestroyed -> session reconcile
//! FixedUpdate: wander_targets (only while Playing; paused virtual time stops it)
//! ```

use bevy::prelude::*;

use crate::common::state::GameFlowState;
use crate::plugins::GameSet;

mod components;
mod messages;
mod set;
pub mod systems;

pub use components::{DestructionListener, TargetHandle, Wander};
pub use messages::{TargetDestroyed, TargetHit};
pub use set::{SpawnPlan, SpawnSite, TargetSet, TargetSetError};

pub fn plugin(app: &mut App) {
    app.add_message::<TargetHit>()
        .add_message::<TargetDestroyed>()
        .add_systems(
            Update,
            systems::apply_target_hits
                .in_set(GameSet::Targets)
                .run_if(in_state(GameFlowState::Playing)),
        )
        .add_systems(
            FixedUpdate,
            systems::wander_targets.run_if(in_state(GameFlowState::Playing)),
        );
}

#[cfg(test)]
mod tests;
