use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use super::components::{DestructionListener, TargetHandle, Wander};
use super::messages::{TargetDestroyed, TargetHit};
use crate::common::rng::GameRng;

/// Turn hits into destruction notifications and despawn the targets.
///
/// Each handle is destroyed at most once: repeated hits in the same tick are
/// skipped, and a despawned target no longer matches the query next tick.
pub fn apply_target_hits(
    mut commands: Commands,
    mut hits: MessageReader<TargetHit>,
    mut q_targets: Query<(&mut TargetHandle, &DestructionListener)>,
    mut destroyed: MessageWriter<TargetDestroyed>,
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();

    for hit in hits.read() {
        if !seen.insert(hit.target) {
            continue;
        }
        let Ok((mut handle, listener)) = q_targets.get_mut(hit.target) else {
            continue;
        };
        if !handle.is_alive() {
            continue;
        }

        let (id, points) = handle.destroy();
        trace!("target {id} hit by {:?}", hit.projectile);
        destroyed.write(TargetDestroyed { epoch: listener.0, id, points });
        commands.entity(hit.target).try_despawn();
    }
}

/// Steer each target toward its destination; pick a new one when the timer fires.
///
/// Targets sit directly under an unrotated anchor, so local offsets and world
/// velocities share axes.
pub fn wander_targets(
    time: Res<Time>,
    mut rng: ResMut<GameRng>,
    mut q: Query<(&Transform, &mut LinearVelocity, &mut Wander), With<TargetHandle>>,
) {
    for (transform, mut velocity, mut wander) in &mut q {
        wander.retarget.tick(time.delta());
        if wander.retarget.just_finished() {
            let radius = wander.radius;
            wander.destination = rng.disc_point(radius);
        }

        let to_go = wander.destination - transform.translation.truncate();
        velocity.0 = if to_go.length_squared() < 1e-4 {
            Vec2::ZERO
        } else {
            to_go.normalize() * wander.speed
        };
    }
}
