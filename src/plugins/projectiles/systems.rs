use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use super::slingshot::{AmmoChanged, Slingshot};
use super::{Lifetime, Projectile};
use crate::common::layers::projectile_layers;
use crate::common::tunables::Tunables;
use crate::plugins::input::ContactBegan;
use crate::plugins::surfaces::ArSurfaces;
use crate::plugins::targets::{TargetHandle, TargetHit};

/// Fire on the first contact of the tick while the slingshot is armed.
///
/// The shot is aimed at the surface point under the contact; without a hit (or
/// without surface tracking) it flies straight ahead.
pub fn fire_on_contact(
    mut commands: Commands,
    mut contacts: MessageReader<ContactBegan>,
    mut slingshot: ResMut<Slingshot>,
    surfaces: Option<Res<ArSurfaces>>,
    tunables: Res<Tunables>,
    mut ammo: MessageWriter<AmmoChanged>,
) {
    let Some(contact) = contacts.read().next().copied() else {
        return;
    };
    contacts.clear();

    let Some(shot) = slingshot.fire() else {
        return;
    };
    ammo.write(shot);

    let muzzle = slingshot.muzzle();
    let aim = surfaces
        .and_then(|s| s.hit_test(contact.position).first().map(|hit| hit.point.truncate()))
        .unwrap_or(muzzle + Vec2::Y);
    let dir = (aim - muzzle).normalize_or(Vec2::Y);

    commands.spawn((
        Name::new("Projectile"),
        Projectile,
        Lifetime(Timer::from_seconds(tunables.projectile_lifetime_secs, TimerMode::Once)),
        Transform::from_translation(muzzle.extend(0.0)),
        RigidBody::Dynamic,
        Collider::circle(tunables.projectile_radius),
        projectile_layers(),
        LinearVelocity(dir * tunables.projectile_speed),
        // Avian only writes CollisionStart when one side opts in.
        CollisionEventsEnabled,
    ));
    debug!("shot toward {aim}, {} left", shot.remaining);

    if let Some(reload) = slingshot.reload() {
        ammo.write(reload);
    }
}

pub fn projectile_lifetime(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut q: Query<(Entity, &mut Lifetime)>,
) {
    for (e, mut lt) in &mut q {
        lt.tick(time.delta());
        if lt.is_finished() {
            commands.entity(e).try_despawn();
        }
    }
}

/// Remove every projectile when the session is torn down.
///
/// The end of a round does not retire anything: shots already in flight still
/// get to land.
pub fn retire_projectiles(mut commands: Commands, q: Query<Entity, With<Projectile>>) {
    for e in &q {
        commands.entity(e).try_despawn();
    }
}

#[inline]
fn gameplay_owner(collider: Entity, body: Option<Entity>) -> Entity {
    body.unwrap_or(collider)
}

/// Bulk collision processing for projectile hits.
///
/// One `TargetHit` per target per tick and one per projectile; the projectile is
/// spent on its first hit.
pub fn process_projectile_hits(
    mut commands: Commands,
    mut started: MessageReader<CollisionStart>,
    q_projectiles: Query<(), With<Projectile>>,
    q_targets: Query<&TargetHandle>,
    mut hits: MessageWriter<TargetHit>,
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();

    for ev in started.read() {
        let a = gameplay_owner(ev.collider1, ev.body1);
        let b = gameplay_owner(ev.collider2, ev.body2);

        let (projectile, other) = if q_projectiles.contains(a) {
            (a, b)
        } else if q_projectiles.contains(b) {
            (b, a)
        } else {
            continue;
        };

        let Ok(handle) = q_targets.get(other) else {
            continue;
        };
        if !handle.is_alive() {
            continue;
        }
        if seen.contains(&projectile) || seen.contains(&other) {
            continue;
        }
        seen.insert(projectile);
        seen.insert(other);

        hits.write(TargetHit { target: other, projectile });
        commands.entity(projectile).try_despawn();
    }
}
