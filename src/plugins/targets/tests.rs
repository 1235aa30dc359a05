use bevy::ecs::message::Messages;
use bevy::prelude::*;

use super::*;
use crate::common::ids::{SessionEpoch, SurfaceId, TargetId};
use crate::common::rng::GameRng;
use crate::common::test_utils::{drain_messages, run_system_once};
use crate::common::tunables::Tunables;
use crate::plugins::surfaces::Surface;

fn floor() -> Surface {
    Surface {
        id: SurfaceId(1),
        transform: Transform::from_xyz(2.0, 1.0, 0.0),
        polygon: vec![
            Vec2::new(-1.5, -1.5),
            Vec2::new(1.5, -1.5),
            Vec2::new(1.5, 1.5),
            Vec2::new(-1.5, 1.5),
        ],
        active: true,
    }
}

fn world_with_rng() -> World {
    let mut world = World::new();
    world.insert_resource(GameRng::new(7));
    world
}

fn spawn_into(world: &mut World, count: u32) -> (TargetSet, Entity, Result<Vec<TargetId>, TargetSetError>) {
    let anchor = world.spawn(Transform::from_xyz(2.0, 1.0, 0.0)).id();
    let surface = floor();
    let mut plan = SpawnPlan::from_tunables(&Tunables::default());
    plan.count = count;

    let (set, result) = run_system_once(world, move |mut commands: Commands, mut rng: ResMut<GameRng>| {
        let mut set = TargetSet::default();
        let result = set.spawn(
            &mut commands,
            Some(SpawnSite { anchor, surface: &surface }),
            SessionEpoch(1),
            &plan,
            &mut rng,
        );
        (set, result)
    });
    (set, anchor, result)
}

#[test]
fn spawn_yields_sequential_ids_under_the_anchor() {
    let mut world = world_with_rng();
    let (set, anchor, result) = spawn_into(&mut world, 5);

    let ids = result.expect("spawn");
    assert_eq!(ids, (1..=5).map(TargetId).collect::<Vec<_>>());
    assert_eq!(set.len(), 5);
    assert_eq!(set.ids(), ids);
    assert_eq!(set.spawned(), 5);

    let mut q = world.query::<(&TargetHandle, &ChildOf, &Transform, &DestructionListener)>();
    assert_eq!(q.iter(&world).count(), 5);
    for (handle, child_of, transform, listener) in q.iter(&world) {
        assert!(handle.is_alive());
        assert_eq!(handle.point_value(), 10);
        assert_eq!(child_of.parent(), anchor);
        assert_eq!(listener.0, SessionEpoch(1));
        // Offsets come from a square of half-width 0.5, doubled.
        assert!(transform.translation.x.abs() <= 1.0 + f32::EPSILON);
        assert!(transform.translation.y.abs() <= 1.0 + f32::EPSILON);
        assert_eq!(transform.scale, Vec3::splat(0.1));
        let expected = Vec3::new(2.0, 1.0, 0.0) + transform.translation;
        assert!(handle.spawn_position().distance(expected) < 1e-5);
    }
}

#[test]
fn spawning_zero_targets_is_a_logged_no_op() {
    let mut world = world_with_rng();
    let (set, _, result) = spawn_into(&mut world, 0);
    assert_eq!(result, Err(TargetSetError::ZeroCount));
    assert!(set.is_empty());
    assert_eq!(world.query::<&TargetHandle>().iter(&world).count(), 0);
}

#[test]
fn spawning_without_a_surface_fails() {
    let mut world = world_with_rng();
    let plan = SpawnPlan::from_tunables(&Tunables::default());
    let result = run_system_once(&mut world, move |mut commands: Commands, mut rng: ResMut<GameRng>| {
        TargetSet::default().spawn(&mut commands, None, SessionEpoch(1), &plan, &mut rng)
    });
    assert_eq!(result, Err(TargetSetError::NoSurface));
}

#[test]
fn retiring_ids_keeps_the_count_invariant() {
    let mut world = world_with_rng();
    let (mut set, _, _) = spawn_into(&mut world, 3);

    set.mark_destroyed(TargetId(2)).expect("live id");
    assert_eq!(set.len() as u32 + set.destroyed(), set.spawned());
    assert_eq!(
        set.mark_destroyed(TargetId(2)),
        Err(TargetSetError::UnknownTarget(TargetId(2)))
    );
    assert_eq!(set.ids(), vec![TargetId(1), TargetId(3)]);
}

#[test]
fn clear_despawns_without_notifications() {
    let mut world = world_with_rng();
    let (mut set, _, _) = spawn_into(&mut world, 4);

    let (set, cleared) = run_system_once(&mut world, move |mut commands: Commands| {
        let n = set.clear(&mut commands);
        (std::mem::take(&mut set), n)
    });

    assert_eq!(cleared, 4);
    assert!(set.is_empty());
    assert_eq!(set.spawned(), 0);
    assert_eq!(world.query::<&TargetHandle>().iter(&world).count(), 0);
    assert!(drain_messages::<TargetDestroyed>(&mut world).is_empty());
}

#[test]
#[should_panic(expected = "destroyed twice")]
fn destroying_a_handle_twice_panics() {
    let mut handle = TargetHandle::new(TargetId(1), Vec3::ZERO, 10);
    assert_eq!(handle.destroy(), (TargetId(1), 10));
    handle.destroy();
}

#[test]
fn repeated_hits_notify_once_and_despawn() {
    let mut world = world_with_rng();
    world.init_resource::<Messages<TargetHit>>();
    world.init_resource::<Messages<TargetDestroyed>>();
    let (set, _, _) = spawn_into(&mut world, 2);
    let target = set.entity(TargetId(1)).expect("live");
    let projectile = world.spawn_empty().id();

    world.write_message(TargetHit { target, projectile });
    world.write_message(TargetHit { target, projectile });
    run_system_once(&mut world, systems::apply_target_hits);

    let destroyed = drain_messages::<TargetDestroyed>(&mut world);
    assert_eq!(
        destroyed,
        vec![TargetDestroyed { epoch: SessionEpoch(1), id: TargetId(1), points: 10 }]
    );
    assert!(world.get_entity(target).is_err());
    assert!(world.get_entity(set.entity(TargetId(2)).expect("live")).is_ok());
}
