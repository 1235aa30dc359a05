//! The live-target collection of one session.

use std::fmt;

use avian2d::prelude::*;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use super::components::{DestructionListener, TargetHandle, Wander};
use crate::common::ids::{SessionEpoch, TargetId};
use crate::common::layers::target_layers;
use crate::common::rng::GameRng;
use crate::common::tunables::Tunables;
use crate::plugins::surfaces::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSetError {
    NoSurface,
    ZeroCount,
    UnknownTarget(TargetId),
}

impl fmt::Display for TargetSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSetError::NoSurface => f.write_str("cannot spawn targets without a surface"),
            TargetSetError::ZeroCount => f.write_str("asked to spawn zero targets"),
            TargetSetError::UnknownTarget(id) => write!(f, "target {id} is not live"),
        }
    }
}

impl std::error::Error for TargetSetError {}

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnPlan {
    pub count: u32,
    pub point_value: u32,
    pub half_width: f32,
    pub spread: f32,
    pub scale: f32,
    pub radius: f32,
    pub wander_speed: f32,
    pub wander_retarget_secs: f32,
}

impl SpawnPlan {
    pub fn from_tunables(t: &Tunables) -> Self {
        Self {
            count: t.targets_num,
            point_value: t.point_value,
            half_width: t.spawn_half_width,
            spread: t.spawn_spread,
            scale: t.target_scale,
            radius: t.target_radius,
            wander_speed: t.wander_speed,
            wander_retarget_secs: t.wander_retarget_secs,
        }
    }
}

/// Where targets go: the surface and the anchor entity that tracks it.
#[derive(Debug, Clone, Copy)]
pub struct SpawnSite<'a> {
    pub anchor: Entity,
    pub surface: &'a Surface,
}

/// Invariant: `live.len() + destroyed == spawned`.
#[derive(Debug, Default)]
pub struct TargetSet {
    next_id: u32,
    live: HashMap<TargetId, Entity>,
    destroyed: u32,
    spawned: u32,
}

impl TargetSet {
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn destroyed(&self) -> u32 {
        self.destroyed
    }

    pub fn contains(&self, id: TargetId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn entity(&self, id: TargetId) -> Option<Entity> {
        self.live.get(&id).copied()
    }

    /// Live ids in ascending order.
    pub fn ids(&self) -> Vec<TargetId> {
        let mut ids: Vec<_> = self.live.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Spawn `plan.count` targets as children of the site anchor.
    ///
    /// Offsets are drawn independently from a square around the surface center.
    pub fn spawn(
        &mut self,
        commands: &mut Commands,
        site: Option<SpawnSite<'_>>,
        epoch: SessionEpoch,
        plan: &SpawnPlan,
        rng: &mut GameRng,
    ) -> Result<Vec<TargetId>, TargetSetError> {
        let Some(site) = site else {
            warn!("{}", TargetSetError::NoSurface);
            return Err(TargetSetError::NoSurface);
        };
        if plan.count == 0 {
            debug!("{}", TargetSetError::ZeroCount);
            return Err(TargetSetError::ZeroCount);
        }

        let wander_radius = site.surface.inner_radius();
        let mut ids = Vec::with_capacity(plan.count as usize);

        for _ in 0..plan.count {
            self.next_id += 1;
            let id = TargetId(self.next_id);
            let offset = rng.square_offset(plan.half_width) * plan.spread;
            let spawn_position = site.surface.transform.transform_point(offset.extend(0.0));

            let entity = commands
                .spawn((
                    Name::new(format!("Target {id}")),
                    TargetHandle::new(id, spawn_position, plan.point_value),
                    DestructionListener(epoch),
                    Wander::new(
                        wander_radius,
                        plan.wander_speed,
                        plan.wander_retarget_secs,
                        offset,
                    ),
                    Transform::from_translation(offset.extend(0.0))
                        .with_scale(Vec3::splat(plan.scale)),
                    RigidBody::Kinematic,
                    Collider::circle(plan.radius),
                    target_layers(),
                    LinearVelocity::ZERO,
                    ChildOf(site.anchor),
                ))
                .id();

            self.live.insert(id, entity);
            self.spawned += 1;
            ids.push(id);
        }

        debug!("spawned {} target(s) on {} for epoch {:?}", ids.len(), site.surface.id, epoch);
        Ok(ids)
    }

    /// Retire an id reported through the destruction notification path.
    pub fn mark_destroyed(&mut self, id: TargetId) -> Result<Entity, TargetSetError> {
        let entity = self.live.remove(&id).ok_or(TargetSetError::UnknownTarget(id))?;
        self.destroyed += 1;
        Ok(entity)
    }

    /// Remove and despawn a live target without notifying anyone.
    pub fn destroy(&mut self, commands: &mut Commands, id: TargetId) -> Result<(), TargetSetError> {
        let entity = self.mark_destroyed(id)?;
        commands.entity(entity).try_despawn();
        Ok(())
    }

    /// Despawn every live target without notification and forget the set.
    pub fn clear(&mut self, commands: &mut Commands) -> usize {
        let count = self.live.len();
        for (_, entity) in self.live.drain() {
            commands.entity(entity).try_despawn();
        }
        *self = Self::default();
        count
    }
}
