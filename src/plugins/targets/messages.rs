use bevy::prelude::*;

use crate::common::ids::{SessionEpoch, TargetId};

/// A projectile struck `target` (deduplicated per target per tick).
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetHit {
    pub target: Entity,
    pub projectile: Entity,
}

/// Destruction notification, delivered once per target to its listener.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetDestroyed {
    pub epoch: SessionEpoch,
    pub id: TargetId,
    pub points: u32,
}
