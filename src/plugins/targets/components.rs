use bevy::prelude::*;

use crate::common::ids::{SessionEpoch, TargetId};

/// One spawned alien.
///
/// `alive` only ever goes from true to false. The hit path calls `destroy`
/// exactly once; a second call means two systems think they own the kill.
#[derive(Component, Debug, Clone)]
pub struct TargetHandle {
    id: TargetId,
    spawn_position: Vec3,
    point_value: u32,
    alive: bool,
}

impl TargetHandle {
    pub fn new(id: TargetId, spawn_position: Vec3, point_value: u32) -> Self {
        Self { id, spawn_position, point_value, alive: true }
    }

    pub fn id(&self) -> TargetId {
        self.id
    }

    pub fn spawn_position(&self) -> Vec3 {
        self.spawn_position
    }

    pub fn point_value(&self) -> u32 {
        self.point_value
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Retire the target and hand back its `(id, points)` notification.
    pub fn destroy(&mut self) -> (TargetId, u32) {
        assert!(self.alive, "target {} destroyed twice", self.id);
        self.alive = false;
        (self.id, self.point_value)
    }
}

/// The session (by epoch) that receives this target's destruction notification.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestructionListener(pub SessionEpoch);

/// Random walk inside a disc around the anchor.
#[derive(Component, Debug, Clone)]
pub struct Wander {
    pub radius: f32,
    pub speed: f32,
    pub destination: Vec2,
    pub retarget: Timer,
}

impl Wander {
    pub fn new(radius: f32, speed: f32, retarget_secs: f32, destination: Vec2) -> Self {
        Self {
            radius,
            speed,
            destination,
            retarget: Timer::from_seconds(retarget_secs.max(0.01), TimerMode::Repeating),
        }
    }
}
