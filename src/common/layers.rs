//! Collision layers.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    Target,
    Projectile,
}

#[inline]
pub fn target_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Target, [Layer::Projectile])
}

#[inline]
pub fn projectile_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Projectile, [Layer::Target])
}
