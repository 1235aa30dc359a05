//! The projectile source.
//!
//! `Slingshot` is the single owner of the ammo pool. Every shot and every
//! reload is announced as `AmmoChanged`; the session reconciles its own counter
//! from those notifications.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmmoCause {
    Shot,
    Reload,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmmoChanged {
    pub remaining: u32,
    pub cause: AmmoCause,
}

#[derive(Resource, Debug, Default, Clone)]
pub struct Slingshot {
    ammo_left: u32,
    loaded: bool,
    armed: bool,
    /// Launch point in world XY.
    muzzle: Vec2,
}

impl Slingshot {
    /// Hand the slingshot `ammo` shots, fired from `muzzle`, and load the first one.
    pub fn arm(&mut self, ammo: u32, muzzle: Vec2) -> AmmoChanged {
        self.ammo_left = ammo;
        self.armed = true;
        self.loaded = ammo > 0;
        self.muzzle = muzzle;
        AmmoChanged { remaining: ammo, cause: AmmoCause::Reload }
    }

    /// Load the next projectile, if there is one and nothing is loaded.
    pub fn reload(&mut self) -> Option<AmmoChanged> {
        if !self.armed || self.loaded || self.ammo_left == 0 {
            return None;
        }
        self.loaded = true;
        Some(AmmoChanged { remaining: self.ammo_left, cause: AmmoCause::Reload })
    }

    /// Release the loaded projectile.
    pub fn fire(&mut self) -> Option<AmmoChanged> {
        if !self.armed || !self.loaded {
            return None;
        }
        self.loaded = false;
        self.ammo_left -= 1;
        Some(AmmoChanged { remaining: self.ammo_left, cause: AmmoCause::Shot })
    }

    /// Disarm and drop whatever ammo is left.
    pub fn clear(&mut self) {
        *self = Self { muzzle: self.muzzle, ..Self::default() };
    }

    pub fn current_ammo(&self) -> u32 {
        self.ammo_left
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn muzzle(&self) -> Vec2 {
        self.muzzle
    }
}
