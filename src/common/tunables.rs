//! Tunable gameplay constants.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    /// Targets spawned per session.
    pub targets_num: u32,
    /// Projectiles granted per round.
    pub ammo: u32,
    /// Points awarded per destroyed target.
    pub point_value: u32,
    /// Half-width of the square spawn offsets are drawn from (meters).
    pub spawn_half_width: f32,
    /// Multiplier applied to every spawn offset so targets do not bunch up.
    pub spawn_spread: f32,
    /// Uniform scale applied to target bodies.
    pub target_scale: f32,
    /// Collider radius of a target before scaling.
    pub target_radius: f32,
    pub wander_speed: f32,
    pub wander_retarget_secs: f32,
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    pub projectile_lifetime_secs: f32,
    /// Distance behind the surface center the slingshot fires from.
    pub launch_offset: f32,
    /// Physics length unit (AR space is in meters).
    pub length_unit: f32,
    pub loading_step_secs: f32,
    pub loading_settle_secs: f32,
    pub restart_delay_secs: f32,
    pub game_over_delay_secs: f32,
    pub leaderboard_size: usize,
    pub rng_seed: u64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            targets_num: 5,
            ammo: 7,
            point_value: 10,
            spawn_half_width: 0.5,
            spawn_spread: 2.0,
            target_scale: 0.1,
            target_radius: 1.0,
            wander_speed: 0.15,
            wander_retarget_secs: 2.0,
            projectile_speed: 3.0,
            projectile_radius: 0.03,
            projectile_lifetime_secs: 3.0,
            launch_offset: 1.5,
            length_unit: 1.0,
            loading_step_secs: 1.0,
            loading_settle_secs: 0.5,
            restart_delay_secs: 0.2,
            game_over_delay_secs: 1.0,
            leaderboard_size: 10,
            rng_seed: 0xA11E_5EED,
        }
    }
}
