//! AR surface collaborator.
//!
//! Gameplay sees surface tracking only through the `SurfaceProvider` trait,
//! stored as the `ArSurfaces` resource. The provider is polled once per tick
//! while playing; a pending "candidates changed" flag becomes a
//! `SurfacesChanged` message.
//!
//! Play happens in the surface plane: a surface transform maps surface-local XY
//! into the world, so 2D physics runs directly in surface coordinates.

use bevy::prelude::*;

use crate::common::ids::SurfaceId;
use crate::common::state::GameFlowState;

mod simulated;

pub use simulated::{PlaneLayout, SimulatedSurfaces};

/// A tracked planar region.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub id: SurfaceId,
    pub transform: Transform,
    /// Boundary in surface-local coordinates, counter-clockwise.
    pub polygon: Vec<Vec2>,
    pub active: bool,
}

impl Surface {
    pub fn center(&self) -> Vec3 {
        self.transform.translation
    }

    /// Distance from the center to the nearest polygon edge.
    pub fn inner_radius(&self) -> f32 {
        let n = self.polygon.len();
        if n < 3 {
            return 0.0;
        }
        (0..n)
            .map(|i| {
                let a = self.polygon[i];
                let b = self.polygon[(i + 1) % n];
                let edge = b - a;
                let len = edge.length();
                if len <= f32::EPSILON { a.length() } else { edge.perp_dot(-a).abs() / len }
            })
            .fold(f32::INFINITY, f32::min)
    }

    /// Whether a surface-local point lies inside the polygon (even-odd rule).
    pub fn contains_local(&self, p: Vec2) -> bool {
        let n = self.polygon.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (a, b) = (self.polygon[i], self.polygon[j]);
            if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    pub fn world_to_local(&self, world: Vec3) -> Vec2 {
        let local = self.transform.rotation.inverse() * (world - self.transform.translation);
        local.truncate()
    }
}

/// One raycast result against tracked surfaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub surface: SurfaceId,
    pub point: Vec3,
    pub distance: f32,
}

pub trait SurfaceProvider: Send + Sync + 'static {
    /// Advance tracking by `dt` seconds of wall-clock time.
    fn update(&mut self, dt: f32);

    /// Currently tracked surfaces.
    fn candidates(&self) -> Vec<SurfaceId>;

    /// Consume the pending "candidates changed" notification.
    fn take_changed(&mut self) -> bool;

    /// Raycast from a screen point; nearest hit first. Only polygon interiors count.
    fn hit_test(&self, screen_point: Vec2) -> Vec<SurfaceHit>;

    fn surface(&self, id: SurfaceId) -> Option<&Surface>;

    fn surface_center(&self, id: SurfaceId) -> Option<Vec3> {
        self.surface(id).map(Surface::center)
    }

    fn surface_transform(&self, id: SurfaceId) -> Option<Transform> {
        self.surface(id).map(|s| s.transform)
    }

    fn set_surface_active(&mut self, id: SurfaceId, active: bool);

    fn set_detection_enabled(&mut self, enabled: bool);

    fn detection_enabled(&self) -> bool;

    /// Drop every tracked surface and start over.
    fn reset(&mut self);
}

#[derive(Resource, Deref, DerefMut)]
pub struct ArSurfaces(pub Box<dyn SurfaceProvider>);

impl ArSurfaces {
    pub fn new(provider: impl SurfaceProvider) -> Self {
        Self(Box::new(provider))
    }
}

#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct SurfacesChanged {
    pub candidates: Vec<SurfaceId>,
}

pub fn poll_surfaces(
    time: Res<Time<Real>>,
    surfaces: Option<ResMut<ArSurfaces>>,
    mut changed: MessageWriter<SurfacesChanged>,
) {
    let Some(mut surfaces) = surfaces else {
        return;
    };
    surfaces.update(time.delta_secs());
    if surfaces.take_changed() {
        let candidates = surfaces.candidates();
        trace!("surfaces changed: {} candidate(s)", candidates.len());
        changed.write(SurfacesChanged { candidates });
    }
}

pub fn plugin(app: &mut App) {
    app.add_message::<SurfacesChanged>().add_systems(
        Update,
        poll_surfaces
            .in_set(crate::plugins::GameSet::Surfaces)
            .run_if(in_state(GameFlowState::Playing)),
    );
}

#[cfg(test)]
mod tests;
