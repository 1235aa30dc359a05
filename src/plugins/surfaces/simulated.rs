//! In-memory surface tracking for desktop runs and tests.
//!
//! The simulated room is a list of axis-aligned rectangular planes stacked at
//! different heights under a top-down camera. Scanning "discovers" each plane
//! once its detection delay has elapsed.

use bevy::prelude::*;

use super::{Surface, SurfaceHit, SurfaceProvider};
use crate::common::ids::SurfaceId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneLayout {
    pub center: Vec3,
    pub half_extents: Vec2,
    /// Seconds of scanning before this plane is tracked.
    pub detect_after: f32,
}

impl PlaneLayout {
    pub fn new(center: Vec3, half_extents: Vec2) -> Self {
        Self { center, half_extents, detect_after: 0.0 }
    }

    pub fn detected_after(mut self, secs: f32) -> Self {
        self.detect_after = secs;
        self
    }

    fn polygon(&self) -> Vec<Vec2> {
        let h = self.half_extents;
        vec![
            Vec2::new(-h.x, -h.y),
            Vec2::new(h.x, -h.y),
            Vec2::new(h.x, h.y),
            Vec2::new(-h.x, h.y),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct SimulatedSurfaces {
    layout: Vec<PlaneLayout>,
    detected: Vec<bool>,
    tracked: Vec<Surface>,
    scan_time: f32,
    detection_enabled: bool,
    changed: bool,
    next_id: u64,
    viewport: Vec2,
    pixels_per_meter: f32,
    camera_height: f32,
}

impl SimulatedSurfaces {
    pub const DEFAULT_VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

    pub fn new(layout: Vec<PlaneLayout>) -> Self {
        let detected = vec![false; layout.len()];
        Self {
            layout,
            detected,
            tracked: Vec::new(),
            scan_time: 0.0,
            detection_enabled: true,
            changed: false,
            next_id: 1,
            viewport: Self::DEFAULT_VIEWPORT,
            pixels_per_meter: 200.0,
            camera_height: 1.6,
        }
    }

    /// A floor with a low table on it.
    pub fn living_room() -> Self {
        Self::new(vec![
            PlaneLayout::new(Vec3::ZERO, Vec2::new(1.5, 1.0)).detected_after(1.0),
            PlaneLayout::new(Vec3::new(0.6, 0.3, 0.45), Vec2::new(0.4, 0.25)).detected_after(2.5),
        ])
    }

    pub fn with_viewport(mut self, viewport: Vec2, pixels_per_meter: f32) -> Self {
        self.viewport = viewport;
        self.pixels_per_meter = pixels_per_meter;
        self
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            (screen.x - self.viewport.x * 0.5) / self.pixels_per_meter,
            (self.viewport.y * 0.5 - screen.y) / self.pixels_per_meter,
        )
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(
            world.x * self.pixels_per_meter + self.viewport.x * 0.5,
            self.viewport.y * 0.5 - world.y * self.pixels_per_meter,
        )
    }

    fn detect(&mut self) {
        for (i, plane) in self.layout.iter().enumerate() {
            if self.detected[i] || plane.detect_after > self.scan_time {
                continue;
            }
            self.detected[i] = true;
            let id = SurfaceId(self.next_id);
            self.next_id += 1;
            debug!("tracking {id} at {}", plane.center);
            self.tracked.push(Surface {
                id,
                transform: Transform::from_translation(plane.center),
                polygon: plane.polygon(),
                active: true,
            });
            self.changed = true;
        }
    }
}

impl SurfaceProvider for SimulatedSurfaces {
    fn update(&mut self, dt: f32) {
        if !self.detection_enabled {
            return;
        }
        self.scan_time += dt.max(0.0);
        self.detect();
    }

    fn candidates(&self) -> Vec<SurfaceId> {
        self.tracked.iter().map(|s| s.id).collect()
    }

    fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    fn hit_test(&self, screen_point: Vec2) -> Vec<SurfaceHit> {
        let ray = self.screen_to_world(screen_point);
        let mut hits: Vec<SurfaceHit> = self
            .tracked
            .iter()
            .filter(|s| s.active)
            .filter_map(|s| {
                let point = ray.extend(s.center().z);
                s.contains_local(s.world_to_local(point)).then(|| SurfaceHit {
                    surface: s.id,
                    point,
                    distance: self.camera_height - point.z,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.tracked.iter().find(|s| s.id == id)
    }

    fn set_surface_active(&mut self, id: SurfaceId, active: bool) {
        if let Some(s) = self.tracked.iter_mut().find(|s| s.id == id) {
            s.active = active;
        }
    }

    fn set_detection_enabled(&mut self, enabled: bool) {
        self.detection_enabled = enabled;
    }

    fn detection_enabled(&self) -> bool {
        self.detection_enabled
    }

    fn reset(&mut self) {
        self.tracked.clear();
        self.detected.iter_mut().for_each(|d| *d = false);
        self.scan_time = 0.0;
        self.changed = false;
    }
}
