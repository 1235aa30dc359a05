use super::*;

fn room() -> SimulatedSurfaces {
    SimulatedSurfaces::new(vec![
        PlaneLayout::new(Vec3::ZERO, Vec2::new(1.0, 1.0)),
        PlaneLayout::new(Vec3::new(0.0, 0.0, 0.5), Vec2::new(0.25, 0.25)).detected_after(1.0),
    ])
}

#[test]
fn planes_are_detected_after_their_delay() {
    let mut surfaces = room();
    assert!(surfaces.candidates().is_empty());

    surfaces.update(0.0);
    assert_eq!(surfaces.candidates(), vec![SurfaceId(1)]);
    assert!(surfaces.take_changed());
    assert!(!surfaces.take_changed(), "notification is consumed");

    surfaces.update(1.0);
    assert_eq!(surfaces.candidates(), vec![SurfaceId(1), SurfaceId(2)]);
    assert!(surfaces.take_changed());
}

#[test]
fn disabled_detection_finds_nothing_new() {
    let mut surfaces = room();
    surfaces.set_detection_enabled(false);
    surfaces.update(5.0);
    assert!(surfaces.candidates().is_empty());
    assert!(!surfaces.take_changed());
}

#[test]
fn hit_test_orders_nearest_first_and_skips_inactive() {
    let mut surfaces = room();
    surfaces.update(1.0);
    let center = surfaces.world_to_screen(Vec2::ZERO);

    let hits = surfaces.hit_test(center);
    let ids: Vec<_> = hits.iter().map(|h| h.surface).collect();
    assert_eq!(ids, vec![SurfaceId(2), SurfaceId(1)], "the raised plane is nearer");

    surfaces.set_surface_active(SurfaceId(2), false);
    let hits = surfaces.hit_test(center);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].surface, SurfaceId(1));
}

#[test]
fn hit_test_outside_every_polygon_is_empty() {
    let mut surfaces = room();
    surfaces.update(1.0);
    let far = surfaces.world_to_screen(Vec2::new(3.0, 0.0));
    assert!(surfaces.hit_test(far).is_empty());
}

#[test]
fn reset_forgets_tracked_surfaces_and_rescans() {
    let mut surfaces = room();
    surfaces.update(1.0);
    surfaces.take_changed();

    surfaces.reset();
    assert!(surfaces.candidates().is_empty());

    surfaces.update(0.0);
    assert_eq!(surfaces.candidates().len(), 1);
    assert_eq!(surfaces.candidates()[0], SurfaceId(3), "ids are never reused");
}

#[test]
fn inner_radius_of_a_rectangle_is_its_short_half_extent() {
    let surface = Surface {
        id: SurfaceId(1),
        transform: Transform::default(),
        polygon: vec![
            Vec2::new(-2.0, -1.0),
            Vec2::new(2.0, -1.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(-2.0, 1.0),
        ],
        active: true,
    };
    assert!((surface.inner_radius() - 1.0).abs() < 1e-5);
    assert!(surface.contains_local(Vec2::new(1.9, 0.9)));
    assert!(!surface.contains_local(Vec2::new(2.1, 0.0)));
}
