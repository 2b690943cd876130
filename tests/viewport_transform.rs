use egui::{Pos2, Rect, Vec2};
use pagemark::{MAX_ZOOM, MIN_ZOOM, Viewport};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn approx_pos(a: Pos2, b: Pos2) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y)
}

#[test]
fn zoom_stays_clamped_for_any_delta_sequence() {
    let mut viewport = Viewport::new();
    viewport.set_surface_size(Vec2::new(800.0, 600.0));

    let deltas = [
        3.0, 10.0, -25.0, 0.05, -0.05, 100.0, -100.0, 0.3, 0.3, 0.3, -4.9, 7.7, -0.11,
    ];
    for delta in deltas {
        viewport.zoom_by(delta);
        assert!(
            (MIN_ZOOM..=MAX_ZOOM).contains(&viewport.zoom()),
            "zoom {} escaped the clamp",
            viewport.zoom()
        );
    }
}

#[test]
fn identity_transform_maps_screen_to_scene_directly() {
    let viewport = Viewport::new();
    let p = Pos2::new(123.0, 45.0);
    assert_eq!(viewport.screen_to_scene(p), p);
    assert_eq!(viewport.scene_to_screen(p), p);
}

#[test]
fn screen_and_scene_conversions_are_inverse() {
    let mut viewport = Viewport::new();
    viewport.set_surface_size(Vec2::new(640.0, 480.0));
    viewport.zoom_by(0.75);
    viewport.pan(Vec2::new(-130.0, 42.0));

    for p in [
        Pos2::ZERO,
        Pos2::new(10.0, 10.0),
        Pos2::new(-500.0, 333.3),
        Pos2::new(9999.0, -12.5),
    ] {
        let roundtrip = viewport.scene_to_screen(viewport.screen_to_scene(p));
        assert!(approx_pos(roundtrip, p), "{roundtrip:?} != {p:?}");
    }
}

#[test]
fn zoom_keeps_the_viewport_center_fixed() {
    let mut viewport = Viewport::new();
    viewport.set_surface_size(Vec2::new(800.0, 600.0));
    viewport.pan(Vec2::new(57.0, -23.0));

    let center = Pos2::new(400.0, 300.0);
    let anchor = viewport.screen_to_scene(center);
    viewport.zoom_by(1.5);

    assert!(approx_pos(viewport.screen_to_scene(center), anchor));
}

#[test]
fn pan_accumulates_without_bound() {
    let mut viewport = Viewport::new();
    for _ in 0..100 {
        viewport.pan(Vec2::new(1.0e4, -1.0e4));
    }
    assert_eq!(viewport.pan_offset(), Vec2::new(1.0e6, -1.0e6));
}

#[test]
fn reset_restores_the_identity_transform() {
    let mut viewport = Viewport::new();
    viewport.set_surface_size(Vec2::new(800.0, 600.0));
    viewport.zoom_by(2.0);
    viewport.pan(Vec2::new(40.0, 40.0));

    viewport.reset_zoom();

    assert_eq!(viewport.zoom(), 1.0);
    assert_eq!(viewport.pan_offset(), Vec2::ZERO);
}

#[test]
fn fit_centers_the_canvas_in_the_surface() {
    let mut viewport = Viewport::new();
    viewport.set_surface_size(Vec2::new(400.0, 400.0));
    let canvas = Rect::from_min_size(Pos2::ZERO, Vec2::new(200.0, 100.0));

    viewport.fit_to_surface(canvas);

    assert!(approx(viewport.zoom(), 2.0));
    assert!(approx_pos(
        viewport.scene_to_screen(canvas.center()),
        Pos2::new(200.0, 200.0)
    ));
}

#[test]
fn fit_without_a_surface_falls_back_to_identity() {
    let mut viewport = Viewport::new();
    viewport.fit_to_surface(Rect::from_min_size(Pos2::ZERO, Vec2::new(200.0, 100.0)));
    assert_eq!(viewport.zoom(), 1.0);
    assert_eq!(viewport.pan_offset(), Vec2::ZERO);
}
