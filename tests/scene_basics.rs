use std::sync::Arc;

use egui::{Color32, Pos2, Rect, Vec2};
use image::{Rgba, RgbaImage};
use pagemark::object::{Background, FreehandPath, ShapeKind, ShapeObject, TextLabel};
use pagemark::{Scene, SceneError, VisualObject};

fn test_scene() -> Scene {
    let raster = Arc::new(RgbaImage::from_pixel(200, 100, Rgba([255, 255, 255, 255])));
    Scene::new(
        Background::new(raster, Pos2::ZERO, 1.0),
        Some("page-1".to_string()),
    )
}

fn test_path(x: f32) -> VisualObject {
    let points = vec![Pos2::new(x, 10.0), Pos2::new(x + 20.0, 30.0)];
    VisualObject::Path(FreehandPath::new(points, Color32::RED, 3.0).unwrap())
}

fn test_shape(rect: Rect) -> VisualObject {
    VisualObject::Shape(ShapeObject::new(
        ShapeKind::Rect,
        rect,
        Color32::BLUE,
        2.0,
        None,
    ))
}

fn background_count(scene: &Scene) -> usize {
    scene
        .objects_in_paint_order()
        .iter()
        .filter(|object| matches!(object, VisualObject::Background(_)))
        .count()
}

#[test]
fn background_is_single_and_first_under_mutation() {
    let mut scene = test_scene();

    let a = scene.add_object(test_path(10.0));
    let b = scene.add_object(test_shape(Rect::from_min_size(
        Pos2::new(40.0, 40.0),
        Vec2::new(30.0, 20.0),
    )));
    scene.add_object(VisualObject::Label(TextLabel::new(
        "note".to_string(),
        Pos2::new(5.0, 5.0),
        18.0,
        Color32::BLACK,
    )));
    scene.remove_object(a);
    scene.remove_object(b);

    assert_eq!(background_count(&scene), 1);
    assert!(matches!(
        scene.objects_in_paint_order()[0],
        VisualObject::Background(_)
    ));
}

#[test]
fn adding_a_background_replaces_instead_of_stacking() {
    let mut scene = test_scene();
    let raster = Arc::new(RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 255])));
    scene.add_object(VisualObject::Background(Background::new(
        raster,
        Pos2::ZERO,
        1.0,
    )));

    assert_eq!(background_count(&scene), 1);
    assert!(matches!(
        scene.objects_in_paint_order()[0],
        VisualObject::Background(_)
    ));
    assert_eq!(scene.canvas_rect().width(), 64.0);
}

#[test]
fn removing_the_background_is_a_noop() {
    let mut scene = test_scene();
    let bg_id = scene.background().id();

    assert!(!scene.remove_object(bg_id));
    assert_eq!(scene.objects_in_paint_order().len(), 1);
}

#[test]
fn clear_keeps_only_the_background() {
    let mut scene = test_scene();
    scene.add_object(test_path(10.0));
    scene.add_object(test_path(50.0));

    scene.clear();

    assert_eq!(scene.objects_in_paint_order().len(), 1);
    assert_eq!(background_count(&scene), 1);
}

#[test]
fn objects_append_above_existing_ones() {
    let mut scene = test_scene();
    let first = scene.add_object(test_path(10.0));
    let second = scene.add_object(test_path(50.0));

    let order: Vec<_> = scene
        .objects_in_paint_order()
        .iter()
        .map(|object| object.id())
        .collect();
    assert_eq!(order[1], first);
    assert_eq!(order[2], second);
}

#[test]
fn background_is_not_selectable() {
    let mut scene = test_scene();
    let bg_id = scene.background().id();

    assert_eq!(
        scene.set_selection(Some(bg_id)),
        Err(SceneError::BackgroundLocked)
    );
    assert_eq!(scene.selected(), None);
}

#[test]
fn selecting_a_missing_object_fails() {
    let mut scene = test_scene();
    let mut other = test_scene();
    let foreign = other.add_object(test_path(10.0));

    assert!(matches!(
        scene.set_selection(Some(foreign)),
        Err(SceneError::NotFound(_))
    ));
}

#[test]
fn removing_the_selected_object_clears_selection() {
    let mut scene = test_scene();
    let id = scene.add_object(test_path(10.0));
    scene.set_selection(Some(id)).unwrap();

    assert!(scene.remove_object(id));
    assert_eq!(scene.selected(), None);
}

#[test]
fn hit_test_returns_the_topmost_object() {
    let mut scene = test_scene();
    let below = scene.add_object(test_shape(Rect::from_min_size(
        Pos2::new(10.0, 10.0),
        Vec2::new(50.0, 50.0),
    )));
    let above = scene.add_object(test_shape(Rect::from_min_size(
        Pos2::new(10.0, 10.0),
        Vec2::new(50.0, 50.0),
    )));

    assert_eq!(scene.hit_test_top(Pos2::new(30.0, 30.0)), Some(above));
    assert_ne!(scene.hit_test_top(Pos2::new(30.0, 30.0)), Some(below));
    // The background never hit-tests, even where nothing else is.
    assert_eq!(scene.hit_test_top(Pos2::new(150.0, 90.0)), None);
}

#[test]
fn background_geometry_is_locked() {
    let mut scene = test_scene();
    let bg_id = scene.background().id();

    assert_eq!(
        scene.translate_object(bg_id, Vec2::new(5.0, 5.0)),
        Err(SceneError::BackgroundLocked)
    );
    assert_eq!(
        scene.resize_object(
            bg_id,
            Rect::from_min_size(Pos2::ZERO, Vec2::new(50.0, 50.0))
        ),
        Err(SceneError::BackgroundLocked)
    );
}
