use egui::Pos2;
use pagemark::{CropAspect, CropRect};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn free_drag_spans_the_full_bounding_box() {
    let crop = CropRect::from_drag(
        Pos2::new(10.0, 10.0),
        Pos2::new(110.0, 60.0),
        CropAspect::Free,
    );
    assert!(approx(crop.rect.min.x, 10.0));
    assert!(approx(crop.rect.min.y, 10.0));
    assert!(approx(crop.rect.width(), 100.0));
    assert!(approx(crop.rect.height(), 50.0));
}

#[test]
fn square_constraint_shrinks_the_wider_axis() {
    let crop = CropRect::from_drag(
        Pos2::new(10.0, 10.0),
        Pos2::new(110.0, 60.0),
        CropAspect::of(1, 1),
    );
    // Width 100 vs height 50 at 1:1 — the width is recomputed to 50.
    assert!(approx(crop.rect.min.x, 10.0));
    assert!(approx(crop.rect.min.y, 10.0));
    assert!(approx(crop.rect.width(), 50.0));
    assert!(approx(crop.rect.height(), 50.0));
}

#[test]
fn square_constraint_shrinks_the_taller_axis() {
    let crop = CropRect::from_drag(
        Pos2::new(10.0, 10.0),
        Pos2::new(60.0, 110.0),
        CropAspect::of(1, 1),
    );
    assert!(approx(crop.rect.width(), 50.0));
    assert!(approx(crop.rect.height(), 50.0));
}

#[test]
fn constrained_rect_never_exceeds_the_free_bounding_box() {
    let start = Pos2::new(0.0, 0.0);
    let drags = [
        Pos2::new(300.0, 100.0),
        Pos2::new(100.0, 300.0),
        Pos2::new(-250.0, 80.0),
        Pos2::new(40.0, -90.0),
        Pos2::new(-33.0, -77.0),
    ];
    for current in drags {
        let free = CropRect::from_drag(start, current, CropAspect::Free);
        let locked = CropRect::from_drag(start, current, CropAspect::of(16, 9));
        assert!(locked.rect.width() <= free.rect.width() + 1e-3);
        assert!(locked.rect.height() <= free.rect.height() + 1e-3);
    }
}

#[test]
fn constrained_rect_holds_its_ratio() {
    let start = Pos2::new(20.0, 30.0);
    let ratio = 16.0 / 9.0;
    for current in [
        Pos2::new(420.0, 130.0),
        Pos2::new(-180.0, 130.0),
        Pos2::new(120.0, -270.0),
    ] {
        let crop = CropRect::from_drag(start, current, CropAspect::of(16, 9));
        assert!(
            approx(crop.rect.width() / crop.rect.height(), ratio),
            "ratio drifted: {} x {}",
            crop.rect.width(),
            crop.rect.height()
        );
    }
}

#[test]
fn drag_direction_does_not_matter() {
    let a = CropRect::from_drag(
        Pos2::new(110.0, 60.0),
        Pos2::new(10.0, 10.0),
        CropAspect::Free,
    );
    assert!(approx(a.rect.min.x, 10.0));
    assert!(approx(a.rect.min.y, 10.0));
    assert!(approx(a.rect.width(), 100.0));
    assert!(approx(a.rect.height(), 50.0));

    // Up-left under a constraint still anchors at the drag start.
    let b = CropRect::from_drag(
        Pos2::new(110.0, 60.0),
        Pos2::new(10.0, 10.0),
        CropAspect::of(1, 1),
    );
    assert!(approx(b.rect.width(), 50.0));
    assert!(approx(b.rect.height(), 50.0));
    assert!(approx(b.rect.max.x, 110.0));
    assert!(approx(b.rect.max.y, 60.0));
}

#[test]
fn zero_height_drag_is_guarded_under_a_constraint() {
    let crop = CropRect::from_drag(
        Pos2::new(10.0, 10.0),
        Pos2::new(50.0, 10.0),
        CropAspect::of(1, 1),
    );
    assert!(crop.is_zero_size());
    assert!(approx(crop.rect.width(), 0.0));
    assert!(approx(crop.rect.height(), 0.0));
}

#[test]
fn zero_drag_is_zero_size_in_free_mode_too() {
    let crop = CropRect::from_drag(Pos2::new(5.0, 5.0), Pos2::new(5.0, 5.0), CropAspect::Free);
    assert!(crop.is_zero_size());
}
