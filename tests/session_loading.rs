use std::time::{Duration, Instant};

use egui::{Pos2, Vec2};
use image::{Rgba, RgbaImage};
use pagemark::loader::{DECODE_RETRY_DELAY, MAX_SURFACE_ATTEMPTS, SURFACE_RETRY_DELAY};
use pagemark::{
    EditorSession, EngineError, SceneSource, SessionConfig, SessionPhase, ToolKind,
};

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([250, 250, 250, 255]));
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn fresh(bytes: Vec<u8>) -> EditorSession {
    let _ = env_logger::builder().is_test(true).try_init();
    EditorSession::open(
        bytes,
        SceneSource::Fresh {
            background_ref: Some("page-1".to_string()),
        },
        SessionConfig::default(),
    )
}

#[test]
fn session_becomes_ready_after_decode_and_surface() {
    let mut session = fresh(png_bytes(200, 100));
    assert!(matches!(session.phase(), SessionPhase::Loading));

    session.attach_surface(Vec2::new(400.0, 300.0));
    session.poll(Instant::now());

    assert!(session.is_ready());
    assert!(!session.can_undo(), "loading establishes the undo floor");
    assert_eq!(session.tool_kind(), ToolKind::Select);
    let scene = session.scene().unwrap();
    assert_eq!(scene.objects_in_paint_order().len(), 1);
    assert_eq!(scene.background_ref(), Some("page-1"));
}

#[test]
fn undecodable_bytes_retry_once_then_fail_terminally() {
    let mut session = fresh(b"not an image at all".to_vec());
    session.attach_surface(Vec2::new(400.0, 300.0));

    let t0 = Instant::now();
    assert!(matches!(session.poll(t0), SessionPhase::Loading));

    // Still inside the retry delay: no second attempt yet.
    let early = t0 + Duration::from_millis(10);
    assert!(matches!(session.poll(early), SessionPhase::Loading));

    let after_retry = t0 + DECODE_RETRY_DELAY + Duration::from_millis(10);
    match session.poll(after_retry) {
        SessionPhase::Failed(EngineError::BackgroundDecode(_)) => {}
        phase => panic!("expected terminal decode failure, got {phase:?}"),
    }
}

#[test]
fn surface_that_never_attaches_exhausts_and_fails() {
    let mut session = fresh(png_bytes(200, 100));

    let t0 = Instant::now();
    let mut now = t0;
    for _ in 0..=MAX_SURFACE_ATTEMPTS {
        match session.poll(now) {
            SessionPhase::Loading => now += SURFACE_RETRY_DELAY + Duration::from_millis(5),
            SessionPhase::Failed(EngineError::SurfaceUnavailable { attempts }) => {
                assert_eq!(*attempts, MAX_SURFACE_ATTEMPTS);
                return;
            }
            phase => panic!("unexpected phase {phase:?}"),
        }
    }
    panic!("surface probe never exhausted");
}

#[test]
fn closing_during_an_inflight_load_abandons_silently() {
    let mut session = fresh(png_bytes(200, 100));
    session.close();

    // Late polls and events must not touch anything.
    assert!(matches!(
        session.poll(Instant::now()),
        SessionPhase::Closed
    ));
    session.attach_surface(Vec2::new(400.0, 300.0));
    session.pointer_down(Pos2::new(10.0, 10.0));
    session.pointer_up(Pos2::new(20.0, 20.0));

    assert!(session.scene().is_none());
    assert!(matches!(session.export_raster(), Err(EngineError::NotReady)));
}

#[test]
fn pointer_events_before_ready_are_dropped() {
    let mut session = fresh(png_bytes(200, 100));
    session.pointer_down(Pos2::new(10.0, 10.0));
    session.pointer_move(Pos2::new(30.0, 30.0));
    session.pointer_up(Pos2::new(30.0, 30.0));

    session.attach_surface(Vec2::new(200.0, 100.0));
    session.poll(Instant::now());
    assert!(session.is_ready());
    assert_eq!(session.scene().unwrap().objects_in_paint_order().len(), 1);
    assert!(!session.can_undo());
}

#[test]
fn reedit_reconstructs_the_saved_annotations() {
    // First session: annotate and serialize.
    let mut first = fresh(png_bytes(200, 100));
    first.attach_surface(Vec2::new(200.0, 100.0));
    first.poll(Instant::now());
    first.set_tool(ToolKind::Draw);
    first.pointer_down(Pos2::new(20.0, 20.0));
    first.pointer_move(Pos2::new(60.0, 40.0));
    first.pointer_up(Pos2::new(90.0, 60.0));
    let document = first.serialize().unwrap();
    first.close();

    // Second session: same raster bytes plus the stored document.
    let mut second = EditorSession::open(
        png_bytes(200, 100),
        SceneSource::Reedit { document },
        SessionConfig::default(),
    );
    second.attach_surface(Vec2::new(200.0, 100.0));
    second.poll(Instant::now());

    assert!(second.is_ready());
    let scene = second.scene().unwrap();
    assert_eq!(scene.objects_in_paint_order().len(), 2);
    assert_eq!(scene.objects_in_paint_order()[1].kind(), "path");
    assert!(!second.can_undo(), "re-edit starts a fresh undo floor");
}
