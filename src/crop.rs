use egui::{Pos2, Rect, Vec2};
use log::debug;

use crate::error::EngineError;
use crate::render::{self, ExportedImage};
use crate::scene::Scene;

/// Aspect constraint applied while a crop rectangle is dragged or
/// resized. `Fixed` carries the target width/height ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CropAspect {
    Free,
    Fixed(f32),
}

impl CropAspect {
    /// A fixed constraint from an integral ratio pair, e.g. `of(16, 9)`.
    pub fn of(width: u32, height: u32) -> Self {
        CropAspect::Fixed(width.max(1) as f32 / height.max(1) as f32)
    }
}

/// The transient crop rectangle. Owned by the Crop tool while it is
/// active; never part of the scene, never serialized, never
/// snapshotted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub rect: Rect,
    pub aspect: CropAspect,
}

impl CropRect {
    /// Builds the rectangle spanned by a drag from `start` to
    /// `current`.
    ///
    /// Under a fixed ratio the shorter relative drag axis wins: the
    /// longer axis is recomputed toward the ratio, so the constrained
    /// rectangle never exceeds the free bounding box on either axis.
    /// A zero-height drag is guarded (zero-size rectangle, no
    /// division).
    pub fn from_drag(start: Pos2, current: Pos2, aspect: CropAspect) -> Self {
        let mut w = current.x - start.x;
        let mut h = current.y - start.y;

        if let CropAspect::Fixed(ratio) = aspect {
            if ratio > 0.0 {
                if h == 0.0 {
                    w = 0.0;
                } else if w.abs() / h.abs() > ratio {
                    w = h.abs() * ratio * w.signum();
                } else {
                    h = w.abs() / ratio * h.signum();
                }
            }
        }

        let min = Pos2::new(start.x.min(start.x + w), start.y.min(start.y + h));
        Self {
            rect: Rect::from_min_size(min, Vec2::new(w.abs(), h.abs())),
            aspect,
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.rect = self.rect.translate(delta);
    }

    pub fn is_zero_size(&self) -> bool {
        self.rect.width() <= 0.0 || self.rect.height() <= 0.0
    }
}

/// Rasterizes the region of the full-resolution composite covered by
/// `crop`, at `multiplier` times the rectangle's scene size.
///
/// The crop is always cut from a fresh full render, never from the
/// (possibly zoomed-out) screen image, so output quality does not
/// depend on the current zoom. A zero-size or fully out-of-canvas
/// rectangle produces `Ok(None)`.
pub fn crop_and_export(
    scene: &Scene,
    crop: &CropRect,
    multiplier: f32,
    font: Option<&ab_glyph::FontArc>,
) -> Result<Option<ExportedImage>, EngineError> {
    if crop.is_zero_size() {
        debug!("ignoring zero-size crop commit");
        return Ok(None);
    }

    let canvas = scene.canvas_rect();
    let composite = render::render_scene(scene, multiplier, font);

    // Intersect with the canvas in pixel space.
    let scale = multiplier.max(render::MIN_MULTIPLIER);
    let clamp_x = |v: f32| ((v - canvas.min.x) * scale).round().clamp(0.0, composite.width() as f32);
    let clamp_y = |v: f32| ((v - canvas.min.y) * scale).round().clamp(0.0, composite.height() as f32);
    let left = clamp_x(crop.rect.min.x) as u32;
    let top = clamp_y(crop.rect.min.y) as u32;
    let right = clamp_x(crop.rect.max.x) as u32;
    let bottom = clamp_y(crop.rect.max.y) as u32;
    if right <= left || bottom <= top {
        debug!("ignoring crop with no canvas overlap");
        return Ok(None);
    }
    let (width, height) = (right - left, bottom - top);

    let region = image::imageops::crop_imm(&composite, left, top, width, height).to_image();
    let data = render::encode_png(&region)?;
    Ok(Some(ExportedImage {
        data,
        width,
        height,
    }))
}
