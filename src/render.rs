use std::io::Cursor;

use ab_glyph::{Font, FontArc, ScaleFont};
use egui::{Color32, Pos2, Rect};
use image::{Rgba, RgbaImage, imageops};
use log::warn;

use crate::error::EngineError;
use crate::object::{FreehandPath, ShapeKind, ShapeObject, TextLabel, VisualObject};
use crate::scene::Scene;

/// Floor for the resolution multiplier; guards degenerate output sizes.
pub const MIN_MULTIPLIER: f32 = 0.01;

/// Default multiplier for "save" exports.
pub const DEFAULT_EXPORT_MULTIPLIER: f32 = 2.0;

/// An encoded raster handed to the host for persistence or download.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    /// PNG bytes.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Flattens the scene in paint order onto an offscreen surface sized
/// `canvas × multiplier`. Pure CPU compositing; the current viewport
/// zoom/pan plays no part here.
pub fn render_scene(scene: &Scene, multiplier: f32, font: Option<&FontArc>) -> RgbaImage {
    let canvas = scene.canvas_rect();
    let scale = multiplier.max(MIN_MULTIPLIER);
    let out_w = ((canvas.width() * scale).round() as u32).max(1);
    let out_h = ((canvas.height() * scale).round() as u32).max(1);

    let mut target = RgbaImage::new(out_w, out_h);

    for object in scene.objects_in_paint_order() {
        match object {
            VisualObject::Background(bg) => {
                let raster = bg.raster();
                if raster.width() == out_w && raster.height() == out_h {
                    imageops::replace(&mut target, raster.as_ref(), 0, 0);
                } else {
                    let resized =
                        imageops::resize(raster.as_ref(), out_w, out_h, imageops::FilterType::Triangle);
                    imageops::replace(&mut target, &resized, 0, 0);
                }
            }
            VisualObject::Path(path) => draw_path(&mut target, path, canvas, scale),
            VisualObject::Shape(shape) => draw_shape(&mut target, shape, canvas, scale),
            VisualObject::Label(label) => match font {
                Some(font) => draw_label(&mut target, label, canvas, scale, font),
                None => warn!("no font configured; skipping text label in raster export"),
            },
        }
    }

    target
}

/// Full-canvas export at `multiplier`, encoded as PNG.
pub fn export_raster(
    scene: &Scene,
    multiplier: f32,
    font: Option<&FontArc>,
) -> Result<ExportedImage, EngineError> {
    let composite = render_scene(scene, multiplier, font);
    let (width, height) = composite.dimensions();
    let data = encode_png(&composite)?;
    Ok(ExportedImage {
        data,
        width,
        height,
    })
}

pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, EngineError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .map_err(EngineError::Encode)?;
    Ok(buf.into_inner())
}

fn to_px(p: Pos2, canvas: Rect, scale: f32) -> (f32, f32) {
    ((p.x - canvas.min.x) * scale, (p.y - canvas.min.y) * scale)
}

/// Source-over blend of `color` at the given coverage into one pixel.
fn blend_px(img: &mut RgbaImage, x: i64, y: i64, color: Color32, coverage: f32) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    let alpha = (color.a() as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let dst = img.get_pixel_mut(x as u32, y as u32);
    let inv = 1.0 - alpha;
    let blend = |src: u8, dst: u8| -> u8 {
        (src as f32 * alpha + dst as f32 * inv).round().clamp(0.0, 255.0) as u8
    };
    let out_a = (alpha + dst.0[3] as f32 / 255.0 * inv) * 255.0;
    *dst = Rgba([
        blend(color.r(), dst.0[0]),
        blend(color.g(), dst.0[1]),
        blend(color.b(), dst.0[2]),
        out_a.round().clamp(0.0, 255.0) as u8,
    ]);
}

/// Anti-aliased filled disc; the brush stamp every stroke is built from.
fn fill_disc(img: &mut RgbaImage, cx: f32, cy: f32, radius: f32, color: Color32) {
    let r = radius.max(0.5);
    let min_x = (cx - r - 1.0).floor() as i64;
    let max_x = (cx + r + 1.0).ceil() as i64;
    let min_y = (cy - r - 1.0).floor() as i64;
    let max_y = (cy + r + 1.0).ceil() as i64;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            let coverage = (r - dist + 0.5).clamp(0.0, 1.0);
            if coverage > 0.0 {
                blend_px(img, x, y, color, coverage);
            }
        }
    }
}

/// Stamps discs along a segment at half-radius spacing.
fn draw_segment(img: &mut RgbaImage, a: (f32, f32), b: (f32, f32), width_px: f32, color: Color32) {
    let radius = (width_px * 0.5).max(0.5);
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let len = (dx * dx + dy * dy).sqrt();
    let steps = (len / (radius * 0.5).max(0.25)).ceil().max(1.0) as u32;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        fill_disc(img, a.0 + dx * t, a.1 + dy * t, radius, color);
    }
}

fn draw_path(img: &mut RgbaImage, path: &FreehandPath, canvas: Rect, scale: f32) {
    let width_px = path.width() * scale;
    let points = path.points();
    for window in points.windows(2) {
        draw_segment(
            img,
            to_px(window[0], canvas, scale),
            to_px(window[1], canvas, scale),
            width_px,
            path.color(),
        );
    }
}

fn draw_shape(img: &mut RgbaImage, shape: &ShapeObject, canvas: Rect, scale: f32) {
    let rect = shape.rect();
    let width_px = shape.stroke_width() * scale;
    let min = to_px(rect.min, canvas, scale);
    let max = to_px(rect.max, canvas, scale);

    match shape.kind() {
        ShapeKind::Rect => {
            if let Some(fill) = shape.fill() {
                fill_rect(img, min, max, fill);
            }
            let corners = [min, (max.0, min.1), max, (min.0, max.1)];
            for i in 0..4 {
                draw_segment(img, corners[i], corners[(i + 1) % 4], width_px, shape.stroke_color());
            }
        }
        ShapeKind::Circle => {
            let cx = (min.0 + max.0) * 0.5;
            let cy = (min.1 + max.1) * 0.5;
            let rx = ((max.0 - min.0) * 0.5).abs().max(0.5);
            let ry = ((max.1 - min.1) * 0.5).abs().max(0.5);
            if let Some(fill) = shape.fill() {
                fill_ellipse(img, cx, cy, rx, ry, fill);
            }
            draw_ellipse_outline(img, cx, cy, rx, ry, width_px, shape.stroke_color());
        }
        ShapeKind::Arrow => {
            draw_arrow(img, min, max, width_px, shape.stroke_color());
        }
    }
}

fn fill_rect(img: &mut RgbaImage, min: (f32, f32), max: (f32, f32), color: Color32) {
    let x0 = min.0.floor() as i64;
    let x1 = max.0.ceil() as i64;
    let y0 = min.1.floor() as i64;
    let y1 = max.1.ceil() as i64;
    for y in y0..y1 {
        for x in x0..x1 {
            blend_px(img, x, y, color, 1.0);
        }
    }
}

fn fill_ellipse(img: &mut RgbaImage, cx: f32, cy: f32, rx: f32, ry: f32, color: Color32) {
    let x0 = (cx - rx).floor() as i64;
    let x1 = (cx + rx).ceil() as i64;
    let y0 = (cy - ry).floor() as i64;
    let y1 = (cy + ry).ceil() as i64;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let nx = (x as f32 + 0.5 - cx) / rx;
            let ny = (y as f32 + 0.5 - cy) / ry;
            if nx * nx + ny * ny <= 1.0 {
                blend_px(img, x, y, color, 1.0);
            }
        }
    }
}

fn draw_ellipse_outline(
    img: &mut RgbaImage,
    cx: f32,
    cy: f32,
    rx: f32,
    ry: f32,
    width_px: f32,
    color: Color32,
) {
    let radius = (width_px * 0.5).max(0.5);
    let circumference = std::f32::consts::TAU * rx.max(ry);
    let steps = (circumference / (radius * 0.5).max(0.25)).ceil().max(8.0) as u32;
    for i in 0..steps {
        let t = i as f32 / steps as f32 * std::f32::consts::TAU;
        fill_disc(img, cx + rx * t.cos(), cy + ry * t.sin(), radius, color);
    }
}

/// Shaft plus two head strokes at ±30° from the tip.
fn draw_arrow(img: &mut RgbaImage, tail: (f32, f32), tip: (f32, f32), width_px: f32, color: Color32) {
    draw_segment(img, tail, tip, width_px, color);

    let dx = tip.0 - tail.0;
    let dy = tip.1 - tail.1;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON {
        return;
    }
    let head_len = (width_px * 4.0).max(10.0).min(len);
    let angle = dy.atan2(dx);
    for spread in [-0.5235988_f32, 0.5235988_f32] {
        let a = angle + std::f32::consts::PI + spread;
        let end = (tip.0 + head_len * a.cos(), tip.1 + head_len * a.sin());
        draw_segment(img, tip, end, width_px, color);
    }
}

/// Glyph walk with kerning, one line per `\n`, baseline stepping by the
/// scaled line height. Coverage from the outline rasterizer feeds the
/// same blend as every other mark.
fn draw_label(
    img: &mut RgbaImage,
    label: &TextLabel,
    canvas: Rect,
    scale: f32,
    font: &FontArc,
) {
    let px = label.font_size() * scale;
    let scaled = font.as_scaled(px);
    let origin = to_px(label.position(), canvas, scale);
    let mut baseline = origin.1 + scaled.ascent();

    for line in label.content().split('\n') {
        let mut caret = origin.0;
        let mut prev: Option<ab_glyph::GlyphId> = None;
        for ch in line.chars() {
            let gid = font.glyph_id(ch);
            if let Some(prev_id) = prev {
                caret += scaled.kern(prev_id, gid);
            }
            let glyph = gid.with_scale_and_position(px, ab_glyph::point(caret, baseline));
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    blend_px(
                        img,
                        (bounds.min.x + gx as f32).floor() as i64,
                        (bounds.min.y + gy as f32).floor() as i64,
                        label.color(),
                        coverage,
                    );
                });
            }
            caret += scaled.h_advance(gid);
            prev = Some(gid);
        }
        baseline += scaled.height();
    }
}
