use std::sync::Arc;

use egui::{Pos2, Rect, Vec2};
use image::RgbaImage;

use super::ObjectId;

/// The page raster every annotation sits on. Exactly one exists per
/// scene, always at the bottom of the paint order, and its geometry is
/// locked: it cannot be selected, moved, resized or rotated. A crop
/// gesture reads it but never mutates it.
#[derive(Clone)]
pub struct Background {
    id: ObjectId,
    raster: Arc<RgbaImage>,
    position: Pos2,
    scale: f32,
}

// Custom Debug: the raster is megabytes of pixel data.
impl std::fmt::Debug for Background {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Background")
            .field("id", &self.id)
            .field("raster", &(self.raster.width(), self.raster.height()))
            .field("position", &self.position)
            .field("scale", &self.scale)
            .finish()
    }
}

impl Background {
    pub fn new(raster: Arc<RgbaImage>, position: Pos2, scale: f32) -> Self {
        Self {
            id: ObjectId::new(),
            raster,
            position,
            scale,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The decoded page pixels. Shared (not copied) across history
    /// snapshots; immutable for the lifetime of the session.
    pub fn raster(&self) -> &Arc<RgbaImage> {
        &self.raster
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// The page rectangle in scene coordinates. This doubles as the
    /// canvas extent for raster export.
    pub fn rect(&self) -> Rect {
        let size = Vec2::new(
            self.raster.width() as f32 * self.scale,
            self.raster.height() as f32 * self.scale,
        );
        Rect::from_min_size(self.position, size)
    }
}
