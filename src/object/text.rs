use egui::{Color32, Pos2, Rect, Vec2};

use super::{ObjectId, common};
use crate::error::SceneError;

/// Line height and average advance as a fraction of the font size.
/// Used only for hit testing and selection bounds; the compositor
/// measures real glyph metrics when it rasterizes.
const LINE_HEIGHT_FACTOR: f32 = 1.3;
const CHAR_WIDTH_FACTOR: f32 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    id: ObjectId,
    content: String,
    position: Pos2,
    font_size: f32,
    color: Color32,
}

impl TextLabel {
    pub fn new(content: String, position: Pos2, font_size: f32, color: Color32) -> Self {
        Self {
            id: ObjectId::new(),
            content,
            position,
            font_size: font_size.max(1.0),
            color,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    /// Estimated bounds from the line count and the longest line.
    pub fn rect(&self) -> Rect {
        let lines = self.content.split('\n');
        let mut line_count = 0usize;
        let mut longest = 0usize;
        for line in lines {
            line_count += 1;
            longest = longest.max(line.chars().count());
        }
        let width = (longest.max(1) as f32 * self.font_size * CHAR_WIDTH_FACTOR).max(8.0);
        let height = line_count.max(1) as f32 * self.font_size * LINE_HEIGHT_FACTOR;
        Rect::from_min_size(self.position, Vec2::new(width, height))
    }

    pub fn hit_test(&self, pos: Pos2) -> bool {
        self.rect().expand(2.0).contains(pos)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Re-anchors at the new min corner and scales the font with the
    /// height factor.
    pub fn resize(&mut self, new_rect: Rect) -> Result<(), SceneError> {
        common::validate_rect(&new_rect)?;
        let old = self.rect();
        if old.height() > 0.0 {
            self.font_size = (self.font_size * new_rect.height() / old.height()).max(1.0);
        }
        self.position = new_rect.min;
        Ok(())
    }
}
