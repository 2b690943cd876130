use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::{ObjectId, common};
use crate::error::SceneError;

/// Geometric primitives insertable as immediate actions. An arrow runs
/// from the top-left to the bottom-right of its rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    Circle,
    Arrow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeObject {
    id: ObjectId,
    kind: ShapeKind,
    rect: Rect,
    stroke_color: Color32,
    stroke_width: f32,
    fill: Option<Color32>,
}

impl ShapeObject {
    pub fn new(
        kind: ShapeKind,
        rect: Rect,
        stroke_color: Color32,
        stroke_width: f32,
        fill: Option<Color32>,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            kind,
            rect,
            stroke_color,
            stroke_width,
            fill,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn stroke_color(&self) -> Color32 {
        self.stroke_color
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn fill(&self) -> Option<Color32> {
        self.fill
    }

    pub fn hit_test(&self, pos: Pos2) -> bool {
        self.rect.expand(self.stroke_width / 2.0 + 2.0).contains(pos)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.rect = self.rect.translate(delta);
    }

    pub fn resize(&mut self, new_rect: Rect) -> Result<(), SceneError> {
        common::validate_rect(&new_rect)?;
        self.rect = new_rect;
        Ok(())
    }
}
