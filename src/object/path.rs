use egui::{Color32, Pos2, Rect, Vec2};

use super::{ObjectId, common};
use crate::error::SceneError;

/// A freehand polyline produced by the Draw and Erase tools. Erase
/// strokes are ordinary paths with a background-matching color at
/// doubled width, not pixel deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct FreehandPath {
    id: ObjectId,
    points: Vec<Pos2>,
    color: Color32,
    width: f32,
}

impl FreehandPath {
    /// Builds a path from a completed gesture. Fewer than two points
    /// cannot form a visible stroke and are rejected.
    pub fn new(points: Vec<Pos2>, color: Color32, width: f32) -> Result<Self, SceneError> {
        if points.len() < 2 {
            return Err(SceneError::DegeneratePath);
        }
        Ok(Self {
            id: ObjectId::new(),
            points,
            color,
            width,
        })
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn rect(&self) -> Rect {
        common::calculate_bounds(&self.points, self.width / 2.0)
    }

    pub fn hit_test(&self, pos: Pos2) -> bool {
        for window in self.points.windows(2) {
            let distance = common::distance_to_line_segment(pos, window[0], window[1]);
            if distance <= (self.width / 2.0).max(2.0) {
                return true;
            }
        }
        false
    }

    pub fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }

    /// Maps every point into `new_rect` and scales the stroke width by
    /// the mean axis factor.
    pub fn resize(&mut self, new_rect: Rect) -> Result<(), SceneError> {
        common::validate_rect(&new_rect)?;

        let old_rect = self.rect();
        if old_rect.width() <= 0.0 || old_rect.height() <= 0.0 {
            return Err(SceneError::TooSmall);
        }

        let scale_x = new_rect.width() / old_rect.width();
        let scale_y = new_rect.height() / old_rect.height();

        for point in &mut self.points {
            let relative_x = (point.x - old_rect.min.x) / old_rect.width();
            let relative_y = (point.y - old_rect.min.y) / old_rect.height();
            point.x = new_rect.min.x + relative_x * new_rect.width();
            point.y = new_rect.min.y + relative_y * new_rect.height();
        }
        self.width *= (scale_x + scale_y) / 2.0;
        Ok(())
    }
}
