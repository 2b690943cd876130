use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod background;
mod common;
mod path;
mod shape;
mod text;

pub use background::Background;
pub use common::MIN_OBJECT_SIZE;
pub use path::FreehandPath;
pub use shape::{ShapeKind, ShapeObject};
pub use text::TextLabel;

use crate::error::SceneError;

/// Stable identity of a scene object. The scene owns every object by
/// id; nothing holds a back-pointer to the scene, so deep copies and
/// serialization stay purely structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(Uuid);

impl ObjectId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Every object the scene can hold. The union is closed on purpose:
/// tool dispatch and serialization match on it exhaustively.
#[derive(Debug, Clone)]
pub enum VisualObject {
    Background(Background),
    Path(FreehandPath),
    Shape(ShapeObject),
    Label(TextLabel),
}

impl VisualObject {
    pub fn id(&self) -> ObjectId {
        match self {
            VisualObject::Background(bg) => bg.id(),
            VisualObject::Path(path) => path.id(),
            VisualObject::Shape(shape) => shape.id(),
            VisualObject::Label(label) => label.id(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            VisualObject::Background(_) => "background",
            VisualObject::Path(_) => "path",
            VisualObject::Shape(_) => "shape",
            VisualObject::Label(_) => "label",
        }
    }

    /// Geometry lock. Only the background carries it; locked objects
    /// reject `translate` and `resize` and are skipped by hit testing.
    pub fn is_locked(&self) -> bool {
        matches!(self, VisualObject::Background(_))
    }

    pub fn rect(&self) -> Rect {
        match self {
            VisualObject::Background(bg) => bg.rect(),
            VisualObject::Path(path) => path.rect(),
            VisualObject::Shape(shape) => shape.rect(),
            VisualObject::Label(label) => label.rect(),
        }
    }

    pub fn hit_test(&self, pos: Pos2) -> bool {
        match self {
            VisualObject::Background(_) => false,
            VisualObject::Path(path) => path.hit_test(pos),
            VisualObject::Shape(shape) => shape.hit_test(pos),
            VisualObject::Label(label) => label.hit_test(pos),
        }
    }

    pub fn translate(&mut self, delta: Vec2) -> Result<(), SceneError> {
        match self {
            VisualObject::Background(_) => Err(SceneError::BackgroundLocked),
            VisualObject::Path(path) => {
                path.translate(delta);
                Ok(())
            }
            VisualObject::Shape(shape) => {
                shape.translate(delta);
                Ok(())
            }
            VisualObject::Label(label) => {
                label.translate(delta);
                Ok(())
            }
        }
    }

    pub fn resize(&mut self, new_rect: Rect) -> Result<(), SceneError> {
        match self {
            VisualObject::Background(_) => Err(SceneError::BackgroundLocked),
            VisualObject::Path(path) => path.resize(new_rect),
            VisualObject::Shape(shape) => shape.resize(new_rect),
            VisualObject::Label(label) => label.resize(new_rect),
        }
    }
}
