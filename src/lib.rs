#![warn(clippy::all, rust_2018_idioms)]

pub mod crop;
pub mod error;
pub mod history;
pub mod loader;
pub mod object;
pub mod persistence;
pub mod render;
pub mod scene;
pub mod session;
pub mod tools;
pub mod viewport;

pub use crop::{CropAspect, CropRect};
pub use error::{EngineError, SceneError};
pub use history::History;
pub use object::{Background, FreehandPath, ObjectId, ShapeKind, ShapeObject, TextLabel, VisualObject};
pub use persistence::{ObjectRecord, SceneDocument};
pub use render::ExportedImage;
pub use scene::{Scene, SceneSnapshot};
pub use session::{EditorSession, SceneSource, SessionConfig, SessionPhase};
pub use tools::{GestureOutcome, StyleSettings, ToolController, ToolKind};
pub use viewport::{MAX_ZOOM, MIN_ZOOM, Viewport};
