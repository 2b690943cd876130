use thiserror::Error;

use crate::object::ObjectId;

/// Errors surfaced to the host by session-level operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The background image could not be decoded after the retry.
    #[error("background image failed to decode: {0}")]
    BackgroundDecode(#[from] image::ImageError),

    /// The host never attached a drawing surface within the retry budget.
    #[error("drawing surface not ready after {attempts} attempts")]
    SurfaceUnavailable { attempts: u32 },

    /// Raster encoding failed while exporting.
    #[error("failed to encode exported raster: {0}")]
    Encode(image::ImageError),

    /// An operation that needs a ready scene was called while loading.
    #[error("session is not ready (still loading or failed)")]
    NotReady,
}

/// Object-level rejections. These are absorbed by the tool controller
/// during gestures and only escalate through explicit scene calls.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("object {0} not found in the scene")]
    NotFound(ObjectId),

    #[error("the background image is geometry-locked")]
    BackgroundLocked,

    #[error("object dimensions are below the minimum size")]
    TooSmall,

    #[error("a freehand path needs at least two points")]
    DegeneratePath,
}
