use std::sync::Arc;

use egui::{Color32, Pos2, Rect};
use image::RgbaImage;
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::object::{Background, FreehandPath, ShapeKind, ShapeObject, TextLabel, VisualObject};
use crate::scene::Scene;

/// Errors from encoding or decoding a scene document.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to encode scene document: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The portable, JSON-compatible form of a scene: one record per
/// object plus the reference to the stored background raster. Handed
/// to the persistence collaborator and consumed again on re-edit.
///
/// Transient crop state has no record type — it can never round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    pub objects: Vec<ObjectRecord>,
    pub background_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ObjectRecord {
    Background {
        position: Pos2,
        scale: f32,
        z_index: usize,
    },
    Path {
        points: Vec<Pos2>,
        color: Color32,
        width: f32,
        z_index: usize,
    },
    Shape {
        kind: ShapeKind,
        rect: Rect,
        stroke_color: Color32,
        stroke_width: f32,
        fill: Option<Color32>,
        z_index: usize,
    },
    Label {
        content: String,
        position: Pos2,
        font_size: f32,
        color: Color32,
        z_index: usize,
    },
}

impl SceneDocument {
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Serializes the scene into its portable document. Paint order is
/// recorded as `z_index`, so a reordered or hand-edited document still
/// reconstructs deterministically.
pub fn document_from_scene(scene: &Scene) -> SceneDocument {
    let objects = scene
        .objects_in_paint_order()
        .iter()
        .enumerate()
        .map(|(z_index, object)| match object {
            VisualObject::Background(bg) => ObjectRecord::Background {
                position: bg.position(),
                scale: bg.scale(),
                z_index,
            },
            VisualObject::Path(path) => ObjectRecord::Path {
                points: path.points().to_vec(),
                color: path.color(),
                width: path.width(),
                z_index,
            },
            VisualObject::Shape(shape) => ObjectRecord::Shape {
                kind: shape.kind(),
                rect: shape.rect(),
                stroke_color: shape.stroke_color(),
                stroke_width: shape.stroke_width(),
                fill: shape.fill(),
                z_index,
            },
            VisualObject::Label(label) => ObjectRecord::Label {
                content: label.content().to_string(),
                position: label.position(),
                font_size: label.font_size(),
                color: label.color(),
                z_index,
            },
        })
        .collect();

    SceneDocument {
        objects,
        background_ref: scene.background_ref().map(str::to_string),
    }
}

/// Reconstructs a scene from a document and the re-fetched background
/// raster. Defensive against malformed input: the background lands at
/// index 0 regardless of where the document put it, and a document with
/// no usable background reference or record falls back to a fresh
/// scene (recoverable anomaly, not an error).
pub fn scene_from_document(doc: &SceneDocument, raster: Arc<RgbaImage>) -> Scene {
    let background_record = doc.objects.iter().find_map(|record| match record {
        ObjectRecord::Background { position, scale, .. } => Some((*position, *scale)),
        _ => None,
    });

    let (position, scale) = match (doc.background_ref.as_ref(), background_record) {
        (Some(_), Some(placement)) => placement,
        _ => {
            warn!("scene document has no usable background reference; starting fresh");
            let background = Background::new(raster, Pos2::ZERO, 1.0);
            return Scene::new(background, doc.background_ref.clone());
        }
    };

    let background = Background::new(raster, position, scale);
    let mut scene = Scene::new(background, doc.background_ref.clone());

    let mut records: Vec<&ObjectRecord> = doc
        .objects
        .iter()
        .filter(|record| !matches!(record, ObjectRecord::Background { .. }))
        .collect();
    records.sort_by_key(|record| record_z(record));

    for record in records {
        match record {
            ObjectRecord::Background { .. } => {}
            ObjectRecord::Path {
                points,
                color,
                width,
                ..
            } => match FreehandPath::new(points.clone(), *color, *width) {
                Ok(path) => {
                    scene.add_object(VisualObject::Path(path));
                }
                Err(err) => warn!("skipping malformed path record: {err}"),
            },
            ObjectRecord::Shape {
                kind,
                rect,
                stroke_color,
                stroke_width,
                fill,
                ..
            } => {
                scene.add_object(VisualObject::Shape(ShapeObject::new(
                    *kind,
                    *rect,
                    *stroke_color,
                    *stroke_width,
                    *fill,
                )));
            }
            ObjectRecord::Label {
                content,
                position,
                font_size,
                color,
                ..
            } => {
                scene.add_object(VisualObject::Label(TextLabel::new(
                    content.clone(),
                    *position,
                    *font_size,
                    *color,
                )));
            }
        }
    }

    scene
}

fn record_z(record: &ObjectRecord) -> usize {
    match record {
        ObjectRecord::Background { z_index, .. }
        | ObjectRecord::Path { z_index, .. }
        | ObjectRecord::Shape { z_index, .. }
        | ObjectRecord::Label { z_index, .. } => *z_index,
    }
}
