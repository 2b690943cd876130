use egui::{Pos2, Rect};
use log::{debug, warn};

use crate::error::SceneError;
use crate::object::{Background, ObjectId, VisualObject};

/// The full set of visual objects under edit, in paint order. Index 0
/// is always the background; everything above it is editable.
///
/// The scene reports nothing to the history manager itself — the
/// session snapshots it after each committed gesture, which keeps this
/// type freely constructible in tests.
#[derive(Debug, Clone)]
pub struct Scene {
    objects: Vec<VisualObject>,
    selected: Option<ObjectId>,
    background_ref: Option<String>,
}

/// A deep, value-equal copy of the scene's object list at one point in
/// time. Geometry and the structural lock flag ride along with each
/// variant; the background raster is shared by `Arc`, never copied.
#[derive(Debug, Clone)]
pub struct SceneSnapshot {
    objects: Vec<VisualObject>,
}

impl SceneSnapshot {
    pub fn objects(&self) -> &[VisualObject] {
        &self.objects
    }
}

impl Scene {
    pub fn new(background: Background, background_ref: Option<String>) -> Self {
        Self {
            objects: vec![VisualObject::Background(background)],
            selected: None,
            background_ref,
        }
    }

    /// Adds an object above everything else in paint order and returns
    /// its id. A background object is routed to index 0, replacing the
    /// current page, so the background invariant survives any input.
    pub fn add_object(&mut self, object: VisualObject) -> ObjectId {
        let id = object.id();
        if matches!(object, VisualObject::Background(_)) {
            debug!("replacing background via add_object");
            self.objects[0] = object;
        } else {
            self.objects.push(object);
        }
        id
    }

    /// Removes an object. Removing the background is a no-op: the page
    /// can only be replaced by loading a new image.
    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        if id == self.background().id() {
            warn!("ignoring attempt to remove the background image");
            return false;
        }
        let before = self.objects.len();
        self.objects.retain(|object| object.id() != id);
        let removed = self.objects.len() != before;
        if removed && self.selected == Some(id) {
            self.selected = None;
        }
        removed
    }

    /// Drops every editable object, keeping the background.
    pub fn clear(&mut self) {
        self.objects.truncate(1);
        self.selected = None;
    }

    /// Selects an editable object, or clears the selection with `None`.
    /// The background is not selectable.
    pub fn set_selection(&mut self, id: Option<ObjectId>) -> Result<(), SceneError> {
        match id {
            None => {
                self.selected = None;
                Ok(())
            }
            Some(id) => {
                let object = self.find(id).ok_or(SceneError::NotFound(id))?;
                if object.is_locked() {
                    return Err(SceneError::BackgroundLocked);
                }
                self.selected = Some(id);
                Ok(())
            }
        }
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    pub fn objects_in_paint_order(&self) -> &[VisualObject] {
        &self.objects
    }

    pub fn find(&self, id: ObjectId) -> Option<&VisualObject> {
        self.objects.iter().find(|object| object.id() == id)
    }

    pub fn find_mut(&mut self, id: ObjectId) -> Option<&mut VisualObject> {
        self.objects.iter_mut().find(|object| object.id() == id)
    }

    pub fn translate_object(&mut self, id: ObjectId, delta: egui::Vec2) -> Result<(), SceneError> {
        self.find_mut(id)
            .ok_or(SceneError::NotFound(id))?
            .translate(delta)
    }

    pub fn resize_object(&mut self, id: ObjectId, new_rect: Rect) -> Result<(), SceneError> {
        self.find_mut(id)
            .ok_or(SceneError::NotFound(id))?
            .resize(new_rect)
    }

    /// Top-most editable object under `pos`, in reverse paint order.
    pub fn hit_test_top(&self, pos: Pos2) -> Option<ObjectId> {
        self.objects
            .iter()
            .rev()
            .find(|object| !object.is_locked() && object.hit_test(pos))
            .map(|object| object.id())
    }

    pub fn background(&self) -> &Background {
        match self.objects.first() {
            Some(VisualObject::Background(bg)) => bg,
            // Every mutation path keeps the background at index 0.
            _ => unreachable!("scene invariant: background occupies index 0"),
        }
    }

    pub fn background_ref(&self) -> Option<&str> {
        self.background_ref.as_deref()
    }

    /// The page extent in scene coordinates; the canvas for export.
    pub fn canvas_rect(&self) -> Rect {
        self.background().rect()
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            objects: self.objects.clone(),
        }
    }

    /// Replaces the live object list with a deep copy of the snapshot.
    /// A selection pointing at an object that no longer exists is
    /// dropped rather than left dangling.
    pub fn restore(&mut self, snapshot: &SceneSnapshot) {
        self.objects = snapshot.objects.clone();
        if let Some(id) = self.selected {
            if self.find(id).is_none() {
                self.selected = None;
            }
        }
    }
}
