use egui::{Pos2, Rect};
use log::debug;

use super::{Corner, GestureOutcome, HANDLE_HIT_RADIUS, corner_at_point};
use crate::object::ObjectId;
use crate::scene::Scene;

/// Gesture state of the Select tool: hit-test on press, then either a
/// move drag or a corner-handle resize until release. The release
/// commits exactly one history entry if anything actually changed.
#[derive(Debug, Default)]
pub struct SelectState {
    gesture: SelectGesture,
}

#[derive(Debug, Default)]
enum SelectGesture {
    #[default]
    Idle,
    Moving {
        id: ObjectId,
        last: Pos2,
        moved: bool,
    },
    Resizing {
        id: ObjectId,
        anchor: Pos2,
        changed: bool,
    },
}

impl SelectState {
    pub(super) fn down(&mut self, pos: Pos2, zoom: f32, scene: &mut Scene) -> GestureOutcome {
        let radius = HANDLE_HIT_RADIUS / zoom.max(f32::EPSILON);

        // Handles of the already-selected object win over plain hits.
        if let Some(id) = scene.selected() {
            if let Some(object) = scene.find(id) {
                if let Some(corner) = corner_at_point(object.rect(), pos, radius) {
                    self.gesture = SelectGesture::Resizing {
                        id,
                        anchor: corner.opposite_point(object.rect()),
                        changed: false,
                    };
                    return GestureOutcome::InProgress;
                }
            }
        }

        match scene.hit_test_top(pos) {
            Some(id) => {
                if scene.set_selection(Some(id)).is_err() {
                    return GestureOutcome::Absorbed;
                }
                self.gesture = SelectGesture::Moving {
                    id,
                    last: pos,
                    moved: false,
                };
                GestureOutcome::InProgress
            }
            None => {
                // Click on empty space deselects.
                let _ = scene.set_selection(None);
                self.gesture = SelectGesture::Idle;
                GestureOutcome::Absorbed
            }
        }
    }

    pub(super) fn drag(&mut self, pos: Pos2, scene: &mut Scene) -> GestureOutcome {
        match &mut self.gesture {
            SelectGesture::Idle => GestureOutcome::Absorbed,
            SelectGesture::Moving { id, last, moved } => {
                let delta = pos - *last;
                if delta != egui::Vec2::ZERO {
                    if scene.translate_object(*id, delta).is_ok() {
                        *moved = true;
                    }
                    *last = pos;
                }
                GestureOutcome::InProgress
            }
            SelectGesture::Resizing { id, anchor, changed } => {
                let new_rect = Rect::from_two_pos(*anchor, pos);
                // Undersized previews are rejected by the scene and the
                // drag simply continues from the last valid rectangle.
                if scene.resize_object(*id, new_rect).is_ok() {
                    *changed = true;
                }
                GestureOutcome::InProgress
            }
        }
    }

    pub(super) fn up(&mut self) -> GestureOutcome {
        match std::mem::take(&mut self.gesture) {
            SelectGesture::Idle => GestureOutcome::Absorbed,
            SelectGesture::Moving { moved: true, .. }
            | SelectGesture::Resizing { changed: true, .. } => GestureOutcome::Committed,
            _ => {
                debug!("selection gesture released without movement");
                GestureOutcome::Absorbed
            }
        }
    }

    /// A corner used by the active resize, if one is in flight.
    pub fn active_resize(&self) -> Option<ObjectId> {
        match self.gesture {
            SelectGesture::Resizing { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Corner handle positions for a selected object, for host overlays.
pub fn handle_points(rect: Rect) -> [(Corner, Pos2); 4] {
    [
        (Corner::TopLeft, Corner::TopLeft.point(rect)),
        (Corner::TopRight, Corner::TopRight.point(rect)),
        (Corner::BottomLeft, Corner::BottomLeft.point(rect)),
        (Corner::BottomRight, Corner::BottomRight.point(rect)),
    ]
}
