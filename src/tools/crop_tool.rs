use egui::Pos2;
use log::debug;

use super::{GestureOutcome, HANDLE_HIT_RADIUS, corner_at_point};
use crate::crop::{CropAspect, CropRect};

/// Crop-mode gesture state. The rectangle it owns is transient: it
/// never enters the scene, history, or serialized documents, and it is
/// dropped structurally when the controller switches tools.
///
/// A press inside an existing rectangle defers to the rectangle's own
/// handles — corners resize (anchored on the opposite corner), the
/// interior moves. A press outside starts a new rectangle under the
/// currently selected aspect constraint.
#[derive(Debug, Default)]
pub struct CropTool {
    rect: Option<CropRect>,
    phase: CropPhase,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
enum CropPhase {
    #[default]
    Idle,
    Dragging {
        start: Pos2,
    },
    MovingRect {
        last: Pos2,
    },
    Resizing {
        anchor: Pos2,
    },
    /// Finalized rectangle waiting for a commit; the tool stays Crop.
    Ready,
}

impl CropTool {
    pub(super) fn down(&mut self, pos: Pos2, zoom: f32, aspect: CropAspect) -> GestureOutcome {
        if let Some(crop) = self.rect {
            let radius = HANDLE_HIT_RADIUS / zoom.max(f32::EPSILON);
            if let Some(corner) = corner_at_point(crop.rect, pos, radius) {
                self.phase = CropPhase::Resizing {
                    anchor: corner.opposite_point(crop.rect),
                };
                return GestureOutcome::InProgress;
            }
            if crop.rect.contains(pos) {
                self.phase = CropPhase::MovingRect { last: pos };
                return GestureOutcome::InProgress;
            }
        }

        self.rect = Some(CropRect::from_drag(pos, pos, aspect));
        self.phase = CropPhase::Dragging { start: pos };
        GestureOutcome::InProgress
    }

    pub(super) fn drag(&mut self, pos: Pos2) -> GestureOutcome {
        match self.phase {
            CropPhase::Idle | CropPhase::Ready => GestureOutcome::Absorbed,
            CropPhase::Dragging { start } => {
                let aspect = self.rect.map_or(CropAspect::Free, |crop| crop.aspect);
                self.rect = Some(CropRect::from_drag(start, pos, aspect));
                GestureOutcome::InProgress
            }
            CropPhase::Resizing { anchor } => {
                let aspect = self.rect.map_or(CropAspect::Free, |crop| crop.aspect);
                self.rect = Some(CropRect::from_drag(anchor, pos, aspect));
                GestureOutcome::InProgress
            }
            CropPhase::MovingRect { last } => {
                if let Some(crop) = &mut self.rect {
                    crop.translate(pos - last);
                }
                self.phase = CropPhase::MovingRect { last: pos };
                GestureOutcome::InProgress
            }
        }
    }

    /// Finalizes the gesture. The rectangle is kept on screen in the
    /// Ready sub-state; a crop is only produced when the session
    /// commits it. Never a history entry.
    pub(super) fn up(&mut self) -> GestureOutcome {
        match self.phase {
            CropPhase::Idle | CropPhase::Ready => GestureOutcome::Absorbed,
            _ => {
                if self.rect.is_some_and(|crop| crop.is_zero_size()) {
                    debug!("discarding zero-size crop rectangle");
                    self.rect = None;
                    self.phase = CropPhase::Idle;
                } else {
                    self.phase = CropPhase::Ready;
                }
                GestureOutcome::Absorbed
            }
        }
    }

    pub(super) fn rect(&self) -> Option<&CropRect> {
        self.rect.as_ref()
    }

    pub(super) fn take_ready(&mut self) -> Option<CropRect> {
        if self.phase == CropPhase::Ready {
            self.phase = CropPhase::Idle;
            self.rect.take()
        } else {
            None
        }
    }
}
