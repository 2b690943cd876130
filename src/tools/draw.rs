use egui::Pos2;
use log::debug;

use super::{EditCtx, GestureOutcome};
use crate::object::{FreehandPath, VisualObject};

/// Shared gesture buffer for the Draw and Erase tools: points
/// accumulate from press to release, and the release turns them into
/// one `FreehandPath` (and exactly one history entry). Erase differs
/// only in style — the erase color at doubled width.
#[derive(Debug, Default)]
pub struct DrawState {
    points: Option<Vec<Pos2>>,
}

impl DrawState {
    pub(super) fn down(&mut self, pos: Pos2) -> GestureOutcome {
        self.points = Some(vec![pos]);
        GestureOutcome::InProgress
    }

    pub(super) fn drag(&mut self, pos: Pos2) -> GestureOutcome {
        match &mut self.points {
            Some(points) => {
                if points.last() != Some(&pos) {
                    points.push(pos);
                }
                GestureOutcome::InProgress
            }
            // Move without a press: duplicate or out-of-order event.
            None => GestureOutcome::Absorbed,
        }
    }

    pub(super) fn up(&mut self, pos: Pos2, ctx: &mut EditCtx<'_>, erase: bool) -> GestureOutcome {
        let Some(mut points) = self.points.take() else {
            return GestureOutcome::Absorbed;
        };
        if points.last() != Some(&pos) {
            points.push(pos);
        }

        let (color, width) = if erase {
            (ctx.style.erase_color, ctx.style.stroke_width * 2.0)
        } else {
            (ctx.style.stroke_color, ctx.style.stroke_width)
        };

        match FreehandPath::new(points, color, width) {
            Ok(path) => {
                ctx.scene.add_object(VisualObject::Path(path));
                GestureOutcome::Committed
            }
            Err(_) => {
                // A click with no movement draws nothing.
                debug!("discarding degenerate {} gesture", if erase { "erase" } else { "draw" });
                GestureOutcome::Absorbed
            }
        }
    }

    pub(super) fn preview_points(&self) -> Option<&[Pos2]> {
        self.points.as_deref()
    }
}
