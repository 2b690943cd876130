use egui::{Color32, Pos2, Rect};
use log::debug;

mod crop_tool;
mod draw;
mod select;

pub use crop_tool::CropTool;
pub use draw::DrawState;
pub use select::{SelectState, handle_points};

use crate::crop::{CropAspect, CropRect};
use crate::render::DEFAULT_EXPORT_MULTIPLIER;
use crate::scene::Scene;
use crate::viewport::Viewport;

/// Screen-space hit radius for corner handles, divided by the zoom so
/// grabbing a handle feels the same at every magnification.
pub(crate) const HANDLE_HIT_RADIUS: f32 = 8.0;

/// A corner of a selection or crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn point(self, rect: Rect) -> Pos2 {
        match self {
            Corner::TopLeft => rect.min,
            Corner::TopRight => Pos2::new(rect.max.x, rect.min.y),
            Corner::BottomLeft => Pos2::new(rect.min.x, rect.max.y),
            Corner::BottomRight => rect.max,
        }
    }

    /// The fixed anchor while this corner is being dragged.
    pub fn opposite_point(self, rect: Rect) -> Pos2 {
        match self {
            Corner::TopLeft => rect.max,
            Corner::TopRight => Pos2::new(rect.min.x, rect.max.y),
            Corner::BottomLeft => Pos2::new(rect.max.x, rect.min.y),
            Corner::BottomRight => rect.min,
        }
    }
}

/// The corner of `rect` within `radius` of `pos`, if any.
pub(crate) fn corner_at_point(rect: Rect, pos: Pos2, radius: f32) -> Option<Corner> {
    Corner::ALL.into_iter().find(|corner| {
        let point = corner.point(rect);
        (pos.x - point.x).abs() <= radius && (pos.y - point.y).abs() <= radius
    })
}

/// Style inputs the host feeds the engine; consumed by gestures and
/// immediate insertions.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSettings {
    pub stroke_color: Color32,
    pub stroke_width: f32,
    /// "Background-matching" color used by the Erase tool. The page is
    /// arbitrary raster imagery, so this is a setting, not a lookup.
    pub erase_color: Color32,
    pub fill: Option<Color32>,
    pub font_size: f32,
    pub crop_aspect: CropAspect,
    pub export_multiplier: f32,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            stroke_color: Color32::BLACK,
            stroke_width: 3.0,
            erase_color: Color32::WHITE,
            fill: None,
            font_size: 24.0,
            crop_aspect: CropAspect::Free,
            export_multiplier: DEFAULT_EXPORT_MULTIPLIER,
        }
    }
}

/// Host-facing tool identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Select,
    Draw,
    Erase,
    Pan,
    Crop,
}

/// What a routed pointer event did to the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Nothing to do (orphan or duplicate event, empty gesture).
    Absorbed,
    /// The gesture continues; no history entry yet.
    InProgress,
    /// A mutation was finalized; the session must snapshot now.
    Committed,
}

/// Everything a gesture may touch, borrowed for the duration of one
/// pointer event. Passing this explicitly (instead of tools reaching
/// into shared state) keeps engines independently instantiable.
pub struct EditCtx<'a> {
    pub scene: &'a mut Scene,
    pub viewport: &'a mut Viewport,
    pub style: &'a StyleSettings,
}

#[derive(Debug)]
enum ToolState {
    Select(SelectState),
    Draw(DrawState),
    Erase(DrawState),
    Pan(PanState),
    Crop(CropTool),
}

#[derive(Debug, Default)]
struct PanState {
    last: Option<Pos2>,
}

/// Finite-state selector of the active editing mode. Exactly one mode
/// is active; its transient gesture state lives inside the variant, so
/// switching tools structurally drops whatever was in flight.
#[derive(Debug)]
pub struct ToolController {
    state: ToolState,
}

impl Default for ToolController {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolController {
    pub fn new() -> Self {
        Self {
            state: ToolState::Select(SelectState::default()),
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self.state {
            ToolState::Select(_) => ToolKind::Select,
            ToolState::Draw(_) => ToolKind::Draw,
            ToolState::Erase(_) => ToolKind::Erase,
            ToolState::Pan(_) => ToolKind::Pan,
            ToolState::Crop(_) => ToolKind::Crop,
        }
    }

    /// Activates a tool. Re-selecting the active tool keeps its state
    /// (a Crop→Crop switch keeps the rectangle); any real switch starts
    /// from a fresh state and discards an in-progress crop rectangle.
    pub fn set_tool(&mut self, kind: ToolKind) {
        if kind == self.kind() {
            return;
        }
        debug!("tool change: {:?} -> {:?}", self.kind(), kind);
        self.state = match kind {
            ToolKind::Select => ToolState::Select(SelectState::default()),
            ToolKind::Draw => ToolState::Draw(DrawState::default()),
            ToolKind::Erase => ToolState::Erase(DrawState::default()),
            ToolKind::Pan => ToolState::Pan(PanState::default()),
            ToolKind::Crop => ToolState::Crop(CropTool::default()),
        };
    }

    pub fn pointer_down(&mut self, screen: Pos2, ctx: &mut EditCtx<'_>) -> GestureOutcome {
        let scene_pos = ctx.viewport.screen_to_scene(screen);
        match &mut self.state {
            ToolState::Select(state) => state.down(scene_pos, ctx.viewport.zoom(), ctx.scene),
            ToolState::Draw(state) | ToolState::Erase(state) => state.down(scene_pos),
            ToolState::Pan(state) => {
                state.last = Some(screen);
                GestureOutcome::InProgress
            }
            ToolState::Crop(state) => {
                state.down(scene_pos, ctx.viewport.zoom(), ctx.style.crop_aspect)
            }
        }
    }

    pub fn pointer_move(&mut self, screen: Pos2, ctx: &mut EditCtx<'_>) -> GestureOutcome {
        let scene_pos = ctx.viewport.screen_to_scene(screen);
        match &mut self.state {
            ToolState::Select(state) => state.drag(scene_pos, ctx.scene),
            ToolState::Draw(state) | ToolState::Erase(state) => state.drag(scene_pos),
            ToolState::Pan(state) => match state.last {
                Some(last) => {
                    ctx.viewport.pan(screen - last);
                    state.last = Some(screen);
                    GestureOutcome::InProgress
                }
                None => GestureOutcome::Absorbed,
            },
            ToolState::Crop(state) => state.drag(scene_pos),
        }
    }

    pub fn pointer_up(&mut self, screen: Pos2, ctx: &mut EditCtx<'_>) -> GestureOutcome {
        let scene_pos = ctx.viewport.screen_to_scene(screen);
        match &mut self.state {
            ToolState::Select(state) => state.up(),
            ToolState::Draw(state) => state.up(scene_pos, ctx, false),
            ToolState::Erase(state) => state.up(scene_pos, ctx, true),
            ToolState::Pan(state) => {
                // Viewport changes are not part of history: never commit.
                state.last = None;
                GestureOutcome::Absorbed
            }
            ToolState::Crop(state) => state.up(),
        }
    }

    /// The crop rectangle currently on screen, for host overlays.
    pub fn crop_rect(&self) -> Option<&CropRect> {
        match &self.state {
            ToolState::Crop(state) => state.rect(),
            _ => None,
        }
    }

    /// Takes a finalized crop rectangle, leaving the tool in Crop mode
    /// with no rectangle. `None` while a drag is still in flight.
    pub fn take_ready_crop(&mut self) -> Option<CropRect> {
        match &mut self.state {
            ToolState::Crop(state) => state.take_ready(),
            _ => None,
        }
    }

    /// Drops the current crop rectangle without leaving Crop mode
    /// (used when the aspect constraint changes under it).
    pub fn discard_crop_rect(&mut self) {
        if let ToolState::Crop(state) = &mut self.state {
            *state = CropTool::default();
        }
    }

    /// Points of the stroke currently being drawn, for live preview.
    pub fn preview_points(&self) -> Option<&[Pos2]> {
        match &self.state {
            ToolState::Draw(state) | ToolState::Erase(state) => state.preview_points(),
            _ => None,
        }
    }
}
