use std::sync::Arc;
use std::time::Instant;

use ab_glyph::FontArc;
use egui::{Pos2, Rect, Vec2};
use image::RgbaImage;
use log::{debug, info, warn};

use crate::crop::{self, CropAspect, CropRect};
use crate::error::EngineError;
use crate::history::History;
use crate::loader::{BackgroundLoader, LoadPoll, SurfacePoll, SurfaceProbe};
use crate::object::{Background, ObjectId, ShapeKind, ShapeObject, TextLabel, VisualObject};
use crate::persistence::{self, SceneDocument};
use crate::render::{self, ExportedImage};
use crate::scene::Scene;
use crate::tools::{EditCtx, GestureOutcome, StyleSettings, ToolController, ToolKind};
use crate::viewport::Viewport;

/// Default extent of an inserted shape, centered on the viewport.
const INSERTED_SHAPE_SIZE: Vec2 = Vec2::new(120.0, 90.0);

/// Where the background raster comes from.
pub enum SceneSource {
    /// A fresh edit of a newly rasterized page.
    Fresh { background_ref: Option<String> },
    /// Re-edit of a previously saved annotation: the stored document
    /// plus its re-fetched raster bytes.
    Reedit { document: SceneDocument },
}

pub struct SessionConfig {
    pub style: StyleSettings,
    /// Font used to flatten text labels into rasters. Labels serialize
    /// fine without one but are skipped during export.
    pub font: Option<FontArc>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            style: StyleSettings::default(),
            font: None,
        }
    }
}

#[derive(Debug)]
pub enum SessionPhase {
    /// Decoding the background and/or waiting for the host surface.
    Loading,
    Ready,
    /// Terminal load failure; the host shows a retry/close affordance.
    Failed(EngineError),
    Closed,
}

/// One editing session: exactly one scene, viewport, history stack and
/// tool controller, with no state shared across sessions. All mutation
/// happens synchronously inside the pointer entry points, in strict
/// event order; the only asynchronous boundaries are the background
/// decode and surface readiness, both driven by [`poll`].
///
/// [`poll`]: EditorSession::poll
pub struct EditorSession {
    phase: SessionPhase,
    scene: Option<Scene>,
    viewport: Viewport,
    history: History,
    controller: ToolController,
    style: StyleSettings,
    font: Option<FontArc>,
    loader: Option<BackgroundLoader>,
    probe: SurfaceProbe,
    raster: Option<Arc<RgbaImage>>,
    pending_document: Option<SceneDocument>,
    background_ref: Option<String>,
    surface_attached: bool,
}

impl EditorSession {
    /// Starts a session from encoded background bytes. The session is
    /// not usable until [`poll`](Self::poll) reports `Ready`.
    pub fn open(bytes: Vec<u8>, source: SceneSource, config: SessionConfig) -> Self {
        let (pending_document, background_ref) = match source {
            SceneSource::Fresh { background_ref } => (None, background_ref),
            SceneSource::Reedit { document } => {
                let background_ref = document.background_ref.clone();
                (Some(document), background_ref)
            }
        };
        Self {
            phase: SessionPhase::Loading,
            scene: None,
            viewport: Viewport::new(),
            history: History::new(),
            controller: ToolController::new(),
            style: config.style,
            font: config.font,
            loader: Some(BackgroundLoader::new(bytes)),
            probe: SurfaceProbe::new(),
            raster: None,
            pending_document,
            background_ref,
            surface_attached: false,
        }
    }

    /// Drives the load state machine. Call from the host event loop
    /// until the phase leaves `Loading`. After [`close`](Self::close)
    /// this abandons silently without touching any state.
    pub fn poll(&mut self, now: Instant) -> &SessionPhase {
        if !matches!(self.phase, SessionPhase::Loading) {
            return &self.phase;
        }

        if self.raster.is_none() {
            if let Some(loader) = &mut self.loader {
                match loader.poll(now) {
                    LoadPoll::Pending => {}
                    LoadPoll::Ready(raster) => {
                        self.raster = Some(raster);
                        self.loader = None;
                    }
                    LoadPoll::Failed(err) => {
                        self.loader = None;
                        self.phase = SessionPhase::Failed(EngineError::BackgroundDecode(err));
                        return &self.phase;
                    }
                }
            }
        }

        if !self.surface_attached {
            if let SurfacePoll::Exhausted { attempts } = self.probe.poll(now) {
                self.phase = SessionPhase::Failed(EngineError::SurfaceUnavailable { attempts });
                return &self.phase;
            }
        }

        self.maybe_finish_load();
        &self.phase
    }

    /// The host's surface became available (or changed size). Safe to
    /// call in any phase; during `Loading` it completes initialization
    /// as soon as the raster is decoded.
    pub fn attach_surface(&mut self, size: Vec2) {
        if matches!(self.phase, SessionPhase::Closed) {
            return;
        }
        self.surface_attached = true;
        self.viewport.set_surface_size(size);
        self.maybe_finish_load();
    }

    fn maybe_finish_load(&mut self) {
        if !matches!(self.phase, SessionPhase::Loading) || !self.surface_attached {
            return;
        }
        let Some(raster) = self.raster.clone() else {
            return;
        };

        let scene = match self.pending_document.take() {
            Some(document) => persistence::scene_from_document(&document, raster),
            None => Scene::new(
                Background::new(raster, Pos2::ZERO, 1.0),
                self.background_ref.clone(),
            ),
        };

        self.viewport.fit_to_surface(scene.canvas_rect());
        self.history.initialize(scene.snapshot());
        info!(
            "session ready: {} objects, canvas {:?}",
            scene.objects_in_paint_order().len(),
            scene.canvas_rect().size()
        );
        self.scene = Some(scene);
        self.phase = SessionPhase::Ready;
    }

    /// Ends the session. Any in-flight load is abandoned; the scene is
    /// discarded (it only survives through an explicit export).
    pub fn close(&mut self) {
        self.phase = SessionPhase::Closed;
        self.loader = None;
        self.scene = None;
        self.pending_document = None;
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, SessionPhase::Ready)
    }

    // ---- pointer gestures ------------------------------------------------

    pub fn pointer_down(&mut self, screen: Pos2) {
        self.route(screen, |controller, pos, ctx| controller.pointer_down(pos, ctx));
    }

    pub fn pointer_move(&mut self, screen: Pos2) {
        self.route(screen, |controller, pos, ctx| controller.pointer_move(pos, ctx));
    }

    pub fn pointer_up(&mut self, screen: Pos2) {
        self.route(screen, |controller, pos, ctx| controller.pointer_up(pos, ctx));
    }

    fn route(
        &mut self,
        screen: Pos2,
        handler: impl FnOnce(&mut ToolController, Pos2, &mut EditCtx<'_>) -> GestureOutcome,
    ) {
        if !matches!(self.phase, SessionPhase::Ready) {
            debug!("dropping pointer event while not ready");
            return;
        }
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let outcome = {
            let mut ctx = EditCtx {
                scene,
                viewport: &mut self.viewport,
                style: &self.style,
            };
            handler(&mut self.controller, screen, &mut ctx)
        };
        if outcome == GestureOutcome::Committed {
            if let Some(scene) = self.scene.as_ref() {
                self.history.commit(scene.snapshot());
            }
        }
    }

    // ---- tools and style -------------------------------------------------

    pub fn set_tool(&mut self, kind: ToolKind) {
        self.controller.set_tool(kind);
    }

    pub fn tool_kind(&self) -> ToolKind {
        self.controller.kind()
    }

    pub fn style(&self) -> &StyleSettings {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut StyleSettings {
        &mut self.style
    }

    /// Changes the aspect constraint for subsequent crop drags. An
    /// existing rectangle is discarded: reshaping it in place has no
    /// user-chosen anchor.
    pub fn set_crop_aspect(&mut self, aspect: CropAspect) {
        self.style.crop_aspect = aspect;
        self.controller.discard_crop_rect();
    }

    pub fn crop_rect(&self) -> Option<&CropRect> {
        self.controller.crop_rect()
    }

    pub fn preview_points(&self) -> Option<&[Pos2]> {
        self.controller.preview_points()
    }

    // ---- immediate insertions -------------------------------------------

    /// Creates a shape at the viewport center, selects it and hands
    /// control to the Select tool so it can be repositioned at once.
    /// Insertion is an immediate action, not a persistent tool mode.
    pub fn insert_shape(&mut self, kind: ShapeKind) -> Option<ObjectId> {
        if !self.is_ready() {
            return None;
        }
        let center = self.viewport.visible_center();
        let rect = Rect::from_center_size(center, INSERTED_SHAPE_SIZE);
        let shape = ShapeObject::new(
            kind,
            rect,
            self.style.stroke_color,
            self.style.stroke_width,
            self.style.fill,
        );
        self.insert_object(VisualObject::Shape(shape))
    }

    /// Creates a text label centered on the viewport; same flow as
    /// [`insert_shape`](Self::insert_shape).
    pub fn insert_label(&mut self, content: impl Into<String>) -> Option<ObjectId> {
        if !self.is_ready() {
            return None;
        }
        let center = self.viewport.visible_center();
        let mut label = TextLabel::new(
            content.into(),
            Pos2::ZERO,
            self.style.font_size,
            self.style.stroke_color,
        );
        let half = label.rect().size() * 0.5;
        label.translate(center.to_vec2() - half);
        self.insert_object(VisualObject::Label(label))
    }

    fn insert_object(&mut self, object: VisualObject) -> Option<ObjectId> {
        let scene = self.scene.as_mut()?;
        let id = scene.add_object(object);
        self.controller.set_tool(ToolKind::Select);
        if let Err(err) = scene.set_selection(Some(id)) {
            warn!("could not select inserted object: {err}");
        }
        self.history.commit(scene.snapshot());
        Some(id)
    }

    /// Removes the selected object, if any. The background cannot be
    /// selected, so it can never be deleted this way.
    pub fn delete_selected(&mut self) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let Some(id) = scene.selected() else {
            return false;
        };
        if scene.remove_object(id) {
            self.history.commit(scene.snapshot());
            true
        } else {
            false
        }
    }

    /// Removes every annotation, keeping the background.
    pub fn clear_all(&mut self) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        if scene.objects_in_paint_order().len() <= 1 {
            return;
        }
        scene.clear();
        self.history.commit(scene.snapshot());
    }

    // ---- viewport --------------------------------------------------------

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Zoom step; never a history entry.
    pub fn zoom_by(&mut self, delta: f32) {
        self.viewport.zoom_by(delta);
    }

    pub fn reset_zoom(&mut self) {
        self.viewport.reset_zoom();
    }

    // ---- history ---------------------------------------------------------

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        match self.history.undo() {
            Some(snapshot) => {
                scene.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        match self.history.redo() {
            Some(snapshot) => {
                scene.restore(snapshot);
                true
            }
            None => false,
        }
    }

    // ---- export ----------------------------------------------------------

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Flattens the whole canvas at the configured multiplier.
    pub fn export_raster(&self) -> Result<ExportedImage, EngineError> {
        let scene = self.scene.as_ref().ok_or(EngineError::NotReady)?;
        render::export_raster(scene, self.style.export_multiplier, self.font.as_ref())
    }

    /// Exports the finalized crop rectangle, if one is ready. The
    /// rectangle is consumed either way; a zero-size rectangle exports
    /// nothing.
    pub fn commit_crop(&mut self) -> Result<Option<ExportedImage>, EngineError> {
        let scene = self.scene.as_ref().ok_or(EngineError::NotReady)?;
        let Some(crop) = self.controller.take_ready_crop() else {
            return Ok(None);
        };
        crop::crop_and_export(scene, &crop, self.style.export_multiplier, self.font.as_ref())
    }

    /// The portable document for the persistence collaborator.
    pub fn serialize(&self) -> Result<SceneDocument, EngineError> {
        let scene = self.scene.as_ref().ok_or(EngineError::NotReady)?;
        Ok(persistence::document_from_scene(scene))
    }
}
