use egui::{Pos2, Rect, Vec2};

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 5.0;

/// The transform between scene coordinates and screen coordinates:
/// `screen = scene * zoom + pan_offset`. Every tool that interprets a
/// pointer position goes through [`Viewport::screen_to_scene`], so zoom
/// and pan can never desynchronize tool geometry from what is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    zoom: f32,
    pan_offset: Vec2,
    surface_size: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            pan_offset: Vec2::ZERO,
            surface_size: Vec2::ZERO,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan_offset(&self) -> Vec2 {
        self.pan_offset
    }

    pub fn surface_size(&self) -> Vec2 {
        self.surface_size
    }

    pub fn set_surface_size(&mut self, size: Vec2) {
        self.surface_size = size;
    }

    /// Adds `delta` to the zoom factor, clamped into
    /// [`MIN_ZOOM`, `MAX_ZOOM`], keeping the scene point under the
    /// surface center fixed (zoom anchors on the viewport center, not
    /// the pointer).
    pub fn zoom_by(&mut self, delta: f32) {
        let new_zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
        let center = (self.surface_size * 0.5).to_pos2();
        let anchor = self.screen_to_scene(center);
        self.zoom = new_zoom;
        self.pan_offset = center.to_vec2() - anchor.to_vec2() * new_zoom;
    }

    /// Back to the identity transform.
    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
        self.pan_offset = Vec2::ZERO;
    }

    /// Accumulates a screen-space pan delta. Unbounded: the canvas is
    /// conceptually infinite. Only the Pan tool calls this.
    pub fn pan(&mut self, delta: Vec2) {
        self.pan_offset += delta;
    }

    pub fn screen_to_scene(&self, p: Pos2) -> Pos2 {
        ((p.to_vec2() - self.pan_offset) / self.zoom).to_pos2()
    }

    pub fn scene_to_screen(&self, p: Pos2) -> Pos2 {
        (p.to_vec2() * self.zoom + self.pan_offset).to_pos2()
    }

    /// The scene point currently under the middle of the surface.
    /// Immediate insertions (shapes, labels) land here.
    pub fn visible_center(&self) -> Pos2 {
        self.screen_to_scene((self.surface_size * 0.5).to_pos2())
    }

    /// Picks the clamped zoom that fits `canvas` inside the surface and
    /// centers it. Called once when a freshly loaded page becomes
    /// visible.
    pub fn fit_to_surface(&mut self, canvas: Rect) {
        if self.surface_size.x <= 0.0
            || self.surface_size.y <= 0.0
            || canvas.width() <= 0.0
            || canvas.height() <= 0.0
        {
            self.reset_zoom();
            return;
        }
        let zoom_x = self.surface_size.x / canvas.width();
        let zoom_y = self.surface_size.y / canvas.height();
        self.zoom = zoom_x.min(zoom_y).clamp(MIN_ZOOM, MAX_ZOOM);
        let center = (self.surface_size * 0.5).to_pos2();
        self.pan_offset = center.to_vec2() - canvas.center().to_vec2() * self.zoom;
    }
}
