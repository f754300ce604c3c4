//! Orthographic scene camera

use crate::config::CameraConfig;
use crate::foundation::math::{Mat4, Orthographic3, Vec2, Vec3};

const DEPTH_RANGE: f32 = 100.0;

/// 2D orthographic camera
///
/// `zoom` is world units per pixel, so a larger zoom shows more of the world.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera2D {
    /// World point at the centre of the viewport
    pub position: Vec2,
    /// World units per pixel
    pub zoom: f32,
    /// Viewport width in pixels
    pub viewport_width: f32,
    /// Viewport height in pixels
    pub viewport_height: f32,
    /// World Y grows downwards on screen
    pub y_down: bool,
    zoom_min: f32,
    zoom_max: f32,
    zoom_step: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera2D {
    /// Camera centred on the origin with the configured viewport and zoom
    pub fn from_config(config: &CameraConfig) -> Self {
        let zoom_min = config.zoom_min.min(config.zoom_max);
        let zoom_max = config.zoom_max.max(config.zoom_min);
        Self {
            position: Vec2::zeros(),
            zoom: config.zoom.clamp(zoom_min, zoom_max),
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            y_down: config.y_down,
            zoom_min,
            zoom_max,
            zoom_step: config.zoom_step,
        }
    }

    /// Move the camera by a world-space offset
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Change zoom by whole scroll steps, clamped to the configured range
    pub fn apply_zoom_steps(&mut self, steps: i32) {
        self.set_zoom(self.zoom + self.zoom_step * steps as f32);
    }

    /// Set zoom, clamped to the configured range
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(self.zoom_min, self.zoom_max);
    }

    /// Half of the visible world extent
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(
            (self.viewport_width * self.zoom * 0.5).max(f32::EPSILON),
            (self.viewport_height * self.zoom * 0.5).max(f32::EPSILON),
        )
    }

    /// World to camera space
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::new_translation(&Vec3::new(-self.position.x, -self.position.y, 0.0))
    }

    /// Camera space to clip space
    pub fn projection_matrix(&self) -> Mat4 {
        let half = self.half_extents();
        let (bottom, top) = if self.y_down { (half.y, -half.y) } else { (-half.y, half.y) };
        Orthographic3::new(-half.x, half.x, bottom, top, -DEPTH_RANGE, DEPTH_RANGE).to_homogeneous()
    }

    /// Combined view-projection matrix handed to the renderers
    pub fn combined(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Map a pixel position (origin top-left) to world space
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let half = self.half_extents();
        let ndc_x = screen.x / self.viewport_width * 2.0 - 1.0;
        let ndc_y = 1.0 - screen.y / self.viewport_height * 2.0;
        let up = if self.y_down { -1.0 } else { 1.0 };
        Vec2::new(
            self.position.x + ndc_x * half.x,
            self.position.y + up * ndc_y * half.y,
        )
    }
}
