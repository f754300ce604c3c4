//! Rendering collaborator contracts
//!
//! The scene never talks to a graphics API. It draws through two services the
//! host provides: a sprite batcher for textured quads and a shape renderer for
//! debug lines and simple fills. Both receive the camera matrix from the scene
//! before each pass.

pub mod recorder;

use crate::foundation::math::{Mat4, Vec2};

pub use recorder::{BatchCall, RecordingBatch, RecordingShapes, ShapeCall};

/// Identifier of a texture preloaded by the asset collaborator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureId(pub String);

impl TextureId {
    /// Create a texture identifier from its asset path
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Bottom edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its corner and size
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of the given size centred on the origin
    pub fn centered(width: f32, height: f32) -> Self {
        Self::new(-width * 0.5, -height * 0.5, width, height)
    }

    /// Centre point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

/// RGBA color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    /// Opaque black
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Opaque red
    pub const RED: Self = Self::rgba(1.0, 0.0, 0.0, 1.0);
    /// Opaque green
    pub const GREEN: Self = Self::rgba(0.0, 1.0, 0.0, 1.0);
    /// Opaque blue
    pub const BLUE: Self = Self::rgba(0.0, 0.0, 1.0, 1.0);

    /// Create a color from its components
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// How a shape batch is rasterized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Outlines only
    Line,
    /// Filled shapes
    Filled,
}

/// Textured-quad batcher provided by the renderer
pub trait SpriteBatch {
    /// Replace the projection matrix used by subsequent batches
    fn set_projection(&mut self, projection: &Mat4);

    /// Current projection matrix
    fn projection(&self) -> Mat4;

    /// Start a batch with the current projection
    fn begin(&mut self);

    /// Queue a textured quad covering `region` in model space
    fn draw_sprite(&mut self, texture: &TextureId, transform: &Mat4, region: Rect);

    /// Flush the batch
    fn end(&mut self);
}

/// Line and shape renderer used for debug overlays
pub trait ShapeRenderer {
    /// Replace the projection matrix
    fn set_projection(&mut self, projection: &Mat4);

    /// Current projection matrix
    fn projection(&self) -> Mat4;

    /// Model matrix applied to subsequent shapes
    fn set_transform(&mut self, transform: &Mat4);

    /// Start a shape batch
    fn begin(&mut self, kind: ShapeKind);

    /// Draw a line segment
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color);

    /// Draw a rectangle
    fn draw_rect(&mut self, rect: Rect, color: Color);

    /// Draw a circle
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Flush the batch
    fn end(&mut self);
}

/// Both draw services, handed to controller draw hooks
pub struct Surfaces<'a> {
    /// Sprite batcher
    pub batch: &'a mut dyn SpriteBatch,
    /// Shape renderer
    pub gizmos: &'a mut dyn ShapeRenderer,
}

/// Draw the default actor gizmo: a unit square with red X and blue Y axes
pub fn draw_axes_gizmo(gizmos: &mut dyn ShapeRenderer, world: &Mat4) {
    gizmos.set_transform(world);
    gizmos.begin(ShapeKind::Line);
    gizmos.draw_rect(Rect::new(-0.5, -0.5, 0.5, 0.5), Color::WHITE);
    gizmos.draw_line(Vec2::zeros(), Vec2::new(1.0, 0.0), Color::RED);
    gizmos.draw_line(Vec2::zeros(), Vec2::new(0.0, 1.0), Color::BLUE);
    gizmos.end();
}
