//! Recording render services
//!
//! Headless implementations of [`SpriteBatch`] and [`ShapeRenderer`] that keep
//! every call in order. Used by tests and by tools that need to inspect what a
//! frame would draw.

use super::{Color, Rect, ShapeKind, ShapeRenderer, SpriteBatch, TextureId};
use crate::foundation::math::{Mat4, Vec2};

/// A call made on a [`RecordingBatch`]
#[derive(Debug, Clone, PartialEq)]
pub enum BatchCall {
    /// Projection matrix replaced
    SetProjection(Mat4),
    /// Batch started
    Begin,
    /// Quad queued
    Sprite {
        /// Texture drawn
        texture: TextureId,
        /// Model matrix
        transform: Mat4,
        /// Model-space quad
        region: Rect,
    },
    /// Batch flushed
    End,
}

/// Sprite batch that records calls instead of drawing
#[derive(Debug)]
pub struct RecordingBatch {
    projection: Mat4,
    in_batch: bool,
    calls: Vec<BatchCall>,
}

impl RecordingBatch {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self {
            projection: Mat4::identity(),
            in_batch: false,
            calls: Vec::new(),
        }
    }

    /// All recorded calls
    pub fn calls(&self) -> &[BatchCall] {
        &self.calls
    }

    /// Textures of recorded sprites, in draw order
    pub fn sprites(&self) -> Vec<&TextureId> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BatchCall::Sprite { texture, .. } => Some(texture),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded calls, keeping the projection
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Is a batch currently open
    pub fn in_batch(&self) -> bool {
        self.in_batch
    }
}

impl Default for RecordingBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteBatch for RecordingBatch {
    fn set_projection(&mut self, projection: &Mat4) {
        self.projection = *projection;
        self.calls.push(BatchCall::SetProjection(*projection));
    }

    fn projection(&self) -> Mat4 {
        self.projection
    }

    fn begin(&mut self) {
        if self.in_batch {
            log::warn!("sprite batch begun twice without end");
        }
        self.in_batch = true;
        self.calls.push(BatchCall::Begin);
    }

    fn draw_sprite(&mut self, texture: &TextureId, transform: &Mat4, region: Rect) {
        self.calls.push(BatchCall::Sprite {
            texture: texture.clone(),
            transform: *transform,
            region,
        });
    }

    fn end(&mut self) {
        self.in_batch = false;
        self.calls.push(BatchCall::End);
    }
}

/// A call made on a [`RecordingShapes`]
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeCall {
    /// Projection matrix replaced
    SetProjection(Mat4),
    /// Model matrix replaced
    SetTransform(Mat4),
    /// Batch started
    Begin(ShapeKind),
    /// Line drawn
    Line(Vec2, Vec2, Color),
    /// Rectangle drawn
    Rect(Rect, Color),
    /// Circle drawn
    Circle(Vec2, f32, Color),
    /// Batch flushed
    End,
}

/// Shape renderer that records calls instead of drawing
#[derive(Debug)]
pub struct RecordingShapes {
    projection: Mat4,
    calls: Vec<ShapeCall>,
}

impl RecordingShapes {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self {
            projection: Mat4::identity(),
            calls: Vec::new(),
        }
    }

    /// All recorded calls
    pub fn calls(&self) -> &[ShapeCall] {
        &self.calls
    }

    /// Number of model matrices set, one per gizmo drawn
    pub fn transforms_set(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, ShapeCall::SetTransform(_)))
            .count()
    }

    /// Forget recorded calls, keeping the projection
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Default for RecordingShapes {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeRenderer for RecordingShapes {
    fn set_projection(&mut self, projection: &Mat4) {
        self.projection = *projection;
        self.calls.push(ShapeCall::SetProjection(*projection));
    }

    fn projection(&self) -> Mat4 {
        self.projection
    }

    fn set_transform(&mut self, transform: &Mat4) {
        self.calls.push(ShapeCall::SetTransform(*transform));
    }

    fn begin(&mut self, kind: ShapeKind) {
        self.calls.push(ShapeCall::Begin(kind));
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.calls.push(ShapeCall::Line(from, to, color));
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(ShapeCall::Rect(rect, color));
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.calls.push(ShapeCall::Circle(center, radius, color));
    }

    fn end(&mut self) {
        self.calls.push(ShapeCall::End);
    }
}
