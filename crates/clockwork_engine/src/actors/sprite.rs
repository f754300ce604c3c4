//! Plain textured quad

use crate::render::{Rect, SpriteBatch, TextureId};
use crate::scene::{Actor, ActorContext, DrawContext, SceneError};

/// Decoration drawn at its transform, without a physics body
#[derive(Debug, Clone)]
pub struct SpriteActor {
    texture: TextureId,
    region: Rect,
    /// Rotation speed in radians per second
    pub spin: f32,
}

impl SpriteActor {
    /// Quad covering `region` in local space
    pub fn new(texture: TextureId, region: Rect) -> Self {
        Self {
            texture,
            region,
            spin: 0.0,
        }
    }

    /// Builder pattern: rotate continuously
    pub fn with_spin(mut self, spin: f32) -> Self {
        self.spin = spin;
        self
    }

    /// Drawn texture
    pub fn texture(&self) -> &TextureId {
        &self.texture
    }
}

impl Actor for SpriteActor {
    fn update(&mut self, ctx: &mut ActorContext<'_>, delta: f32) -> Result<(), SceneError> {
        if self.spin != 0.0 {
            ctx.transform_mut()?.rotation += self.spin * delta;
        }
        Ok(())
    }

    fn draw(&self, ctx: &DrawContext<'_>, batch: &mut dyn SpriteBatch) {
        batch.begin();
        batch.draw_sprite(&self.texture, &ctx.world_transform(), self.region);
        batch.end();
    }
}
