//! Physics-backed textured quad
//!
//! The body is created together with the actor and released in `dispose`.
//! The scene copies the body pose into the actor's transform every frame, so
//! drawing at the world transform follows the simulation.

use crate::foundation::collections::{ActorKey, BodyHandle};
use crate::physics::{BodyDef, PhysicsBody, PhysicsError, PhysicsWorld};
use crate::render::{Rect, SpriteBatch, TextureId};
use crate::scene::{Actor, ActorContext, Damageable, DrawContext, ImpactSounding, SceneError};

/// Sprite attached to a rigid body
#[derive(Debug)]
pub struct BodySpriteActor {
    body: Option<PhysicsBody>,
    texture: TextureId,
    region: Rect,
    impact_sound: Option<String>,
    health: Option<f32>,
    contact_damage: f32,
}

impl BodySpriteActor {
    /// Create the body and the actor owning it
    pub fn new(
        physics: &mut dyn PhysicsWorld,
        def: &BodyDef,
        texture: TextureId,
        region: Rect,
    ) -> Result<Self, PhysicsError> {
        Ok(Self {
            body: Some(PhysicsBody::create(physics, def)?),
            texture,
            region,
            impact_sound: None,
            health: None,
            contact_damage: 0.0,
        })
    }

    /// Builder pattern: sound played when something hits this actor
    pub fn with_impact_sound(mut self, cue: impl Into<String>) -> Self {
        self.impact_sound = Some(cue.into());
        self
    }

    /// Builder pattern: make the actor damageable
    pub fn with_health(mut self, health: f32) -> Self {
        self.health = Some(health);
        self
    }

    /// Builder pattern: damage dealt to damageable actors on contact
    pub fn with_contact_damage(mut self, damage: f32) -> Self {
        self.contact_damage = damage;
        self
    }

    /// Remaining health, if damageable
    pub fn health(&self) -> Option<f32> {
        self.health
    }
}

impl Damageable for BodySpriteActor {
    fn apply_damage(&mut self, amount: f32) {
        if let Some(health) = self.health.as_mut() {
            *health -= amount;
        }
    }

    fn is_destroyed(&self) -> bool {
        self.health.is_some_and(|health| health <= 0.0)
    }
}

impl ImpactSounding for BodySpriteActor {
    fn impact_sound(&self) -> Option<&str> {
        self.impact_sound.as_deref()
    }
}

impl Actor for BodySpriteActor {
    fn update(&mut self, ctx: &mut ActorContext<'_>, _delta: f32) -> Result<(), SceneError> {
        if self.is_destroyed() {
            ctx.remove();
        }
        Ok(())
    }

    fn draw(&self, ctx: &DrawContext<'_>, batch: &mut dyn SpriteBatch) {
        batch.begin();
        batch.draw_sprite(&self.texture, &ctx.world_transform(), self.region);
        batch.end();
    }

    fn dispose(&mut self, physics: &mut dyn PhysicsWorld) -> Result<(), SceneError> {
        if let Some(body) = self.body.take() {
            body.release(physics)?;
        }
        Ok(())
    }

    fn body(&self) -> Option<BodyHandle> {
        self.body.as_ref().map(PhysicsBody::handle)
    }

    fn on_hit(&mut self, ctx: &mut ActorContext<'_>, other: ActorKey) -> Result<(), SceneError> {
        let sound = ctx.with_actor(other, |actor| {
            actor
                .as_impact_sounding()
                .and_then(|sounding| sounding.impact_sound())
                .map(str::to_string)
        })?;
        if let Some(sound) = sound {
            ctx.play_sound(sound);
        }

        if self.contact_damage > 0.0 {
            let damage = self.contact_damage;
            ctx.with_actor_mut(other, |actor| {
                if let Some(target) = actor.as_damageable_mut() {
                    target.apply_damage(damage);
                }
            })?;
        }
        Ok(())
    }

    fn as_damageable_mut(&mut self) -> Option<&mut dyn Damageable> {
        if self.health.is_some() {
            Some(self)
        } else {
            None
        }
    }

    fn as_impact_sounding(&self) -> Option<&dyn ImpactSounding> {
        if self.impact_sound.is_some() {
            Some(self)
        } else {
            None
        }
    }
}
