//! Single-owner body handle

use super::{BodyDef, BodyType, PhysicsError, PhysicsWorld};
use crate::foundation::collections::BodyHandle;
use crate::foundation::math::Vec2;

/// A rigid body owned by one actor
///
/// Not `Clone`: the owner is the only component allowed to destroy the body,
/// and [`PhysicsBody::release`] consumes the value so a second release cannot
/// be written. Dropping a body that was never released leaks it in the
/// simulator and is logged as an error.
#[derive(Debug)]
pub struct PhysicsBody {
    handle: BodyHandle,
    body_type: BodyType,
    released: bool,
}

impl PhysicsBody {
    /// Create a body in the given world
    pub fn create(world: &mut dyn PhysicsWorld, def: &BodyDef) -> Result<Self, PhysicsError> {
        let handle = world.create_body(def)?;
        log::debug!("Created {:?} body {:?}", def.body_type, handle);
        Ok(Self {
            handle,
            body_type: def.body_type,
            released: false,
        })
    }

    /// Raw handle, for contact lookups
    pub fn handle(&self) -> BodyHandle {
        self.handle
    }

    /// Simulation type fixed at creation
    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    /// Current position
    pub fn position(&self, world: &dyn PhysicsWorld) -> Result<Vec2, PhysicsError> {
        world.position(self.handle)
    }

    /// Current rotation in radians
    pub fn rotation(&self, world: &dyn PhysicsWorld) -> Result<f32, PhysicsError> {
        world.rotation(self.handle)
    }

    /// Teleport the body
    pub fn set_position(&self, world: &mut dyn PhysicsWorld, position: Vec2) -> Result<(), PhysicsError> {
        world.set_position(self.handle, position)
    }

    /// Set rotation in radians
    pub fn set_rotation(&self, world: &mut dyn PhysicsWorld, rotation: f32) -> Result<(), PhysicsError> {
        world.set_rotation(self.handle, rotation)
    }

    /// Return the body to the world
    pub fn release(mut self, world: &mut dyn PhysicsWorld) -> Result<(), PhysicsError> {
        self.released = true;
        log::debug!("Releasing body {:?}", self.handle);
        world.destroy_body(self.handle)
    }
}

impl Drop for PhysicsBody {
    fn drop(&mut self) {
        if !self.released {
            log::error!("Physics body {:?} dropped without being released", self.handle);
        }
    }
}
