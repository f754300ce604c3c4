//! Reference physics world
//!
//! A small deterministic simulator good enough to drive the scene without a
//! native engine: semi-implicit Euler integration and contact-begin detection
//! from bounding circles. It does not resolve collisions.

use std::collections::HashSet;

use super::{BodyDef, BodyType, Contact, PhysicsError, PhysicsWorld};
use crate::foundation::collections::{BodyHandle, SlotMap};
use crate::foundation::math::Vec2;

#[derive(Debug)]
struct Body {
    body_type: BodyType,
    position: Vec2,
    rotation: f32,
    linear_velocity: Vec2,
    angular_velocity: f32,
    force: Vec2,
    mass: f32,
    radius: f32,
}

/// Deterministic in-process physics world
#[derive(Debug)]
pub struct SimplePhysicsWorld {
    bodies: SlotMap<BodyHandle, Body>,
    gravity: Vec2,
    touching: HashSet<Contact>,
    contacts: Vec<Contact>,
    destroyed: Vec<BodyHandle>,
}

impl Default for SimplePhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimplePhysicsWorld {
    /// World without gravity
    pub fn new() -> Self {
        Self::with_gravity(Vec2::zeros())
    }

    /// World with the given gravity
    pub fn with_gravity(gravity: Vec2) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            gravity,
            touching: HashSet::new(),
            contacts: Vec::new(),
            destroyed: Vec::new(),
        }
    }

    /// Gravity applied to dynamic bodies
    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Every body destroyed so far, in order
    pub fn destroyed_bodies(&self) -> &[BodyHandle] {
        &self.destroyed
    }

    fn body(&self, handle: BodyHandle) -> Result<&Body, PhysicsError> {
        self.bodies.get(handle).ok_or(PhysicsError::UnknownBody(handle))
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body, PhysicsError> {
        self.bodies.get_mut(handle).ok_or(PhysicsError::UnknownBody(handle))
    }

    fn detect_contacts(&mut self) {
        let bodies: Vec<(BodyHandle, &Body)> = self.bodies.iter().collect();
        let mut now_touching = HashSet::new();

        for (i, (handle_a, a)) in bodies.iter().enumerate() {
            for (handle_b, b) in &bodies[i + 1..] {
                if a.body_type == BodyType::Static && b.body_type == BodyType::Static {
                    continue;
                }
                let reach = a.radius + b.radius;
                if (a.position - b.position).magnitude_squared() <= reach * reach {
                    now_touching.insert(Contact::new(*handle_a, *handle_b));
                }
            }
        }

        let mut begun: Vec<Contact> = now_touching.difference(&self.touching).copied().collect();
        begun.sort_by_key(|c| (c.body_a, c.body_b));
        self.contacts.extend(begun);
        self.touching = now_touching;
    }
}

impl PhysicsWorld for SimplePhysicsWorld {
    fn create_body(&mut self, def: &BodyDef) -> Result<BodyHandle, PhysicsError> {
        def.validate()?;

        let mass = def
            .shapes
            .iter()
            .map(|desc| desc.shape.area() * desc.material.density)
            .sum::<f32>()
            .max(f32::EPSILON);
        let radius = def
            .shapes
            .iter()
            .map(|desc| desc.shape.bounding_radius())
            .fold(0.0, f32::max);

        Ok(self.bodies.insert(Body {
            body_type: def.body_type,
            position: def.position,
            rotation: def.rotation,
            linear_velocity: Vec2::zeros(),
            angular_velocity: 0.0,
            force: Vec2::zeros(),
            mass,
            radius,
        }))
    }

    fn destroy_body(&mut self, handle: BodyHandle) -> Result<(), PhysicsError> {
        self.bodies.remove(handle).ok_or(PhysicsError::UnknownBody(handle))?;
        self.touching.retain(|c| c.body_a != handle && c.body_b != handle);
        self.contacts.retain(|c| c.body_a != handle && c.body_b != handle);
        self.destroyed.push(handle);
        Ok(())
    }

    fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(handle)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn step(&mut self, delta: f32) {
        let gravity = self.gravity;
        for (_, body) in self.bodies.iter_mut() {
            match body.body_type {
                BodyType::Static => {}
                BodyType::Kinematic => {
                    body.position += body.linear_velocity * delta;
                    body.rotation += body.angular_velocity * delta;
                }
                BodyType::Dynamic => {
                    let acceleration = gravity + body.force / body.mass;
                    body.linear_velocity += acceleration * delta;
                    body.position += body.linear_velocity * delta;
                    body.rotation += body.angular_velocity * delta;
                }
            }
            body.force = Vec2::zeros();
        }
        self.detect_contacts();
    }

    fn position(&self, handle: BodyHandle) -> Result<Vec2, PhysicsError> {
        Ok(self.body(handle)?.position)
    }

    fn set_position(&mut self, handle: BodyHandle, position: Vec2) -> Result<(), PhysicsError> {
        self.body_mut(handle)?.position = position;
        Ok(())
    }

    fn rotation(&self, handle: BodyHandle) -> Result<f32, PhysicsError> {
        Ok(self.body(handle)?.rotation)
    }

    fn set_rotation(&mut self, handle: BodyHandle, rotation: f32) -> Result<(), PhysicsError> {
        self.body_mut(handle)?.rotation = rotation;
        Ok(())
    }

    fn linear_velocity(&self, handle: BodyHandle) -> Result<Vec2, PhysicsError> {
        Ok(self.body(handle)?.linear_velocity)
    }

    fn set_linear_velocity(&mut self, handle: BodyHandle, velocity: Vec2) -> Result<(), PhysicsError> {
        self.body_mut(handle)?.linear_velocity = velocity;
        Ok(())
    }

    fn angular_velocity(&self, handle: BodyHandle) -> Result<f32, PhysicsError> {
        Ok(self.body(handle)?.angular_velocity)
    }

    fn set_angular_velocity(&mut self, handle: BodyHandle, velocity: f32) -> Result<(), PhysicsError> {
        self.body_mut(handle)?.angular_velocity = velocity;
        Ok(())
    }

    fn apply_force(&mut self, handle: BodyHandle, force: Vec2) -> Result<(), PhysicsError> {
        self.body_mut(handle)?.force += force;
        Ok(())
    }

    fn drain_contacts(&mut self) -> Vec<Contact> {
        std::mem::take(&mut self.contacts)
    }
}
