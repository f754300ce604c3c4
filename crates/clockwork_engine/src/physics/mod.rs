//! Physics collaborator contract
//!
//! The scene treats the rigid-body simulator as an opaque service. Bodies are
//! fully described at creation time by a [`BodyDef`]; changing shape, type or
//! material means destroying the body and creating a new one. Each body is
//! owned by exactly one actor through a [`PhysicsBody`].

mod body;
pub mod world;

use thiserror::Error;

use crate::foundation::collections::BodyHandle;
use crate::foundation::math::Vec2;

pub use body::PhysicsBody;
pub use world::SimplePhysicsWorld;

/// How a body takes part in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyType {
    /// Never moves
    Static,
    /// Moves only by its velocity, unaffected by forces
    Kinematic,
    /// Fully simulated
    Dynamic,
}

/// Collision geometry in body-local coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Circle centred on the body origin
    Circle {
        /// Radius
        radius: f32,
    },
    /// Box centred on the body origin
    Box {
        /// Half of the width
        half_width: f32,
        /// Half of the height
        half_height: f32,
    },
    /// Convex polygon, counter-clockwise
    Polygon(Vec<Vec2>),
}

impl Shape {
    /// Regular polygon approximating a circle, as used for rolling props
    pub fn regular_polygon(radius: f32, sides: usize) -> Self {
        let step = std::f32::consts::TAU / sides as f32;
        Self::Polygon(
            (0..sides)
                .map(|i| {
                    let angle = step * i as f32;
                    Vec2::new(radius * angle.cos(), radius * angle.sin())
                })
                .collect(),
        )
    }

    /// Radius of the smallest origin-centred circle enclosing the shape
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Self::Circle { radius } => *radius,
            Self::Box { half_width, half_height } => half_width.hypot(*half_height),
            Self::Polygon(vertices) => vertices
                .iter()
                .map(|v| v.magnitude())
                .fold(0.0, f32::max),
        }
    }

    /// Surface area
    pub fn area(&self) -> f32 {
        match self {
            Self::Circle { radius } => std::f32::consts::PI * radius * radius,
            Self::Box { half_width, half_height } => 4.0 * half_width * half_height,
            Self::Polygon(vertices) => {
                let twice_area: f32 = vertices
                    .iter()
                    .zip(vertices.iter().cycle().skip(1))
                    .map(|(a, b)| a.x * b.y - b.x * a.y)
                    .sum();
                twice_area.abs() * 0.5
            }
        }
    }

    fn validate(&self) -> Result<(), PhysicsError> {
        let valid = match self {
            Self::Circle { radius } => *radius > 0.0,
            Self::Box { half_width, half_height } => *half_width > 0.0 && *half_height > 0.0,
            Self::Polygon(vertices) => vertices.len() >= 3 && self.area() > 0.0,
        };
        if valid {
            Ok(())
        } else {
            Err(PhysicsError::InvalidShape(format!("{self:?}")))
        }
    }
}

/// Surface and mass properties of a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Mass per unit area
    pub density: f32,
    /// Coulomb friction coefficient
    pub friction: f32,
    /// Bounciness
    pub restitution: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            density: 1.0,
            friction: 0.2,
            restitution: 0.0,
        }
    }
}

/// One shape attached to a body
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDesc {
    /// Geometry
    pub shape: Shape,
    /// Material
    pub material: Material,
}

/// Complete description of a body, fixed at creation
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDef {
    /// Simulation type
    pub body_type: BodyType,
    /// Initial position
    pub position: Vec2,
    /// Initial rotation in radians
    pub rotation: f32,
    /// Attached shapes
    pub shapes: Vec<ShapeDesc>,
}

impl BodyDef {
    /// Body of the given type at the origin with no shapes
    pub fn new(body_type: BodyType) -> Self {
        Self {
            body_type,
            position: Vec2::zeros(),
            rotation: 0.0,
            shapes: Vec::new(),
        }
    }

    /// Builder pattern: set initial position
    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: set initial rotation
    pub fn rotated(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: attach a shape
    pub fn with_shape(mut self, shape: Shape, material: Material) -> Self {
        self.shapes.push(ShapeDesc { shape, material });
        self
    }

    /// Check the definition before a body is created from it
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if self.shapes.is_empty() {
            return Err(PhysicsError::NoShapes);
        }
        self.shapes.iter().try_for_each(|desc| desc.shape.validate())
    }
}

/// Two bodies that started touching during the last step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Contact {
    /// First body
    pub body_a: BodyHandle,
    /// Second body
    pub body_b: BodyHandle,
}

impl Contact {
    /// Create a contact with a stable body order
    pub fn new(a: BodyHandle, b: BodyHandle) -> Self {
        if a <= b {
            Self { body_a: a, body_b: b }
        } else {
            Self { body_a: b, body_b: a }
        }
    }
}

/// Physics collaborator errors
#[derive(Debug, Error, PartialEq)]
pub enum PhysicsError {
    /// The handle does not name a live body
    #[error("unknown body {0:?}")]
    UnknownBody(BodyHandle),

    /// Body definition without shapes
    #[error("body definition has no shapes")]
    NoShapes,

    /// Degenerate geometry
    #[error("invalid shape: {0}")]
    InvalidShape(String),
}

/// Rigid-body simulator used by the scene
pub trait PhysicsWorld {
    /// Create a body from its full definition
    fn create_body(&mut self, def: &BodyDef) -> Result<BodyHandle, PhysicsError>;

    /// Destroy a body; destroying an unknown body is an error
    fn destroy_body(&mut self, handle: BodyHandle) -> Result<(), PhysicsError>;

    /// Is the handle a live body
    fn contains(&self, handle: BodyHandle) -> bool;

    /// Number of live bodies
    fn body_count(&self) -> usize;

    /// Advance the simulation
    fn step(&mut self, delta: f32);

    /// Body position
    fn position(&self, handle: BodyHandle) -> Result<Vec2, PhysicsError>;

    /// Teleport a body
    fn set_position(&mut self, handle: BodyHandle, position: Vec2) -> Result<(), PhysicsError>;

    /// Body rotation in radians
    fn rotation(&self, handle: BodyHandle) -> Result<f32, PhysicsError>;

    /// Set body rotation in radians
    fn set_rotation(&mut self, handle: BodyHandle, rotation: f32) -> Result<(), PhysicsError>;

    /// Linear velocity
    fn linear_velocity(&self, handle: BodyHandle) -> Result<Vec2, PhysicsError>;

    /// Set linear velocity
    fn set_linear_velocity(&mut self, handle: BodyHandle, velocity: Vec2) -> Result<(), PhysicsError>;

    /// Angular velocity in radians per second
    fn angular_velocity(&self, handle: BodyHandle) -> Result<f32, PhysicsError>;

    /// Set angular velocity
    fn set_angular_velocity(&mut self, handle: BodyHandle, velocity: f32) -> Result<(), PhysicsError>;

    /// Apply a force at the centre of mass until the next step
    fn apply_force(&mut self, handle: BodyHandle, force: Vec2) -> Result<(), PhysicsError>;

    /// Take the contact-begin events produced since the last call
    fn drain_contacts(&mut self) -> Vec<Contact>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_polygon_area() {
        let square = Shape::Polygon(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ]);
        assert_relative_eq!(square.area(), 4.0);
    }

    #[test]
    fn test_regular_polygon_bounds() {
        let ball = Shape::regular_polygon(0.28, 8);
        assert_relative_eq!(ball.bounding_radius(), 0.28, epsilon = 1e-6);
    }

    #[test]
    fn test_body_def_validation() {
        assert_eq!(BodyDef::new(BodyType::Static).validate(), Err(PhysicsError::NoShapes));

        let flat = BodyDef::new(BodyType::Dynamic)
            .with_shape(Shape::Box { half_width: 1.0, half_height: 0.0 }, Material::default());
        assert!(matches!(flat.validate(), Err(PhysicsError::InvalidShape(_))));

        let ok = BodyDef::new(BodyType::Dynamic)
            .with_shape(Shape::Circle { radius: 1.0 }, Material::default());
        assert_eq!(ok.validate(), Ok(()));
    }
}
