//! Math utilities and types
//!
//! Provides the 2D math types used by the scene: vectors, homogeneous matrices
//! and the position/rotation/scale transform every scene node carries.

pub use nalgebra::{Matrix4, Orthographic3, Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type (2D position plus depth)
pub type Vec3 = Vector3<f32>;

/// 4x4 homogeneous matrix type
pub type Mat4 = Matrix4<f32>;

/// Local transform of a 2D scene node
///
/// The `z` component of the position is a depth hint handed to the renderer;
/// it never changes paint order, which is decided by layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    /// Position, with depth in `z`
    pub position: Vec3,

    /// Rotation around the Z axis in radians
    pub rotation: f32,

    /// Scale factors
    pub scale: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Transform2D {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only a 2D position
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position: Vec3::new(position.x, position.y, 0.0),
            ..Default::default()
        }
    }

    /// Builder pattern: set rotation in radians
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: set non-uniform scale
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Builder pattern: set depth
    pub fn with_depth(mut self, depth: f32) -> Self {
        self.position.z = depth;
        self
    }

    /// The 2D part of the position
    pub fn translation(&self) -> Vec2 {
        self.position.xy()
    }

    /// Replace the 2D part of the position, keeping depth
    pub fn set_translation(&mut self, translation: Vec2) {
        self.position.x = translation.x;
        self.position.y = translation.y;
    }

    /// Convert to a transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * Mat4::from_axis_angle(&Vec3::z_axis(), self.rotation)
            * Mat4::new_nonuniform_scaling(&Vec3::new(self.scale.x, self.scale.y, 1.0))
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Mat4, Vec2};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Extract the 2D translation of a homogeneous matrix
    pub fn matrix_translation(matrix: &Mat4) -> Vec2 {
        Vec2::new(matrix.m14, matrix.m24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_matrix() {
        assert_eq!(Transform2D::identity().to_matrix(), Mat4::identity());
    }

    #[test]
    fn test_trs_order() {
        let transform = Transform2D::from_position(Vec2::new(10.0, 0.0))
            .with_rotation(constants::PI * 0.5)
            .with_scale(Vec2::new(2.0, 2.0));

        // local (1, 0) is scaled to (2, 0), rotated to (0, 2), then moved
        let point = transform
            .to_matrix()
            .transform_point(&nalgebra::Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(point.x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(point.y, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_depth_kept_on_translation() {
        let mut transform = Transform2D::identity().with_depth(3.0);
        transform.set_translation(Vec2::new(1.0, 2.0));
        assert_eq!(transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.translation(), Vec2::new(1.0, 2.0));
    }
}
