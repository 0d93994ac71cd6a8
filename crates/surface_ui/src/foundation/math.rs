//! Math utilities and types
//!
//! Provides the fundamental math types shared by canvases, the render bridge
//! and the surface projection.

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Quaternion,
    Unit,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Integer 2D vector type (pixel coordinates)
pub type IVec2 = Vector2<i32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Local +X axis rotated into world space
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::x()
    }

    /// Local +Y axis rotated into world space
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::y()
    }

    /// Local +Z axis rotated into world space
    pub fn back(&self) -> Vec3 {
        self.rotation * Vec3::z()
    }
}

/// Math utility functions
pub mod utils {
    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }

    /// Quaternion components in `[x, y, z, w]` order, the layout shaders expect
    pub fn quat_to_array(rotation: &super::Quat) -> [f32; 4] {
        let q = rotation.quaternion();
        [q.i, q.j, q.k, q.w]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_axes() {
        let transform = Transform::identity();
        assert_relative_eq!(transform.right(), Vec3::x());
        assert_relative_eq!(transform.up(), Vec3::y());
        assert_relative_eq!(transform.back(), Vec3::z());
    }

    #[test]
    fn test_rotated_axes() {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::PI);
        let transform = Transform::from_position_rotation(Vec3::zeros(), rotation);
        assert_relative_eq!(transform.right(), -Vec3::x(), epsilon = 1e-6);
        assert_relative_eq!(transform.back(), -Vec3::z(), epsilon = 1e-6);
    }

    #[test]
    fn test_quat_layout_puts_w_last() {
        let values = utils::quat_to_array(&Quat::identity());
        assert_eq!(values, [0.0, 0.0, 0.0, 1.0]);
    }
}
