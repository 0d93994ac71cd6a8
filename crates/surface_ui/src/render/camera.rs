//! # Cameras and viewports
//!
//! A [`Camera`] only carries lens parameters; its placement comes from the
//! owning entity's transform. Combining the two with an output size yields a
//! [`Viewport`], which is what rendering and pointer picking consume.
//!
//! ## Coordinate System
//! - Camera looks down its local -Z axis with +Y up
//! - Screen pixels have their origin at the top-left, +Y pointing down

use crate::foundation::geometry::Ray;
use crate::foundation::math::{utils, Quat, Transform, Vec3};

/// Perspective lens attached to a camera entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Vertical field of view in radians
    pub fov: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective lens, field of view given in degrees
    pub fn perspective(fov_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            fov: utils::deg_to_rad(fov_degrees),
            near,
            far,
        }
    }

    /// Build the viewport seen through this lens from `transform`
    pub fn viewport(&self, transform: &Transform, width: u32, height: u32) -> Viewport {
        Viewport {
            width,
            height,
            position: transform.position,
            rotation: transform.rotation,
            fov: self.fov,
            near: self.near,
            far: self.far,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(60.0, 0.1, 1000.0)
    }
}

/// Snapshot of the active render target and the camera looking into it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Camera world position
    pub position: Vec3,
    /// Camera world rotation
    pub rotation: Quat,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Near plane distance
    pub near: f32,
    /// Far plane distance
    pub far: f32,
}

impl Viewport {
    /// Width over height; 1.0 for a degenerate viewport
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// World-space ray from the camera through a screen pixel
    ///
    /// The pixel at `(width / 2, height / 2)` maps exactly onto the camera's
    /// forward axis.
    pub fn ray(&self, screen_x: f32, screen_y: f32) -> Ray {
        let width = self.width.max(1) as f32;
        let height = self.height.max(1) as f32;
        let ndc_x = screen_x / width * 2.0 - 1.0;
        let ndc_y = 1.0 - screen_y / height * 2.0;

        let half_height = (self.fov * 0.5).tan();
        let local = Vec3::new(ndc_x * half_height * self.aspect(), ndc_y * half_height, -1.0);

        Ray::new(self.position, self.rotation * local)
    }

    /// Camera forward direction in world space
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::z()
    }
}
