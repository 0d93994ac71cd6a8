//! Ray and plane primitives used for pointer picking on world-space canvases

use super::math::Vec3;

/// Dot products below this magnitude are treated as "ray parallel to plane"
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// A ray for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Intersect a ray with the infinite plane through `plane_point` with normal
/// `normal`.
///
/// Returns the ray parameter `t` of the hit, or `None` when the ray runs
/// parallel to the plane. Negative `t` (plane behind the origin) is reported
/// as a hit.
pub fn ray_plane_intersection(ray: &Ray, plane_point: Vec3, normal: Vec3) -> Option<f32> {
    let denom = ray.direction.dot(&normal);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }
    Some((plane_point - ray.origin).dot(&normal) / denom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hits_facing_plane() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0));
        let t = ray_plane_intersection(&ray, Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0))
            .expect("ray should hit the plane");
        assert_relative_eq!(t, 5.0);
        assert_relative_eq!(ray.point_at(t), Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0));
        assert!(ray_plane_intersection(&ray, Vec3::new(3.0, 0.0, 0.0), Vec3::x()).is_none());
    }

    #[test]
    fn test_plane_behind_origin_gives_negative_t() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0));
        let t = ray_plane_intersection(&ray, Vec3::new(0.0, 0.0, -2.0), Vec3::z()).unwrap();
        assert_relative_eq!(t, -2.0);
    }

    #[test]
    fn test_direction_is_normalized() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 3.0, 4.0));
        assert_relative_eq!(ray.direction.norm(), 1.0);
    }
}
