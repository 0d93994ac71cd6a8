//! Mouse pixels to canvas coordinates
//!
//! A world-space canvas is treated as an infinite plane through its entity
//! position, facing along the entity's local +Z. The pointer ray is
//! intersected with that plane and the hit is expressed along the canvas's
//! local X and Y axes. Those offsets are read as 0..1 fractions of the
//! viewport, Y flipped for the UI's top-left origin.
//!
//! The mapping assumes the canvas spans a unit square starting at its entity
//! position (its bottom-left corner). Scaled or non-square canvases map only
//! approximately.

use super::Canvas;
use crate::ecs::SceneHost;
use crate::foundation::geometry::ray_plane_intersection;
use crate::foundation::math::{IVec2, Transform};
use crate::render::Viewport;

/// Project a screen pixel onto a canvas plane, `None` if the ray runs parallel to it
pub fn project_to_surface(viewport: &Viewport, canvas: &Transform, x: f32, y: f32) -> Option<IVec2> {
    let ray = viewport.ray(x, y);
    let t = ray_plane_intersection(&ray, canvas.position, canvas.back())?;
    let offset = ray.point_at(t) - canvas.position;

    let x_proj = offset.dot(&canvas.right());
    let y_proj = offset.dot(&canvas.up());

    Some(IVec2::new(
        (x_proj * viewport.width as f32) as i32,
        ((1.0 - y_proj) * viewport.height as f32) as i32,
    ))
}

/// Canvas-local mouse position for a screen pixel
///
/// Flat canvases, a missing camera or transform and parallel rays all fall
/// back to the raw screen position.
pub fn transform_mouse_position(host: &dyn SceneHost, canvas: &Canvas, x: i32, y: i32) -> IVec2 {
    let raw = IVec2::new(x, y);
    if !canvas.is_3d() {
        return raw;
    }
    let Some(viewport) = host.active_viewport() else {
        return raw;
    };
    let Some(transform) = host.transform(canvas.entity()) else {
        return raw;
    };
    project_to_surface(&viewport, &transform, x as f32, y as f32).unwrap_or_else(|| {
        log::trace!("Pointer ray parallel to canvas {}, using screen position", canvas.entity());
        raw
    })
}
