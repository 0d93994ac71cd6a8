//! Entity-attached UI canvases
//!
//! The [`CanvasRegistry`] owns every canvas, renders them through the render
//! bridge and routes pointer input to the focused one.

#[allow(clippy::module_inception)]
mod canvas;
pub mod input;
pub mod projection;
pub mod registry;

pub use canvas::Canvas;
pub use input::{DeviceType, InputEvent, InputEventKind};
pub use projection::{project_to_surface, transform_mouse_position};
pub use registry::{context_name, CanvasRegistry};
