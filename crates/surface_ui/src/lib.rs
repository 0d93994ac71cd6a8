//! # Surface UI
//!
//! Interactive UI canvases attached to scene entities, rendered either as flat
//! screen-space overlays or as textured panels placed in the 3D world.
//!
//! ## Features
//!
//! - **Canvas Registry**: one UI context per entity, focus tracking, per-frame
//!   update and render
//! - **Render Bridge**: translates immediate-mode UI draw callbacks into a
//!   deferred render job executed later on the GPU submission thread
//! - **Surface Projection**: maps mouse pixels onto world-space canvases by
//!   ray casting through the active camera
//! - **Input Routing**: forwards mouse events to the focused canvas
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use surface_ui::prelude::*;
//!
//! let system = UiSystem::new(library, SurfaceUiConfig::default())?;
//! let mut registry = system.create_registry(Box::new(DiskFileSystem::new("assets")), textures);
//! registry.create_canvas(&mut world, entity)?;
//!
//! // every frame
//! registry.update(&world, &input_events, delta_time);
//! registry.render(&world, &mut pipeline);
//! let frame = pipeline.renderer_mut().take_frame();
//! render_thread.submit(frame);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod ecs;
pub mod render;
pub mod assets;
pub mod ui;
pub mod canvas;

mod error;
mod system;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{UiError, UiResult};
pub use system::{EngineSystemInterface, UiSystem, UI_LOG_TARGET};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        UiError, UiResult, UiSystem,
        assets::{DiskFileSystem, FileSystem, FileTextureSource, TextureSource},
        canvas::{Canvas, CanvasRegistry, DeviceType, InputEvent, InputEventKind},
        config::{Config, SurfaceUiConfig},
        ecs::{ComponentType, Entity, SceneHost, World},
        foundation::math::{IVec2, Quat, Transform, Vec2, Vec3},
        render::{
            GpuDevice, HeadlessRenderer, Pipeline, RecordingDevice, RenderPipeline, RenderQueue,
            RenderThread, Renderer, Viewport,
        },
        ui::{SharedUiLibrary, UiContext, UiLibrary, UiRenderInterface, UiVertex},
    };
}
