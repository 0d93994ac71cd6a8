//! The view of the scene the UI layer needs
//!
//! Canvases only hold entity ids. Everything else (transforms, the active
//! camera, component lifecycle bookkeeping) is looked up through [`SceneHost`]
//! so that the UI layer never keeps references into the scene.

use super::Entity;
use crate::foundation::math::Transform;
use crate::render::Viewport;

/// Named component type, used for lifecycle notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentType(&'static str);

impl ComponentType {
    /// The UI canvas component
    pub const UI_CANVAS: Self = Self("ui_canvas");

    /// Create a component type from its name
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Component type name
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

/// Scene services consumed by canvas registries
pub trait SceneHost {
    /// World transform of an entity, if it has one
    fn transform(&self, entity: Entity) -> Option<Transform>;

    /// Camera entity currently used for rendering
    fn active_camera(&self) -> Option<Entity>;

    /// Viewport of a camera entity
    fn camera_viewport(&self, camera: Entity) -> Option<Viewport>;

    /// A component was attached to an entity
    fn on_component_created(&mut self, entity: Entity, component: ComponentType);

    /// A component was detached from an entity
    fn on_component_destroyed(&mut self, entity: Entity, component: ComponentType);

    /// Viewport of the active camera
    fn active_viewport(&self) -> Option<Viewport> {
        self.active_camera().and_then(|camera| self.camera_viewport(camera))
    }
}
