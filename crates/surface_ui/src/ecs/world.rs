//! ECS World implementation

use super::{ComponentType, Entity, SceneHost};
use crate::foundation::math::Transform;
use crate::render::{Camera, Viewport};
use std::collections::{HashMap, HashSet};

/// Component attach/detach notification recorded by the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Component attached
    Created(Entity, ComponentType),
    /// Component detached
    Destroyed(Entity, ComponentType),
}

/// ECS World containing all entities and components
pub struct World {
    next_entity_id: u32,
    entities: Vec<Entity>,
    transforms: HashMap<Entity, Transform>,
    cameras: HashMap<Entity, Camera>,
    components: HashMap<Entity, HashSet<ComponentType>>,
    active_camera: Option<Entity>,
    screen_size: (u32, u32),
    lifecycle: Vec<LifecycleEvent>,
}

impl World {
    /// Create a new world rendering to a screen of the given size
    pub fn new(screen_width: u32, screen_height: u32) -> Self {
        Self {
            next_entity_id: 0,
            entities: Vec::new(),
            transforms: HashMap::new(),
            cameras: HashMap::new(),
            components: HashMap::new(),
            active_camera: None,
            screen_size: (screen_width, screen_height),
            lifecycle: Vec::new(),
        }
    }

    /// Create a new entity
    pub fn create_entity(&mut self) -> Entity {
        let entity = Entity::from_raw(self.next_entity_id);
        self.next_entity_id += 1;
        self.entities.push(entity);
        entity
    }

    /// Create an entity with a transform
    pub fn spawn(&mut self, transform: Transform) -> Entity {
        let entity = self.create_entity();
        self.set_transform(entity, transform);
        entity
    }

    /// Remove an entity and everything attached to it
    pub fn destroy_entity(&mut self, entity: Entity) {
        self.entities.retain(|e| *e != entity);
        self.transforms.remove(&entity);
        self.cameras.remove(&entity);
        self.components.remove(&entity);
        if self.active_camera == Some(entity) {
            self.active_camera = None;
        }
    }

    /// Set or replace an entity's transform
    pub fn set_transform(&mut self, entity: Entity, transform: Transform) {
        self.transforms.insert(entity, transform);
    }

    /// Attach a camera to an entity
    pub fn add_camera(&mut self, entity: Entity, camera: Camera) {
        self.cameras.insert(entity, camera);
    }

    /// Choose the camera used for rendering and picking
    pub fn set_active_camera(&mut self, camera: Option<Entity>) {
        self.active_camera = camera;
    }

    /// Resize the output surface
    pub fn set_screen_size(&mut self, width: u32, height: u32) {
        self.screen_size = (width, height);
    }

    /// Output surface size in pixels
    pub fn screen_size(&self) -> (u32, u32) {
        self.screen_size
    }

    /// Whether an entity currently carries a component of the given type
    pub fn has_component(&self, entity: Entity, component: ComponentType) -> bool {
        self.components
            .get(&entity)
            .is_some_and(|set| set.contains(&component))
    }

    /// Component lifecycle notifications received so far
    pub fn lifecycle_events(&self) -> &[LifecycleEvent] {
        &self.lifecycle
    }

    /// Get an iterator over all entities
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl SceneHost for World {
    fn transform(&self, entity: Entity) -> Option<Transform> {
        self.transforms.get(&entity).copied()
    }

    fn active_camera(&self) -> Option<Entity> {
        self.active_camera
    }

    fn camera_viewport(&self, camera: Entity) -> Option<Viewport> {
        let lens = self.cameras.get(&camera)?;
        let transform = self.transforms.get(&camera).copied().unwrap_or_default();
        let (width, height) = self.screen_size;
        Some(lens.viewport(&transform, width, height))
    }

    fn on_component_created(&mut self, entity: Entity, component: ComponentType) {
        self.components.entry(entity).or_default().insert(component);
        self.lifecycle.push(LifecycleEvent::Created(entity, component));
    }

    fn on_component_destroyed(&mut self, entity: Entity, component: ComponentType) {
        if let Some(set) = self.components.get_mut(&entity) {
            set.remove(&component);
        }
        self.lifecycle.push(LifecycleEvent::Destroyed(entity, component));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_entities_get_unique_ids() {
        let mut world = World::default();
        let a = world.create_entity();
        let b = world.create_entity();
        assert_ne!(a, b);
        assert_eq!(world.entities().count(), 2);
    }

    #[test]
    fn test_viewport_requires_camera_component() {
        let mut world = World::new(640, 480);
        let entity = world.spawn(Transform::from_position(Vec3::new(1.0, 2.0, 3.0)));
        assert!(world.camera_viewport(entity).is_none());

        world.add_camera(entity, Camera::default());
        world.set_active_camera(Some(entity));
        let viewport = world.active_viewport().unwrap();
        assert_eq!((viewport.width, viewport.height), (640, 480));
        assert_eq!(viewport.position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_lifecycle_tracking() {
        let mut world = World::default();
        let entity = world.create_entity();
        world.on_component_created(entity, ComponentType::UI_CANVAS);
        assert!(world.has_component(entity, ComponentType::UI_CANVAS));
        world.on_component_destroyed(entity, ComponentType::UI_CANVAS);
        assert!(!world.has_component(entity, ComponentType::UI_CANVAS));
        assert_eq!(
            world.lifecycle_events(),
            &[
                LifecycleEvent::Created(entity, ComponentType::UI_CANVAS),
                LifecycleEvent::Destroyed(entity, ComponentType::UI_CANVAS),
            ]
        );
    }

    #[test]
    fn test_destroying_active_camera_clears_it() {
        let mut world = World::default();
        let camera = world.spawn(Transform::identity());
        world.add_camera(camera, Camera::default());
        world.set_active_camera(Some(camera));
        world.destroy_entity(camera);
        assert!(world.active_camera().is_none());
    }
}
