//! Entity-Component-System implementation
//!
//! A deliberately small scene: entities, transforms, cameras and a component
//! lifecycle log. Hosts with their own scene graph implement [`SceneHost`]
//! instead of using [`World`].

pub mod entity;
pub mod host;
pub mod world;

pub use entity::Entity;
pub use host::{ComponentType, SceneHost};
pub use world::{LifecycleEvent, World};
