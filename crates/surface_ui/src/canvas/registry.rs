//! # Canvas registry
//!
//! Owns the canvases of one scene. Each entity has at most one canvas; each
//! canvas owns one UI context, created with the canvas and removed with it.
//!
//! ## Lifecycle
//!
//! A canvas goes from non-existent to active to destroyed and is never
//! revived. Creation and destruction notify the scene host so the entity's
//! component set stays in sync.
//!
//! ## Focus
//!
//! At most one entity holds input focus. The first canvas created while
//! nothing is focused takes it. Destroying the focused canvas clears focus
//! without passing it on.

use super::input::{dispatch, InputEvent};
use super::Canvas;
use crate::assets::FileSystem;
use crate::config::SurfaceUiConfig;
use crate::ecs::{ComponentType, Entity, SceneHost};
use crate::error::{UiError, UiResult};
use crate::foundation::math::{IVec2, Vec2};
use crate::render::RenderPipeline;
use crate::ui::{CanvasPass, RenderBridge, SharedUiLibrary};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique UI context name for a canvas
///
/// The UI library keeps one global context namespace, so the name combines
/// the registry instance with the entity.
pub fn context_name(registry_id: u64, entity: Entity) -> String {
    format!("{registry_id}#{entity}")
}

/// Active canvases of one scene
pub struct CanvasRegistry {
    id: u64,
    library: SharedUiLibrary,
    files: Box<dyn FileSystem>,
    bridge: RenderBridge,
    canvases: Vec<Canvas>,
    focused: Option<Entity>,
    default_document: String,
    virtual_size: IVec2,
    default_3d: bool,
}

impl CanvasRegistry {
    /// Create an empty registry
    pub fn new(
        library: SharedUiLibrary,
        files: Box<dyn FileSystem>,
        bridge: RenderBridge,
        config: &SurfaceUiConfig,
    ) -> Self {
        let id = NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed);
        log::debug!("Created canvas registry {}", id);
        Self {
            id,
            library,
            files,
            bridge,
            canvases: Vec::new(),
            focused: None,
            default_document: config.default_document.clone(),
            virtual_size: IVec2::new(config.virtual_size[0] as i32, config.virtual_size[1] as i32),
            default_3d: config.default_3d,
        }
    }

    /// Instance id used in context names
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Attach a canvas to `entity`
    ///
    /// Fails with [`UiError::DuplicateCanvas`] if the entity already has one;
    /// the existing canvas is left untouched.
    pub fn create_canvas(&mut self, host: &mut dyn SceneHost, entity: Entity) -> UiResult<()> {
        if self.index_of(entity).is_some() {
            log::warn!("Entity {} already has a canvas", entity);
            return Err(UiError::DuplicateCanvas(entity));
        }

        let name = context_name(self.id, entity);
        let size = (self.virtual_size.x as u32, self.virtual_size.y as u32);
        let mut context = self
            .library
            .borrow_mut()
            .create_context(&name, size)
            .ok_or_else(|| UiError::ContextCreationFailed(name.clone()))?;

        let document = match self.files.content_sync(&self.default_document) {
            Some(markup) => {
                let document = context.load_document_from_memory(&markup, &self.default_document);
                if let Some(document) = document {
                    context.show_document(document);
                }
                document
            }
            None => {
                log::debug!("No document at '{}', canvas {} starts empty", self.default_document, entity);
                None
            }
        };

        self.canvases.push(Canvas::new(entity, self.default_3d, self.virtual_size, name, context, document));
        if self.focused.is_none() {
            self.focused = Some(entity);
        }
        host.on_component_created(entity, ComponentType::UI_CANVAS);
        log::info!("Created canvas for entity {}", entity);
        Ok(())
    }

    /// Remove the canvas of `entity` and release its context
    ///
    /// Focus on `entity` is cleared even when it has no canvas.
    pub fn destroy_canvas(&mut self, host: &mut dyn SceneHost, entity: Entity) -> UiResult<()> {
        if self.focused == Some(entity) {
            self.focused = None;
        }
        let index = self.index_of(entity).ok_or(UiError::NoCanvas(entity))?;
        let canvas = self.canvases.remove(index);
        self.library.borrow_mut().remove_context(canvas.context_name());
        drop(canvas);

        host.on_component_destroyed(entity, ComponentType::UI_CANVAS);
        log::info!("Destroyed canvas for entity {}", entity);
        Ok(())
    }

    /// Destroy every canvas
    pub fn clear(&mut self, host: &mut dyn SceneHost) {
        for canvas in self.canvases.drain(..) {
            self.library.borrow_mut().remove_context(canvas.context_name());
            host.on_component_destroyed(canvas.entity(), ComponentType::UI_CANVAS);
        }
        self.focused = None;
    }

    /// Give input focus to an entity; it need not have a canvas yet
    pub fn set_focus(&mut self, entity: Entity) {
        self.focused = Some(entity);
    }

    /// Drop input focus
    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    /// Entity holding input focus
    pub fn focused(&self) -> Option<Entity> {
        self.focused
    }

    /// Whether the canvas renders in world space, `None` without a canvas
    pub fn is_3d(&self, entity: Entity) -> Option<bool> {
        self.canvas(entity).map(Canvas::is_3d)
    }

    /// Switch a canvas between world-space and overlay rendering
    pub fn set_3d(&mut self, entity: Entity, is_3d: bool) -> UiResult<()> {
        let index = self.index_of(entity).ok_or(UiError::NoCanvas(entity))?;
        self.canvases[index].set_3d(is_3d);
        Ok(())
    }

    /// Canvas of an entity
    pub fn canvas(&self, entity: Entity) -> Option<&Canvas> {
        self.canvases.iter().find(|c| c.entity() == entity)
    }

    /// Entities with a canvas, in creation order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.canvases.iter().map(Canvas::entity)
    }

    /// Number of canvases
    pub fn len(&self) -> usize {
        self.canvases.len()
    }

    /// Whether there are no canvases
    pub fn is_empty(&self) -> bool {
        self.canvases.is_empty()
    }

    /// Render every canvas into the pipeline, one job per canvas, in creation order
    pub fn render(&mut self, host: &dyn SceneHost, pipeline: &mut dyn RenderPipeline) {
        let viewport = pipeline.viewport();
        let uniform_buffer = pipeline.drawcall_uniform_buffer();
        self.bridge.prepare_frame(pipeline.renderer());

        for canvas in &mut self.canvases {
            let Some(transform) = host.transform(canvas.entity()) else {
                log::trace!("Canvas {} has no transform, skipping", canvas.entity());
                continue;
            };

            canvas.context.set_dimensions(viewport.width, viewport.height);
            let pass = CanvasPass {
                canvas_size: Vec2::new(viewport.width as f32, viewport.height as f32),
                is_3d: canvas.is_3d(),
                position: transform.position - viewport.position,
                rotation: transform.rotation,
            };

            if !self.bridge.begin_render(pipeline.renderer(), pass, uniform_buffer) {
                continue;
            }
            canvas.context.render(&mut self.bridge);
            self.bridge.end_render(pipeline.renderer());
        }
    }

    /// Route input to the focused canvas, then advance every context
    pub fn update(&mut self, host: &dyn SceneHost, events: &[InputEvent], time_delta: f32) {
        if let Some(focused) = self.focused {
            match self.canvases.iter_mut().find(|c| c.entity() == focused) {
                Some(canvas) => {
                    for event in events {
                        dispatch(host, canvas, event);
                    }
                }
                None if !events.is_empty() => {
                    log::trace!("Focused entity {} has no canvas, dropping {} events", focused, events.len());
                }
                None => {}
            }
        }

        log::trace!("Updating {} canvases ({:.4}s)", self.canvases.len(), time_delta);
        for canvas in &mut self.canvases {
            canvas.context.update();
        }
    }

    /// Canvas configuration is not persisted
    pub fn serialize(&self, _out: &mut Vec<u8>) {}

    /// Canvas configuration is not persisted
    pub fn deserialize(&mut self, _data: &[u8]) {}

    fn index_of(&self, entity: Entity) -> Option<usize> {
        self.canvases.iter().position(|c| c.entity() == entity)
    }
}

impl Drop for CanvasRegistry {
    fn drop(&mut self) {
        let Ok(mut library) = self.library.try_borrow_mut() else {
            log::error!("UI library busy while dropping registry {}, contexts leaked", self.id);
            return;
        };
        for canvas in &self.canvases {
            library.remove_context(canvas.context_name());
        }
    }
}
