//! A UI surface owned by one entity

use crate::ecs::Entity;
use crate::foundation::math::IVec2;
use crate::ui::{DocumentId, UiContext};

/// UI surface bound to an entity, owning its UI context
pub struct Canvas {
    entity: Entity,
    is_3d: bool,
    virtual_size: IVec2,
    context_name: String,
    pub(crate) context: Box<dyn UiContext>,
    document: Option<DocumentId>,
}

impl Canvas {
    pub(crate) fn new(
        entity: Entity,
        is_3d: bool,
        virtual_size: IVec2,
        context_name: String,
        context: Box<dyn UiContext>,
        document: Option<DocumentId>,
    ) -> Self {
        Self {
            entity,
            is_3d,
            virtual_size,
            context_name,
            context,
            document,
        }
    }

    /// Owning entity
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Rendered in world space rather than as a screen overlay
    pub fn is_3d(&self) -> bool {
        self.is_3d
    }

    pub(crate) fn set_3d(&mut self, is_3d: bool) {
        self.is_3d = is_3d;
    }

    /// Logical size the context was created with
    pub fn virtual_size(&self) -> IVec2 {
        self.virtual_size
    }

    /// Process-unique name of the UI context
    pub fn context_name(&self) -> &str {
        &self.context_name
    }

    /// Default document, if it was found and parsed
    pub fn document(&self) -> Option<DocumentId> {
        self.document
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("entity", &self.entity)
            .field("is_3d", &self.is_3d)
            .field("virtual_size", &self.virtual_size)
            .field("context_name", &self.context_name)
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}
