//! Error types for the UI layer

use crate::config::ConfigError;
use crate::ecs::Entity;

/// Errors surfaced by canvas management and texture resolution
#[derive(thiserror::Error, Debug)]
pub enum UiError {
    /// The entity already owns a canvas
    #[error("entity {0} already has a canvas")]
    DuplicateCanvas(Entity),

    /// The entity owns no canvas
    #[error("entity {0} has no canvas")]
    NoCanvas(Entity),

    /// The UI library refused to create a context
    #[error("failed to create UI context '{0}'")]
    ContextCreationFailed(String),

    /// A texture asset finished loading with an error
    #[error("failed to load texture '{0}'")]
    TextureLoadFailed(String),

    /// A blocking texture wait ran past its limit
    #[error("timed out after {waited_ms}ms waiting for texture '{path}'")]
    TextureTimeout {
        /// Asset path being waited on
        path: String,
        /// Time spent waiting
        waited_ms: u64,
    },

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The UI library failed to initialise
    #[error("UI library initialisation failed")]
    LibraryInitFailed,
}

/// Result alias for UI operations
pub type UiResult<T> = Result<T, UiError>;
