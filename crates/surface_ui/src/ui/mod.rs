//! Bridge between the immediate-mode UI library and the deferred renderer

pub mod bridge;
pub mod interface;
pub mod job;
pub mod texture;
pub mod vertex;

pub use bridge::{CanvasPass, RenderBridge, UI_JOB_ORDER};
pub use interface::{
    decode_texture, encode_texture, DocumentId, KeyModifiers, LoadedTexture, SharedUiLibrary, TextureId,
    UiContext, UiLibrary, UiLogLevel, UiRenderInterface, UiSystemInterface,
};
pub use job::{DrawCall, DrawcallUniforms, TextureUpload, UiRenderJob};
pub use texture::{SharedTextureSource, TextureInfo, TextureRequest, TextureResolver, TextureSource, TextureState};
pub use vertex::UiVertex;
