//! Contract with the immediate-mode UI library
//!
//! The library lays out and paints documents; this crate only feeds it input
//! and receives its draw callbacks through [`UiRenderInterface`].

use super::vertex::UiVertex;
use crate::foundation::math::Vec2;
use crate::render::TextureHandle;
use bitflags::bitflags;
use std::cell::RefCell;
use std::rc::Rc;

/// Opaque texture id as seen by the UI library
pub type TextureId = usize;

/// Turn a GPU texture handle into the id handed to the UI library
pub fn encode_texture(handle: TextureHandle) -> TextureId {
    handle.0 as TextureId
}

/// Recover the GPU texture handle from a UI texture id
pub fn decode_texture(texture: TextureId) -> TextureHandle {
    TextureHandle(texture as u32)
}

/// Texture returned by a successful load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedTexture {
    /// Id to reference the texture in draw calls
    pub handle: TextureId,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

bitflags! {
    /// Modifier keys held during an input event
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u32 {
        /// Control
        const CTRL = 1 << 0;
        /// Shift
        const SHIFT = 1 << 1;
        /// Alt
        const ALT = 1 << 2;
        /// Meta / command
        const META = 1 << 3;
        /// Caps lock active
        const CAPSLOCK = 1 << 4;
        /// Num lock active
        const NUMLOCK = 1 << 5;
    }
}

/// Loaded document inside a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u32);

/// Severity of a message logged by the UI library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiLogLevel {
    /// Always shown
    Always,
    /// Error
    Error,
    /// Failed assertion inside the library
    Assert,
    /// Warning
    Warning,
    /// Informational
    Info,
    /// Debug output
    Debug,
}

/// Rendering callbacks the UI library invokes while painting a context
pub trait UiRenderInterface {
    /// Draw indexed triangles offset by `translation` pixels
    fn render_geometry(&mut self, vertices: &[UiVertex], indices: &[u32], texture: TextureId, translation: Vec2);

    /// Toggle clipping for subsequent geometry
    fn enable_scissor_region(&mut self, enable: bool);

    /// Clip rectangle for subsequent geometry
    fn set_scissor_region(&mut self, x: i32, y: i32, width: i32, height: i32);

    /// Resolve an image by path
    fn load_texture(&mut self, source: &str) -> Option<LoadedTexture>;

    /// Create a texture from RGBA8 pixels
    fn generate_texture(&mut self, pixels: &[u8], width: u32, height: u32) -> Option<TextureId>;

    /// Release a texture obtained from this interface
    fn release_texture(&mut self, texture: TextureId);
}

/// One UI context: a document tree with its own coordinate space
pub trait UiContext {
    /// Resize the context's coordinate space
    fn set_dimensions(&mut self, width: u32, height: u32);

    /// Parse a document from markup; `source` names it for diagnostics
    fn load_document_from_memory(&mut self, markup: &str, source: &str) -> Option<DocumentId>;

    /// Make a document visible
    fn show_document(&mut self, document: DocumentId);

    /// Paint the context through the given callbacks
    fn render(&mut self, target: &mut dyn UiRenderInterface);

    /// Advance layout and time-based state
    fn update(&mut self);

    /// Pointer moved to a context-local position
    fn process_mouse_move(&mut self, x: i32, y: i32, modifiers: KeyModifiers);

    /// Pointer button pressed
    fn process_mouse_button_down(&mut self, button: u32, modifiers: KeyModifiers);

    /// Pointer button released
    fn process_mouse_button_up(&mut self, button: u32, modifiers: KeyModifiers);
}

/// Engine services the UI library calls back into
pub trait UiSystemInterface {
    /// Seconds since the engine started
    fn elapsed_time(&self) -> f64;

    /// Report a library message; returns whether execution should continue
    fn log_message(&self, level: UiLogLevel, message: &str) -> bool;
}

/// Process-wide UI library
pub trait UiLibrary {
    /// Install engine services and start the library
    fn initialise(&mut self, system: Box<dyn UiSystemInterface>) -> bool;

    /// Stop the library
    fn shutdown(&mut self);

    /// Register a font face file
    fn load_font_face(&mut self, path: &str) -> bool;

    /// Create a context under a process-unique name
    fn create_context(&mut self, name: &str, dimensions: (u32, u32)) -> Option<Box<dyn UiContext>>;

    /// Forget a context created earlier
    fn remove_context(&mut self, name: &str);
}

/// UI library shared by every registry on the producer thread
pub type SharedUiLibrary = Rc<RefCell<dyn UiLibrary>>;
