//! GPU vocabulary shared by render jobs and devices
//!
//! Handles are plain ids. They are allocated on the producing thread through a
//! [`HandleAllocator`] and bound to real resources later, when a job executes
//! on the device.

use bitflags::bitflags;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Texture identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

/// Buffer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(pub u32);

/// Linked shader program identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramHandle(pub u32);

bitflags! {
    /// Buffer usage flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferFlags: u32 {
        /// Contents are written once and never updated
        const IMMUTABLE = 1 << 0;
        /// Usable as a vertex buffer
        const VERTEX = 1 << 1;
        /// Usable as an index buffer
        const INDEX = 1 << 2;
        /// Usable as a uniform buffer
        const UNIFORM = 1 << 3;
    }
}

bitflags! {
    /// Texture creation flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextureFlags: u32 {
        /// Sample in sRGB space
        const SRGB = 1 << 0;
        /// Generate mip levels
        const MIPMAPS = 1 << 1;
        /// Clamp instead of wrap
        const CLAMP = 1 << 2;
    }
}

/// Texel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 8 bits per channel RGBA
    Rgba8,
}

impl TextureFormat {
    /// Size of one texel in bytes
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8 => 4,
        }
    }
}

/// Blend factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    /// 0
    Zero,
    /// 1
    One,
    /// Source alpha
    SrcAlpha,
    /// 1 - source alpha
    OneMinusSrcAlpha,
}

/// Fixed-function blend state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendState {
    /// Colour source factor
    pub src_color: BlendFactor,
    /// Colour destination factor
    pub dst_color: BlendFactor,
    /// Alpha source factor
    pub src_alpha: BlendFactor,
    /// Alpha destination factor
    pub dst_alpha: BlendFactor,
}

impl BlendState {
    /// UI composited additively over an opaque background
    pub const UI_COMPOSITE: Self = Self {
        src_color: BlendFactor::SrcAlpha,
        dst_color: BlendFactor::One,
        src_alpha: BlendFactor::One,
        dst_alpha: BlendFactor::One,
    };
}

/// Index element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    /// 16-bit indices
    U16,
    /// 32-bit indices
    U32,
}

impl IndexType {
    /// Size of one index in bytes
    pub const fn size(self) -> usize {
        match self {
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }
}

/// Vertex attribute formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// Two floats
    Float2,
    /// Four unsigned bytes mapped to 0..1
    UByte4Norm,
}

/// One attribute of a vertex layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Shader semantic name
    pub semantic: &'static str,
    /// Data format
    pub format: VertexFormat,
    /// Byte offset inside the vertex
    pub offset: u32,
}

/// Vertex layout declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexDecl {
    /// Attributes in binding order
    pub attributes: Vec<VertexAttribute>,
    /// Distance between consecutive vertices in bytes
    pub stride: u32,
}

impl VertexDecl {
    /// Layout of [`crate::ui::UiVertex`]
    pub fn ui() -> Self {
        Self {
            attributes: vec![
                VertexAttribute { semantic: "POSITION", format: VertexFormat::Float2, offset: 0 },
                VertexAttribute { semantic: "COLOR0", format: VertexFormat::UByte4Norm, offset: 8 },
                VertexAttribute { semantic: "TEXCOORD0", format: VertexFormat::Float2, offset: 12 },
            ],
            stride: 20,
        }
    }
}

/// Scissor rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScissorRect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width
    pub width: i32,
    /// Height
    pub height: i32,
}

/// Thread-safe source of fresh GPU handles
///
/// Clones share the same counters, so handles allocated on the producing
/// thread never collide with those a device allocates while executing.
#[derive(Debug, Clone)]
pub struct HandleAllocator {
    next_texture: Arc<AtomicU32>,
    next_buffer: Arc<AtomicU32>,
}

impl HandleAllocator {
    /// Create an allocator; ids start at 1 so 0 can mean "no texture"
    pub fn new() -> Self {
        Self {
            next_texture: Arc::new(AtomicU32::new(1)),
            next_buffer: Arc::new(AtomicU32::new(1)),
        }
    }

    /// Reserve a texture handle
    pub fn alloc_texture(&self) -> TextureHandle {
        TextureHandle(self.next_texture.fetch_add(1, Ordering::Relaxed))
    }

    /// Reserve a buffer handle
    pub fn alloc_buffer(&self) -> BufferHandle {
        BufferHandle(self.next_buffer.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for HandleAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Command-recording interface a render job executes against
pub trait GpuDevice {
    /// Handle allocator shared with the producing side
    fn handles(&self) -> &HandleAllocator;

    /// Create a texture under a pre-allocated handle and upload its texels
    fn create_texture(
        &mut self,
        handle: TextureHandle,
        width: u32,
        height: u32,
        format: TextureFormat,
        flags: TextureFlags,
        pixels: &[u8],
    );

    /// Create a buffer under a pre-allocated handle
    fn create_buffer(&mut self, handle: BufferHandle, flags: BufferFlags, data: &[u8]);

    /// Overwrite part of a buffer
    fn update_buffer(&mut self, handle: BufferHandle, offset: usize, data: &[u8]);

    /// Release a buffer
    fn destroy_buffer(&mut self, handle: BufferHandle);

    /// Set blend state
    fn set_blend_state(&mut self, state: BlendState);

    /// Bind a shader program
    fn use_program(&mut self, program: ProgramHandle);

    /// Bind textures to consecutive slots starting at `first_slot`
    fn bind_textures(&mut self, textures: &[TextureHandle], first_slot: u32);

    /// Bind a range of a buffer as uniforms
    fn bind_uniform_buffer(&mut self, slot: u32, buffer: BufferHandle, offset: usize, size: usize);

    /// Bind the index buffer
    fn bind_index_buffer(&mut self, buffer: BufferHandle);

    /// Bind (or unbind with `None`) a vertex stream
    fn bind_vertex_buffer(&mut self, slot: u32, buffer: Option<BufferHandle>, offset: usize, stride: u32);

    /// Enable a scissor rectangle, or disable scissoring with `None`
    fn set_scissor(&mut self, rect: Option<ScissorRect>);

    /// Indexed draw starting at `index_byte_offset`
    fn draw_indexed(&mut self, index_byte_offset: usize, count: u32, index_type: IndexType);

    /// Open a named debug region
    fn push_debug_group(&mut self, name: &str);

    /// Close the innermost debug region
    fn pop_debug_group(&mut self);
}
