//! A `GpuDevice` that records what it is asked to do

use super::gpu::{
    BlendState, BufferFlags, BufferHandle, GpuDevice, HandleAllocator, IndexType, ProgramHandle,
    ScissorRect, TextureFlags, TextureFormat, TextureHandle,
};
use std::collections::{HashMap, HashSet};

/// One recorded device call
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCommand {
    /// Texture created and filled
    CreateTexture {
        /// Texture
        handle: TextureHandle,
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
        /// Size of the uploaded data
        byte_len: usize,
    },
    /// Buffer created
    CreateBuffer {
        /// Buffer
        handle: BufferHandle,
        /// Usage
        flags: BufferFlags,
        /// Initial contents
        data: Vec<u8>,
    },
    /// Buffer range overwritten
    UpdateBuffer {
        /// Buffer
        handle: BufferHandle,
        /// Byte offset
        offset: usize,
        /// New contents
        data: Vec<u8>,
    },
    /// Buffer released
    DestroyBuffer(BufferHandle),
    /// Blend state set
    SetBlendState(BlendState),
    /// Program bound
    UseProgram(ProgramHandle),
    /// Textures bound
    BindTextures {
        /// Textures in slot order
        textures: Vec<TextureHandle>,
        /// First slot
        first_slot: u32,
    },
    /// Uniform range bound
    BindUniformBuffer {
        /// Slot
        slot: u32,
        /// Buffer
        buffer: BufferHandle,
        /// Byte offset
        offset: usize,
        /// Byte size
        size: usize,
    },
    /// Index buffer bound
    BindIndexBuffer(BufferHandle),
    /// Vertex stream bound
    BindVertexBuffer {
        /// Stream slot
        slot: u32,
        /// Buffer or `None` to unbind
        buffer: Option<BufferHandle>,
        /// Byte offset
        offset: usize,
        /// Vertex stride
        stride: u32,
    },
    /// Scissor set
    SetScissor(Option<ScissorRect>),
    /// Indexed draw
    DrawIndexed {
        /// Byte offset into the index buffer
        index_byte_offset: usize,
        /// Number of indices
        count: u32,
        /// Index element type
        index_type: IndexType,
    },
    /// Debug group opened
    PushDebugGroup(String),
    /// Debug group closed
    PopDebugGroup,
}

/// Device that keeps every call in order, with a little resource bookkeeping
#[derive(Debug, Default)]
pub struct RecordingDevice {
    handles: HandleAllocator,
    commands: Vec<GpuCommand>,
    textures: HashSet<TextureHandle>,
    buffers: HashMap<BufferHandle, Vec<u8>>,
    debug_depth: usize,
}

impl RecordingDevice {
    /// Create a device with its own handle allocator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a device sharing a renderer's handle allocator
    pub fn with_allocator(handles: HandleAllocator) -> Self {
        Self {
            handles,
            ..Self::default()
        }
    }

    /// Commands recorded so far
    pub fn commands(&self) -> &[GpuCommand] {
        &self.commands
    }

    /// Drain the recorded commands
    pub fn take_commands(&mut self) -> Vec<GpuCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Whether a texture has been created
    pub fn has_texture(&self, handle: TextureHandle) -> bool {
        self.textures.contains(&handle)
    }

    /// Number of buffers currently alive
    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    /// Number of debug groups still open
    pub fn debug_depth(&self) -> usize {
        self.debug_depth
    }

    /// Number of draw calls recorded
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, GpuCommand::DrawIndexed { .. }))
            .count()
    }
}

impl GpuDevice for RecordingDevice {
    fn handles(&self) -> &HandleAllocator {
        &self.handles
    }

    fn create_texture(
        &mut self,
        handle: TextureHandle,
        width: u32,
        height: u32,
        _format: TextureFormat,
        _flags: TextureFlags,
        pixels: &[u8],
    ) {
        self.textures.insert(handle);
        self.commands.push(GpuCommand::CreateTexture {
            handle,
            width,
            height,
            byte_len: pixels.len(),
        });
    }

    fn create_buffer(&mut self, handle: BufferHandle, flags: BufferFlags, data: &[u8]) {
        self.buffers.insert(handle, data.to_vec());
        self.commands.push(GpuCommand::CreateBuffer {
            handle,
            flags,
            data: data.to_vec(),
        });
    }

    fn update_buffer(&mut self, handle: BufferHandle, offset: usize, data: &[u8]) {
        self.commands.push(GpuCommand::UpdateBuffer {
            handle,
            offset,
            data: data.to_vec(),
        });
    }

    fn destroy_buffer(&mut self, handle: BufferHandle) {
        if self.buffers.remove(&handle).is_none() {
            log::warn!("Destroying unknown buffer {:?}", handle);
        }
        self.commands.push(GpuCommand::DestroyBuffer(handle));
    }

    fn set_blend_state(&mut self, state: BlendState) {
        self.commands.push(GpuCommand::SetBlendState(state));
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.commands.push(GpuCommand::UseProgram(program));
    }

    fn bind_textures(&mut self, textures: &[TextureHandle], first_slot: u32) {
        self.commands.push(GpuCommand::BindTextures {
            textures: textures.to_vec(),
            first_slot,
        });
    }

    fn bind_uniform_buffer(&mut self, slot: u32, buffer: BufferHandle, offset: usize, size: usize) {
        self.commands.push(GpuCommand::BindUniformBuffer { slot, buffer, offset, size });
    }

    fn bind_index_buffer(&mut self, buffer: BufferHandle) {
        self.commands.push(GpuCommand::BindIndexBuffer(buffer));
    }

    fn bind_vertex_buffer(&mut self, slot: u32, buffer: Option<BufferHandle>, offset: usize, stride: u32) {
        self.commands.push(GpuCommand::BindVertexBuffer { slot, buffer, offset, stride });
    }

    fn set_scissor(&mut self, rect: Option<ScissorRect>) {
        self.commands.push(GpuCommand::SetScissor(rect));
    }

    fn draw_indexed(&mut self, index_byte_offset: usize, count: u32, index_type: IndexType) {
        self.commands.push(GpuCommand::DrawIndexed {
            index_byte_offset,
            count,
            index_type,
        });
    }

    fn push_debug_group(&mut self, name: &str) {
        self.debug_depth += 1;
        self.commands.push(GpuCommand::PushDebugGroup(name.to_string()));
    }

    fn pop_debug_group(&mut self) {
        self.debug_depth = self.debug_depth.saturating_sub(1);
        self.commands.push(GpuCommand::PopDebugGroup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_bookkeeping() {
        let mut device = RecordingDevice::new();
        let buffer = device.handles().alloc_buffer();
        device.create_buffer(buffer, BufferFlags::VERTEX, &[1, 2, 3]);
        assert_eq!(device.live_buffers(), 1);
        device.destroy_buffer(buffer);
        assert_eq!(device.live_buffers(), 0);
        assert_eq!(device.commands().len(), 2);
    }

    #[test]
    fn test_debug_groups_balance() {
        let mut device = RecordingDevice::new();
        device.push_debug_group("UI");
        assert_eq!(device.debug_depth(), 1);
        device.pop_debug_group();
        assert_eq!(device.debug_depth(), 0);
        assert_eq!(device.take_commands().len(), 2);
        assert!(device.commands().is_empty());
    }
}
