//! # UI render job
//!
//! Everything one canvas painted in one frame: pending texture uploads, a
//! shared vertex/index stream and the ordered draw calls addressing it.
//!
//! ## Execution Order
//!
//! 1. Create every queued texture, then forget the uploads
//! 2. Upload the vertex and index streams as two buffers
//! 3. Replay draw calls in emission order
//! 4. Destroy both buffers
//!
//! Uploads always precede draws, so a texture generated mid-paint is valid by
//! the time any draw call samples it.

use super::interface::{decode_texture, TextureId};
use super::vertex::UiVertex;
use crate::foundation::math::{utils, Quat, Vec2, Vec3};
use crate::render::{
    BlendState, BufferFlags, BufferHandle, GpuDevice, IndexType, ProgramHandle, RenderJob, ScissorRect,
    TextureFlags, TextureFormat, TextureHandle,
};
use bytemuck::{Pod, Zeroable};

/// Uniform slot the per-drawcall block is bound to
pub const DRAWCALL_UNIFORM_SLOT: u32 = 4;

/// A texture waiting to be created on the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureUpload {
    /// Handle reserved when the upload was requested
    pub handle: TextureHandle,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// RGBA8 texels
    pub pixels: Vec<u8>,
}

/// Recorded UI draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    /// First vertex in the job's vertex stream
    pub vertex_offset: u32,
    /// First index in the job's index stream
    pub index_offset: u32,
    /// Number of vertices
    pub vertex_count: u32,
    /// Number of indices
    pub index_count: u32,
    /// Texture to sample, 0 for none
    pub texture: TextureId,
    /// Pixel offset applied in the shader
    pub translation: Vec2,
    /// Clip rectangle captured at emission
    pub scissor: ScissorRect,
    /// Whether clipping was on at emission
    pub scissor_enabled: bool,
    /// World-space canvas
    pub is_3d: bool,
    /// Canvas position, camera relative
    pub position: Vec3,
    /// Canvas rotation
    pub rotation: Quat,
}

/// Per-drawcall uniform block
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DrawcallUniforms {
    /// Canvas rotation, `[x, y, z, w]`
    pub rotation: [f32; 4],
    /// Canvas position with w = 1
    pub position: [f32; 4],
    /// Canvas logical size
    pub canvas_size: [f32; 2],
    /// Draw call translation
    pub translation: [f32; 2],
}

impl DrawcallUniforms {
    fn for_call(call: &DrawCall, canvas_size: Vec2) -> Self {
        Self {
            rotation: utils::quat_to_array(&call.rotation),
            position: [call.position.x, call.position.y, call.position.z, 1.0],
            canvas_size: [canvas_size.x, canvas_size.y],
            translation: [call.translation.x, call.translation.y],
        }
    }
}

/// One canvas frame, ready to run on the GPU thread
#[derive(Debug, Clone)]
pub struct UiRenderJob {
    draw_calls: Vec<DrawCall>,
    vertices: Vec<UiVertex>,
    indices: Vec<u32>,
    texture_uploads: Vec<TextureUpload>,
    canvas_size: Vec2,
    uniform_buffer: BufferHandle,
    flat_program: ProgramHandle,
    spatial_program: ProgramHandle,
}

impl UiRenderJob {
    /// Empty job for a canvas of `canvas_size` logical pixels
    pub fn new(canvas_size: Vec2, uniform_buffer: BufferHandle) -> Self {
        Self {
            draw_calls: Vec::new(),
            vertices: Vec::new(),
            indices: Vec::new(),
            texture_uploads: Vec::new(),
            canvas_size,
            uniform_buffer,
            flat_program: ProgramHandle(0),
            spatial_program: ProgramHandle(0),
        }
    }

    /// Append geometry; empty index lists are ignored
    pub fn push_geometry(&mut self, vertices: &[UiVertex], indices: &[u32], template: DrawCall) {
        if indices.is_empty() {
            return;
        }
        let call = DrawCall {
            vertex_offset: self.vertices.len() as u32,
            index_offset: self.indices.len() as u32,
            vertex_count: vertices.len() as u32,
            index_count: indices.len() as u32,
            ..template
        };
        self.vertices.extend_from_slice(vertices);
        self.indices.extend_from_slice(indices);
        self.draw_calls.push(call);
    }

    /// Queue a texture for creation before any draw call runs
    pub fn push_upload(&mut self, upload: TextureUpload) {
        self.texture_uploads.push(upload);
    }

    /// Programs used for flat and world-space draw calls
    pub fn set_programs(&mut self, flat: ProgramHandle, spatial: ProgramHandle) {
        self.flat_program = flat;
        self.spatial_program = spatial;
    }

    /// Recorded draw calls in emission order
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    /// Shared vertex stream
    pub fn vertices(&self) -> &[UiVertex] {
        &self.vertices
    }

    /// Shared index stream
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Uploads not yet executed
    pub fn texture_uploads(&self) -> &[TextureUpload] {
        &self.texture_uploads
    }

    fn program_for(&self, call: &DrawCall) -> ProgramHandle {
        if call.is_3d {
            self.spatial_program
        } else {
            self.flat_program
        }
    }
}

/// Create queued textures on the device and clear the list
pub(crate) fn execute_uploads(uploads: &mut Vec<TextureUpload>, device: &mut dyn GpuDevice) {
    for upload in uploads.drain(..) {
        device.create_texture(
            upload.handle,
            upload.width,
            upload.height,
            TextureFormat::Rgba8,
            TextureFlags::empty(),
            &upload.pixels,
        );
    }
}

impl RenderJob for UiRenderJob {
    fn execute(&mut self, device: &mut dyn GpuDevice) {
        execute_uploads(&mut self.texture_uploads, device);

        if self.draw_calls.is_empty() {
            return;
        }

        device.push_debug_group("UI");

        let vertex_buffer = device.handles().alloc_buffer();
        let index_buffer = device.handles().alloc_buffer();
        device.create_buffer(
            vertex_buffer,
            BufferFlags::IMMUTABLE | BufferFlags::VERTEX,
            bytemuck::cast_slice(&self.vertices),
        );
        device.create_buffer(
            index_buffer,
            BufferFlags::IMMUTABLE | BufferFlags::INDEX,
            bytemuck::cast_slice(&self.indices),
        );

        device.set_blend_state(BlendState::UI_COMPOSITE);

        let stride = std::mem::size_of::<UiVertex>();
        let uniform_size = std::mem::size_of::<DrawcallUniforms>();
        for call in &self.draw_calls {
            device.use_program(self.program_for(call));
            device.bind_textures(&[decode_texture(call.texture)], 0);

            let uniforms = DrawcallUniforms::for_call(call, self.canvas_size);
            device.update_buffer(self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
            device.bind_uniform_buffer(DRAWCALL_UNIFORM_SLOT, self.uniform_buffer, 0, uniform_size);

            device.bind_index_buffer(index_buffer);
            device.bind_vertex_buffer(0, Some(vertex_buffer), call.vertex_offset as usize * stride, stride as u32);
            device.bind_vertex_buffer(1, None, 0, 0);

            // screen-space clipping is meaningless for world-space canvases
            if call.scissor_enabled && !call.is_3d {
                device.set_scissor(Some(call.scissor));
            } else {
                device.set_scissor(None);
            }

            device.draw_indexed(
                call.index_offset as usize * IndexType::U32.size(),
                call.index_count,
                IndexType::U32,
            );
        }

        device.destroy_buffer(vertex_buffer);
        device.destroy_buffer(index_buffer);
        device.pop_debug_group();
    }

    fn label(&self) -> &str {
        "ui"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{GpuCommand, RecordingDevice};

    fn template(is_3d: bool) -> DrawCall {
        DrawCall {
            vertex_offset: 0,
            index_offset: 0,
            vertex_count: 0,
            index_count: 0,
            texture: 0,
            translation: Vec2::new(10.0, 20.0),
            scissor: ScissorRect { x: 1, y: 2, width: 30, height: 40 },
            scissor_enabled: true,
            is_3d,
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::identity(),
        }
    }

    fn quad() -> (Vec<UiVertex>, Vec<u32>) {
        let v = UiVertex::new([0.0, 0.0], [255; 4], [0.0, 0.0]);
        (vec![v; 4], vec![0, 1, 2, 0, 2, 3])
    }

    #[test]
    fn test_uniform_block_size() {
        assert_eq!(std::mem::size_of::<DrawcallUniforms>(), 48);
    }

    #[test]
    fn test_offsets_accumulate() {
        let (vertices, indices) = quad();
        let mut job = UiRenderJob::new(Vec2::new(800.0, 600.0), BufferHandle(1));
        job.push_geometry(&vertices, &indices, template(false));
        job.push_geometry(&vertices, &indices, template(false));
        let calls = job.draw_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!((calls[1].vertex_offset, calls[1].index_offset), (4, 6));
        assert_eq!(job.vertices().len(), 8);
        assert_eq!(job.indices().len(), 12);
    }

    #[test]
    fn test_empty_indices_ignored() {
        let (vertices, _) = quad();
        let mut job = UiRenderJob::new(Vec2::new(800.0, 600.0), BufferHandle(1));
        job.push_geometry(&vertices, &[], template(false));
        assert!(job.draw_calls().is_empty());
        assert!(job.vertices().is_empty());
        assert!(job.indices().is_empty());
    }

    #[test]
    fn test_uploads_run_once() {
        let mut job = UiRenderJob::new(Vec2::new(8.0, 8.0), BufferHandle(1));
        job.push_upload(TextureUpload { handle: TextureHandle(9), width: 1, height: 1, pixels: vec![0; 4] });
        let mut device = RecordingDevice::new();
        job.execute(&mut device);
        job.execute(&mut device);
        let created = device
            .commands()
            .iter()
            .filter(|c| matches!(c, GpuCommand::CreateTexture { .. }))
            .count();
        assert_eq!(created, 1);
        assert!(job.texture_uploads().is_empty());
        // no draw calls, so no buffers or debug group
        assert_eq!(device.commands().len(), 1);
    }

    #[test]
    fn test_execution_sequence() {
        let (vertices, indices) = quad();
        let mut job = UiRenderJob::new(Vec2::new(800.0, 600.0), BufferHandle(77));
        job.set_programs(ProgramHandle(1), ProgramHandle(2));
        job.push_geometry(&vertices, &indices, template(false));
        job.push_geometry(&vertices, &indices, template(true));

        let mut device = RecordingDevice::new();
        job.execute(&mut device);

        let commands = device.commands();
        assert_eq!(commands.first(), Some(&GpuCommand::PushDebugGroup("UI".to_string())));
        assert_eq!(commands.last(), Some(&GpuCommand::PopDebugGroup));
        assert!(commands.contains(&GpuCommand::SetBlendState(BlendState::UI_COMPOSITE)));

        let programs: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                GpuCommand::UseProgram(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(programs, vec![ProgramHandle(1), ProgramHandle(2)]);

        let scissors: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                GpuCommand::SetScissor(s) => Some(*s),
                _ => None,
            })
            .collect();
        assert_eq!(scissors, vec![Some(template(false).scissor), None]);

        let draws: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                GpuCommand::DrawIndexed { index_byte_offset, count, .. } => Some((*index_byte_offset, *count)),
                _ => None,
            })
            .collect();
        assert_eq!(draws, vec![(0, 6), (24, 6)]);

        assert!(commands.contains(&GpuCommand::BindVertexBuffer {
            slot: 0,
            buffer: Some(BufferHandle(1)),
            offset: 80,
            stride: 20,
        }));
        assert!(commands.contains(&GpuCommand::BindUniformBuffer {
            slot: DRAWCALL_UNIFORM_SLOT,
            buffer: BufferHandle(77),
            offset: 0,
            size: 48,
        }));
        assert_eq!(device.live_buffers(), 0);
    }

    #[test]
    fn test_uniform_contents() {
        let uniforms = DrawcallUniforms::for_call(&template(true), Vec2::new(800.0, 600.0));
        assert_eq!(uniforms.position, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniforms.rotation, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(uniforms.canvas_size, [800.0, 600.0]);
        assert_eq!(uniforms.translation, [10.0, 20.0]);
    }
}
