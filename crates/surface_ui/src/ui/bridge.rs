//! # Render bridge
//!
//! Implements [`UiRenderInterface`] for the UI library. While a canvas paints,
//! every callback is recorded into a [`UiRenderJob`]; nothing touches the GPU.
//! Ending the pass hands the job to the renderer's queue and the bridge keeps
//! no reference to it.
//!
//! Loaded and generated textures both take their handles from the
//! renderer's allocator, captured when the frame is prepared.
//!
//! One shader serves every canvas. The flat program is built with no defines,
//! the world-space program with the spatial define bit set.

use super::interface::{encode_texture, LoadedTexture, TextureId, UiRenderInterface};
use super::job::{DrawCall, TextureUpload, UiRenderJob};
use super::texture::TextureResolver;
use super::vertex::UiVertex;
use crate::foundation::math::{Quat, Vec2, Vec3};
use crate::render::{BufferHandle, HandleAllocator, JobOrder, Renderer, ScissorRect, ShaderId, VertexDecl};

/// Queue position of UI jobs; canvases of equal key keep registry order
pub const UI_JOB_ORDER: JobOrder = 0;

/// Per-canvas parameters of one render pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPass {
    /// Logical canvas size in pixels
    pub canvas_size: Vec2,
    /// World-space canvas
    pub is_3d: bool,
    /// Canvas position, camera relative
    pub position: Vec3,
    /// Canvas rotation
    pub rotation: Quat,
}

struct ActivePass {
    job: UiRenderJob,
    pass: CanvasPass,
    scissor_enabled: bool,
    scissor: ScissorRect,
}

/// Adapter between UI draw callbacks and deferred render jobs
pub struct RenderBridge {
    shader_path: String,
    spatial_define: String,
    shader: Option<ShaderId>,
    spatial_mask: u32,
    handles: Option<HandleAllocator>,
    textures: TextureResolver,
    active: Option<ActivePass>,
}

impl RenderBridge {
    /// Create a bridge for the given shader and spatial define
    pub fn new(shader_path: impl Into<String>, spatial_define: impl Into<String>, textures: TextureResolver) -> Self {
        Self {
            shader_path: shader_path.into(),
            spatial_define: spatial_define.into(),
            shader: None,
            spatial_mask: 0,
            handles: None,
            textures,
            active: None,
        }
    }

    /// Once per frame before any canvas renders
    pub fn prepare_frame(&mut self, renderer: &mut dyn Renderer) {
        if self.shader.is_none() {
            self.shader = Some(renderer.load_shader(&self.shader_path));
        }
        let index = renderer.shader_define_index(&self.spatial_define);
        self.spatial_mask = match 1u32.checked_shl(index) {
            Some(mask) => mask,
            None => {
                log::error!(
                    "Define '{}' has index {}, beyond the 32-bit program mask; spatial canvases render flat",
                    self.spatial_define,
                    index
                );
                0
            }
        };
        self.handles = Some(renderer.handle_allocator());
    }

    /// Open a pass for one canvas
    ///
    /// Returns `false` while the shader is not loaded yet; the canvas then
    /// renders nothing this frame.
    pub fn begin_render(&mut self, renderer: &mut dyn Renderer, pass: CanvasPass, uniform_buffer: BufferHandle) -> bool {
        match self.shader {
            Some(shader) if renderer.is_shader_ready(shader) => {}
            _ => {
                log::debug!("UI shader '{}' not ready, skipping canvas", self.shader_path);
                return false;
            }
        }

        if self.active.is_some() {
            log::warn!("Render pass opened while another is active, dropping the previous one");
        }

        self.handles = Some(renderer.handle_allocator());
        self.active = Some(ActivePass {
            job: UiRenderJob::new(pass.canvas_size, uniform_buffer),
            pass,
            scissor_enabled: false,
            scissor: ScissorRect::default(),
        });
        true
    }

    /// Close the pass and queue its job
    pub fn end_render(&mut self, renderer: &mut dyn Renderer) -> bool {
        let (Some(active), Some(shader)) = (self.active.take(), self.shader) else {
            return false;
        };

        let decl = VertexDecl::ui();
        let flat = renderer.shader_program(shader, &decl, 0);
        let spatial = renderer.shader_program(shader, &decl, self.spatial_mask);

        let mut job = active.job;
        job.set_programs(flat, spatial);
        log::trace!(
            "Queueing UI job: {} draw calls, {} uploads",
            job.draw_calls().len(),
            job.texture_uploads().len()
        );
        renderer.queue(Box::new(job), UI_JOB_ORDER);
        true
    }

    /// Whether a pass is open
    pub fn is_rendering(&self) -> bool {
        self.active.is_some()
    }

    /// Bit mask selecting the spatial program variant
    pub fn spatial_mask(&self) -> u32 {
        self.spatial_mask
    }
}

impl UiRenderInterface for RenderBridge {
    fn render_geometry(&mut self, vertices: &[UiVertex], indices: &[u32], texture: TextureId, translation: Vec2) {
        if indices.is_empty() {
            return;
        }
        let Some(active) = self.active.as_mut() else {
            log::trace!("Geometry outside a render pass ignored");
            return;
        };

        let template = DrawCall {
            vertex_offset: 0,
            index_offset: 0,
            vertex_count: 0,
            index_count: 0,
            texture,
            translation,
            scissor: active.scissor,
            scissor_enabled: active.scissor_enabled,
            is_3d: active.pass.is_3d,
            position: active.pass.position,
            rotation: active.pass.rotation,
        };
        active.job.push_geometry(vertices, indices, template);
    }

    fn enable_scissor_region(&mut self, enable: bool) {
        if let Some(active) = self.active.as_mut() {
            active.scissor_enabled = enable;
        }
    }

    fn set_scissor_region(&mut self, x: i32, y: i32, width: i32, height: i32) {
        if let Some(active) = self.active.as_mut() {
            active.scissor = ScissorRect { x, y, width, height };
        }
    }

    fn load_texture(&mut self, source: &str) -> Option<LoadedTexture> {
        let Some(handles) = self.handles.as_ref() else {
            log::warn!("Texture '{}' requested before the first frame was prepared", source);
            return None;
        };
        match self.textures.resolve_blocking(source, handles) {
            Ok(info) => Some(LoadedTexture {
                handle: encode_texture(info.handle),
                width: info.width,
                height: info.height,
            }),
            Err(err) => {
                log::warn!("{}", err);
                None
            }
        }
    }

    fn generate_texture(&mut self, pixels: &[u8], width: u32, height: u32) -> Option<TextureId> {
        let (Some(active), Some(handles)) = (self.active.as_mut(), self.handles.as_ref()) else {
            log::warn!("Texture generated outside a render pass");
            return None;
        };
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            log::warn!("Generated texture has {} bytes, expected {}", pixels.len(), expected);
            return None;
        }

        let handle = handles.alloc_texture();
        active.job.push_upload(TextureUpload {
            handle,
            width,
            height,
            pixels: pixels.to_vec(),
        });
        Some(encode_texture(handle))
    }

    fn release_texture(&mut self, texture: TextureId) {
        panic!("UI textures are owned by the asset system and cannot be released (texture {})", texture);
    }
}
