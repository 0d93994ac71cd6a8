//! Render pipeline: the current render target, its viewport and the renderer

use super::camera::Viewport;
use super::gpu::BufferHandle;
use super::renderer::Renderer;

/// What a canvas registry needs from whoever drives rendering
pub trait RenderPipeline {
    /// Viewport of the target being rendered
    fn viewport(&self) -> Viewport;

    /// Uniform buffer reserved for per-drawcall data
    fn drawcall_uniform_buffer(&self) -> BufferHandle;

    /// The renderer jobs are submitted to
    fn renderer(&mut self) -> &mut dyn Renderer;
}

/// Pipeline over any concrete renderer
pub struct Pipeline<R: Renderer> {
    renderer: R,
    viewport: Viewport,
    drawcall_uniforms: BufferHandle,
}

impl<R: Renderer> Pipeline<R> {
    /// Wrap a renderer, reserving the per-drawcall uniform buffer
    pub fn new(renderer: R, viewport: Viewport) -> Self {
        let drawcall_uniforms = renderer.handle_allocator().alloc_buffer();
        Self {
            renderer,
            viewport,
            drawcall_uniforms,
        }
    }

    /// Replace the viewport, e.g. after the camera moved or the window resized
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Concrete renderer
    pub fn renderer_ref(&self) -> &R {
        &self.renderer
    }

    /// Concrete renderer, mutably
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

impl<R: Renderer> RenderPipeline for Pipeline<R> {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn drawcall_uniform_buffer(&self) -> BufferHandle {
        self.drawcall_uniforms
    }

    fn renderer(&mut self) -> &mut dyn Renderer {
        &mut self.renderer
    }
}
