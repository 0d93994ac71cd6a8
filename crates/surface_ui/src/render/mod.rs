//! Rendering seam between the UI layer and the GPU
//!
//! Jobs are recorded on the producing thread against the [`Renderer`] trait
//! and replayed later against a [`GpuDevice`].

pub mod camera;
pub mod gpu;
pub mod job;
pub mod pipeline;
pub mod recording;
pub mod renderer;
pub mod thread;

pub use camera::{Camera, Viewport};
pub use gpu::{
    BlendState, BufferFlags, BufferHandle, GpuDevice, HandleAllocator, IndexType, ProgramHandle,
    ScissorRect, TextureFlags, TextureFormat, TextureHandle, VertexDecl,
};
pub use job::{Frame, JobOrder, RenderJob, RenderQueue};
pub use pipeline::{Pipeline, RenderPipeline};
pub use recording::{GpuCommand, RecordingDevice};
pub use renderer::{HeadlessRenderer, Renderer, ShaderId};
pub use thread::RenderThread;
