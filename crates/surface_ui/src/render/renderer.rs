//! Renderer interface used by the UI layer, plus an in-process implementation

use super::gpu::{HandleAllocator, ProgramHandle, VertexDecl};
use super::job::{Frame, JobOrder, RenderJob, RenderQueue};
use std::collections::HashMap;

/// Loaded shader identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub u32);

/// Services the UI layer consumes from the renderer
pub trait Renderer {
    /// Start loading a shader (idempotent per path)
    fn load_shader(&mut self, path: &str) -> ShaderId;

    /// Whether a shader finished loading and can produce programs
    fn is_shader_ready(&self, shader: ShaderId) -> bool;

    /// Bit index of a named shader define
    fn shader_define_index(&mut self, name: &str) -> u32;

    /// Program for a shader, vertex layout and define mask
    fn shader_program(&mut self, shader: ShaderId, decl: &VertexDecl, define_mask: u32) -> ProgramHandle;

    /// Allocator for handles that are bound to resources later
    fn handle_allocator(&self) -> HandleAllocator;

    /// Hand a finished job to the submission queue
    fn queue(&mut self, job: Box<dyn RenderJob>, order: JobOrder);
}

struct ShaderEntry {
    path: String,
    ready: bool,
}

/// A renderer with no window or GPU behind it
///
/// Keeps the bookkeeping a real backend would (shaders, defines, a program
/// cache and a job queue) and leaves execution to whoever takes the frame.
pub struct HeadlessRenderer {
    auto_ready: bool,
    shaders: Vec<ShaderEntry>,
    defines: HashMap<String, u32>,
    programs: HashMap<(ShaderId, VertexDecl, u32), ProgramHandle>,
    next_program: u32,
    handles: HandleAllocator,
    queue: RenderQueue,
}

impl HeadlessRenderer {
    /// Create a renderer; with `auto_ready` shaders are usable as soon as loaded
    pub fn new(auto_ready: bool) -> Self {
        Self::with_allocator(auto_ready, HandleAllocator::new())
    }

    /// Create a renderer sharing an existing handle allocator
    pub fn with_allocator(auto_ready: bool, handles: HandleAllocator) -> Self {
        Self {
            auto_ready,
            shaders: Vec::new(),
            defines: HashMap::new(),
            programs: HashMap::new(),
            next_program: 1,
            handles,
            queue: RenderQueue::new(),
        }
    }

    /// Finish loading a shader
    pub fn mark_shader_ready(&mut self, shader: ShaderId) {
        if let Some(entry) = self.shaders.get_mut(shader.0 as usize) {
            log::debug!("Shader '{}' ready", entry.path);
            entry.ready = true;
        }
    }

    /// Finish loading every pending shader
    pub fn mark_all_shaders_ready(&mut self) {
        for entry in &mut self.shaders {
            entry.ready = true;
        }
    }

    /// Number of distinct programs created
    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    /// Jobs waiting in the queue
    pub fn queued_jobs(&self) -> usize {
        self.queue.len()
    }

    /// Take the current frame's jobs in execution order
    pub fn take_frame(&mut self) -> Frame {
        self.queue.take_frame()
    }
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Renderer for HeadlessRenderer {
    fn load_shader(&mut self, path: &str) -> ShaderId {
        if let Some(index) = self.shaders.iter().position(|s| s.path == path) {
            return ShaderId(index as u32);
        }
        log::debug!("Loading shader '{}'", path);
        self.shaders.push(ShaderEntry {
            path: path.to_string(),
            ready: self.auto_ready,
        });
        ShaderId((self.shaders.len() - 1) as u32)
    }

    fn is_shader_ready(&self, shader: ShaderId) -> bool {
        self.shaders.get(shader.0 as usize).is_some_and(|s| s.ready)
    }

    fn shader_define_index(&mut self, name: &str) -> u32 {
        let next = self.defines.len() as u32;
        *self.defines.entry(name.to_string()).or_insert(next)
    }

    fn shader_program(&mut self, shader: ShaderId, decl: &VertexDecl, define_mask: u32) -> ProgramHandle {
        let key = (shader, decl.clone(), define_mask);
        if let Some(program) = self.programs.get(&key) {
            return *program;
        }
        let program = ProgramHandle(self.next_program);
        self.next_program += 1;
        log::debug!("Linked program {:?} for shader {:?} mask {:#x}", program, shader, define_mask);
        self.programs.insert(key, program);
        program
    }

    fn handle_allocator(&self) -> HandleAllocator {
        self.handles.clone()
    }

    fn queue(&mut self, job: Box<dyn RenderJob>, order: JobOrder) {
        self.queue.push(job, order);
    }
}
