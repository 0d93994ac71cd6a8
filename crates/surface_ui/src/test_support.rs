//! Scripted collaborators for unit tests

use crate::assets::FileSystem;
use crate::ecs::{Entity, World};
use crate::foundation::math::{Quat, Transform, Vec2, Vec3};
use crate::render::{Camera, HandleAllocator};
use crate::ui::{
    DocumentId, KeyModifiers, TextureInfo, TextureRequest, TextureSource, TextureState, UiContext, UiLibrary,
    UiRenderInterface, UiSystemInterface, UiVertex,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Paint routine run by every mock context
pub type Painter = Rc<dyn Fn(&mut dyn UiRenderInterface)>;

/// Emits one textured quad
pub fn quad_painter() -> Painter {
    Rc::new(|target: &mut dyn UiRenderInterface| {
        let v = UiVertex::new([0.0, 0.0], [255; 4], [0.0, 0.0]);
        target.render_geometry(&[v; 4], &[0, 1, 2, 0, 2, 3], 0, Vec2::zeros());
    })
}

/// Everything a mock context was asked to do
#[derive(Debug, Default)]
pub struct ContextLog {
    pub dimensions: Vec<(u32, u32)>,
    pub documents: Vec<String>,
    pub shown: Vec<DocumentId>,
    pub renders: usize,
    pub updates: usize,
    pub mouse_moves: Vec<(i32, i32)>,
    pub buttons: Vec<(u32, bool)>,
}

pub struct MockContext {
    log: Rc<RefCell<ContextLog>>,
    painter: Option<Painter>,
    next_document: u32,
}

impl UiContext for MockContext {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.log.borrow_mut().dimensions.push((width, height));
    }

    fn load_document_from_memory(&mut self, _markup: &str, source: &str) -> Option<DocumentId> {
        self.log.borrow_mut().documents.push(source.to_string());
        self.next_document += 1;
        Some(DocumentId(self.next_document))
    }

    fn show_document(&mut self, document: DocumentId) {
        self.log.borrow_mut().shown.push(document);
    }

    fn render(&mut self, target: &mut dyn UiRenderInterface) {
        self.log.borrow_mut().renders += 1;
        if let Some(painter) = &self.painter {
            painter(target);
        }
    }

    fn update(&mut self) {
        self.log.borrow_mut().updates += 1;
    }

    fn process_mouse_move(&mut self, x: i32, y: i32, _modifiers: KeyModifiers) {
        self.log.borrow_mut().mouse_moves.push((x, y));
    }

    fn process_mouse_button_down(&mut self, button: u32, _modifiers: KeyModifiers) {
        self.log.borrow_mut().buttons.push((button, true));
    }

    fn process_mouse_button_up(&mut self, button: u32, _modifiers: KeyModifiers) {
        self.log.borrow_mut().buttons.push((button, false));
    }
}

#[derive(Default)]
pub struct MockLibrary {
    pub initialised: bool,
    pub shut_down: bool,
    pub fail_init: bool,
    pub fail_create: bool,
    pub rejected_fonts: Vec<String>,
    pub fonts: Vec<String>,
    pub live: Vec<String>,
    pub created: Vec<String>,
    pub removed: Vec<String>,
    pub logs: HashMap<String, Rc<RefCell<ContextLog>>>,
    pub painter: Option<Painter>,
    pub system: Option<Box<dyn UiSystemInterface>>,
}

impl MockLibrary {
    /// Library whose contexts paint one quad each
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            painter: Some(quad_painter()),
            ..Self::default()
        }))
    }

    pub fn log(&self, name: &str) -> Rc<RefCell<ContextLog>> {
        Rc::clone(&self.logs[name])
    }
}

impl UiLibrary for MockLibrary {
    fn initialise(&mut self, system: Box<dyn UiSystemInterface>) -> bool {
        if self.fail_init {
            return false;
        }
        self.system = Some(system);
        self.initialised = true;
        true
    }

    fn shutdown(&mut self) {
        self.shut_down = true;
    }

    fn load_font_face(&mut self, path: &str) -> bool {
        if self.rejected_fonts.iter().any(|f| f == path) {
            return false;
        }
        self.fonts.push(path.to_string());
        true
    }

    fn create_context(&mut self, name: &str, dimensions: (u32, u32)) -> Option<Box<dyn UiContext>> {
        if self.fail_create || self.live.iter().any(|n| n == name) {
            return None;
        }
        let log = Rc::new(RefCell::new(ContextLog::default()));
        log.borrow_mut().dimensions.push(dimensions);
        self.live.push(name.to_string());
        self.created.push(name.to_string());
        self.logs.insert(name.to_string(), Rc::clone(&log));
        Some(Box::new(MockContext {
            log,
            painter: self.painter.clone(),
            next_document: 0,
        }))
    }

    fn remove_context(&mut self, name: &str) {
        self.live.retain(|n| n != name);
        self.removed.push(name.to_string());
    }
}

/// In-memory file system
#[derive(Default)]
pub struct MockFiles {
    files: HashMap<String, String>,
}

impl MockFiles {
    pub fn with(mut self, path: &str, contents: &str) -> Self {
        self.files.insert(path.to_string(), contents.to_string());
        self
    }
}

impl FileSystem for MockFiles {
    fn content_sync(&self, path: &str) -> Option<String> {
        self.files.get(path).cloned()
    }
}

/// Scripted outcome of a texture request
#[derive(Debug, Clone, Copy)]
pub enum ScriptedTexture {
    /// Ready after this many callback passes, with width and height
    ReadyAfter(u32, u32, u32),
    Fail,
    Never,
}

#[derive(Default)]
pub struct ScriptedTextureSource {
    scripts: HashMap<String, ScriptedTexture>,
    requests: Vec<ScriptedRequest>,
}

struct ScriptedRequest {
    path: String,
    passes: u32,
    loaded: Option<TextureInfo>,
}

impl ScriptedTextureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, script: ScriptedTexture) -> Self {
        self.scripts.insert(path.to_string(), script);
        self
    }
}

impl TextureSource for ScriptedTextureSource {
    fn request(&mut self, path: &str) -> TextureRequest {
        let index = match self.requests.iter().position(|r| r.path == path) {
            Some(index) => index,
            None => {
                self.requests.push(ScriptedRequest {
                    path: path.to_string(),
                    passes: 0,
                    loaded: None,
                });
                self.requests.len() - 1
            }
        };
        TextureRequest(index as u64)
    }

    fn state(&self, request: TextureRequest) -> TextureState {
        let Some(entry) = self.requests.get(request.0 as usize) else {
            return TextureState::Failed;
        };
        if let Some(info) = entry.loaded {
            return TextureState::Ready(info);
        }
        match self.scripts.get(&entry.path) {
            Some(ScriptedTexture::ReadyAfter(..) | ScriptedTexture::Never) => TextureState::Pending,
            Some(ScriptedTexture::Fail) | None => TextureState::Failed,
        }
    }

    fn process_callbacks(&mut self, handles: &HandleAllocator) {
        for entry in &mut self.requests {
            entry.passes += 1;
            if let Some(ScriptedTexture::ReadyAfter(needed, width, height)) = self.scripts.get(&entry.path) {
                if entry.loaded.is_none() && entry.passes >= *needed {
                    entry.loaded = Some(TextureInfo {
                        handle: handles.alloc_texture(),
                        width: *width,
                        height: *height,
                    });
                }
            }
        }
    }
}

/// 800x600 world with an active camera at the origin looking down +Z
pub fn scene() -> (World, Entity) {
    let mut world = World::new(800, 600);
    let turned = Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::PI);
    let camera = world.spawn(Transform::from_position_rotation(Vec3::zeros(), turned));
    world.add_camera(camera, Camera::perspective(60.0, 0.1, 100.0));
    world.set_active_camera(Some(camera));
    (world, camera)
}
