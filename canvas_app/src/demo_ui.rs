//! A tiny stand-in UI library for the demo
//!
//! Each context paints a background panel and one button. The button lights
//! up while the pointer is over it and uses a checker texture generated on
//! the first frame.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use surface_ui::foundation::math::Vec2;
use surface_ui::ui::{
    DocumentId, KeyModifiers, TextureId, UiContext, UiLibrary, UiLogLevel, UiRenderInterface, UiSystemInterface,
    UiVertex,
};

const BUTTON: (i32, i32, i32, i32) = (300, 250, 200, 100);

fn quad(x: f32, y: f32, w: f32, h: f32, colour: [u8; 4]) -> ([UiVertex; 4], [u32; 6]) {
    (
        [
            UiVertex::new([x, y], colour, [0.0, 0.0]),
            UiVertex::new([x + w, y], colour, [1.0, 0.0]),
            UiVertex::new([x + w, y + h], colour, [1.0, 1.0]),
            UiVertex::new([x, y + h], colour, [0.0, 1.0]),
        ],
        [0, 1, 2, 0, 2, 3],
    )
}

fn checker(size: u32) -> Vec<u8> {
    (0..size * size)
        .flat_map(|i| {
            if (i % size + i / size) % 2 == 0 {
                [255, 255, 255, 255]
            } else {
                [40, 40, 40, 255]
            }
        })
        .collect()
}

/// Engine services shared by the library and its contexts
struct Services {
    system: Option<Box<dyn UiSystemInterface>>,
}

impl Services {
    fn log(&self, level: UiLogLevel, message: &str) {
        if let Some(system) = &self.system {
            system.log_message(level, message);
        }
    }
}

/// Library creating [`PanelContext`]s
pub struct PanelLibrary {
    services: Rc<RefCell<Services>>,
    contexts: HashSet<String>,
    fonts: Vec<String>,
}

impl PanelLibrary {
    pub fn new() -> Self {
        Self {
            services: Rc::new(RefCell::new(Services { system: None })),
            contexts: HashSet::new(),
            fonts: Vec::new(),
        }
    }

    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }
}

impl Default for PanelLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl UiLibrary for PanelLibrary {
    fn initialise(&mut self, system: Box<dyn UiSystemInterface>) -> bool {
        self.services.borrow_mut().system = Some(system);
        self.services.borrow().log(UiLogLevel::Info, "panel library ready");
        true
    }

    fn shutdown(&mut self) {
        self.services.borrow().log(UiLogLevel::Info, "panel library shutting down");
        self.services.borrow_mut().system = None;
    }

    fn load_font_face(&mut self, path: &str) -> bool {
        // fonts are only recorded; the panels draw no text
        self.fonts.push(path.to_string());
        true
    }

    fn create_context(&mut self, name: &str, dimensions: (u32, u32)) -> Option<Box<dyn UiContext>> {
        if !self.contexts.insert(name.to_string()) {
            self.services
                .borrow()
                .log(UiLogLevel::Error, &format!("context '{}' already exists", name));
            return None;
        }
        Some(Box::new(PanelContext {
            services: Rc::clone(&self.services),
            size: dimensions,
            pointer: (-1, -1),
            pressed: false,
            clicks: 0,
            documents: Vec::new(),
            visible: false,
            checker: None,
            logo: None,
            logo_requested: false,
        }))
    }

    fn remove_context(&mut self, name: &str) {
        self.contexts.remove(name);
    }
}

/// One panel
struct PanelContext {
    services: Rc<RefCell<Services>>,
    size: (u32, u32),
    pointer: (i32, i32),
    pressed: bool,
    clicks: u32,
    documents: Vec<String>,
    visible: bool,
    checker: Option<TextureId>,
    logo: Option<TextureId>,
    logo_requested: bool,
}

impl PanelContext {
    fn hovered(&self) -> bool {
        let (x, y, w, h) = BUTTON;
        (x..x + w).contains(&self.pointer.0) && (y..y + h).contains(&self.pointer.1)
    }
}

impl UiContext for PanelContext {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn load_document_from_memory(&mut self, markup: &str, source: &str) -> Option<DocumentId> {
        if markup.trim().is_empty() {
            return None;
        }
        self.documents.push(source.to_string());
        Some(DocumentId(self.documents.len() as u32))
    }

    fn show_document(&mut self, _document: DocumentId) {
        self.visible = true;
    }

    fn render(&mut self, target: &mut dyn UiRenderInterface) {
        if self.checker.is_none() {
            self.checker = target.generate_texture(&checker(8), 8, 8);
        }
        if !self.logo_requested {
            self.logo_requested = true;
            self.logo = target.load_texture("ui/logo.png").map(|t| t.handle);
        }

        let (w, h) = (self.size.0 as f32, self.size.1 as f32);
        let alpha = if self.visible { 200 } else { 90 };
        let (vertices, indices) = quad(0.0, 0.0, w, h, [20, 30, 60, alpha]);
        target.render_geometry(&vertices, &indices, self.logo.unwrap_or(0), Vec2::zeros());

        let (x, y, bw, bh) = BUTTON;
        let colour = match (self.hovered(), self.pressed) {
            (true, true) => [255, 120, 40, 255],
            (true, false) => [255, 200, 80, 255],
            _ => [160, 160, 160, 255],
        };
        target.set_scissor_region(x, y, bw, bh);
        target.enable_scissor_region(true);
        let (vertices, indices) = quad(0.0, 0.0, bw as f32, bh as f32, colour);
        target.render_geometry(&vertices, &indices, self.checker.unwrap_or(0), Vec2::new(x as f32, y as f32));
        target.enable_scissor_region(false);
    }

    fn update(&mut self) {}

    fn process_mouse_move(&mut self, x: i32, y: i32, _modifiers: KeyModifiers) {
        self.pointer = (x, y);
    }

    fn process_mouse_button_down(&mut self, _button: u32, _modifiers: KeyModifiers) {
        self.pressed = self.hovered();
    }

    fn process_mouse_button_up(&mut self, _button: u32, _modifiers: KeyModifiers) {
        if self.pressed && self.hovered() {
            self.clicks += 1;
            self.services
                .borrow()
                .log(UiLogLevel::Info, &format!("button clicked ({} total)", self.clicks));
        }
        self.pressed = false;
    }
}
