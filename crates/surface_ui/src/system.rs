//! UI system: owns the library lifetime and builds canvas registries

use crate::assets::FileSystem;
use crate::canvas::CanvasRegistry;
use crate::config::SurfaceUiConfig;
use crate::error::{UiError, UiResult};
use crate::ui::{RenderBridge, SharedTextureSource, SharedUiLibrary, TextureResolver, UiLogLevel, UiSystemInterface};
use std::time::Instant;

/// Log target for messages coming from the UI library
pub const UI_LOG_TARGET: &str = "surface_ui::ui";

/// Engine services handed to the UI library
pub struct EngineSystemInterface {
    started: Instant,
}

impl EngineSystemInterface {
    /// Start the clock
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for EngineSystemInterface {
    fn default() -> Self {
        Self::new()
    }
}

impl UiSystemInterface for EngineSystemInterface {
    fn elapsed_time(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    fn log_message(&self, level: UiLogLevel, message: &str) -> bool {
        match level {
            UiLogLevel::Warning => log::warn!(target: UI_LOG_TARGET, "{}", message),
            UiLogLevel::Error | UiLogLevel::Assert => log::error!(target: UI_LOG_TARGET, "{}", message),
            UiLogLevel::Always | UiLogLevel::Info | UiLogLevel::Debug => {
                log::info!(target: UI_LOG_TARGET, "{}", message);
            }
        }
        true
    }
}

/// Entry point: initialises the UI library and creates registries
pub struct UiSystem {
    library: SharedUiLibrary,
    config: SurfaceUiConfig,
}

impl UiSystem {
    /// Initialise the library and load the configured font faces
    pub fn new(library: SharedUiLibrary, config: SurfaceUiConfig) -> UiResult<Self> {
        if !library.borrow_mut().initialise(Box::new(EngineSystemInterface::new())) {
            log::error!("UI library failed to initialise");
            return Err(UiError::LibraryInitFailed);
        }

        for face in &config.font_faces {
            if !library.borrow_mut().load_font_face(face) {
                log::warn!("Failed to load font face '{}'", face);
            }
        }

        log::info!("UI system initialised with {} font faces", config.font_faces.len());
        Ok(Self { library, config })
    }

    /// Settings in effect
    pub fn config(&self) -> &SurfaceUiConfig {
        &self.config
    }

    /// Shared library handle
    pub fn library(&self) -> SharedUiLibrary {
        SharedUiLibrary::clone(&self.library)
    }

    /// Build a registry for one scene
    pub fn create_registry(&self, files: Box<dyn FileSystem>, textures: SharedTextureSource) -> CanvasRegistry {
        let resolver = TextureResolver::new(textures, self.config.poll_interval(), self.config.wait_timeout());
        let bridge = RenderBridge::new(&self.config.shader_path, &self.config.spatial_define, resolver);
        CanvasRegistry::new(self.library(), files, bridge, &self.config)
    }
}

impl Drop for UiSystem {
    fn drop(&mut self) {
        match self.library.try_borrow_mut() {
            Ok(mut library) => library.shutdown(),
            Err(_) => log::error!("UI library busy during shutdown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{scene, MockFiles, MockLibrary, ScriptedTextureSource};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn textures() -> SharedTextureSource {
        Rc::new(RefCell::new(ScriptedTextureSource::new()))
    }

    #[test]
    fn test_initialises_and_loads_fonts() {
        let library = MockLibrary::shared();
        library.borrow_mut().rejected_fonts.push("ui/Delicious-Bold.otf".to_string());

        let system = UiSystem::new(library.clone(), SurfaceUiConfig::default()).unwrap();
        assert!(library.borrow().initialised);
        assert_eq!(library.borrow().fonts.len(), 3);
        assert!(library.borrow().system.is_some());

        drop(system);
        assert!(library.borrow().shut_down);
    }

    #[test]
    fn test_init_failure() {
        let library = MockLibrary::shared();
        library.borrow_mut().fail_init = true;
        let result = UiSystem::new(library.clone(), SurfaceUiConfig::default());
        assert!(matches!(result, Err(UiError::LibraryInitFailed)));
        assert!(library.borrow().fonts.is_empty());
    }

    #[test]
    fn test_registries_share_library() {
        let library = MockLibrary::shared();
        let system = UiSystem::new(library.clone(), SurfaceUiConfig::default()).unwrap();
        let mut first = system.create_registry(Box::new(MockFiles::default()), textures());
        let mut second = system.create_registry(Box::new(MockFiles::default()), textures());

        let (mut world, _) = scene();
        let entity = world.create_entity();
        first.create_canvas(&mut world, entity).unwrap();
        second.create_canvas(&mut world, entity).unwrap();
        assert_eq!(library.borrow().live.len(), 2);
    }

    #[test]
    fn test_registry_uses_config() {
        let library = MockLibrary::shared();
        let config = SurfaceUiConfig {
            default_3d: false,
            virtual_size: [320, 240],
            ..SurfaceUiConfig::default()
        };
        let system = UiSystem::new(library.clone(), config).unwrap();
        let mut registry = system.create_registry(Box::new(MockFiles::default()), textures());
        let (mut world, _) = scene();
        let entity = world.create_entity();
        registry.create_canvas(&mut world, entity).unwrap();
        assert_eq!(registry.is_3d(entity), Some(false));
        let name = registry.canvas(entity).unwrap().context_name().to_string();
        assert_eq!(library.borrow().log(&name).borrow().dimensions[0], (320, 240));
    }

    #[test]
    fn test_engine_interface() {
        let system = EngineSystemInterface::new();
        assert!(system.elapsed_time() >= 0.0);
        assert!(system.log_message(UiLogLevel::Warning, "careful"));
        assert!(system.log_message(UiLogLevel::Debug, "detail"));
    }
}
