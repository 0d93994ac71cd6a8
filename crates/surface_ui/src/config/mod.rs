//! Configuration system

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(path, &contents)
    }

    /// Parse configuration text, picking the format from the path extension
    fn parse(path: &str, contents: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".toml") {
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Settings shared by every canvas registry created from one `UiSystem`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceUiConfig {
    /// Shader used for both the flat and the world-space programs
    pub shader_path: String,

    /// Shader define that switches the program to world-space transforms
    pub spatial_define: String,

    /// Document loaded into every new canvas, if it exists
    pub default_document: String,

    /// Logical resolution a new UI context is created with
    pub virtual_size: [u32; 2],

    /// Whether new canvases start in world-space mode
    pub default_3d: bool,

    /// Font faces registered with the UI library at startup
    pub font_faces: Vec<String>,

    /// Directory the disk file system resolves relative paths against
    pub asset_root: String,

    /// Sleep between polls while blocking on a texture
    pub texture_poll_interval_ms: u64,

    /// Upper bound for a blocking texture wait; `None` waits forever
    pub texture_wait_timeout_ms: Option<u64>,
}

impl Default for SurfaceUiConfig {
    fn default() -> Self {
        Self {
            shader_path: "pipelines/ui.shd".to_string(),
            spatial_define: "SPATIAL".to_string(),
            default_document: "ui/demo.rml".to_string(),
            virtual_size: [800, 600],
            default_3d: true,
            font_faces: vec![
                "ui/Delicious-Roman.otf".to_string(),
                "ui/Delicious-Bold.otf".to_string(),
                "ui/Delicious-Italic.otf".to_string(),
                "ui/Delicious-BoldItalic.otf".to_string(),
            ],
            asset_root: "assets".to_string(),
            texture_poll_interval_ms: 1,
            texture_wait_timeout_ms: Some(10_000),
        }
    }
}

impl Config for SurfaceUiConfig {}

impl SurfaceUiConfig {
    /// Poll interval as a `Duration`
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.texture_poll_interval_ms)
    }

    /// Wait timeout as a `Duration`
    pub fn wait_timeout(&self) -> Option<std::time::Duration> {
        self.texture_wait_timeout_ms.map(std::time::Duration::from_millis)
    }
}
