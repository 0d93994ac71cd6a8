//! Asset access used by canvases: documents from the file system, images
//! through an asynchronous texture source.

pub mod texture_loader;

pub use crate::ui::texture::{TextureInfo, TextureRequest, TextureSource, TextureState};
pub use texture_loader::{FileTextureSource, ImageData, TextureUploadJob, TEXTURE_UPLOAD_ORDER};

use std::path::{Path, PathBuf};

/// Synchronous text file access
pub trait FileSystem {
    /// Read a text file, `None` if it does not exist or cannot be read
    fn content_sync(&self, path: &str) -> Option<String>;
}

/// File system rooted at an asset directory
#[derive(Debug, Clone)]
pub struct DiskFileSystem {
    root: PathBuf,
}

impl DiskFileSystem {
    /// Resolve paths relative to `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Asset root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of an asset path
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl FileSystem for DiskFileSystem {
    fn content_sync(&self, path: &str) -> Option<String> {
        let full = self.resolve(path);
        match std::fs::read_to_string(&full) {
            Ok(contents) => Some(contents),
            Err(err) => {
                log::debug!("Could not read {:?}: {}", full, err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_relative_to_root() {
        let root = std::env::temp_dir().join(format!("surface_ui_fs_{}", std::process::id()));
        std::fs::create_dir_all(root.join("ui")).unwrap();
        std::fs::write(root.join("ui/demo.rml"), "<rml/>").unwrap();

        let files = DiskFileSystem::new(&root);
        assert_eq!(files.content_sync("ui/demo.rml").as_deref(), Some("<rml/>"));
        assert!(files.content_sync("ui/absent.rml").is_none());

        let _ = std::fs::remove_dir_all(&root);
    }
}
