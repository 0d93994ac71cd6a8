//! Image textures decoded on a worker thread
//!
//! Requests are keyed by path and cached. Decoding happens off the producer
//! thread; [`TextureSource::process_callbacks`] collects finished images,
//! reserves their GPU handles from the caller's allocator and stages the
//! pixel uploads, which the host
//! drains with [`FileTextureSource::take_upload_job`] and queues ahead of the
//! UI jobs.

use crate::render::{GpuDevice, HandleAllocator, JobOrder, RenderJob};
use crate::ui::job::{execute_uploads, TextureUpload};
use crate::ui::texture::{TextureInfo, TextureRequest, TextureSource, TextureState};
use slotmap::{Key, KeyData, SlotMap};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

/// Queue position of texture uploads, ahead of UI jobs
pub const TEXTURE_UPLOAD_ORDER: JobOrder = -100;

slotmap::new_key_type! {
    struct TextureKey;
}

/// Decoded RGBA8 image
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageData {
    /// Load an image from a file path
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let img = image::open(path).map_err(|e| format!("Failed to load image {:?}: {}", path, e))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("Decoded image {}x{} from {:?}", width, height, path);
        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
        })
    }
}

struct LoadRequest {
    key: TextureKey,
    path: PathBuf,
}

struct LoadResult {
    key: TextureKey,
    image: Result<ImageData, String>,
}

struct Entry {
    path: String,
    state: TextureState,
}

/// [`TextureSource`] reading image files below an asset root
pub struct FileTextureSource {
    root: PathBuf,
    entries: SlotMap<TextureKey, Entry>,
    by_path: HashMap<String, TextureKey>,
    requests: Option<Sender<LoadRequest>>,
    results: Receiver<LoadResult>,
    worker: Option<JoinHandle<()>>,
    uploads: Vec<TextureUpload>,
}

impl FileTextureSource {
    /// Start the decode worker
    pub fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<LoadRequest>();
        let (result_tx, result_rx) = mpsc::channel::<LoadResult>();

        let worker = std::thread::Builder::new()
            .name("texture-loader".to_string())
            .spawn(move || {
                while let Ok(request) = request_rx.recv() {
                    let image = ImageData::from_file(&request.path);
                    if result_tx.send(LoadResult { key: request.key, image }).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            root: root.into(),
            entries: SlotMap::with_key(),
            by_path: HashMap::new(),
            requests: Some(request_tx),
            results: result_rx,
            worker: Some(worker),
            uploads: Vec::new(),
        })
    }

    /// Staged uploads as a render job, if any are pending
    pub fn take_upload_job(&mut self) -> Option<TextureUploadJob> {
        if self.uploads.is_empty() {
            return None;
        }
        Some(TextureUploadJob {
            uploads: std::mem::take(&mut self.uploads),
        })
    }

    /// Number of requests still decoding
    pub fn pending(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.state == TextureState::Pending)
            .count()
    }

    fn fail(&mut self, key: TextureKey, reason: &str) {
        if let Some(entry) = self.entries.get_mut(key) {
            log::warn!("Texture '{}' failed: {}", entry.path, reason);
            entry.state = TextureState::Failed;
        }
    }
}

impl TextureSource for FileTextureSource {
    fn request(&mut self, path: &str) -> TextureRequest {
        if let Some(key) = self.by_path.get(path) {
            return TextureRequest(key.data().as_ffi());
        }

        let key = self.entries.insert(Entry {
            path: path.to_string(),
            state: TextureState::Pending,
        });
        self.by_path.insert(path.to_string(), key);

        let sent = self.requests.as_ref().is_some_and(|requests| {
            requests
                .send(LoadRequest {
                    key,
                    path: self.root.join(path),
                })
                .is_ok()
        });
        if !sent {
            self.fail(key, "texture loader stopped");
        }

        TextureRequest(key.data().as_ffi())
    }

    fn state(&self, request: TextureRequest) -> TextureState {
        let key = TextureKey::from(KeyData::from_ffi(request.0));
        self.entries
            .get(key)
            .map_or(TextureState::Failed, |entry| entry.state)
    }

    fn process_callbacks(&mut self, handles: &HandleAllocator) {
        while let Ok(result) = self.results.try_recv() {
            match result.image {
                Ok(image) => {
                    let Some(entry) = self.entries.get_mut(result.key) else {
                        continue;
                    };
                    let handle = handles.alloc_texture();
                    entry.state = TextureState::Ready(TextureInfo {
                        handle,
                        width: image.width,
                        height: image.height,
                    });
                    log::debug!("Texture '{}' ready as {:?}", entry.path, handle);
                    self.uploads.push(TextureUpload {
                        handle,
                        width: image.width,
                        height: image.height,
                        pixels: image.data,
                    });
                }
                Err(reason) => self.fail(result.key, &reason),
            }
        }
    }
}

impl Drop for FileTextureSource {
    fn drop(&mut self) {
        self.requests = None;
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Texture uploads produced by the loader
pub struct TextureUploadJob {
    uploads: Vec<TextureUpload>,
}

impl TextureUploadJob {
    /// Uploads carried by the job
    pub fn uploads(&self) -> &[TextureUpload] {
        &self.uploads
    }
}

impl RenderJob for TextureUploadJob {
    fn execute(&mut self, device: &mut dyn GpuDevice) {
        execute_uploads(&mut self.uploads, device);
    }

    fn label(&self) -> &str {
        "texture-upload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingDevice;
    use std::time::{Duration, Instant};

    fn wait(source: &mut FileTextureSource, request: TextureRequest, handles: &HandleAllocator) -> TextureState {
        let started = Instant::now();
        loop {
            source.process_callbacks(handles);
            let state = source.state(request);
            if state != TextureState::Pending || started.elapsed() > Duration::from_secs(5) {
                return state;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    fn asset_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("surface_ui_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_loads_png_and_stages_upload() {
        let dir = asset_dir("png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]))
            .save(dir.join("tile.png"))
            .unwrap();

        let mut source = FileTextureSource::new(&dir).unwrap();
        let request = source.request("tile.png");
        assert_eq!(source.request("tile.png"), request);

        let handles = HandleAllocator::new();
        let TextureState::Ready(info) = wait(&mut source, request, &handles) else {
            panic!("texture did not load");
        };
        assert_eq!((info.width, info.height), (3, 2));

        let mut job = source.take_upload_job().unwrap();
        assert_eq!(job.uploads()[0].pixels.len(), 24);
        assert!(source.take_upload_job().is_none());

        let mut device = RecordingDevice::with_allocator(handles);
        job.execute(&mut device);
        assert!(device.has_texture(info.handle));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_and_generated_textures_share_allocator() {
        use crate::foundation::math::{Quat, Vec2, Vec3};
        use crate::render::{BufferHandle, HeadlessRenderer, Renderer, TextureHandle};
        use crate::ui::{CanvasPass, RenderBridge, TextureResolver, UiRenderInterface};
        use std::cell::RefCell;
        use std::rc::Rc;

        let dir = asset_dir("shared_handles");
        image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 255]))
            .save(dir.join("a.png"))
            .unwrap();

        let source = Rc::new(RefCell::new(FileTextureSource::new(&dir).unwrap()));
        let resolver = TextureResolver::new(source.clone(), Duration::from_millis(1), Some(Duration::from_secs(5)));
        let mut bridge = RenderBridge::new("pipelines/ui.shd", "SPATIAL", resolver);
        let mut renderer = HeadlessRenderer::default();
        bridge.prepare_frame(&mut renderer);
        let pass = CanvasPass {
            canvas_size: Vec2::new(800.0, 600.0),
            is_3d: false,
            position: Vec3::zeros(),
            rotation: Quat::identity(),
        };
        assert!(bridge.begin_render(&mut renderer, pass, BufferHandle(1)));

        let loaded = bridge.load_texture("a.png").unwrap().handle;
        let generated = bridge.generate_texture(&[0; 16], 2, 2).unwrap();
        assert_ne!(loaded, generated);
        bridge.end_render(&mut renderer);

        let mut device = RecordingDevice::with_allocator(renderer.handle_allocator());
        if let Some(mut uploads) = source.borrow_mut().take_upload_job() {
            uploads.execute(&mut device);
        }
        for mut job in renderer.take_frame() {
            job.execute(&mut device);
        }
        assert!(device.has_texture(TextureHandle(loaded as u32)));
        assert!(device.has_texture(TextureHandle(generated as u32)));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = asset_dir("missing");
        let mut source = FileTextureSource::new(&dir).unwrap();
        let request = source.request("nope.png");
        assert_eq!(wait(&mut source, request, &HandleAllocator::new()), TextureState::Failed);
        assert_eq!(source.pending(), 0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_unknown_request_is_failed() {
        let source = FileTextureSource::new(asset_dir("unknown")).unwrap();
        assert_eq!(source.state(TextureRequest(12345)), TextureState::Failed);
    }
}
