//! Texture resolution for UI image requests
//!
//! Asset loading is asynchronous, but the UI library asks for textures from
//! inside a callback that cannot suspend. [`TextureResolver::poll`] is the
//! non-blocking half; [`TextureResolver::resolve_blocking`] is the bounded
//! busy-wait used by the render callbacks. It stalls the producer thread on
//! first use of a path, so keep it out of latency-sensitive code.

use crate::error::{UiError, UiResult};
use crate::foundation::time::Deadline;
use crate::render::{HandleAllocator, TextureHandle};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Ticket for an asset request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureRequest(pub u64);

/// A texture that finished loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    /// GPU handle the texture will live under
    pub handle: TextureHandle,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Progress of an asset request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureState {
    /// Still loading
    Pending,
    /// Loaded
    Ready(TextureInfo),
    /// Loading failed
    Failed,
}

/// Asset system side of texture loading
pub trait TextureSource {
    /// Request a texture; repeated requests for a path return the same ticket
    fn request(&mut self, path: &str) -> TextureRequest;

    /// Current state of a request
    fn state(&self, request: TextureRequest) -> TextureState;

    /// Run completion callbacks for finished loads
    ///
    /// Finished textures take their GPU handles from `handles`, the same
    /// allocator the renderer hands to generated textures.
    fn process_callbacks(&mut self, handles: &HandleAllocator);
}

/// Texture source shared between registries and the host loop
pub type SharedTextureSource = Rc<RefCell<dyn TextureSource>>;

/// Resolves texture paths against a [`TextureSource`]
pub struct TextureResolver {
    source: SharedTextureSource,
    poll_interval: Duration,
    timeout: Option<Duration>,
}

impl TextureResolver {
    /// Create a resolver; `timeout` of `None` waits forever
    pub fn new(source: SharedTextureSource, poll_interval: Duration, timeout: Option<Duration>) -> Self {
        Self {
            source,
            poll_interval,
            timeout,
        }
    }

    /// Request the texture, service pending callbacks once and report its state
    pub fn poll(&self, path: &str, handles: &HandleAllocator) -> TextureState {
        let mut source = self.source.borrow_mut();
        let request = source.request(path);
        source.process_callbacks(handles);
        source.state(request)
    }

    /// Wait until the texture is loaded, failed, or the timeout elapsed
    pub fn resolve_blocking(&self, path: &str, handles: &HandleAllocator) -> UiResult<TextureInfo> {
        let deadline = Deadline::after(self.timeout);
        loop {
            match self.poll(path, handles) {
                TextureState::Ready(info) => return Ok(info),
                TextureState::Failed => return Err(UiError::TextureLoadFailed(path.to_string())),
                TextureState::Pending => {
                    if deadline.expired() {
                        return Err(UiError::TextureTimeout {
                            path: path.to_string(),
                            waited_ms: deadline.elapsed().as_millis() as u64,
                        });
                    }
                    std::thread::sleep(self.poll_interval);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedTexture, ScriptedTextureSource};

    fn resolver(source: ScriptedTextureSource, timeout_ms: Option<u64>) -> TextureResolver {
        TextureResolver::new(
            Rc::new(RefCell::new(source)),
            Duration::from_millis(1),
            timeout_ms.map(Duration::from_millis),
        )
    }

    #[test]
    fn test_poll_does_not_block() {
        let source = ScriptedTextureSource::new().with("a.png", ScriptedTexture::ReadyAfter(3, 16, 16));
        let resolver = resolver(source, Some(1000));
        assert_eq!(resolver.poll("a.png", &HandleAllocator::new()), TextureState::Pending);
    }

    #[test]
    fn test_blocking_waits_for_ready() {
        let source = ScriptedTextureSource::new().with("a.png", ScriptedTexture::ReadyAfter(3, 16, 8));
        let info = resolver(source, Some(1000)).resolve_blocking("a.png", &HandleAllocator::new()).unwrap();
        assert_eq!((info.width, info.height), (16, 8));
    }

    #[test]
    fn test_failed_load_reported() {
        let source = ScriptedTextureSource::new().with("bad.png", ScriptedTexture::Fail);
        let result = resolver(source, Some(1000)).resolve_blocking("bad.png", &HandleAllocator::new());
        assert!(matches!(result, Err(UiError::TextureLoadFailed(path)) if path == "bad.png"));
    }

    #[test]
    fn test_never_completing_load_times_out() {
        let source = ScriptedTextureSource::new().with("slow.png", ScriptedTexture::Never);
        let result = resolver(source, Some(5)).resolve_blocking("slow.png", &HandleAllocator::new());
        assert!(matches!(result, Err(UiError::TextureTimeout { waited_ms, .. }) if waited_ms >= 5));
    }
}
