//! GPU submission thread
//!
//! Owns the device. Completed frames are moved in over a channel, so the only
//! data crossing threads is finished, immutable job lists.

use super::gpu::GpuDevice;
use super::job::{execute_frame, Frame};
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

enum Message {
    Frame(Frame),
    Shutdown,
}

/// Executes submitted frames on a dedicated thread
pub struct RenderThread<D: GpuDevice + Send + 'static> {
    sender: Sender<Message>,
    worker: Option<JoinHandle<D>>,
}

impl<D: GpuDevice + Send + 'static> RenderThread<D> {
    /// Spawn the thread, moving the device onto it
    pub fn spawn(mut device: D) -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::channel::<Message>();
        let worker = std::thread::Builder::new()
            .name("render".to_string())
            .spawn(move || {
                let mut frames = 0u64;
                while let Ok(message) = receiver.recv() {
                    match message {
                        Message::Frame(frame) => {
                            log::trace!("Render thread executing frame {} ({} jobs)", frames, frame.len());
                            execute_frame(frame, &mut device);
                            frames += 1;
                        }
                        Message::Shutdown => break,
                    }
                }
                log::debug!("Render thread exiting after {} frames", frames);
                device
            })?;

        Ok(Self {
            sender,
            worker: Some(worker),
        })
    }

    /// Hand a completed frame to the render thread
    ///
    /// Returns `false` if the thread has already stopped.
    pub fn submit(&self, frame: Frame) -> bool {
        self.sender.send(Message::Frame(frame)).is_ok()
    }

    /// Execute everything already submitted, stop the thread and return the device
    pub fn shutdown(mut self) -> Option<D> {
        let _ = self.sender.send(Message::Shutdown);
        let worker = self.worker.take()?;
        match worker.join() {
            Ok(device) => Some(device),
            Err(_) => {
                log::error!("Render thread panicked");
                None
            }
        }
    }
}

impl<D: GpuDevice + Send + 'static> Drop for RenderThread<D> {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.sender.send(Message::Shutdown);
            let _ = worker.join();
        }
    }
}
