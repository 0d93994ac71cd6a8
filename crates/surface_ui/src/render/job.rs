//! # Deferred render jobs
//!
//! Producers record self-contained jobs on the simulation thread and hand them
//! to a [`RenderQueue`]. A frame's worth of jobs is taken out of the queue,
//! ordered by key, and executed later against a [`GpuDevice`], possibly on a
//! different thread.

use super::gpu::GpuDevice;

/// Sort key for queued jobs; lower keys execute first
pub type JobOrder = i32;

/// A unit of recorded GPU work executed after it has been produced
pub trait RenderJob: Send {
    /// Called once when the job is queued, on the producing thread
    fn setup(&mut self) {}

    /// Replay the recorded work
    fn execute(&mut self, device: &mut dyn GpuDevice);

    /// Name used in logs
    fn label(&self) -> &str {
        "job"
    }
}

/// Jobs of one frame in execution order
pub type Frame = Vec<Box<dyn RenderJob>>;

/// Collects jobs for the current frame
#[derive(Default)]
pub struct RenderQueue {
    jobs: Vec<(JobOrder, Box<dyn RenderJob>)>,
}

impl RenderQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a job, running its setup step
    pub fn push(&mut self, mut job: Box<dyn RenderJob>, order: JobOrder) {
        job.setup();
        log::trace!("Queued render job '{}' with order {}", job.label(), order);
        self.jobs.push((order, job));
    }

    /// Number of queued jobs
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Remove all jobs, ordered by key; equal keys keep submission order
    pub fn take_frame(&mut self) -> Frame {
        let mut jobs = std::mem::take(&mut self.jobs);
        jobs.sort_by_key(|(order, _)| *order);
        jobs.into_iter().map(|(_, job)| job).collect()
    }

    /// Take the frame and execute it inline
    pub fn execute_frame(&mut self, device: &mut dyn GpuDevice) -> usize {
        let frame = self.take_frame();
        let count = frame.len();
        execute_frame(frame, device);
        count
    }
}

/// Execute the jobs of a frame in order, consuming them
pub fn execute_frame(frame: Frame, device: &mut dyn GpuDevice) {
    for mut job in frame {
        job.execute(device);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingDevice;

    struct Marker(&'static str);

    impl RenderJob for Marker {
        fn execute(&mut self, device: &mut dyn GpuDevice) {
            device.push_debug_group(self.0);
            device.pop_debug_group();
        }

        fn label(&self) -> &str {
            self.0
        }
    }

    fn labels(frame: &Frame) -> Vec<&str> {
        frame.iter().map(|job| job.label()).collect()
    }

    #[test]
    fn test_sorted_by_order_key() {
        let mut queue = RenderQueue::new();
        queue.push(Box::new(Marker("late")), 10);
        queue.push(Box::new(Marker("early")), -5);
        queue.push(Box::new(Marker("middle")), 0);
        let frame = queue.take_frame();
        assert_eq!(labels(&frame), vec!["early", "middle", "late"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_equal_keys_keep_submission_order() {
        let mut queue = RenderQueue::new();
        for name in ["a", "b", "c", "d"] {
            queue.push(Box::new(Marker(name)), 0);
        }
        assert_eq!(labels(&queue.take_frame()), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_execute_frame_runs_jobs() {
        let mut queue = RenderQueue::new();
        queue.push(Box::new(Marker("one")), 0);
        queue.push(Box::new(Marker("two")), 0);
        let mut device = RecordingDevice::new();
        assert_eq!(queue.execute_frame(&mut device), 2);
        assert_eq!(device.commands().len(), 4);
    }
}
