//! Render surface registrations
//!
//! The surface stands in for the host container. Every listener, frame loop
//! and uploaded geometry buffer a session creates is an RAII `Registration`;
//! dropping it releases the slot. Counting them lets hosts (and tests) verify
//! that tearing a session down leaves nothing behind.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Listener,
    FrameLoop,
    GpuBuffer,
}

#[derive(Debug, Default)]
struct Counters {
    listeners: AtomicUsize,
    frame_loops: AtomicUsize,
    gpu_buffers: AtomicUsize,
}

impl Counters {
    fn slot(&self, kind: ResourceKind) -> &AtomicUsize {
        match kind {
            ResourceKind::Listener => &self.listeners,
            ResourceKind::FrameLoop => &self.frame_loops,
            ResourceKind::GpuBuffer => &self.gpu_buffers,
        }
    }
}

/// Live resource counts at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceUsage {
    pub listeners: usize,
    pub frame_loops: usize,
    pub gpu_buffers: usize,
}

/// Held by whoever owns the resource; releases on drop
#[derive(Debug)]
pub struct Registration {
    kind: ResourceKind,
    label: &'static str,
    counters: Arc<Counters>,
}

impl Registration {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.counters.slot(self.kind).fetch_sub(1, Ordering::SeqCst);
    }
}

/// Host container: pixel size plus resource bookkeeping.
/// Clones share the same counters.
#[derive(Debug, Clone)]
pub struct Surface {
    width: f32,
    height: f32,
    counters: Arc<Counters>,
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Record a new measured size. Returns true if it changed.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let (w, h) = (width.max(1.0), height.max(1.0));
        if (w - self.width).abs() < 0.5 && (h - self.height).abs() < 0.5 {
            return false;
        }
        self.width = w;
        self.height = h;
        true
    }

    pub fn register(&self, kind: ResourceKind, label: &'static str) -> Registration {
        self.counters.slot(kind).fetch_add(1, Ordering::SeqCst);
        Registration {
            kind,
            label,
            counters: Arc::clone(&self.counters),
        }
    }

    pub fn add_listener(&self, label: &'static str) -> Registration {
        self.register(ResourceKind::Listener, label)
    }

    pub fn start_frame_loop(&self) -> Registration {
        self.register(ResourceKind::FrameLoop, "frame")
    }

    pub fn upload_buffer(&self, label: &'static str) -> Registration {
        self.register(ResourceKind::GpuBuffer, label)
    }

    pub fn usage(&self) -> SurfaceUsage {
        SurfaceUsage {
            listeners: self.counters.listeners.load(Ordering::SeqCst),
            frame_loops: self.counters.frame_loops.load(Ordering::SeqCst),
            gpu_buffers: self.counters.gpu_buffers.load(Ordering::SeqCst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registrations_release_on_drop() {
        let surface = Surface::new(640.0, 480.0);
        let before = surface.usage();
        {
            let _a = surface.add_listener("pointerdown");
            let frame = surface.start_frame_loop();
            let c = surface.upload_buffer("mesh");
            assert_eq!(c.kind(), ResourceKind::GpuBuffer);
            assert_eq!(c.label(), "mesh");
            assert_eq!(frame.kind(), ResourceKind::FrameLoop);
            let clone = surface.clone();
            assert_eq!(clone.usage(), SurfaceUsage { listeners: 1, frame_loops: 1, gpu_buffers: 1 });
        }
        assert_eq!(surface.usage(), before);
    }

    #[test]
    fn test_resize_reports_change() {
        let mut surface = Surface::new(640.0, 480.0);
        assert!(!surface.resize(640.0, 480.0));
        assert!(surface.resize(1280.0, 720.0));
        assert_eq!(surface.size(), (1280.0, 720.0));
    }
}
