//! Pointer tracking for effect components.
//!
//! One tracker per stage ingests raw window events; components never see
//! the event stream. Instead the host loop takes a [`PointerSnapshot`] at
//! the start of each frame and hands the same read-only value to every
//! frame callback, so there is no hidden coupling through shared mutable
//! state.
//!
//! Pointer events are best-effort: a missing event just means the last
//! snapshot stays current until the next valid sample arrives.

use glam::Vec2;
use winit::event::WindowEvent;

/// Immutable pointer state captured at the start of a frame.
#[derive(Debug, Clone, Copy)]
pub struct PointerSnapshot {
    /// Position in normalized device coordinates (-1 to 1).
    ///
    /// Origin at viewport center, X increasing right, Y increasing up.
    pub ndc: Vec2,
    /// Position in physical pixels, origin top-left.
    pub position: Vec2,
    /// Elapsed-time stamp of the last pointer movement, if any.
    pub last_move: Option<f32>,
}

impl PointerSnapshot {
    /// A snapshot that has never seen pointer input.
    pub fn idle() -> Self {
        Self {
            ndc: Vec2::ZERO,
            position: Vec2::ZERO,
            last_move: None,
        }
    }

    /// Seconds since the last pointer movement, or infinity if none ever
    /// arrived.
    pub fn idle_for(&self, now: f32) -> f32 {
        match self.last_move {
            Some(stamp) => (now - stamp).max(0.0),
            None => f32::INFINITY,
        }
    }

    /// Whether the pointer has been idle for at least `threshold` seconds.
    pub fn is_idle(&self, now: f32, threshold: f32) -> bool {
        self.idle_for(now) >= threshold
    }
}

/// Tracks pointer position over the stage viewport.
///
/// Written only by the event loop; read by components through snapshots.
#[derive(Debug)]
pub struct PointerTracker {
    position: Vec2,
    ndc: Vec2,
    last_move: Option<f32>,
    viewport: (u32, u32),
}

impl PointerTracker {
    /// Create a tracker for the given viewport size in physical pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Vec2::ZERO,
            ndc: Vec2::ZERO,
            last_move: None,
            viewport: (width, height),
        }
    }

    /// Update the viewport size used for NDC mapping.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    /// Process a winit window event. `now` is the frame clock's elapsed
    /// time, used to stamp pointer movement for idle detection.
    pub fn handle_event(&mut self, event: &WindowEvent, now: f32) {
        if let WindowEvent::CursorMoved { position, .. } = event {
            self.record_move(position.x as f32, position.y as f32, now);
        }
    }

    /// Record a pointer sample at pixel coordinates.
    pub fn record_move(&mut self, x: f32, y: f32, now: f32) {
        self.position = Vec2::new(x, y);
        self.last_move = Some(now);

        let (w, h) = self.viewport;
        if w > 0 && h > 0 {
            self.ndc = Vec2::new(
                (x / w as f32) * 2.0 - 1.0,
                1.0 - (y / h as f32) * 2.0, // Y flipped
            );
        }
    }

    /// Take a read-only snapshot of the current state.
    pub fn snapshot(&self) -> PointerSnapshot {
        PointerSnapshot {
            ndc: self.ndc,
            position: self.position,
            last_move: self.last_move,
        }
    }
}
