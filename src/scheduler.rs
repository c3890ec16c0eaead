//! Frame scheduling for effect components.
//!
//! Every visual component performs its per-frame work in a callback
//! registered here, and the host loop pumps the scheduler once per
//! rendered frame. This replaces recursive self-scheduling against the
//! display clock with an explicit registry, so tests can drive components
//! with virtual time instead of waiting on a real display.
//!
//! # Usage
//!
//! ```ignore
//! let mut scheduler = FrameScheduler::new();
//! let id = scheduler.register(move |tick, input| {
//!     field.borrow_mut().update(tick, input);
//! });
//!
//! // Per frame, from the host loop:
//! scheduler.run_frame(tick, &input);
//!
//! // On teardown:
//! scheduler.cancel(id);
//! ```

use glam::Vec2;

use crate::pointer::PointerSnapshot;

/// Timing values for one frame, captured at the start of the frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameTick {
    /// Total elapsed time in seconds.
    pub elapsed: f32,
    /// Time since the previous frame in seconds.
    pub delta: f32,
    /// Frame counter.
    pub frame: u64,
}

/// Read-only input state shared by every callback within one frame.
///
/// Captured once per frame so all components observe the same pointer
/// and viewport state regardless of invocation order.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    /// Pointer state snapshot as of the start of the frame.
    pub pointer: PointerSnapshot,
    /// Viewport size in physical pixels.
    pub viewport: Vec2,
}

impl FrameInput {
    /// Input with an idle pointer and the given viewport. Handy in tests.
    pub fn idle(viewport: Vec2) -> Self {
        Self {
            pointer: PointerSnapshot::idle(),
            viewport,
        }
    }
}

/// Handle returned by [`FrameScheduler::register`].
///
/// Slot indices are reused after cancellation; the generation counter
/// keeps a stale handle from cancelling whatever callback inherited the
/// slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackId {
    slot: usize,
    generation: u32,
}

type Callback = Box<dyn FnMut(FrameTick, &FrameInput)>;

struct Slot {
    generation: u32,
    callback: Option<Callback>,
}

/// Registry of per-frame callbacks.
///
/// Callbacks run in registration order within a frame, but callers must
/// not rely on cross-component ordering; components are independent.
pub struct FrameScheduler {
    slots: Vec<Slot>,
    free: Vec<usize>,
    elapsed: f32,
    frame: u64,
}

impl FrameScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            elapsed: 0.0,
            frame: 0,
        }
    }

    /// Register a callback to be invoked once per frame.
    pub fn register<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut(FrameTick, &FrameInput) + 'static,
    {
        let callback: Callback = Box::new(callback);
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot];
            entry.generation += 1;
            entry.callback = Some(callback);
            CallbackId {
                slot,
                generation: entry.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                callback: Some(callback),
            });
            CallbackId {
                slot: self.slots.len() - 1,
                generation: 0,
            }
        }
    }

    /// Deregister a callback. Returns `true` if it was still registered.
    ///
    /// A cancelled callback is never invoked again; cancelling twice (or
    /// with a stale handle) is a no-op.
    pub fn cancel(&mut self, id: CallbackId) -> bool {
        match self.slots.get_mut(id.slot) {
            Some(entry) if entry.generation == id.generation && entry.callback.is_some() => {
                entry.callback = None;
                self.free.push(id.slot);
                true
            }
            _ => false,
        }
    }

    /// Number of currently registered callbacks.
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.callback.is_some()).count()
    }

    /// Invoke every registered callback with the given tick and input.
    pub fn run_frame(&mut self, tick: FrameTick, input: &FrameInput) {
        self.elapsed = tick.elapsed;
        self.frame = tick.frame;
        for slot in &mut self.slots {
            if let Some(callback) = slot.callback.as_mut() {
                callback(tick, input);
            }
        }
    }

    /// Advance virtual time by `delta` seconds and run one frame.
    ///
    /// Drives the scheduler without a real clock; repeated calls with the
    /// same deltas produce identical tick sequences.
    pub fn advance(&mut self, delta: f32, input: &FrameInput) -> FrameTick {
        let tick = FrameTick {
            elapsed: self.elapsed + delta,
            delta,
            frame: self.frame + 1,
        };
        self.run_frame(tick, input);
        tick
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn input() -> FrameInput {
        FrameInput::idle(Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_register_and_run() {
        let mut scheduler = FrameScheduler::new();
        let count = Rc::new(RefCell::new(0u32));

        let c = count.clone();
        scheduler.register(move |_, _| *c.borrow_mut() += 1);

        scheduler.advance(0.016, &input());
        scheduler.advance(0.016, &input());

        assert_eq!(*count.borrow(), 2);
        assert_eq!(scheduler.active_count(), 1);
    }

    #[test]
    fn test_cancel_stops_invocation() {
        let mut scheduler = FrameScheduler::new();
        let count = Rc::new(RefCell::new(0u32));

        let c = count.clone();
        let id = scheduler.register(move |_, _| *c.borrow_mut() += 1);

        scheduler.advance(0.016, &input());
        assert!(scheduler.cancel(id));
        scheduler.advance(0.016, &input());
        scheduler.advance(0.016, &input());

        assert_eq!(*count.borrow(), 1);
        assert_eq!(scheduler.active_count(), 0);
        // Second cancel is a no-op
        assert!(!scheduler.cancel(id));
    }

    #[test]
    fn test_stale_handle_does_not_cancel_reused_slot() {
        let mut scheduler = FrameScheduler::new();
        let count = Rc::new(RefCell::new(0u32));

        let old = scheduler.register(|_, _| {});
        scheduler.cancel(old);

        let c = count.clone();
        let new = scheduler.register(move |_, _| *c.borrow_mut() += 1);

        // Stale handle points at the reused slot but an older generation
        assert!(!scheduler.cancel(old));
        scheduler.advance(0.016, &input());
        assert_eq!(*count.borrow(), 1);

        assert!(scheduler.cancel(new));
    }

    #[test]
    fn test_virtual_time_is_deterministic() {
        let run = || {
            let mut scheduler = FrameScheduler::new();
            let ticks = Rc::new(RefCell::new(Vec::new()));
            let t = ticks.clone();
            scheduler.register(move |tick, _| t.borrow_mut().push((tick.elapsed, tick.frame)));
            for _ in 0..5 {
                scheduler.advance(0.25, &input());
            }
            let out = ticks.borrow().clone();
            out
        };

        assert_eq!(run(), run());
        let ticks = run();
        assert_eq!(ticks.len(), 5);
        assert!((ticks[4].0 - 1.25).abs() < 1e-6);
        assert_eq!(ticks[4].1, 5);
    }
}
