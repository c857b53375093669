use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

/// Identifies one requested animation frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameHandle(pub u64);

/// The host's animation-frame facility (e.g. `requestAnimationFrame`, a vsync callback, or a
/// TUI render tick).
///
/// The coordinator requests at most one frame at a time. When a requested frame fires, the
/// host calls [`crate::ScrollCoordinator::on_frame`] with its handle. A cancelled handle must
/// never be delivered.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// A frame scheduler driven by hand.
///
/// Clones share the same queue, so an adapter can keep one clone and hand the other to the
/// coordinator, then call [`ManualFrameScheduler::run_frame`] once per frame.
#[derive(Clone, Debug, Default)]
pub struct ManualFrameScheduler {
    inner: Rc<RefCell<FrameQueue>>,
}

#[derive(Debug, Default)]
struct FrameQueue {
    next_id: u64,
    pending: Vec<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains and returns every handle due on this frame, in request order.
    pub fn run_frame(&self) -> Vec<FrameHandle> {
        core::mem::take(&mut self.inner.borrow_mut().pending)
    }

    /// Number of requested frames that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    pub fn requested_count(&self) -> u64 {
        self.inner.borrow().requested
    }

    pub fn cancelled_count(&self) -> u64 {
        self.inner.borrow().cancelled
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let mut q = self.inner.borrow_mut();
        q.next_id = q.next_id.wrapping_add(1);
        let handle = FrameHandle(q.next_id);
        q.pending.push(handle);
        q.requested = q.requested.saturating_add(1);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut q = self.inner.borrow_mut();
        let before = q.pending.len();
        q.pending.retain(|&h| h != handle);
        if q.pending.len() != before {
            q.cancelled = q.cancelled.saturating_add(1);
        }
    }
}
