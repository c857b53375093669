use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cmp;
use core::fmt;

use crate::{
    Align, FixedHeightCalculator, FrameHandle, FrameScheduler, ItemPosition, ManualFrameScheduler,
    RangeCalculator, ScrollDirection, ScrollSnapshot, VirtualizationOptions, VisibleRange,
};

/// A callback fired after every recomputation of the visible range.
pub type OnChangeCallback = Arc<dyn Fn(&ScrollSnapshot) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FrameState {
    Idle,
    Scheduled {
        handle: FrameHandle,
        pending_offset: u64,
    },
    Disposed,
}

/// Turns raw scroll events into visible ranges, at most once per animation frame.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_scroll` from the scroll handler (any number of times per frame)
/// - `on_frame` when a frame requested through the [`FrameScheduler`] fires
/// - `set_*` when the list's props change (recomputed synchronously)
/// - `dispose` (or drop it) on teardown
///
/// Only the most recent offset seen before a frame fires is applied; earlier offsets in the
/// same frame window are dropped, never queued.
pub struct ScrollCoordinator<
    C: RangeCalculator = FixedHeightCalculator,
    S: FrameScheduler = ManualFrameScheduler,
> {
    calculator: C,
    scheduler: S,
    options: VirtualizationOptions,
    item_count: usize,
    item_height: u32,

    scroll_offset: u64,
    direction: Option<ScrollDirection>,
    range: VisibleRange,
    total_height: u64,

    frame: FrameState,
    recompute_count: u64,
    on_change: Option<OnChangeCallback>,
}

impl<C: RangeCalculator, S: FrameScheduler> ScrollCoordinator<C, S> {
    /// Creates a coordinator and computes the initial range at offset 0.
    ///
    /// The initial computation does not fire `on_change` and is not counted by
    /// [`Self::recompute_count`].
    pub fn new(
        calculator: C,
        scheduler: S,
        item_count: usize,
        item_height: u32,
        options: VirtualizationOptions,
    ) -> Self {
        vdebug!(
            item_count,
            item_height,
            container_height = options.container_height,
            overscan = options.overscan,
            "ScrollCoordinator::new"
        );
        let range = calculator.visible_range(
            0,
            options.container_height,
            item_count,
            item_height,
            options.overscan,
        );
        let total_height = calculator.total_height(item_count, item_height);
        Self {
            calculator,
            scheduler,
            options,
            item_count,
            item_height,
            scroll_offset: 0,
            direction: None,
            range,
            total_height,
            frame: FrameState::Idle,
            recompute_count: 0,
            on_change: None,
        }
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&ScrollSnapshot) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&ScrollSnapshot) + Send + Sync + 'static>,
    ) {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
    }

    pub fn calculator(&self) -> &C {
        &self.calculator
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn options(&self) -> &VirtualizationOptions {
        &self.options
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn item_height(&self) -> u32 {
        self.item_height
    }

    /// The last committed scroll offset (a pending offset is not visible here until its frame
    /// fires).
    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.direction
    }

    pub fn visible_range(&self) -> VisibleRange {
        self.range
    }

    pub fn total_height(&self) -> u64 {
        self.total_height
    }

    pub fn is_frame_scheduled(&self) -> bool {
        matches!(self.frame, FrameState::Scheduled { .. })
    }

    pub fn is_disposed(&self) -> bool {
        self.frame == FrameState::Disposed
    }

    /// Number of recomputations since construction (scroll frames and prop changes).
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    pub fn snapshot(&self) -> ScrollSnapshot {
        ScrollSnapshot {
            scroll_offset: self.scroll_offset,
            range: self.range,
            total_height: self.total_height,
            direction: self.direction,
        }
    }

    pub fn item_position(&self, index: usize) -> Option<ItemPosition> {
        (index < self.item_count).then(|| self.calculator.item_position(index, self.item_height))
    }

    /// Calls `f` with every index in the current range and its position.
    pub fn for_each_visible_item(&self, f: impl FnMut(usize, ItemPosition)) {
        self.calculator.for_each_item(self.range, self.item_height, f);
    }

    /// Collects the current range's items into `out` (clears `out` first).
    ///
    /// For maximum performance, prefer `for_each_visible_item` and reuse a scratch buffer.
    pub fn collect_visible_items(&self, out: &mut Vec<(usize, ItemPosition)>) {
        out.clear();
        out.reserve(self.range.len());
        self.for_each_visible_item(|i, pos| out.push((i, pos)));
    }

    /// Records a scroll event.
    ///
    /// The offset is taken by value, so the event object may be recycled as soon as this
    /// returns. If a frame is already scheduled it is cancelled and a new one is requested for
    /// the latest offset.
    pub fn on_scroll(&mut self, scroll_offset: u64) {
        match self.frame {
            FrameState::Disposed => {
                vtrace!(scroll_offset, "on_scroll after dispose ignored");
            }
            FrameState::Idle => {
                let handle = self.scheduler.request_frame();
                vtrace!(scroll_offset, handle = handle.0, "on_scroll: frame scheduled");
                self.frame = FrameState::Scheduled {
                    handle,
                    pending_offset: scroll_offset,
                };
            }
            FrameState::Scheduled { handle, .. } => {
                self.scheduler.cancel_frame(handle);
                let handle = self.scheduler.request_frame();
                vtrace!(scroll_offset, handle = handle.0, "on_scroll: frame rescheduled");
                self.frame = FrameState::Scheduled {
                    handle,
                    pending_offset: scroll_offset,
                };
            }
        }
    }

    /// Delivers a fired animation frame.
    ///
    /// Commits the pending offset, clamped to the scrollable extent as it is at commit time, and
    /// recomputes when `handle` is the scheduled frame. Returns `true` in that case; any other
    /// handle is ignored.
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        let FrameState::Scheduled {
            handle: scheduled,
            pending_offset,
        } = self.frame
        else {
            vtrace!(handle = handle.0, "on_frame without a scheduled frame");
            return false;
        };
        if scheduled != handle {
            vtrace!(
                handle = handle.0,
                scheduled = scheduled.0,
                "on_frame for a stale handle"
            );
            return false;
        }

        self.frame = FrameState::Idle;
        let offset = pending_offset.min(self.max_scroll_offset());
        self.commit_offset(offset);
        self.recompute();
        true
    }

    /// Programmatically scrolls to an offset, bypassing frame batching.
    ///
    /// Any pending scroll frame is cancelled, since this offset supersedes it. The offset is
    /// clamped to the scrollable extent. Returns the applied offset.
    pub fn scroll_to_offset(&mut self, offset: u64) -> u64 {
        if self.is_disposed() {
            return self.scroll_offset;
        }
        self.cancel_pending_frame();
        let offset = offset.min(self.max_scroll_offset());
        self.commit_offset(offset);
        self.recompute();
        offset
    }

    /// Programmatically scrolls so that `index` is aligned in the viewport.
    ///
    /// Returns the applied (clamped) offset.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> u64 {
        let offset = self.calculator.scroll_to_index_offset(
            index,
            align,
            self.scroll_offset,
            self.options.container_height,
            self.item_count,
            self.item_height,
        );
        self.scroll_to_offset(offset)
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.calculator.max_scroll_offset(
            self.item_count,
            self.item_height,
            self.options.container_height,
        )
    }

    pub fn set_item_count(&mut self, item_count: usize) {
        if self.item_count == item_count {
            return;
        }
        self.item_count = item_count;
        self.recompute();
    }

    pub fn set_item_height(&mut self, item_height: u32) {
        if self.item_height == item_height {
            return;
        }
        self.item_height = item_height;
        self.recompute();
    }

    pub fn set_container_height(&mut self, container_height: u32) {
        if self.options.container_height == container_height {
            return;
        }
        self.options.container_height = container_height;
        self.recompute();
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        if self.options.overscan == overscan {
            return;
        }
        self.options.overscan = overscan;
        self.recompute();
    }

    /// Replaces the options, recomputing only if a field that affects the range changed.
    pub fn set_options(&mut self, options: VirtualizationOptions) {
        let affects_range = options.container_height != self.options.container_height
            || options.overscan != self.options.overscan;
        self.options = options;
        if affects_range {
            self.recompute();
        }
    }

    /// Cancels any pending frame and stops all further recomputation.
    ///
    /// Calling this more than once is a no-op. Dropping the coordinator disposes it.
    pub fn dispose(&mut self) {
        if self.is_disposed() {
            return;
        }
        self.cancel_pending_frame();
        self.frame = FrameState::Disposed;
        vdebug!(
            recompute_count = self.recompute_count,
            "ScrollCoordinator::dispose"
        );
    }

    fn cancel_pending_frame(&mut self) {
        if let FrameState::Scheduled { handle, .. } = self.frame {
            self.scheduler.cancel_frame(handle);
            self.frame = FrameState::Idle;
        }
    }

    fn commit_offset(&mut self, offset: u64) {
        self.direction = match offset.cmp(&self.scroll_offset) {
            cmp::Ordering::Greater => Some(ScrollDirection::Forward),
            cmp::Ordering::Less => Some(ScrollDirection::Backward),
            cmp::Ordering::Equal => self.direction,
        };
        self.scroll_offset = offset;
    }

    fn recompute(&mut self) {
        if self.is_disposed() {
            return;
        }
        self.range = self.calculator.visible_range(
            self.scroll_offset,
            self.options.container_height,
            self.item_count,
            self.item_height,
            self.options.overscan,
        );
        self.total_height = self
            .calculator
            .total_height(self.item_count, self.item_height);
        self.recompute_count = self.recompute_count.saturating_add(1);
        vtrace!(
            scroll_offset = self.scroll_offset,
            start = self.range.start,
            end = self.range.end,
            total_height = self.total_height,
            "recompute"
        );

        if let Some(cb) = &self.on_change {
            cb(&self.snapshot());
        }
    }
}

impl<C: RangeCalculator, S: FrameScheduler> Drop for ScrollCoordinator<C, S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<C: RangeCalculator, S: FrameScheduler> fmt::Debug for ScrollCoordinator<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollCoordinator")
            .field("options", &self.options)
            .field("item_count", &self.item_count)
            .field("item_height", &self.item_height)
            .field("scroll_offset", &self.scroll_offset)
            .field("range", &self.range)
            .field("total_height", &self.total_height)
            .field("frame", &self.frame)
            .field("recompute_count", &self.recompute_count)
            .finish_non_exhaustive()
    }
}
