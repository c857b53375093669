use crate::{Align, ItemPosition, VisibleRange};

/// The math behind a virtualized list: which indexes to render, where each one goes, and how
/// tall the scrollable content is.
///
/// [`crate::ScrollCoordinator`] takes its calculator by value, so a different strategy (or a
/// test double) can be swapped in without touching the coordinator.
///
/// Only the three required methods define a strategy. The provided methods are derived from
/// them and can be overridden when a strategy has a faster closed form.
pub trait RangeCalculator {
    /// Returns the inclusive range to render for the given viewport, including `overscan`
    /// items on each side, clipped to `0..item_count`.
    fn visible_range(
        &self,
        scroll_offset: u64,
        container_height: u32,
        item_count: usize,
        item_height: u32,
        overscan: usize,
    ) -> VisibleRange;

    fn item_position(&self, index: usize, item_height: u32) -> ItemPosition;

    fn total_height(&self, item_count: usize, item_height: u32) -> u64;

    fn max_scroll_offset(&self, item_count: usize, item_height: u32, container_height: u32) -> u64 {
        self.total_height(item_count, item_height)
            .saturating_sub(container_height as u64)
    }

    /// Returns the index of the item covering `offset`, clamped to the last item.
    ///
    /// Returns `None` for an empty list.
    fn index_at_offset(&self, offset: u64, item_count: usize, item_height: u32) -> Option<usize> {
        if item_count == 0 {
            return None;
        }
        // First item whose bottom edge is past `offset`.
        let (mut lo, mut hi) = (0usize, item_count);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.item_position(mid, item_height).bottom() <= offset {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        Some(lo.min(item_count - 1))
    }

    /// Computes the (clamped) scroll offset that brings `index` into view.
    ///
    /// `current_offset` is only consulted for [`Align::Auto`], which keeps the current offset
    /// when the item is already fully visible.
    fn scroll_to_index_offset(
        &self,
        index: usize,
        align: Align,
        current_offset: u64,
        container_height: u32,
        item_count: usize,
        item_height: u32,
    ) -> u64 {
        if item_count == 0 {
            return 0;
        }
        let item = self.item_position(index.min(item_count - 1), item_height);
        let view = container_height as u64;

        let target = match align {
            Align::Start => item.top,
            Align::End => item.bottom().saturating_sub(view),
            Align::Center => {
                let center = item.top.saturating_add(item.height as u64 / 2);
                center.saturating_sub(view / 2)
            }
            Align::Auto => {
                let cur_end = current_offset.saturating_add(view);
                if item.top >= current_offset && item.bottom() <= cur_end {
                    current_offset
                } else if item.top < current_offset {
                    item.top
                } else {
                    item.bottom().saturating_sub(view)
                }
            }
        };

        target.min(self.max_scroll_offset(item_count, item_height, container_height))
    }

    /// Calls `f` with each index of `range` and its position, in ascending order.
    fn for_each_item(
        &self,
        range: VisibleRange,
        item_height: u32,
        mut f: impl FnMut(usize, ItemPosition),
    ) where
        Self: Sized,
    {
        for i in range.indices() {
            f(i, self.item_position(i, item_height));
        }
    }
}

/// The default strategy: every item has the same height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedHeightCalculator;

impl RangeCalculator for FixedHeightCalculator {
    fn visible_range(
        &self,
        scroll_offset: u64,
        container_height: u32,
        item_count: usize,
        item_height: u32,
        overscan: usize,
    ) -> VisibleRange {
        calculate_visible_range(
            scroll_offset,
            container_height,
            item_count,
            item_height,
            overscan,
        )
    }

    fn item_position(&self, index: usize, item_height: u32) -> ItemPosition {
        calculate_item_position(index, item_height)
    }

    fn total_height(&self, item_count: usize, item_height: u32) -> u64 {
        calculate_total_height(item_count, item_height)
    }

    fn index_at_offset(&self, offset: u64, item_count: usize, item_height: u32) -> Option<usize> {
        if item_count == 0 {
            return None;
        }
        if item_height == 0 {
            return Some(0);
        }
        let index = offset / item_height as u64;
        Some(usize::try_from(index).map_or(item_count - 1, |i| i.min(item_count - 1)))
    }
}

/// Computes the inclusive range of items to render.
///
/// `scroll_offset` is clamped to `[0, total_height - container_height]` first, so offsets past
/// the end of the content (e.g. after the list shrank) still produce a valid range.
///
/// The range covers `ceil(container_height / item_height)` rows starting at the row under the
/// offset, widened by `overscan` on both sides. When the offset falls partway through a row,
/// the sliver of the next row at the bottom of the viewport is covered by overscan.
///
/// Returns [`VisibleRange::EMPTY`] when there is nothing to render: an empty list, a zero
/// `item_height` (which is a caller error), or a zero-height viewport without overscan.
pub fn calculate_visible_range(
    scroll_offset: u64,
    container_height: u32,
    item_count: usize,
    item_height: u32,
    overscan: usize,
) -> VisibleRange {
    if item_count == 0 {
        return VisibleRange::EMPTY;
    }
    if item_height == 0 {
        vwarn!(item_count, "calculate_visible_range: item_height must be positive");
        return VisibleRange::EMPTY;
    }

    let height = item_height as u64;
    let total = calculate_total_height(item_count, item_height);
    let offset = scroll_offset.min(total.saturating_sub(container_height as u64));

    let first_visible = offset / height;
    let visible_count = (container_height as u64).div_ceil(height);
    let overscan = overscan as u64;
    let last_index = item_count as u64 - 1;

    let start = first_visible.saturating_sub(overscan);
    // Zero means the range ends before index 0.
    let end_exclusive = first_visible
        .saturating_add(visible_count)
        .saturating_add(overscan);
    if end_exclusive == 0 {
        return VisibleRange::EMPTY;
    }
    let end = (end_exclusive - 1).min(last_index);
    if end < start {
        return VisibleRange::EMPTY;
    }

    VisibleRange::inclusive(start as usize, end as usize)
}

pub fn calculate_item_position(index: usize, item_height: u32) -> ItemPosition {
    ItemPosition {
        top: (index as u64).saturating_mul(item_height as u64),
        height: item_height,
    }
}

pub fn calculate_total_height(item_count: usize, item_height: u32) -> u64 {
    (item_count as u64).saturating_mul(item_height as u64)
}
