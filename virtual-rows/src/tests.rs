use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }
}

/// Only implements the required methods, so the provided ones run their generic fallbacks.
struct GenericFixed;

impl RangeCalculator for GenericFixed {
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
}

fn list(
    frames: &ManualFrameScheduler,
    item_count: usize,
    item_height: u32,
    options: VirtualizationOptions,
) -> ScrollCoordinator {
    ScrollCoordinator::new(
        FixedHeightCalculator,
        frames.clone(),
        item_count,
        item_height,
        options,
    )
}

fn fire_frame(frames: &ManualFrameScheduler, c: &mut ScrollCoordinator) -> usize {
    let mut applied = 0;
    for handle in frames.run_frame() {
        if c.on_frame(handle) {
            applied += 1;
        }
    }
    applied
}

#[test]
fn empty_list_yields_sentinel_range() {
    let r = calculate_visible_range(0, 600, 0, 50, 3);
    assert_eq!(r, VisibleRange::EMPTY);
    assert_eq!(r.start, 0);
    assert_eq!(r.end, -1);
    assert!(r.is_empty());

    // Other inputs do not matter.
    assert_eq!(calculate_visible_range(12_345, 0, 0, 1, 0), VisibleRange::EMPTY);
}

#[test]
fn range_at_top_includes_trailing_overscan() {
    let r = calculate_visible_range(0, 600, 10_000, 50, 3);
    // 12 visible rows + 3 overscan below, nothing above index 0.
    assert_eq!(r, VisibleRange::inclusive(0, 14));
    assert_eq!(r.len(), 15);
}

#[test]
fn overscan_applies_on_both_sides_when_scrolled() {
    let r = calculate_visible_range(1_000, 600, 10_000, 50, 3);
    assert_eq!(r, VisibleRange::inclusive(17, 34));

    let r = calculate_visible_range(1_000, 600, 10_000, 50, 0);
    assert_eq!(r, VisibleRange::inclusive(20, 31));
}

#[test]
fn offset_past_the_end_is_clamped() {
    // total = 5000, max scroll = 4400 -> first visible row 88.
    let r = calculate_visible_range(1_000_000, 600, 100, 50, 3);
    assert_eq!(r, VisibleRange::inclusive(85, 99));
    assert_eq!(r, calculate_visible_range(4_400, 600, 100, 50, 3));
}

#[test]
fn list_shorter_than_viewport_renders_everything() {
    let r = calculate_visible_range(300, 600, 5, 50, 3);
    assert_eq!(r, VisibleRange::inclusive(0, 4));
}

#[test]
fn unaligned_offset_counts_rows_from_the_first_visible_one() {
    // 12 rows from the row under the offset, whatever the remainder.
    assert_eq!(
        calculate_visible_range(25, 600, 10_000, 50, 0),
        VisibleRange::inclusive(0, 11)
    );
    assert_eq!(
        calculate_visible_range(25, 600, 10_000, 50, 3),
        VisibleRange::inclusive(0, 14)
    );
    assert_eq!(
        calculate_visible_range(1_010, 600, 10_000, 50, 3),
        VisibleRange::inclusive(17, 34)
    );
    assert_eq!(
        calculate_visible_range(1_049, 600, 10_000, 50, 3),
        VisibleRange::inclusive(17, 34)
    );

    // A viewport that is not a whole number of rows rounds up.
    assert_eq!(
        calculate_visible_range(130, 610, 10_000, 50, 1),
        VisibleRange::inclusive(1, 15)
    );
}

#[test]
fn zero_height_viewport() {
    assert_eq!(
        calculate_visible_range(500, 0, 100, 50, 0),
        VisibleRange::EMPTY
    );
    // Overscan still renders the neighbours of the row at the offset.
    assert_eq!(
        calculate_visible_range(500, 0, 100, 50, 2),
        VisibleRange::inclusive(8, 11)
    );
}

#[test]
fn zero_item_height_does_not_panic() {
    assert_eq!(calculate_visible_range(100, 600, 10, 0, 3), VisibleRange::EMPTY);
    assert_eq!(calculate_total_height(10, 0), 0);
}

#[test]
fn item_position_and_total_height() {
    assert_eq!(
        calculate_item_position(0, 50),
        ItemPosition { top: 0, height: 50 }
    );
    let pos = calculate_item_position(123, 50);
    assert_eq!(pos.top, 6_150);
    assert_eq!(pos.height, 50);
    assert_eq!(pos.bottom(), 6_200);

    assert_eq!(calculate_total_height(0, 50), 0);
    assert_eq!(calculate_total_height(100_000, 48), 4_800_000);
}

#[test]
fn visible_range_helpers() {
    let r = VisibleRange::inclusive(3, 6);
    assert_eq!(r.len(), 4);
    assert!(r.contains(3));
    assert!(r.contains(6));
    assert!(!r.contains(7));
    assert_eq!(r.indices().collect::<Vec<_>>(), [3, 4, 5, 6]);

    let e = VisibleRange::default();
    assert_eq!(e, VisibleRange::EMPTY);
    assert_eq!(e.len(), 0);
    assert!(!e.contains(0));
    assert_eq!(e.indices().count(), 0);
}

#[test]
fn randomized_range_invariants() {
    let mut rng = Lcg::new(0x5eed_1234);
    for _ in 0..2_000 {
        let count = rng.gen_range_usize(0, 200);
        let height = rng.gen_range_u32(1, 80);
        let container = rng.gen_range_u32(0, 900);
        let overscan = rng.gen_range_usize(0, 6);
        let total = calculate_total_height(count, height);
        let offset = rng.gen_range_u64(0, total + 2_000);

        let r = calculate_visible_range(offset, container, count, height, overscan);
        assert_eq!(
            r,
            calculate_visible_range(offset, container, count, height, overscan),
            "must be pure"
        );

        if count == 0 {
            assert_eq!(r, VisibleRange::EMPTY);
            continue;
        }
        if r.is_empty() {
            assert_eq!(r, VisibleRange::EMPTY);
        } else {
            assert!(r.start as isize <= r.end);
            assert!(r.end <= count as isize - 1);
        }

        if container == 0 {
            continue;
        }

        // Every row intersecting the (clamped) viewport is in the range. Without overscan this
        // only holds on row boundaries; one overscan row covers the partial row at the bottom.
        let off = offset.min(total.saturating_sub(container as u64));
        let aligned = off % height as u64 == 0;
        let view_end = off + container as u64;
        for i in 0..count {
            let pos = calculate_item_position(i, height);
            if (aligned || overscan >= 1) && pos.top < view_end && pos.bottom() > off {
                assert!(
                    r.contains(i),
                    "row {i} intersects [{off}, {view_end}) but {r:?} misses it"
                );
            }
        }

        // At most `overscan` extra rows above the first visible one.
        let first = (off / height as u64) as usize;
        assert!(r.start + overscan >= first);
    }
}

#[test]
fn start_never_decreases_as_offset_grows() {
    let mut rng = Lcg::new(42);
    for _ in 0..200 {
        let count = rng.gen_range_usize(1, 500);
        let height = rng.gen_range_u32(1, 60);
        let container = rng.gen_range_u32(0, 700);
        let overscan = rng.gen_range_usize(0, 5);
        let total = calculate_total_height(count, height);

        let mut offset = 0u64;
        let mut prev_start = 0usize;
        while offset <= total + 100 {
            let r = calculate_visible_range(offset, container, count, height, overscan);
            assert!(r.start >= prev_start, "start went backwards at offset {offset}");
            prev_start = r.start;
            offset += rng.gen_range_u64(1, 40);
        }
    }
}

#[test]
fn index_at_offset_fast_path_matches_generic_search() {
    let mut rng = Lcg::new(7);
    for _ in 0..500 {
        let count = rng.gen_range_usize(0, 300);
        let height = rng.gen_range_u32(1, 50);
        let offset = rng.gen_range_u64(0, calculate_total_height(count, height) + 500);
        assert_eq!(
            FixedHeightCalculator.index_at_offset(offset, count, height),
            GenericFixed.index_at_offset(offset, count, height),
        );
    }
    assert_eq!(FixedHeightCalculator.index_at_offset(10, 0, 50), None);
    assert_eq!(FixedHeightCalculator.index_at_offset(99, 10, 50), Some(1));
    assert_eq!(FixedHeightCalculator.index_at_offset(10_000, 10, 50), Some(9));
}

#[test]
fn scroll_to_index_offset_alignments() {
    let calc = FixedHeightCalculator;
    let at = |index, align, current| calc.scroll_to_index_offset(index, align, current, 600, 100, 50);

    assert_eq!(at(10, Align::Start, 0), 500);
    assert_eq!(at(10, Align::End, 0), 0);
    assert_eq!(at(30, Align::End, 0), 950);
    assert_eq!(at(20, Align::Center, 0), 725);
    // Clamped to max scroll (5000 - 600).
    assert_eq!(at(99, Align::Start, 0), 4_400);
    assert_eq!(at(1_000, Align::Start, 0), 4_400);

    // Auto keeps the offset when the row is already fully visible.
    assert_eq!(at(5, Align::Auto, 0), 0);
    assert_eq!(at(30, Align::Auto, 0), 950);
    assert_eq!(at(10, Align::Auto, 2_000), 500);

    assert_eq!(calc.scroll_to_index_offset(3, Align::Start, 0, 600, 0, 50), 0);
}

#[test]
fn options_defaults_and_builders() {
    let o = VirtualizationOptions::default();
    assert_eq!(o.container_height, 600);
    assert_eq!(o.overscan, 3);
    assert!(!o.enable_performance_monitoring);

    let o = VirtualizationOptions::new(400)
        .with_overscan(5)
        .with_performance_monitoring(true);
    assert_eq!(o.container_height, 400);
    assert_eq!(o.overscan, 5);
    assert!(o.enable_performance_monitoring);
    assert_eq!(o.with_container_height(10).container_height, 10);
}

#[test]
fn scroll_events_within_one_frame_recompute_once_with_last_offset() {
    let frames = ManualFrameScheduler::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(Vec::<ScrollSnapshot>::new()));
    let mut c = list(&frames, 10_000, 50, VirtualizationOptions::default()).with_on_change(Some({
        let calls = Arc::clone(&calls);
        let seen = Arc::clone(&seen);
        move |s: &ScrollSnapshot| {
            calls.fetch_add(1, Ordering::SeqCst);
            seen.lock().unwrap().push(*s);
        }
    }));

    for i in 1..=10u64 {
        c.on_scroll(i * 100);
    }
    assert!(c.is_frame_scheduled());
    assert_eq!(frames.pending(), 1);
    assert_eq!(frames.requested_count(), 10);
    assert_eq!(frames.cancelled_count(), 9);
    // Nothing is committed before the frame fires.
    assert_eq!(c.scroll_offset(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert_eq!(fire_frame(&frames, &mut c), 1);
    assert!(!c.is_frame_scheduled());
    assert_eq!(c.recompute_count(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(c.scroll_offset(), 1_000);
    assert_eq!(c.visible_range(), VisibleRange::inclusive(17, 34));

    let snapshots = seen.lock().unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].scroll_offset, 1_000);
    assert_eq!(snapshots[0].range, VisibleRange::inclusive(17, 34));
    assert_eq!(snapshots[0].total_height, 500_000);
    assert_eq!(snapshots[0].direction, Some(ScrollDirection::Forward));
}

#[test]
fn each_frame_window_applies_its_own_latest_offset() {
    let frames = ManualFrameScheduler::new();
    let mut c = list(&frames, 1_000, 20, VirtualizationOptions::new(200));

    c.on_scroll(400);
    c.on_scroll(600);
    fire_frame(&frames, &mut c);
    assert_eq!(c.scroll_offset(), 600);

    c.on_scroll(300);
    fire_frame(&frames, &mut c);
    assert_eq!(c.scroll_offset(), 300);
    assert_eq!(c.scroll_direction(), Some(ScrollDirection::Backward));
    assert_eq!(c.recompute_count(), 2);

    // A frame with nothing scheduled does nothing.
    assert_eq!(fire_frame(&frames, &mut c), 0);
    assert_eq!(c.recompute_count(), 2);
}

#[test]
fn scroll_events_past_the_end_commit_the_clamped_offset() {
    let frames = ManualFrameScheduler::new();
    let mut c = list(&frames, 100, 50, VirtualizationOptions::default());
    assert_eq!(c.max_scroll_offset(), 4_400);

    c.on_scroll(1_000_000);
    assert_eq!(fire_frame(&frames, &mut c), 1);
    assert_eq!(c.scroll_offset(), 4_400);
    assert_eq!(c.snapshot().scroll_offset, 4_400);
    assert_eq!(c.visible_range(), VisibleRange::inclusive(85, 99));
    assert_eq!(c.scroll_direction(), Some(ScrollDirection::Forward));

    // Settling back onto the end is not movement.
    c.on_scroll(4_400);
    fire_frame(&frames, &mut c);
    assert_eq!(c.scroll_offset(), 4_400);
    assert_eq!(c.scroll_direction(), Some(ScrollDirection::Forward));
    assert_eq!(c.visible_range(), VisibleRange::inclusive(85, 99));

    c.on_scroll(4_000);
    fire_frame(&frames, &mut c);
    assert_eq!(c.scroll_direction(), Some(ScrollDirection::Backward));

    // The extent is read when the frame fires, not when the event arrives.
    c.on_scroll(4_400);
    c.set_item_count(20);
    fire_frame(&frames, &mut c);
    assert_eq!(c.scroll_offset(), 400);
    assert_eq!(c.visible_range(), VisibleRange::inclusive(5, 19));
}

#[test]
fn stale_frame_handle_is_ignored() {
    let frames = ManualFrameScheduler::new();
    let mut c = list(&frames, 1_000, 20, VirtualizationOptions::default());

    c.on_scroll(100);
    let first = frames.run_frame();
    assert_eq!(first.len(), 1);
    c.on_scroll(200);

    // The first handle was superseded by the second scroll event.
    assert!(!c.on_frame(first[0]));
    assert_eq!(c.recompute_count(), 0);
    assert_eq!(fire_frame(&frames, &mut c), 1);
    assert_eq!(c.scroll_offset(), 200);
}

#[test]
fn prop_changes_recompute_synchronously() {
    let frames = ManualFrameScheduler::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let mut c = list(&frames, 100, 50, VirtualizationOptions::default()).with_on_change(Some({
        let calls = Arc::clone(&calls);
        move |_: &ScrollSnapshot| {
            calls.fetch_add(1, Ordering::SeqCst);
        }
    }));
    assert_eq!(c.total_height(), 5_000);
    assert_eq!(c.visible_range(), VisibleRange::inclusive(0, 14));

    c.set_item_count(10);
    assert_eq!(c.total_height(), 500);
    assert_eq!(c.visible_range(), VisibleRange::inclusive(0, 9));

    c.set_item_height(100);
    assert_eq!(c.total_height(), 1_000);

    c.set_container_height(200);
    c.set_overscan(0);
    assert_eq!(c.visible_range(), VisibleRange::inclusive(0, 1));

    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(frames.requested_count(), 0);

    // Unchanged values do not recompute.
    c.set_item_count(10);
    c.set_overscan(0);
    c.set_options(VirtualizationOptions::new(200).with_overscan(0).with_performance_monitoring(true));
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert!(c.options().enable_performance_monitoring);

    c.set_options(VirtualizationOptions::new(300).with_overscan(0));
    assert_eq!(calls.load(Ordering::SeqCst), 5);
    assert_eq!(c.visible_range(), VisibleRange::inclusive(0, 2));
}

#[test]
fn shrinking_the_list_keeps_the_range_in_bounds() {
    let frames = ManualFrameScheduler::new();
    let mut c = list(&frames, 10_000, 50, VirtualizationOptions::default());
    c.on_scroll(400_000);
    fire_frame(&frames, &mut c);
    assert_eq!(c.visible_range().start, 7_997);

    c.set_item_count(20);
    let r = c.visible_range();
    assert!(!r.is_empty());
    assert!(r.end <= 19);

    c.set_item_count(0);
    assert_eq!(c.visible_range(), VisibleRange::EMPTY);
    assert_eq!(c.total_height(), 0);
}

#[test]
fn dispose_cancels_pending_frame_and_silences_callbacks() {
    let frames = ManualFrameScheduler::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let mut c = list(&frames, 1_000, 20, VirtualizationOptions::default()).with_on_change(Some({
        let calls = Arc::clone(&calls);
        move |_: &ScrollSnapshot| {
            calls.fetch_add(1, Ordering::SeqCst);
        }
    }));

    c.on_scroll(100);
    fire_frame(&frames, &mut c);
    c.on_scroll(500);
    assert_eq!(frames.pending(), 1);
    let before = calls.load(Ordering::SeqCst);

    c.dispose();
    assert!(c.is_disposed());
    assert_eq!(frames.pending(), 0);
    assert_eq!(frames.cancelled_count(), 1);

    c.dispose();
    c.on_scroll(900);
    c.set_item_count(5);
    c.set_overscan(9);
    assert_eq!(c.scroll_to_offset(300), 100);
    assert_eq!(fire_frame(&frames, &mut c), 0);

    assert_eq!(frames.requested_count(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), before);
    assert_eq!(c.scroll_offset(), 100);
}

#[test]
fn dropping_the_coordinator_cancels_its_frame() {
    let frames = ManualFrameScheduler::new();
    {
        let mut c = list(&frames, 1_000, 20, VirtualizationOptions::default());
        c.on_scroll(100);
        assert_eq!(frames.pending(), 1);
    }
    assert_eq!(frames.pending(), 0);
    assert!(frames.run_frame().is_empty());
}

#[test]
fn programmatic_scroll_supersedes_pending_frame() {
    let frames = ManualFrameScheduler::new();
    let mut c = list(&frames, 100, 50, VirtualizationOptions::default());

    c.on_scroll(1_000);
    assert_eq!(c.scroll_to_index(50, Align::Start), 2_500);
    assert!(!c.is_frame_scheduled());
    assert_eq!(frames.pending(), 0);
    assert_eq!(c.visible_range(), VisibleRange::inclusive(47, 64));

    assert_eq!(c.scroll_to_offset(1_000_000), 4_400);
    assert_eq!(c.max_scroll_offset(), 4_400);
    assert_eq!(c.visible_range().end, 99);
}

#[test]
fn visible_items_carry_absolute_positions() {
    let frames = ManualFrameScheduler::new();
    let mut c = list(&frames, 1_000, 30, VirtualizationOptions::new(90).with_overscan(1));
    c.on_scroll(300);
    fire_frame(&frames, &mut c);

    let mut items = Vec::new();
    c.collect_visible_items(&mut items);
    let indexes: Vec<usize> = items.iter().map(|(i, _)| *i).collect();
    assert_eq!(indexes, [9, 10, 11, 12, 13]);
    for (i, pos) in &items {
        assert_eq!(pos.top, *i as u64 * 30);
        assert_eq!(pos.height, 30);
    }

    assert_eq!(c.item_position(999), Some(ItemPosition { top: 29_970, height: 30 }));
    assert_eq!(c.item_position(1_000), None);
    assert_eq!(c.snapshot().range, c.visible_range());
}

#[test]
fn coordinator_accepts_a_substitute_calculator() {
    /// Renders everything; used to check the coordinator only talks to the trait.
    struct Unvirtualized;

    impl RangeCalculator for Unvirtualized {
        fn visible_range(&self, _: u64, _: u32, item_count: usize, _: u32, _: usize) -> VisibleRange {
            if item_count == 0 {
                VisibleRange::EMPTY
            } else {
                VisibleRange::inclusive(0, item_count - 1)
            }
        }

        fn item_position(&self, index: usize, item_height: u32) -> ItemPosition {
            calculate_item_position(index, item_height)
        }

        fn total_height(&self, item_count: usize, item_height: u32) -> u64 {
            calculate_total_height(item_count, item_height)
        }
    }

    let frames = ManualFrameScheduler::new();
    let mut c = ScrollCoordinator::new(
        Unvirtualized,
        frames.clone(),
        250,
        10,
        VirtualizationOptions::default(),
    );
    c.on_scroll(1_000);
    for h in frames.run_frame() {
        c.on_frame(h);
    }
    assert_eq!(c.visible_range().len(), 250);
}
