// Example: a host loop that delivers many scroll events per frame.
use virtual_rows::{
    FixedHeightCalculator, ManualFrameScheduler, ScrollCoordinator, ScrollSnapshot,
    VirtualizationOptions,
};

fn main() {
    let frames = ManualFrameScheduler::new();
    let mut list = ScrollCoordinator::new(
        FixedHeightCalculator,
        frames.clone(),
        50_000,
        32,
        VirtualizationOptions::new(640).with_overscan(4),
    )
    .with_on_change(Some(|s: &ScrollSnapshot| {
        println!(
            "offset={} range={}..={} total={} direction={:?}",
            s.scroll_offset, s.range.start, s.range.end, s.total_height, s.direction
        );
    }));

    let mut offset = 0u64;
    for frame in 0..6 {
        // A trackpad easily fires several wheel events between two frames.
        for _ in 0..5 {
            offset += 37;
            list.on_scroll(offset);
        }
        for handle in frames.run_frame() {
            list.on_frame(handle);
        }
        println!(
            "frame {frame}: requested={} cancelled={} recomputes={}",
            frames.requested_count(),
            frames.cancelled_count(),
            list.recompute_count()
        );
    }

    list.on_scroll(offset + 1_000);
    list.dispose();
    println!("after dispose: pending frames={}", frames.pending());
}
