// Example: a session controller comparing non-virtualized and virtualized rendering.
//
// Rendering is simulated: the node count is the number of rows a real renderer would mount,
// and render time is derived from it.
use std::cell::Cell;
use std::rc::Rc;

use virtual_rows::{
    FixedHeightCalculator, ManualFrameScheduler, ScrollCoordinator, VirtualizationOptions,
};
use virtual_rows_perf::{
    BaselineCapture, BaselineCaptureOptions, BaselineRecord, DemoConfig, NodeCounter,
    PerformanceSampler, RenderMode, SamplerOptions, SavingsReport, should_invalidate_baseline,
};

const FRAME_MS: u64 = 16;

fn main() {
    let config = DemoConfig::new(10_000, 50, 3);
    let options = VirtualizationOptions::default().with_overscan(config.overscan);

    let frames = ManualFrameScheduler::new();
    let mut list = ScrollCoordinator::new(
        FixedHeightCalculator,
        frames.clone(),
        config.dataset_size,
        config.item_height,
        options,
    );

    let mounted_rows = Rc::new(Cell::new(config.dataset_size as u64));
    let counter: Box<dyn NodeCounter> = Box::new({
        let mounted_rows = Rc::clone(&mounted_rows);
        move || Some(mounted_rows.get())
    });
    let heap_bytes = {
        let mounted_rows = Rc::clone(&mounted_rows);
        move || Some(8 * 1024 * 1024 + mounted_rows.get() * 4 * 1024)
    };

    let mut sampler = PerformanceSampler::new(SamplerOptions::default(), heap_bytes);
    let mut capture =
        BaselineCapture::new(RenderMode::NonVirtualized, config, BaselineCaptureOptions::default());
    let mut baseline: Option<BaselineRecord> = None;

    sampler.start_monitoring(|m| println!("sample: {m:?}"), Some(counter), 0);

    let mut now = 0u64;
    let mut offset = 0u64;
    for second in 0..6 {
        let mode = if second < 3 {
            RenderMode::NonVirtualized
        } else {
            RenderMode::Virtualized
        };
        capture.set_mode(mode);

        for _ in 0..(1000 / FRAME_MS) {
            now += FRAME_MS;
            offset += 120;
            list.on_scroll(offset);
            for handle in frames.run_frame() {
                list.on_frame(handle);
            }

            let rows = match mode {
                RenderMode::NonVirtualized => config.dataset_size,
                RenderMode::Virtualized => list.visible_range().len(),
            };
            mounted_rows.set(rows as u64);

            sampler.mark_render_start("rows", now as f64);
            sampler.mark_render_end("rows", now as f64 + rows as f64 * 0.004);
            sampler.record_frame();

            if let Some(sample) = sampler.tick(now) {
                capture.on_sample(sample, now);
            }
            if let Some(record) = capture.poll(now) {
                println!("baseline captured: {:?}", record.metrics);
                baseline = Some(record);
            }
        }
    }

    let current = sampler.metrics();
    sampler.stop_monitoring();
    list.dispose();

    match baseline {
        Some(record) if !should_invalidate_baseline(&config, Some(&record.config)) => {
            println!("{}", SavingsReport::new(current, record.metrics));
        }
        _ => println!("no valid baseline captured"),
    }
}
