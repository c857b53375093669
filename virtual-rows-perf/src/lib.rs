//! Performance sampling and baseline comparison for lists driven by `virtual-rows`.
//!
//! Virtualization is only worth its complexity if it measurably saves work. This crate
//! provides the pieces an adapter needs to show that:
//!
//! - [`PerformanceSampler`]: frame rate, memory, node count and render time, sampled at a fixed
//!   cadence from host-provided probes
//! - [`calculate_resource_savings`], [`average_metrics`], [`should_invalidate_baseline`]: pure
//!   comparison math
//! - [`BaselineCapture`]: captures an averaged baseline while rendering without virtualization
//! - [`SavingsReport`]: a printable summary that tells "no savings" apart from "can't measure"
//!
//! Like `virtual-rows`, nothing here owns a timer or a UI object; the host forwards frames,
//! ticks and clock readings. Sample and record timestamps come from an [`EpochClock`], the
//! system clock unless one is injected with `with_clock`.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod baseline;
mod metrics;
mod report;
mod sampler;
mod savings;


pub use baseline::{
    BASELINE_SAMPLE_COUNT, BaselineCapture, BaselineCaptureOptions, DEFAULT_SETTLE_DELAY_MS,
    SampleHistory,
};
pub use metrics::{
    BaselineConfig, BaselineRecord, DemoConfig, EpochClock, PerformanceMetrics, RenderMode,
    system_epoch_ms,
};
pub use report::{SavingsReport, UNAVAILABLE, format_memory_mb};
pub use sampler::{
    DEFAULT_TICK_INTERVAL_MS, MemoryProbe, NoMemoryProbe, NodeCounter, OnTickCallback,
    PerformanceSampler, SamplerOptions,
};
pub use savings::{
    ResourceSavings, average_metrics, average_metrics_at, calculate_resource_savings,
    should_invalidate_baseline,
};
