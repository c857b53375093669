use std::collections::HashMap;
use std::fmt;

use crate::metrics::BYTES_PER_MB;
use crate::{EpochClock, PerformanceMetrics, system_epoch_ms};

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Reports the process (or page) memory in use, when the platform can tell.
pub trait MemoryProbe {
    fn used_bytes(&self) -> Option<u64>;
}

impl<F: Fn() -> Option<u64>> MemoryProbe for F {
    fn used_bytes(&self) -> Option<u64> {
        self()
    }
}

/// A probe for platforms without memory introspection.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMemoryProbe;

impl MemoryProbe for NoMemoryProbe {
    fn used_bytes(&self) -> Option<u64> {
        None
    }
}

/// Counts rendered nodes under the monitored element.
///
/// `None` means the element is not attached yet.
pub trait NodeCounter {
    fn node_count(&self) -> Option<u64>;
}

impl<F: Fn() -> Option<u64>> NodeCounter for F {
    fn node_count(&self) -> Option<u64> {
        self()
    }
}

/// A callback fired once per sampling tick.
pub type OnTickCallback = Box<dyn FnMut(&PerformanceMetrics)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SamplerOptions {
    /// Sampling cadence; subscribers are never notified more often than this.
    pub tick_interval_ms: u64,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl SamplerOptions {
    pub fn with_tick_interval_ms(mut self, tick_interval_ms: u64) -> Self {
        self.tick_interval_ms = tick_interval_ms;
        self
    }
}

struct Monitor {
    on_tick: OnTickCallback,
    target: Option<Box<dyn NodeCounter>>,
    frames: u64,
    window_start_ms: u64,
    next_tick_ms: u64,
}

/// Samples frame rate, memory, node count and render time at a fixed cadence.
///
/// The sampler is adapter-driven and holds no timers of its own:
/// - `record_frame` from the animation-frame loop (counted, never reported directly)
/// - `tick(now_ms)` from an interval timer; a sample is emitted once per `tick_interval_ms`
/// - `mark_render_start`/`mark_render_end` around a render pass
///
/// After `stop_monitoring` nothing is reported until monitoring starts again.
pub struct PerformanceSampler<P: MemoryProbe = NoMemoryProbe> {
    options: SamplerOptions,
    probe: P,
    clock: EpochClock,
    monitor: Option<Monitor>,
    latest: PerformanceMetrics,
    last_render_time_ms: f64,
    render_marks: HashMap<String, f64>,
}

impl PerformanceSampler<NoMemoryProbe> {
    pub fn without_memory_probe(options: SamplerOptions) -> Self {
        Self::new(options, NoMemoryProbe)
    }
}

impl<P: MemoryProbe> PerformanceSampler<P> {
    pub fn new(options: SamplerOptions, probe: P) -> Self {
        Self {
            options,
            probe,
            clock: system_epoch_ms,
            monitor: None,
            latest: PerformanceMetrics::default(),
            last_render_time_ms: 0.0,
            render_marks: HashMap::new(),
        }
    }

    /// Replaces the wall clock that stamps samples. Defaults to [`system_epoch_ms`].
    pub fn with_clock(mut self, clock: EpochClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn options(&self) -> &SamplerOptions {
        &self.options
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitor.is_some()
    }

    /// Starts sampling. The first sample is due `tick_interval_ms` after `now_ms`.
    ///
    /// Calling this while already monitoring replaces the callback and target and restarts
    /// the cadence.
    pub fn start_monitoring(
        &mut self,
        on_tick: impl FnMut(&PerformanceMetrics) + 'static,
        target: Option<Box<dyn NodeCounter>>,
        now_ms: u64,
    ) {
        vdebug!(
            now_ms,
            interval_ms = self.options.tick_interval_ms,
            restart = self.monitor.is_some(),
            "start_monitoring"
        );
        self.monitor = Some(Monitor {
            on_tick: Box::new(on_tick),
            target,
            frames: 0,
            window_start_ms: now_ms,
            next_tick_ms: now_ms.saturating_add(self.interval_ms()),
        });
    }

    /// Stops sampling and releases the callback and target. The last sample stays readable
    /// through [`Self::metrics`]. Calling this more than once is a no-op.
    pub fn stop_monitoring(&mut self) {
        if self.monitor.take().is_some() {
            vdebug!("stop_monitoring");
        }
        self.render_marks.clear();
    }

    /// Replaces the monitored element (e.g. once it is mounted).
    pub fn set_target(&mut self, target: Option<Box<dyn NodeCounter>>) {
        if let Some(m) = self.monitor.as_mut() {
            m.target = target;
        }
    }

    /// The latest sample, or zeroed metrics before the first tick.
    pub fn metrics(&self) -> PerformanceMetrics {
        self.latest
    }

    /// Counts one animation frame towards the current window's frame rate.
    pub fn record_frame(&mut self) {
        if let Some(m) = self.monitor.as_mut() {
            m.frames = m.frames.saturating_add(1);
        }
    }

    /// Emits a sample if one is due at `now_ms`, and returns it.
    ///
    /// A late tick produces a single sample and realigns the schedule to the next whole
    /// interval, so subscribers never receive bursts.
    pub fn tick(&mut self, now_ms: u64) -> Option<PerformanceMetrics> {
        let interval = self.interval_ms();
        let m = self.monitor.as_mut()?;
        if now_ms < m.next_tick_ms {
            return None;
        }

        let elapsed = now_ms.saturating_sub(m.window_start_ms);
        let fps = if elapsed > 0 {
            (m.frames as f64 * 1000.0 / elapsed as f64).round()
        } else {
            0.0
        };
        let memory_usage_mb = self
            .probe
            .used_bytes()
            .map_or(0.0, |bytes| bytes as f64 / BYTES_PER_MB);
        let dom_node_count = m
            .target
            .as_ref()
            .and_then(|t| t.node_count())
            .unwrap_or(0);

        let sample = PerformanceMetrics {
            fps,
            memory_usage_mb,
            dom_node_count,
            render_time_ms: self.last_render_time_ms,
            timestamp: (self.clock)(),
        };

        let missed = (now_ms - m.next_tick_ms) / interval;
        if missed > 0 {
            vtrace!(missed, "tick: skipped late intervals");
        }
        m.next_tick_ms = m
            .next_tick_ms
            .saturating_add(missed.saturating_add(1).saturating_mul(interval));
        m.frames = 0;
        m.window_start_ms = now_ms;

        self.latest = sample;
        (m.on_tick)(&sample);
        Some(sample)
    }

    /// Opens a render measurement. `now_ms` is a high-resolution timestamp.
    pub fn mark_render_start(&mut self, label: &str, now_ms: f64) {
        self.render_marks.insert(label.to_owned(), now_ms);
    }

    /// Closes the render measurement opened with the same label and returns its duration.
    ///
    /// Without a matching `mark_render_start` this does nothing and returns `None`.
    pub fn mark_render_end(&mut self, label: &str, now_ms: f64) -> Option<f64> {
        let Some(start) = self.render_marks.remove(label) else {
            vtrace!(label, "mark_render_end without start");
            return None;
        };
        let duration = (now_ms - start).max(0.0);
        self.last_render_time_ms = duration;
        Some(duration)
    }

    pub fn last_render_time_ms(&self) -> f64 {
        self.last_render_time_ms
    }

    fn interval_ms(&self) -> u64 {
        if self.options.tick_interval_ms == 0 {
            vwarn!("tick_interval_ms is 0; using 1ms");
        }
        self.options.tick_interval_ms.max(1)
    }
}

impl<P: MemoryProbe> fmt::Debug for PerformanceSampler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerformanceSampler")
            .field("options", &self.options)
            .field("monitoring", &self.monitor.is_some())
            .field("latest", &self.latest)
            .field("last_render_time_ms", &self.last_render_time_ms)
            .field("open_render_marks", &self.render_marks.len())
            .finish_non_exhaustive()
    }
}
