use std::collections::VecDeque;

use crate::{
    BaselineConfig, BaselineRecord, DemoConfig, EpochClock, PerformanceMetrics, RenderMode,
    average_metrics_at, should_invalidate_baseline, system_epoch_ms,
};

pub const BASELINE_SAMPLE_COUNT: usize = 2;
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 500;

/// A fixed-capacity history of the most recent samples; pushing into a full history evicts the
/// oldest one.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleHistory {
    samples: VecDeque<PerformanceMetrics>,
    capacity: usize,
}

impl SampleHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: PerformanceMetrics) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &PerformanceMetrics> {
        self.samples.iter()
    }

    /// Oldest first.
    pub fn as_slice(&mut self) -> &[PerformanceMetrics] {
        self.samples.make_contiguous()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaselineCaptureOptions {
    /// How long the sample history must stay unchanged before it is averaged into a baseline.
    pub settle_delay_ms: u64,
}

impl Default for BaselineCaptureOptions {
    fn default() -> Self {
        Self {
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

impl BaselineCaptureOptions {
    pub fn with_settle_delay_ms(mut self, settle_delay_ms: u64) -> Self {
        self.settle_delay_ms = settle_delay_ms;
        self
    }
}

/// Decides when a session has a stable non-virtualized run to use as its baseline.
///
/// Samples are only collected in [`RenderMode::NonVirtualized`]. Once the last
/// [`BASELINE_SAMPLE_COUNT`] samples are in, a settle deadline starts; every new sample
/// restarts it. When it passes, [`Self::poll`] averages the history into a
/// [`BaselineRecord`]. A session captures at most once, until the mode flips, the dataset
/// size or item height changes, or [`Self::reset`] is called.
#[derive(Clone, Debug)]
pub struct BaselineCapture {
    options: BaselineCaptureOptions,
    mode: RenderMode,
    config: DemoConfig,
    history: SampleHistory,
    captured: bool,
    settle_deadline_ms: Option<u64>,
    clock: EpochClock,
}

impl BaselineCapture {
    pub fn new(mode: RenderMode, config: DemoConfig, options: BaselineCaptureOptions) -> Self {
        Self {
            options,
            mode,
            config,
            history: SampleHistory::with_capacity(BASELINE_SAMPLE_COUNT),
            captured: false,
            settle_deadline_ms: None,
            clock: system_epoch_ms,
        }
    }

    /// Replaces the wall clock that stamps captured records. Defaults to [`system_epoch_ms`].
    pub fn with_clock(mut self, clock: EpochClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Whether a capture is scheduled and waiting for its settle deadline.
    pub fn is_settling(&self) -> bool {
        self.settle_deadline_ms.is_some()
    }

    pub fn settle_deadline_ms(&self) -> Option<u64> {
        self.settle_deadline_ms
    }

    pub fn history(&self) -> &SampleHistory {
        &self.history
    }

    pub fn on_sample(&mut self, sample: PerformanceMetrics, now_ms: u64) {
        if self.mode != RenderMode::NonVirtualized {
            return;
        }
        self.history.push(sample);
        if self.history.is_full() && !self.captured {
            let deadline = now_ms.saturating_add(self.options.settle_delay_ms);
            vtrace!(deadline, restarted = self.is_settling(), "baseline capture scheduled");
            self.settle_deadline_ms = Some(deadline);
        }
    }

    /// Completes a scheduled capture once its deadline has passed.
    pub fn poll(&mut self, now_ms: u64) -> Option<BaselineRecord> {
        let deadline = self.settle_deadline_ms?;
        if now_ms < deadline {
            return None;
        }
        self.settle_deadline_ms = None;

        let timestamp = (self.clock)();
        let metrics = average_metrics_at(self.history.as_slice(), timestamp);
        self.captured = true;
        let record = BaselineRecord {
            metrics,
            timestamp,
            config: BaselineConfig::from(&self.config),
        };
        vdebug!(
            fps = metrics.fps,
            memory_usage_mb = metrics.memory_usage_mb,
            dom_node_count = metrics.dom_node_count,
            dataset_size = self.config.dataset_size,
            item_height = self.config.item_height,
            "baseline captured"
        );
        Some(record)
    }

    /// Switches rendering mode. Any change cancels a pending capture and starts the history
    /// over, so coming back to non-virtualized rendering captures a fresh baseline.
    pub fn set_mode(&mut self, mode: RenderMode) {
        if self.mode == mode {
            return;
        }
        vdebug!(from = ?self.mode, to = ?mode, "render mode changed");
        self.mode = mode;
        self.restart();
    }

    /// Applies a new configuration and returns `true` when it invalidates the baseline (a new
    /// dataset size or item height). Overscan-only changes keep the capture state.
    pub fn set_config(&mut self, config: DemoConfig) -> bool {
        let previous = BaselineConfig::from(&self.config);
        let invalidated = should_invalidate_baseline(&config, Some(&previous));
        self.config = config;
        if invalidated {
            vdebug!(
                dataset_size = config.dataset_size,
                item_height = config.item_height,
                "baseline invalidated"
            );
            self.restart();
        }
        invalidated
    }

    pub fn reset(&mut self) {
        self.restart();
    }

    fn restart(&mut self) {
        self.history.clear();
        self.captured = false;
        self.settle_deadline_ms = None;
    }
}
