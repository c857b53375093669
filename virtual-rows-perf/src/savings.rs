use crate::{BaselineConfig, DemoConfig, PerformanceMetrics, system_epoch_ms};

/// Resource savings of a virtualized run compared to a baseline.
///
/// Memory, node count and render time are clamped to `>= 0`: measurement noise never shows up
/// as a cost. The frame-rate fields are signed, since a regression is a real outcome.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceSavings {
    pub memory_saved_mb: f64,
    pub memory_saved_percent: f64,
    pub dom_nodes_saved: u64,
    pub dom_nodes_saved_percent: f64,
    pub render_time_saved_ms: f64,
    pub render_time_saved_percent: f64,
    pub fps_improvement: f64,
    pub fps_improvement_percent: f64,
}

pub fn calculate_resource_savings(
    current: &PerformanceMetrics,
    baseline: &PerformanceMetrics,
) -> ResourceSavings {
    let memory = baseline.memory_usage_mb - current.memory_usage_mb;
    let nodes = baseline.dom_node_count as f64 - current.dom_node_count as f64;
    let render = baseline.render_time_ms - current.render_time_ms;
    let fps = current.fps - baseline.fps;

    ResourceSavings {
        memory_saved_mb: memory.max(0.0),
        memory_saved_percent: percent_of(memory, baseline.memory_usage_mb).max(0.0),
        dom_nodes_saved: baseline.dom_node_count.saturating_sub(current.dom_node_count),
        dom_nodes_saved_percent: percent_of(nodes, baseline.dom_node_count as f64).max(0.0),
        render_time_saved_ms: render.max(0.0),
        render_time_saved_percent: percent_of(render, baseline.render_time_ms).max(0.0),
        fps_improvement: fps,
        fps_improvement_percent: percent_of(fps, baseline.fps),
    }
}

/// `delta / base * 100`; `0` when `base` is not positive.
fn percent_of(delta: f64, base: f64) -> f64 {
    if base > 0.0 {
        delta / base * 100.0
    } else {
        0.0
    }
}

/// Returns `true` when a baseline exists and was captured for a different dataset size or item
/// height. Overscan never matters: the baseline is rendered without virtualization.
pub fn should_invalidate_baseline(
    current: &DemoConfig,
    baseline: Option<&BaselineConfig>,
) -> bool {
    let Some(baseline) = baseline else {
        return false;
    };
    current.dataset_size != baseline.dataset_size || current.item_height != baseline.item_height
}

/// Averages a run of samples into one.
///
/// `fps`, `memory_usage_mb` and `render_time_ms` are arithmetic means, `dom_node_count` is the
/// mean rounded to the nearest integer, and `timestamp` is taken from the last sample. An
/// empty run yields zeroed metrics stamped with the current time; a single sample is returned
/// as is.
pub fn average_metrics(samples: &[PerformanceMetrics]) -> PerformanceMetrics {
    average_metrics_at(samples, system_epoch_ms())
}

/// Same as [`average_metrics`], with the timestamp for an empty run supplied by the caller.
pub fn average_metrics_at(samples: &[PerformanceMetrics], now_ms: u64) -> PerformanceMetrics {
    match samples {
        [] => PerformanceMetrics::zeroed(now_ms),
        [only] => *only,
        [.., last] => {
            let n = samples.len() as f64;
            let mut fps = 0.0;
            let mut memory = 0.0;
            let mut render = 0.0;
            let mut nodes = 0.0;
            for s in samples {
                fps += s.fps;
                memory += s.memory_usage_mb;
                render += s.render_time_ms;
                nodes += s.dom_node_count as f64;
            }
            PerformanceMetrics {
                fps: fps / n,
                memory_usage_mb: memory / n,
                dom_node_count: (nodes / n).round() as u64,
                render_time_ms: render / n,
                timestamp: last.timestamp,
            }
        }
    }
}
