use std::time::{SystemTime, UNIX_EPOCH};

use virtual_rows::calculate_visible_range;

pub(crate) const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// One performance sample.
///
/// `memory_usage_mb == 0.0` means memory could not be measured, not that nothing was used.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerformanceMetrics {
    pub fps: f64,
    pub memory_usage_mb: f64,
    pub dom_node_count: u64,
    pub render_time_ms: f64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl PerformanceMetrics {
    pub fn zeroed(timestamp: u64) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }

    pub fn has_memory_reading(&self) -> bool {
        self.memory_usage_mb > 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderMode {
    Virtualized,
    NonVirtualized,
}

/// The performance-relevant configuration of a list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DemoConfig {
    pub dataset_size: usize,
    pub item_height: u32,
    /// Only affects virtualized rendering, so it never invalidates a baseline.
    pub overscan: usize,
}

impl DemoConfig {
    pub fn new(dataset_size: usize, item_height: u32, overscan: usize) -> Self {
        Self {
            dataset_size,
            item_height,
            overscan,
        }
    }

    /// Rows a virtualized list materializes for a viewport of `container_height`.
    pub fn virtualized_row_count(&self, container_height: u32) -> usize {
        calculate_visible_range(
            0,
            container_height,
            self.dataset_size,
            self.item_height,
            self.overscan,
        )
        .len()
    }
}

/// The part of [`DemoConfig`] a baseline depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaselineConfig {
    pub dataset_size: usize,
    pub item_height: u32,
}

impl From<&DemoConfig> for BaselineConfig {
    fn from(config: &DemoConfig) -> Self {
        Self {
            dataset_size: config.dataset_size,
            item_height: config.item_height,
        }
    }
}

/// An averaged sample captured while rendering without virtualization.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaselineRecord {
    pub metrics: PerformanceMetrics,
    /// Capture time, in milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub config: BaselineConfig,
}

/// A wall-clock source, in milliseconds since the Unix epoch, used to stamp samples and
/// baseline records. The host's `now_ms` only drives cadence and deadlines.
pub type EpochClock = fn() -> u64;

pub fn system_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
