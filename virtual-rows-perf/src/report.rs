use std::fmt;

use crate::{PerformanceMetrics, ResourceSavings, calculate_resource_savings};

pub const UNAVAILABLE: &str = "N/A";

/// Formats a memory reading, printing `N/A` when it could not be measured.
pub fn format_memory_mb(mb: f64) -> String {
    if mb > 0.0 {
        format!("{mb:.1} MB")
    } else {
        UNAVAILABLE.to_owned()
    }
}

/// A human-readable comparison of a virtualized run against its baseline.
///
/// Memory savings are only meaningful when both runs could measure memory; otherwise they
/// print as `N/A` instead of `0.0 MB saved`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SavingsReport {
    pub current: PerformanceMetrics,
    pub baseline: PerformanceMetrics,
    pub savings: ResourceSavings,
}

impl SavingsReport {
    pub fn new(current: PerformanceMetrics, baseline: PerformanceMetrics) -> Self {
        Self {
            current,
            baseline,
            savings: calculate_resource_savings(&current, &baseline),
        }
    }

    pub fn memory_available(&self) -> bool {
        self.current.has_memory_reading() && self.baseline.has_memory_reading()
    }
}

impl fmt::Display for SavingsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.savings;
        if self.memory_available() {
            writeln!(
                f,
                "memory:      {:.1} MB saved ({:.1}%)",
                s.memory_saved_mb, s.memory_saved_percent
            )?;
        } else {
            writeln!(f, "memory:      {UNAVAILABLE}")?;
        }
        writeln!(
            f,
            "dom nodes:   {} saved ({:.1}%)",
            s.dom_nodes_saved, s.dom_nodes_saved_percent
        )?;
        writeln!(
            f,
            "render time: {:.1} ms saved ({:.1}%)",
            s.render_time_saved_ms, s.render_time_saved_percent
        )?;
        write!(
            f,
            "fps:         {:+.1} ({:+.1}%)",
            s.fps_improvement, s.fps_improvement_percent
        )
    }
}
