pub const DEFAULT_CONTAINER_HEIGHT: u32 = 600;
pub const DEFAULT_OVERSCAN: usize = 3;

/// Per-list configuration for [`crate::ScrollCoordinator`].
///
/// Options may change between renders; recomputation is cheap and idempotent, so adapters can
/// pass a fresh value on every frame and let the coordinator decide whether anything changed.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VirtualizationOptions {
    /// Viewport size in the scroll axis, in pixels.
    pub container_height: u32,
    /// Extra items rendered on each side of the viewport.
    pub overscan: usize,
    /// Whether the host should run a performance sampler alongside the list.
    ///
    /// The coordinator itself never measures anything; this flag is carried for adapters.
    pub enable_performance_monitoring: bool,
}

impl Default for VirtualizationOptions {
    fn default() -> Self {
        Self {
            container_height: DEFAULT_CONTAINER_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
            enable_performance_monitoring: false,
        }
    }
}

impl VirtualizationOptions {
    pub fn new(container_height: u32) -> Self {
        Self {
            container_height,
            ..Self::default()
        }
    }

    pub fn with_container_height(mut self, container_height: u32) -> Self {
        self.container_height = container_height;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_performance_monitoring(mut self, enabled: bool) -> Self {
        self.enable_performance_monitoring = enabled;
        self
    }
}
