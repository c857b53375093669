use crate::{ScrollDirection, VisibleRange};

/// A lightweight snapshot of what the render consumer needs after a recomputation.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollSnapshot {
    pub scroll_offset: u64,
    pub range: VisibleRange,
    pub total_height: u64,
    pub direction: Option<ScrollDirection>,
}
