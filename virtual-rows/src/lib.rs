//! A headless virtualization engine for lists with a fixed row height.
//!
//! Only the rows intersecting the viewport (plus a few overscan rows on each side) need to be
//! materialized, so rendering cost stays proportional to the viewport rather than the list.
//!
//! The crate provides:
//! - [`calculate_visible_range`], [`calculate_item_position`] and [`calculate_total_height`],
//!   the pure math, also available behind the [`RangeCalculator`] trait
//! - [`ScrollCoordinator`], which batches scroll events to at most one recomputation per
//!   animation frame
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - viewport size and scroll offsets
//! - an animation-frame facility (see [`FrameScheduler`])
//!
//! For performance sampling and baseline comparison, see the `virtual-rows-perf` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod calculator;
mod coordinator;
mod frame;
mod options;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use calculator::{
    FixedHeightCalculator, RangeCalculator, calculate_item_position, calculate_total_height,
    calculate_visible_range,
};
pub use coordinator::{OnChangeCallback, ScrollCoordinator};
pub use frame::{FrameHandle, FrameScheduler, ManualFrameScheduler};
pub use options::{DEFAULT_CONTAINER_HEIGHT, DEFAULT_OVERSCAN, VirtualizationOptions};
pub use state::ScrollSnapshot;
pub use types::{Align, ItemPosition, ScrollDirection, VisibleRange};
