use core::ops;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// An inclusive range of item indexes to render.
///
/// An empty list is represented by [`VisibleRange::EMPTY`] (`start = 0`, `end = -1`); any
/// range with `end < start` means "nothing to render".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub start: usize,
    pub end: isize, // inclusive
}

impl VisibleRange {
    pub const EMPTY: Self = Self { start: 0, end: -1 };

    /// Builds a non-empty inclusive range.
    pub fn inclusive(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inclusive range must not be reversed");
        Self {
            start,
            end: end as isize,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start as isize
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.end as usize - self.start + 1
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        !self.is_empty() && index >= self.start && index as isize <= self.end
    }

    /// Returns the range as a half-open `start..end + 1` iterator (empty for the sentinel).
    pub fn indices(&self) -> ops::Range<usize> {
        if self.is_empty() {
            return 0..0;
        }
        self.start..self.end as usize + 1
    }
}

impl Default for VisibleRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Placement of a single item in the scroll axis, relative to the content origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemPosition {
    pub top: u64,
    pub height: u32,
}

impl ItemPosition {
    pub fn bottom(&self) -> u64 {
        self.top.saturating_add(self.height as u64)
    }
}
