// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform child size, row layout, and scrollable extent.
//!
//! A [`LayoutSnapshot`] is computed once at the start of each measure pass and
//! then passed explicitly to range resolution, scrolling, and arrangement. It
//! never carries state from one pass to the next.

use kurbo::Size;

use crate::geometry::{Orientation, floor_to_usize, to_f64};
use crate::spacing::SpacingMode;

/// Where the uniform child size for a measure pass comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChildSizeSource {
    /// A fixed item size was configured; no measurement is needed.
    Fixed(Size),
    /// Reuse the measured size of an already realized container.
    Realized(Size),
    /// Nothing is known yet: realize and measure exactly one item.
    MeasureFirst,
}

impl ChildSizeSource {
    /// Picks the child size source for a pass.
    ///
    /// A configured size always wins over a realized container's measurement.
    #[must_use]
    pub fn select(fixed: Option<Size>, realized: Option<Size>) -> Self {
        match (fixed, realized) {
            (Some(size), _) => Self::Fixed(size),
            (None, Some(size)) => Self::Realized(size),
            (None, None) => Self::MeasureFirst,
        }
    }

    /// The size, if it is already known.
    #[must_use]
    pub const fn size(self) -> Option<Size> {
        match self {
            Self::Fixed(size) | Self::Realized(size) => Some(size),
            Self::MeasureFirst => None,
        }
    }
}

/// Items per row and number of rows for a given child size and available size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    /// Number of items in each row. Always `>= 1`.
    pub items_per_row: usize,
    /// Number of rows needed for all items.
    pub row_count: usize,
}

impl RowLayout {
    /// Computes the row layout.
    ///
    /// - With a finite major-axis `available_major`, each row holds
    ///   `max(1, floor(available_major / child_major))` items.
    /// - With an infinite available size every item goes into a single row.
    /// - A zero (or NaN) child major size places one item per row, so rows
    ///   stay bounded by the minor-axis child size.
    #[must_use]
    pub fn compute(child_major: f64, available_major: f64, item_count: usize) -> Self {
        if item_count == 0 {
            return Self {
                items_per_row: 1,
                row_count: 0,
            };
        }
        let fitting = if child_major.is_nan() || child_major <= 0.0 {
            1
        } else if available_major.is_infinite() {
            item_count
        } else {
            floor_to_usize(available_major / child_major)
        };
        let items_per_row = fitting.max(1);
        Self {
            items_per_row,
            row_count: item_count.div_ceil(items_per_row),
        }
    }
}

/// Immutable per-pass layout state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSnapshot {
    /// Flow orientation used to interpret every size below.
    pub orientation: Orientation,
    /// Uniform size of every child.
    pub child_size: Size,
    /// Items per row and row count.
    pub rows: RowLayout,
    /// Number of items in the backing collection.
    pub item_count: usize,
    /// Total scrollable content size.
    pub extent: Size,
}

impl LayoutSnapshot {
    /// Computes the snapshot for a measure pass.
    ///
    /// The major extent is the packed row width, or the full available major
    /// size when a spacing policy distributes leftover space and that size is
    /// finite.
    #[must_use]
    pub fn compute(
        orientation: Orientation,
        child_size: Size,
        available: Size,
        item_count: usize,
        spacing: SpacingMode,
    ) -> Self {
        let child_major = orientation.major(child_size);
        let child_minor = orientation.minor(child_size);
        let available_major = orientation.major(available);
        let rows = RowLayout::compute(child_major, available_major, item_count);

        let extent = if item_count == 0 {
            Size::ZERO
        } else {
            let major = if spacing != SpacingMode::None && available_major.is_finite() {
                available_major
            } else {
                to_f64(rows.items_per_row) * child_major
            };
            orientation.make_size(major, to_f64(rows.row_count) * child_minor)
        };

        Self {
            orientation,
            child_size,
            rows,
            item_count,
            extent,
        }
    }

    /// Child size along the major axis.
    #[must_use]
    pub const fn child_major(&self) -> f64 {
        self.orientation.major(self.child_size)
    }

    /// Child size along the minor (scrolling) axis.
    #[must_use]
    pub const fn child_minor(&self) -> f64 {
        self.orientation.minor(self.child_size)
    }

    /// Extent along the minor (scrolling) axis.
    #[must_use]
    pub const fn extent_minor(&self) -> f64 {
        self.orientation.minor(self.extent)
    }

    /// Row containing `index`.
    #[must_use]
    pub const fn row_of(&self, index: usize) -> usize {
        index / self.rows.items_per_row
    }

    /// Column of `index` within its row.
    #[must_use]
    pub const fn column_of(&self, index: usize) -> usize {
        index % self.rows.items_per_row
    }

    /// Minor-axis offset of the start of `row`.
    #[must_use]
    pub fn row_offset(&self, row: usize) -> f64 {
        to_f64(row) * self.child_minor()
    }

    /// Row whose span contains the minor-axis `position`, clamped to valid rows.
    ///
    /// Returns `0` when there are no rows.
    #[must_use]
    pub fn row_at(&self, position: f64) -> usize {
        let last = self.rows.row_count.saturating_sub(1);
        let child_minor = self.child_minor();
        if child_minor <= 0.0 {
            return 0;
        }
        floor_to_usize(position / child_minor).min(last)
    }
}
