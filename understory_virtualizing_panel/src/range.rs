// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolving the range of items that must be realized.

use core::ops::Range;

use crate::geometry::{ceil_to_usize, to_f64};
use crate::layout::LayoutSnapshot;

/// A contiguous run of item indices, always within `0..item_count`.
///
/// Stored half-open (`start..end`). The inclusive `[first, last]` form used
/// when talking about realized items is `start` and [`ItemRange::last`], which
/// yields the inclusive end index when the range is non-empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ItemRange {
    /// First index in the range.
    pub start: usize,
    /// One past the last index in the range.
    pub end: usize,
}

impl ItemRange {
    /// The empty range.
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    /// Every item of a collection with `item_count` items.
    #[must_use]
    pub const fn full(item_count: usize) -> Self {
        Self {
            start: 0,
            end: item_count,
        }
    }

    /// Returns `true` if the range holds no indices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Number of indices in the range.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Inclusive last index, if any.
    #[must_use]
    pub const fn last(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.end - 1)
        }
    }

    /// Returns `true` if `index` lies in the range.
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// The range as a [`Range`] for iteration.
    #[must_use]
    pub const fn indices(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Unit in which a [`CacheWindow`] is expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CacheUnit {
    /// Logical pixels along the scrolling axis.
    Pixel,
    /// Whole rows of items.
    Item,
    /// Whole viewports' worth of rows.
    #[default]
    Page,
}

/// Extra range realized outside the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheWindow {
    /// Amount kept before the viewport.
    pub before: f64,
    /// Amount kept after the viewport.
    pub after: f64,
    /// Unit of `before` and `after`.
    pub unit: CacheUnit,
}

impl CacheWindow {
    /// No cache: only the viewport itself is realized.
    pub const NONE: Self = Self {
        before: 0.0,
        after: 0.0,
        unit: CacheUnit::Pixel,
    };

    /// A symmetric cache window.
    #[must_use]
    pub const fn uniform(length: f64, unit: CacheUnit) -> Self {
        Self {
            before: length,
            after: length,
            unit,
        }
    }

    /// Clamps negative and non-finite lengths to zero.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            before: clean(self.before),
            after: clean(self.after),
            unit: self.unit,
        }
    }
}

impl Default for CacheWindow {
    fn default() -> Self {
        Self::uniform(1.0, CacheUnit::Page)
    }
}

/// The unexpanded span along the scrolling axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollWindow {
    /// Scroll offset along the minor axis.
    pub offset: f64,
    /// Viewport size along the minor axis.
    pub viewport: f64,
}

impl ScrollWindow {
    /// Returns `true` if the window, widened by `cache`, overlaps the content
    /// of `snapshot` along the minor axis.
    ///
    /// A nested panel whose parent viewport lies entirely outside it realizes
    /// nothing.
    #[must_use]
    pub fn reaches_content(&self, snapshot: &LayoutSnapshot, cache: CacheWindow) -> bool {
        if !self.offset.is_finite() || !self.viewport.is_finite() {
            return true;
        }
        let cache = cache.sanitized();
        let scale = match cache.unit {
            CacheUnit::Pixel => 1.0,
            CacheUnit::Item => snapshot.child_minor(),
            CacheUnit::Page => self.viewport,
        };
        let start = self.offset - cache.before * scale;
        let end = self.offset + self.viewport.max(0.0) + cache.after * scale;
        end > 0.0 && start < snapshot.extent_minor()
    }
}

/// Computes the items to realize for a scroll window and cache configuration.
///
/// 1. The span `[offset, offset + viewport]` is expanded by the cache window:
///    in pixels directly, or in rows (`Item`) or viewports of rows (`Page`)
///    after converting the unexpanded span to rows.
/// 2. Span ends map to rows by `floor(position / child_minor)`, clamped to the
///    valid rows.
/// 3. Rows map to indices `start_row * items_per_row ..= (end_row + 1) * items_per_row - 1`,
///    clamped to the item count.
///
/// The result is always within `0..snapshot.item_count`.
#[must_use]
pub fn resolve_item_range(
    snapshot: &LayoutSnapshot,
    window: ScrollWindow,
    cache: CacheWindow,
) -> ItemRange {
    let count = snapshot.item_count;
    let rows = snapshot.rows;
    if count == 0 || rows.row_count == 0 {
        return ItemRange::EMPTY;
    }
    let child_minor = snapshot.child_minor();
    let cache = cache.sanitized();
    if child_minor.is_nan() || child_minor <= 0.0 {
        // Zero-height rows all sit at offset zero: realize the first row plus
        // whole cache rows after it, one row per page.
        let after_rows = match cache.unit {
            CacheUnit::Pixel => 0,
            CacheUnit::Item | CacheUnit::Page => ceil_to_usize(cache.after),
        };
        let end_row = after_rows.min(rows.row_count - 1);
        return ItemRange {
            start: 0,
            end: (end_row + 1).saturating_mul(rows.items_per_row).min(count),
        };
    }

    let offset = if window.offset.is_finite() {
        window.offset.max(0.0)
    } else {
        0.0
    };
    let viewport = if window.viewport.is_finite() {
        window.viewport.max(0.0)
    } else {
        snapshot.extent_minor()
    };
    let last_row = rows.row_count - 1;

    let (start_row, end_row) = match cache.unit {
        CacheUnit::Pixel => {
            let start = (offset - cache.before).max(0.0);
            let end = (offset + viewport + cache.after).min(snapshot.extent_minor());
            (snapshot.row_at(start), snapshot.row_at(end.max(start)))
        }
        CacheUnit::Item => {
            let start = snapshot.row_at(offset);
            let end = snapshot.row_at(offset + viewport);
            (
                start.saturating_sub(ceil_to_usize(cache.before)),
                end.saturating_add(ceil_to_usize(cache.after)),
            )
        }
        CacheUnit::Page => {
            let rows_per_page = to_f64(ceil_to_usize(viewport / child_minor).max(1));
            let start = snapshot.row_at(offset);
            let end = snapshot.row_at(offset + viewport);
            (
                start.saturating_sub(ceil_to_usize(cache.before * rows_per_page)),
                end.saturating_add(ceil_to_usize(cache.after * rows_per_page)),
            )
        }
    };
    let start_row = start_row.min(last_row);
    let end_row = end_row.min(last_row).max(start_row);

    ItemRange {
        start: start_row * rows.items_per_row,
        end: (end_row + 1).saturating_mul(rows.items_per_row).min(count),
    }
}
