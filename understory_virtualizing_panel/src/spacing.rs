// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row spacing policies and container placement.

use kurbo::{Rect, Size, Vec2};

use crate::geometry::to_f64;
use crate::layout::LayoutSnapshot;

/// How leftover major-axis space in a row is distributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpacingMode {
    /// Pack items with no added space.
    None,
    /// Equal gaps between items and at both row ends (`items_per_row + 1` gaps).
    #[default]
    Uniform,
    /// Equal gaps between items only (`items_per_row - 1` gaps).
    BetweenItemsOnly,
    /// One gap at each row end, none between items.
    StartAndEndOnly,
}

/// Spacing resolved for one arrange pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSpacing {
    /// Space before the first item and after the last item in a row.
    pub outer: f64,
    /// Space between adjacent items in a row.
    pub inner: f64,
    /// Major-axis size each container is arranged with (grows when stretching).
    pub child_major: f64,
}

impl RowSpacing {
    /// Computes the spacing for rows of `items_per_row` items in `final_major` space.
    ///
    /// With `stretch` enabled, containers first grow to share the row evenly,
    /// bounded by `max_child_major`; any space the bound leaves over is then
    /// distributed by `mode`.
    #[must_use]
    pub fn compute(
        mode: SpacingMode,
        final_major: f64,
        child_major: f64,
        items_per_row: usize,
        stretch: bool,
        max_child_major: Option<f64>,
    ) -> Self {
        let items = to_f64(items_per_row.max(1));
        if !final_major.is_finite() {
            return Self {
                outer: 0.0,
                inner: 0.0,
                child_major,
            };
        }

        let child_major = if stretch {
            let bound = max_child_major.unwrap_or(f64::INFINITY);
            (final_major / items).min(bound).max(child_major)
        } else {
            child_major
        };

        let leftover = (final_major - items * child_major).max(0.0);
        let (outer, inner) = match mode {
            SpacingMode::None => (0.0, 0.0),
            SpacingMode::Uniform => {
                let gap = leftover / (items + 1.0);
                (gap, gap)
            }
            SpacingMode::BetweenItemsOnly => {
                // A single-item row still divides by one.
                let gaps = to_f64(items_per_row.saturating_sub(1).max(1));
                (0.0, leftover / gaps)
            }
            SpacingMode::StartAndEndOnly => (leftover / 2.0, 0.0),
        };

        Self {
            outer,
            inner,
            child_major,
        }
    }

    /// Arranged rectangle for `index`, relative to the viewport at `scroll_offset`.
    #[must_use]
    pub fn item_rect(&self, snapshot: &LayoutSnapshot, index: usize, scroll_offset: Vec2) -> Rect {
        let orientation = snapshot.orientation;
        let column = to_f64(snapshot.column_of(index));
        let major = self.outer + column * (self.child_major + self.inner);
        let minor = snapshot.row_offset(snapshot.row_of(index));
        let offset_major = orientation.major(scroll_offset.to_size());
        let offset_minor = orientation.minor(scroll_offset.to_size());
        orientation.make_rect(
            major - offset_major,
            minor - offset_minor,
            self.child_major,
            snapshot.child_minor(),
        )
    }
}

/// A rectangle at `rect`'s origin with no area.
///
/// Used for containers that stay logically present but must not paint.
#[must_use]
pub fn collapsed(rect: Rect) -> Rect {
    Rect::from_origin_size(rect.origin(), Size::ZERO)
}

#[cfg(test)]
mod tests {
    use super::{RowSpacing, SpacingMode};
    use crate::geometry::Orientation;
    use crate::layout::LayoutSnapshot;
    use kurbo::{Rect, Size, Vec2};

    #[test]
    fn uniform_splits_into_items_plus_one_gaps() {
        let spacing = RowSpacing::compute(SpacingMode::Uniform, 240.0, 50.0, 4, false, None);
        assert_eq!(spacing.outer, 8.0);
        assert_eq!(spacing.inner, 8.0);
        assert_eq!(spacing.child_major, 50.0);
    }

    #[test]
    fn other_policies() {
        let none = RowSpacing::compute(SpacingMode::None, 240.0, 50.0, 4, false, None);
        assert_eq!((none.outer, none.inner), (0.0, 0.0));

        let between = RowSpacing::compute(SpacingMode::BetweenItemsOnly, 240.0, 50.0, 4, false, None);
        assert_eq!(between.outer, 0.0);
        assert!((between.inner - 40.0 / 3.0).abs() < 1e-9);

        let ends = RowSpacing::compute(SpacingMode::StartAndEndOnly, 240.0, 50.0, 4, false, None);
        assert_eq!((ends.outer, ends.inner), (20.0, 0.0));
    }

    #[test]
    fn between_items_only_with_single_column_divides_by_one() {
        let spacing = RowSpacing::compute(SpacingMode::BetweenItemsOnly, 80.0, 50.0, 1, false, None);
        assert_eq!(spacing.inner, 30.0);
        assert_eq!(spacing.outer, 0.0);
    }

    #[test]
    fn stretch_consumes_leftover_up_to_bound() {
        let stretched = RowSpacing::compute(SpacingMode::Uniform, 240.0, 50.0, 4, true, None);
        assert_eq!(stretched.child_major, 60.0);
        assert_eq!(stretched.outer, 0.0);

        let bounded = RowSpacing::compute(SpacingMode::Uniform, 240.0, 50.0, 4, true, Some(55.0));
        assert_eq!(bounded.child_major, 55.0);
        assert_eq!(bounded.outer, 4.0);
    }

    #[test]
    fn item_rect_places_by_row_and_column() {
        let snapshot = LayoutSnapshot::compute(
            Orientation::Horizontal,
            Size::new(50.0, 50.0),
            Size::new(240.0, 120.0),
            100,
            SpacingMode::Uniform,
        );
        let spacing = RowSpacing::compute(SpacingMode::Uniform, 240.0, 50.0, 4, false, None);
        // Index 5 is row 1, column 1.
        let rect = spacing.item_rect(&snapshot, 5, Vec2::new(0.0, 30.0));
        assert_eq!(rect, Rect::new(66.0, 20.0, 116.0, 70.0));
    }
}
