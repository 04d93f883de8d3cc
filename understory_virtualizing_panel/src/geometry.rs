// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orientation-independent geometry.
//!
//! Every layout computation in this crate is written once in terms of a
//! *major* axis (the direction items flow within a row) and a *minor* axis (the
//! direction rows wrap, which is also the scrolling direction). [`Orientation`]
//! maps those abstract axes onto `kurbo`'s x/y coordinates.

use kurbo::{Point, Rect, Size, Vec2};

/// Flow direction of items within a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Items flow left to right and wrap into rows stacked downwards.
    ///
    /// Major axis is x, minor (scrolling) axis is y.
    #[default]
    Horizontal,
    /// Items flow top to bottom and wrap into columns stacked rightwards.
    ///
    /// Major axis is y, minor (scrolling) axis is x.
    Vertical,
}

/// A physical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// The x axis.
    X,
    /// The y axis.
    Y,
}

impl Axis {
    /// Component of `size` along this axis.
    #[must_use]
    pub const fn of_size(self, size: Size) -> f64 {
        match self {
            Self::X => size.width,
            Self::Y => size.height,
        }
    }

    /// Component of `point` along this axis.
    #[must_use]
    pub const fn of_point(self, point: Point) -> f64 {
        match self {
            Self::X => point.x,
            Self::Y => point.y,
        }
    }
}

impl Orientation {
    /// The axis items flow along.
    #[must_use]
    pub const fn major_axis(self) -> Axis {
        match self {
            Self::Horizontal => Axis::X,
            Self::Vertical => Axis::Y,
        }
    }

    /// The axis rows wrap along; this is the scrolling axis.
    #[must_use]
    pub const fn minor_axis(self) -> Axis {
        match self {
            Self::Horizontal => Axis::Y,
            Self::Vertical => Axis::X,
        }
    }

    /// Major component of a size.
    #[must_use]
    pub const fn major(self, size: Size) -> f64 {
        self.major_axis().of_size(size)
    }

    /// Minor component of a size.
    #[must_use]
    pub const fn minor(self, size: Size) -> f64 {
        self.minor_axis().of_size(size)
    }

    /// Major component of a point.
    #[must_use]
    pub const fn major_pos(self, point: Point) -> f64 {
        self.major_axis().of_point(point)
    }

    /// Minor component of a point.
    #[must_use]
    pub const fn minor_pos(self, point: Point) -> f64 {
        self.minor_axis().of_point(point)
    }

    /// Builds a size from major/minor components.
    #[must_use]
    pub const fn make_size(self, major: f64, minor: f64) -> Size {
        match self {
            Self::Horizontal => Size::new(major, minor),
            Self::Vertical => Size::new(minor, major),
        }
    }

    /// Builds a point from major/minor components.
    #[must_use]
    pub const fn make_point(self, major: f64, minor: f64) -> Point {
        match self {
            Self::Horizontal => Point::new(major, minor),
            Self::Vertical => Point::new(minor, major),
        }
    }

    /// Builds a vector from major/minor components.
    #[must_use]
    pub const fn make_vec2(self, major: f64, minor: f64) -> Vec2 {
        match self {
            Self::Horizontal => Vec2::new(major, minor),
            Self::Vertical => Vec2::new(minor, major),
        }
    }

    /// Builds a rectangle from a major/minor origin and a major/minor size.
    #[must_use]
    pub fn make_rect(self, major_pos: f64, minor_pos: f64, major_size: f64, minor_size: f64) -> Rect {
        Rect::from_origin_size(
            self.make_point(major_pos, minor_pos),
            self.make_size(major_size, minor_size),
        )
    }
}

/// Integer floor of a non-negative, finite value, saturating at `usize::MAX`.
///
/// Negative values and NaN map to `0`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Truncation of a non-negative value is floor; out-of-range values saturate"
)]
pub(crate) fn floor_to_usize(value: f64) -> usize {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value as usize
    }
}

/// Integer ceiling of a non-negative, finite value, saturating at `usize::MAX`.
#[allow(
    clippy::cast_precision_loss,
    reason = "Only used to detect a fractional remainder"
)]
pub(crate) fn ceil_to_usize(value: f64) -> usize {
    let floor = floor_to_usize(value);
    if value > floor as f64 {
        floor.saturating_add(1)
    } else {
        floor
    }
}

/// Converts a count into the scalar coordinate space.
#[allow(
    clippy::cast_precision_loss,
    reason = "Item counts far below 2^52 in practice"
)]
pub(crate) const fn to_f64(count: usize) -> f64 {
    count as f64
}
