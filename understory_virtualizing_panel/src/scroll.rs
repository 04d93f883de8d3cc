// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll geometry: offsets, clamping, command deltas, and bringing content into view.

use kurbo::{Rect, Size, Vec2};

use crate::error::PanelError;
use crate::geometry::{Axis, to_f64};

/// Unit used for line and wheel scrolling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollUnit {
    /// Fixed pixel amounts.
    #[default]
    Pixel,
    /// Multiples of the child size.
    Item,
}

/// Line and wheel granularities for both scroll units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollAmounts {
    /// Pixels per line in [`ScrollUnit::Pixel`] mode.
    pub line_pixels: f64,
    /// Pixels per wheel notch in [`ScrollUnit::Pixel`] mode.
    pub wheel_pixels: f64,
    /// Items (rows) per line in [`ScrollUnit::Item`] mode.
    pub line_items: usize,
    /// Items (rows) per wheel notch in [`ScrollUnit::Item`] mode.
    pub wheel_items: usize,
}

impl Default for ScrollAmounts {
    fn default() -> Self {
        Self {
            line_pixels: 16.0,
            wheel_pixels: 48.0,
            line_items: 1,
            wheel_items: 3,
        }
    }
}

/// How far a command scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollGranularity {
    /// One line.
    Line,
    /// One mouse-wheel notch.
    Wheel,
    /// One viewport.
    Page,
}

/// Which way a command scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Towards smaller y.
    Up,
    /// Towards larger y.
    Down,
    /// Towards smaller x.
    Left,
    /// Towards larger x.
    Right,
}

impl ScrollDirection {
    /// The physical axis this direction moves along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Up | Self::Down => Axis::Y,
            Self::Left | Self::Right => Axis::X,
        }
    }

    const fn sign(self) -> f64 {
        match self {
            Self::Up | Self::Left => -1.0,
            Self::Down | Self::Right => 1.0,
        }
    }
}

/// A primitive scroll command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollCommand {
    /// Step size.
    pub granularity: ScrollGranularity,
    /// Step direction.
    pub direction: ScrollDirection,
}

impl ScrollCommand {
    /// Creates a command.
    #[must_use]
    pub const fn new(granularity: ScrollGranularity, direction: ScrollDirection) -> Self {
        Self {
            granularity,
            direction,
        }
    }

    /// Signed delta along [`ScrollDirection::axis`].
    ///
    /// Pixel mode uses fixed line/wheel amounts; item mode scrolls whole
    /// children along the axis. Pages always scroll by the viewport size.
    #[must_use]
    pub fn delta(self, unit: ScrollUnit, amounts: &ScrollAmounts, child_size: Size, viewport: Size) -> f64 {
        let axis = self.direction.axis();
        let magnitude = match (self.granularity, unit) {
            (ScrollGranularity::Page, _) => axis.of_size(viewport),
            (ScrollGranularity::Line, ScrollUnit::Pixel) => amounts.line_pixels,
            (ScrollGranularity::Wheel, ScrollUnit::Pixel) => amounts.wheel_pixels,
            (ScrollGranularity::Line, ScrollUnit::Item) => {
                to_f64(amounts.line_items) * axis.of_size(child_size)
            }
            (ScrollGranularity::Wheel, ScrollUnit::Item) => {
                to_f64(amounts.wheel_items) * axis.of_size(child_size)
            }
        };
        self.direction.sign() * magnitude
    }
}

/// Alignment mode when scrolling a specific index into view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollAlign {
    /// Align the start (top/leading edge) of the item with the viewport.
    #[default]
    Start,
    /// Center the item within the viewport.
    Center,
    /// Align the end (bottom/trailing edge) of the item with the viewport.
    End,
    /// Move just enough to make the item fully visible, preferring the
    /// smallest change from the current scroll offset.
    Nearest,
}

impl ScrollAlign {
    /// Offset that places the span `item_start..item_end` according to this
    /// alignment, before clamping.
    #[must_use]
    pub fn offset_for(self, item_start: f64, item_end: f64, current: f64, viewport: f64) -> f64 {
        match self {
            Self::Start => item_start,
            Self::End => item_end - viewport,
            Self::Center => (item_start + item_end) / 2.0 - viewport / 2.0,
            Self::Nearest => reveal(current, viewport, item_start, item_end),
        }
    }
}

/// Smallest offset change that shows `start..end`, favouring the leading edge
/// when the span is larger than the viewport.
fn reveal(offset: f64, viewport: f64, start: f64, end: f64) -> f64 {
    if start < offset {
        start
    } else if end > offset + viewport {
        (end - viewport).min(start)
    } else {
        offset
    }
}

/// Offset, extent, and viewport along both axes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    offset: Vec2,
    extent: Size,
    viewport: Size,
}

impl ScrollState {
    /// Current offset.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Current extent.
    #[must_use]
    pub const fn extent(&self) -> Size {
        self.extent
    }

    /// Current viewport.
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    /// Offset along `axis`.
    #[must_use]
    pub const fn offset_on(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.offset.x,
            Axis::Y => self.offset.y,
        }
    }

    /// Clamps `value` into `[0, extent - viewport]` on `axis`.
    ///
    /// Collapses to `0` when the content fits in the viewport.
    #[must_use]
    pub fn clamp(&self, axis: Axis, value: f64) -> f64 {
        let extent = axis.of_size(self.extent);
        let viewport = axis.of_size(self.viewport);
        if value < 0.0 || viewport >= extent {
            0.0
        } else if value + viewport > extent {
            extent - viewport
        } else {
            value
        }
    }

    /// Sets the clamped offset on `axis`, returning `true` if it changed.
    pub fn set_offset(&mut self, axis: Axis, value: f64) -> Result<bool, PanelError> {
        if value.is_nan() {
            return Err(PanelError::InvalidOffset { value });
        }
        let value = self.clamp(axis, value);
        let slot = match axis {
            Axis::X => &mut self.offset.x,
            Axis::Y => &mut self.offset.y,
        };
        let changed = *slot != value;
        *slot = value;
        Ok(changed)
    }

    /// Replaces extent and viewport, re-clamping the offset.
    ///
    /// Returns `true` if any of extent, viewport, or offset changed.
    pub fn update(&mut self, extent: Size, viewport: Size) -> bool {
        let geometry_changed = extent != self.extent || viewport != self.viewport;
        self.extent = extent;
        self.viewport = viewport;
        let clamped = Vec2::new(
            self.clamp(Axis::X, self.offset.x),
            self.clamp(Axis::Y, self.offset.y),
        );
        let offset_changed = clamped != self.offset;
        self.offset = clamped;
        geometry_changed || offset_changed
    }

    /// The visible window in content coordinates.
    #[must_use]
    pub fn visible_rect(&self) -> Rect {
        Rect::from_origin_size(self.offset.to_point(), self.viewport)
    }

    /// Scrolls the minimum needed for `target` (content coordinates) to be inside the viewport.
    ///
    /// Returns the part of `target` that is visible afterwards. Non-finite
    /// targets are ignored and yield [`Rect::ZERO`].
    pub fn make_visible(&mut self, target: Rect) -> Rect {
        if !target.is_finite() {
            return Rect::ZERO;
        }
        let target = target.abs();
        let x = reveal(self.offset.x, self.viewport.width, target.x0, target.x1);
        let y = reveal(self.offset.y, self.viewport.height, target.y0, target.y1);
        self.offset = Vec2::new(self.clamp(Axis::X, x), self.clamp(Axis::Y, y));
        target.intersect(self.visible_rect())
    }
}
