// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration surface of [`VirtualizingWrapPanel`](crate::VirtualizingWrapPanel).

use kurbo::Size;

use crate::geometry::Orientation;
use crate::range::{CacheUnit, CacheWindow};
use crate::realization::VirtualizationMode;
use crate::scroll::{ScrollAmounts, ScrollUnit};
use crate::spacing::SpacingMode;

/// Panel configuration.
///
/// Build with [`PanelOptions::default`] and the `with_*` methods:
///
/// ```rust
/// use kurbo::Size;
/// use understory_virtualizing_panel::{CacheUnit, PanelOptions, SpacingMode};
///
/// let options = PanelOptions::default()
///     .with_item_size(Size::new(120.0, 90.0))
///     .with_spacing_mode(SpacingMode::BetweenItemsOnly)
///     .with_cache(2.0, CacheUnit::Item);
/// assert_eq!(options.cache.before, 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelOptions {
    /// Flow direction of items.
    pub orientation: Orientation,
    /// Fixed size of every item. When `None`, the first realized item is measured.
    pub item_size: Option<Size>,
    /// How leftover row space is distributed.
    pub spacing_mode: SpacingMode,
    /// Grow items along the major axis to fill rows.
    pub stretch_items: bool,
    /// Upper bound on the stretched major-axis item size.
    pub max_item_major: Option<f64>,
    /// Extra range realized around the viewport.
    pub cache: CacheWindow,
    /// When `false`, every item is realized regardless of the viewport.
    pub virtualizing: bool,
    /// Recycle or destroy containers that leave the realized range.
    pub virtualization_mode: VirtualizationMode,
    /// Unit for line and wheel scrolling.
    pub scroll_unit: ScrollUnit,
    /// Line and wheel amounts.
    pub scroll_amounts: ScrollAmounts,
    /// Whether the offset may move along the major axis.
    pub can_scroll_major: bool,
    /// Whether the offset may move along the minor axis.
    pub can_scroll_minor: bool,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            item_size: None,
            spacing_mode: SpacingMode::default(),
            stretch_items: false,
            max_item_major: None,
            cache: CacheWindow::default(),
            virtualizing: true,
            virtualization_mode: VirtualizationMode::default(),
            scroll_unit: ScrollUnit::default(),
            scroll_amounts: ScrollAmounts::default(),
            can_scroll_major: true,
            can_scroll_minor: true,
        }
    }
}

impl PanelOptions {
    /// Sets the flow orientation.
    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Fixes the size of every item.
    #[must_use]
    pub fn with_item_size(mut self, size: Size) -> Self {
        self.item_size = Some(size);
        self
    }

    /// Sets the spacing policy.
    #[must_use]
    pub fn with_spacing_mode(mut self, mode: SpacingMode) -> Self {
        self.spacing_mode = mode;
        self
    }

    /// Enables stretching, optionally bounded by `max_item_major`.
    #[must_use]
    pub fn with_stretch_items(mut self, max_item_major: Option<f64>) -> Self {
        self.stretch_items = true;
        self.max_item_major = max_item_major;
        self
    }

    /// Sets a symmetric cache window.
    #[must_use]
    pub fn with_cache(mut self, length: f64, unit: CacheUnit) -> Self {
        self.cache = CacheWindow::uniform(length, unit);
        self
    }

    /// Turns virtualization on or off.
    #[must_use]
    pub fn with_virtualizing(mut self, virtualizing: bool) -> Self {
        self.virtualizing = virtualizing;
        self
    }

    /// Sets the virtualization mode.
    #[must_use]
    pub fn with_virtualization_mode(mut self, mode: VirtualizationMode) -> Self {
        self.virtualization_mode = mode;
        self
    }

    /// Sets the unit for line and wheel scrolling.
    #[must_use]
    pub fn with_scroll_unit(mut self, unit: ScrollUnit) -> Self {
        self.scroll_unit = unit;
        self
    }

    /// Sets line and wheel amounts.
    #[must_use]
    pub fn with_scroll_amounts(mut self, amounts: ScrollAmounts) -> Self {
        self.scroll_amounts = amounts;
        self
    }
}
