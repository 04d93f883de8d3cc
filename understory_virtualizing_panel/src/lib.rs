// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_virtualizing_panel --heading-base-level=0

//! Understory Virtualizing Panel: a virtualizing, recycling wrap layout.
//!
//! This crate arranges a large collection of uniformly sized items in rows
//! that wrap along a scrolling axis, and keeps visual containers alive only
//! for the items near the viewport. It is renderer-agnostic: the host UI
//! framework owns items and containers and plugs in through three traits.
//!
//! The core concepts are:
//!
//! - [`Orientation`]: which physical axis items flow along (the major axis)
//!   and which one rows stack and scroll along (the minor axis).
//! - [`LayoutSnapshot`]: child size, [`RowLayout`], and extent computed once per
//!   measure pass and read by everything downstream.
//! - [`resolve_item_range`]: maps a scroll window plus a [`CacheWindow`] to the
//!   [`ItemRange`] that must be realized.
//! - [`Realizer`]: reconciles realized containers with a range, recycling or
//!   destroying those that leave it according to [`VirtualizationMode`].
//! - [`ScrollState`] and [`ScrollCommand`]: offset clamping and line, wheel,
//!   and page scrolling.
//! - [`RowSpacing`]: distributes leftover row space per [`SpacingMode`].
//! - [`VirtualizingWrapPanel`]: ties the above together behind `measure`,
//!   `arrange`, and scroll operations.
//!
//! Host frameworks are responsible for:
//!
//! - Reporting the item count through [`ItemsOwner`].
//! - Creating, preparing, measuring, and arranging containers through
//!   [`ContainerGenerator`].
//! - Displaying extent, viewport, and offset when notified through
//!   [`ScrollOwner`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use understory_virtualizing_panel::{
//!     CacheUnit, ChildConstraint, ContainerGenerator, ItemRange, ItemsOwner, PanelOptions,
//!     SpacingMode, VirtualizingWrapPanel,
//! };
//!
//! /// A host whose containers are just the item index they display.
//! struct Host {
//!     len: usize,
//! }
//!
//! impl ItemsOwner for Host {
//!     fn item_count(&self) -> usize {
//!         self.len
//!     }
//! }
//!
//! impl ContainerGenerator for Host {
//!     type Container = Option<usize>;
//!
//!     fn create(&mut self, _index: usize) -> Option<Self::Container> {
//!         Some(None)
//!     }
//!     fn prepare(&mut self, container: &mut Self::Container, index: usize) {
//!         *container = Some(index);
//!     }
//!     fn clear(&mut self, container: &mut Self::Container, _index: usize) {
//!         *container = None;
//!     }
//!     fn attach(&mut self, _container: &Self::Container, _visual_index: usize) {}
//!     fn detach(&mut self, _container: &Self::Container, _visual_index: usize) {}
//!     fn measure(&mut self, _container: &mut Self::Container, _constraint: ChildConstraint) -> Size {
//!         Size::new(50.0, 50.0)
//!     }
//!     fn arrange(&mut self, _container: &mut Self::Container, _rect: Rect) {}
//! }
//!
//! let options = PanelOptions::default()
//!     .with_item_size(Size::new(50.0, 50.0))
//!     .with_spacing_mode(SpacingMode::None)
//!     .with_cache(1.0, CacheUnit::Item);
//! let mut panel = VirtualizingWrapPanel::new(options);
//! let mut host = Host { len: 100 };
//!
//! panel.measure(Size::new(220.0, 120.0), &mut host);
//! panel.arrange(Size::new(220.0, 120.0), &mut host);
//! // Four items per row; three visible rows plus one cached row.
//! assert_eq!(panel.resolved_range(), ItemRange { start: 0, end: 16 });
//!
//! panel.bring_index_into_view(37).unwrap();
//! assert_eq!(panel.vertical_offset(), 450.0);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` in `kurbo`.
//! - `libm`: `no_std` float support for `kurbo`.
//! - `tracing` (default): emits diagnostics under the
//!   `understory_virtualizing_panel` target.
//! - `serde`: serialization for configuration types.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[macro_use]
mod macros;

mod error;
mod generator;
mod geometry;
mod host;
mod layout;
mod options;
mod panel;
mod range;
mod realization;
mod scroll;
mod spacing;

#[cfg(test)]
mod test_support;

pub use error::PanelError;
pub use generator::{Generated, GeneratorSession};
pub use geometry::{Axis, Orientation};
pub use host::{
    ChildConstraint, ContainerGenerator, ContainerKind, ItemsOwner, NestedConstraints, ScrollOwner,
};
pub use layout::{ChildSizeSource, LayoutSnapshot, RowLayout};
pub use options::PanelOptions;
pub use panel::VirtualizingWrapPanel;
pub use range::{CacheUnit, CacheWindow, ItemRange, ScrollWindow, resolve_item_range};
pub use realization::{
    CollectionChange, RealizationReport, RealizedChild, Realizer, RecyclePool, VirtualizationMode,
};
pub use scroll::{
    ScrollAlign, ScrollAmounts, ScrollCommand, ScrollDirection, ScrollGranularity, ScrollState,
    ScrollUnit,
};
pub use spacing::{RowSpacing, SpacingMode, collapsed};
