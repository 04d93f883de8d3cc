// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interfaces the host UI framework implements.
//!
//! The panel never reaches into framework internals. Everything it needs from
//! the host flows through these three traits:
//!
//! - [`ItemsOwner`]: the backing item collection and, for nested panels, the
//!   constraints handed down by the enclosing panel.
//! - [`ContainerGenerator`]: creation, preparation, measurement, arrangement,
//!   and disposal of the visual containers for items.
//! - [`ScrollOwner`]: the scroll viewer that displays extent/viewport/offset.

use kurbo::{Rect, Size};

use crate::range::CacheWindow;

/// Host-defined key grouping interchangeable containers.
///
/// Recycled containers are only reused for items whose kind matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ContainerKind(pub u32);

/// Constraints a panel passes down to a nested (grouped) child panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NestedConstraints {
    /// The visible window, in the nested panel's own coordinate space.
    pub viewport: Rect,
    /// The cache window the nested panel should realize around `viewport`.
    pub cache: CacheWindow,
}

/// How a single container is measured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChildConstraint {
    /// Measure against infinite space to obtain the natural size.
    Unconstrained,
    /// The container hosts a nested panel; give it the real viewport so it
    /// can virtualize its own children.
    Nested(NestedConstraints),
}

/// Read-only view over the items displayed by a panel.
pub trait ItemsOwner {
    /// Number of items in the collection.
    fn item_count(&self) -> usize;

    /// Returns `true` if the item at `index` is itself a group that hosts a
    /// nested virtualizing panel.
    fn is_group(&self, index: usize) -> bool {
        let _ = index;
        false
    }

    /// Constraints supplied by an enclosing panel when this panel is nested.
    ///
    /// When present they replace the locally tracked offset, viewport, and
    /// cache window during range resolution.
    fn nested_constraints(&self) -> Option<NestedConstraints> {
        None
    }
}

/// Produces and manages visual containers for item indices.
///
/// The panel owns containers while they are realized or pooled; the host only
/// observes them through the calls below. `attach`/`detach` are the only points
/// where the host's visual child collection changes.
pub trait ContainerGenerator {
    /// Opaque container handle.
    type Container;

    /// Starts a realization session positioned at `start`.
    fn begin_session(&mut self, start: usize) {
        let _ = start;
    }

    /// Ends the current realization session, releasing any cursor state.
    fn end_session(&mut self) {}

    /// Kind of container needed for `index`.
    fn container_kind(&self, index: usize) -> ContainerKind {
        let _ = index;
        ContainerKind::default()
    }

    /// Creates a fresh container for `index`.
    ///
    /// Returning `None` signals an inconsistency in the host; the index is
    /// skipped for this pass and retried on the next one.
    fn create(&mut self, index: usize) -> Option<Self::Container>;

    /// Attaches item data for `index` to `container`.
    fn prepare(&mut self, container: &mut Self::Container, index: usize);

    /// Detaches item data from a container that is about to be pooled.
    fn clear(&mut self, container: &mut Self::Container, index: usize);

    /// Releases a container for good.
    fn destroy(&mut self, container: Self::Container) {
        drop(container);
    }

    /// Inserts `container` into the visual children at `visual_index`.
    fn attach(&mut self, container: &Self::Container, visual_index: usize);

    /// Removes `container` from the visual children at `visual_index`.
    fn detach(&mut self, container: &Self::Container, visual_index: usize);

    /// Measures `container` and returns its desired size.
    fn measure(&mut self, container: &mut Self::Container, constraint: ChildConstraint) -> Size;

    /// Positions `container` at `rect`, relative to the panel's viewport.
    fn arrange(&mut self, container: &mut Self::Container, rect: Rect);
}

/// The scroll viewer hosting a panel.
pub trait ScrollOwner {
    /// Called whenever offset, extent, or viewport change.
    fn invalidate_scroll_info(&mut self);
}

impl<F: FnMut()> ScrollOwner for F {
    fn invalidate_scroll_info(&mut self) {
        self();
    }
}
