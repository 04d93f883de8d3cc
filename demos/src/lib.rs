// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless host for driving `understory_virtualizing_panel` in demos.
//!
//! [`SimHost`] stands in for a UI framework: containers are plain records,
//! the visual child list is a `Vec`, and every call is logged through
//! `tracing` so panel behavior can be followed from the console.

use kurbo::{Rect, Size};
use tracing::{debug, trace};
use understory_virtualizing_panel::{ChildConstraint, ContainerGenerator, ItemsOwner};

/// A container record; `item` is `None` while the container is pooled.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    /// Stable identity of the container.
    pub id: u32,
    /// Label of the displayed item.
    pub item: Option<String>,
    /// Bounds from the last arrange pass.
    pub bounds: Rect,
}

/// Headless stand-in for a UI framework's items control.
#[derive(Debug)]
pub struct SimHost {
    /// Item labels.
    pub items: Vec<String>,
    /// Natural size every tile measures to.
    pub tile_size: Size,
    /// Container ids in visual child order.
    pub visual: Vec<u32>,
    /// Containers created so far.
    pub created: u32,
}

impl SimHost {
    /// Creates a host with `count` labelled items.
    pub fn new(count: usize, tile_size: Size) -> Self {
        Self {
            items: (0..count).map(|i| format!("photo-{i:04}")).collect(),
            tile_size,
            visual: Vec::new(),
            created: 0,
        }
    }
}

impl ItemsOwner for SimHost {
    fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl ContainerGenerator for SimHost {
    type Container = Tile;

    fn begin_session(&mut self, start: usize) {
        trace!(start, "generator session opened");
    }

    fn end_session(&mut self) {
        trace!("generator session closed");
    }

    fn create(&mut self, index: usize) -> Option<Tile> {
        self.created += 1;
        debug!(index, id = self.created, "creating tile");
        Some(Tile {
            id: self.created,
            item: None,
            bounds: Rect::ZERO,
        })
    }

    fn prepare(&mut self, tile: &mut Tile, index: usize) {
        tile.item = self.items.get(index).cloned();
    }

    fn clear(&mut self, tile: &mut Tile, _index: usize) {
        tile.item = None;
    }

    fn destroy(&mut self, tile: Tile) {
        debug!(id = tile.id, "destroying tile");
    }

    fn attach(&mut self, tile: &Tile, visual_index: usize) {
        self.visual.insert(visual_index, tile.id);
    }

    fn detach(&mut self, _tile: &Tile, visual_index: usize) {
        self.visual.remove(visual_index);
    }

    fn measure(&mut self, _tile: &mut Tile, _constraint: ChildConstraint) -> Size {
        self.tile_size
    }

    fn arrange(&mut self, tile: &mut Tile, rect: Rect) {
        tile.bounds = rect;
    }
}
