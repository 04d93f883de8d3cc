// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A recording host used by unit tests.

use alloc::vec::Vec;

use kurbo::{Rect, Size};

use crate::host::{ChildConstraint, ContainerGenerator, ItemsOwner, NestedConstraints};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MockContainer {
    pub(crate) id: u32,
    pub(crate) item: Option<usize>,
}

#[derive(Debug, Default)]
pub(crate) struct MockHost {
    pub(crate) item_count: usize,
    pub(crate) child_size: Size,
    pub(crate) groups: Vec<usize>,
    pub(crate) nested: Option<NestedConstraints>,
    pub(crate) fail_on: Vec<usize>,
    /// Container ids in visual child order.
    pub(crate) visual: Vec<u32>,
    next_id: u32,
    pub(crate) created: usize,
    pub(crate) destroyed: usize,
    pub(crate) cleared: usize,
    pub(crate) measured: usize,
    pub(crate) nested_measures: Vec<(usize, NestedConstraints)>,
    pub(crate) arranged: Vec<(usize, Rect)>,
    pub(crate) sessions_opened: usize,
    pub(crate) sessions_closed: usize,
}

impl MockHost {
    pub(crate) fn new(item_count: usize) -> Self {
        Self {
            item_count,
            child_size: Size::new(50.0, 50.0),
            ..Self::default()
        }
    }

    pub(crate) fn fresh_container(&mut self) -> MockContainer {
        self.next_id += 1;
        MockContainer {
            id: self.next_id,
            item: None,
        }
    }

    pub(crate) fn arranged_rect(&self, index: usize) -> Option<Rect> {
        self.arranged
            .iter()
            .rev()
            .find(|(item, _)| *item == index)
            .map(|(_, rect)| *rect)
    }
}

impl ItemsOwner for MockHost {
    fn item_count(&self) -> usize {
        self.item_count
    }

    fn is_group(&self, index: usize) -> bool {
        self.groups.contains(&index)
    }

    fn nested_constraints(&self) -> Option<NestedConstraints> {
        self.nested
    }
}

impl ContainerGenerator for MockHost {
    type Container = MockContainer;

    fn begin_session(&mut self, _start: usize) {
        assert_eq!(
            self.sessions_opened, self.sessions_closed,
            "previous session was left open"
        );
        self.sessions_opened += 1;
    }

    fn end_session(&mut self) {
        self.sessions_closed += 1;
    }

    fn create(&mut self, index: usize) -> Option<MockContainer> {
        if self.fail_on.contains(&index) {
            return None;
        }
        self.created += 1;
        Some(self.fresh_container())
    }

    fn prepare(&mut self, container: &mut MockContainer, index: usize) {
        assert_eq!(container.item, None, "container still carries stale item data");
        container.item = Some(index);
    }

    fn clear(&mut self, container: &mut MockContainer, _index: usize) {
        assert!(container.item.is_some(), "cleared an unprepared container");
        container.item = None;
        self.cleared += 1;
    }

    fn destroy(&mut self, _container: MockContainer) {
        self.destroyed += 1;
    }

    fn attach(&mut self, container: &MockContainer, visual_index: usize) {
        self.visual.insert(visual_index, container.id);
    }

    fn detach(&mut self, container: &MockContainer, visual_index: usize) {
        assert_eq!(
            self.visual.get(visual_index),
            Some(&container.id),
            "visual child order diverged"
        );
        self.visual.remove(visual_index);
    }

    fn measure(&mut self, container: &mut MockContainer, constraint: ChildConstraint) -> Size {
        self.measured += 1;
        if let ChildConstraint::Nested(nested) = constraint {
            self.nested_measures
                .push((container.item.unwrap_or(usize::MAX), nested));
        }
        self.child_size
    }

    fn arrange(&mut self, container: &mut MockContainer, rect: Rect) {
        self.arranged
            .push((container.item.unwrap_or(usize::MAX), rect));
    }
}
