// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Realization and recycling of item containers.
//!
//! A [`Realizer`] owns every realized container, in item-index order, which is
//! also the order of the host's visual children. Each pass it reconciles that
//! set with a resolved [`ItemRange`]: indices entering the range get a pooled
//! or freshly created container, indices leaving it are recycled into a
//! [`RecyclePool`] or destroyed, depending on [`VirtualizationMode`].

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Size;
use smallvec::SmallVec;

use crate::generator::GeneratorSession;
use crate::host::{ChildConstraint, ContainerGenerator, ContainerKind};
use crate::range::ItemRange;

/// What happens to a container when its item leaves the realized range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VirtualizationMode {
    /// Containers are destroyed.
    Standard,
    /// Containers are cleared and pooled by [`ContainerKind`] for reuse.
    #[default]
    Recycling,
}

/// Containers waiting for reuse, keyed by kind.
#[derive(Debug)]
pub struct RecyclePool<C> {
    by_kind: HashMap<ContainerKind, Vec<C>>,
}

impl<C> Default for RecyclePool<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> RecyclePool<C> {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_kind: HashMap::new(),
        }
    }

    /// Adds a cleared container to the pool.
    pub fn push(&mut self, kind: ContainerKind, container: C) {
        self.by_kind.entry(kind).or_default().push(container);
    }

    /// Takes a container of the given kind, if one is pooled.
    pub fn take(&mut self, kind: ContainerKind) -> Option<C> {
        self.by_kind.get_mut(&kind).and_then(Vec::pop)
    }

    /// Total number of pooled containers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum()
    }

    /// Returns `true` if nothing is pooled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every pooled container.
    pub fn drain(&mut self) -> impl Iterator<Item = C> + '_ {
        self.by_kind.drain().flat_map(|(_, containers)| containers)
    }
}

/// A realized container and the item it displays.
#[derive(Debug, Clone)]
pub struct RealizedChild<C> {
    /// Index of the displayed item.
    pub index: usize,
    /// Kind the container was generated as.
    pub kind: ContainerKind,
    /// Size reported by the last measurement.
    pub desired_size: Size,
    /// The container.
    pub container: C,
}

/// Summary of one reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RealizationReport {
    /// Containers created from scratch.
    pub created: usize,
    /// Containers taken from the recycle pool.
    pub reused: usize,
    /// Containers that stayed realized for the same item.
    pub kept: usize,
    /// Containers cleared and returned to the pool.
    pub recycled: usize,
    /// Containers destroyed.
    pub destroyed: usize,
    /// Indices the host failed to produce a container for.
    pub skipped: SmallVec<[usize; 4]>,
}

/// An incremental change to the backing item collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionChange {
    /// `count` items were inserted at `index`.
    Add {
        /// Position of the first inserted item.
        index: usize,
        /// Number of inserted items.
        count: usize,
    },
    /// `count` items starting at `index` were removed.
    Remove {
        /// Position of the first removed item.
        index: usize,
        /// Number of removed items.
        count: usize,
    },
    /// `count` items starting at `index` were replaced in place.
    Replace {
        /// Position of the first replaced item.
        index: usize,
        /// Number of replaced items.
        count: usize,
    },
    /// `count` items moved from `from` to `to` (position after removal).
    Move {
        /// Original position of the first moved item.
        from: usize,
        /// New position of the first moved item.
        to: usize,
        /// Number of moved items.
        count: usize,
    },
    /// The collection changed wholesale.
    Reset,
}

/// Owner of realized and pooled containers.
#[derive(Debug)]
pub struct Realizer<C> {
    children: Vec<RealizedChild<C>>,
    pool: RecyclePool<C>,
    mode: VirtualizationMode,
}

impl<C> Realizer<C> {
    /// Creates a realizer with no containers.
    #[must_use]
    pub fn new(mode: VirtualizationMode) -> Self {
        Self {
            children: Vec::new(),
            pool: RecyclePool::new(),
            mode,
        }
    }

    /// Current virtualization mode.
    #[must_use]
    pub const fn mode(&self) -> VirtualizationMode {
        self.mode
    }

    /// Changes the virtualization mode for containers virtualized from now on.
    pub fn set_mode(&mut self, mode: VirtualizationMode) {
        self.mode = mode;
    }

    /// Realized children in item-index (and visual) order.
    #[must_use]
    pub fn children(&self) -> &[RealizedChild<C>] {
        &self.children
    }

    /// Mutable access to realized children, for arrangement.
    pub fn children_mut(&mut self) -> &mut [RealizedChild<C>] {
        &mut self.children
    }

    /// Number of pooled containers.
    #[must_use]
    pub fn pooled(&self) -> usize {
        self.pool.len()
    }

    /// Indices spanned by realized children, from first to last.
    #[must_use]
    pub fn realized_range(&self) -> ItemRange {
        match (self.children.first(), self.children.last()) {
            (Some(first), Some(last)) => ItemRange {
                start: first.index,
                end: last.index + 1,
            },
            _ => ItemRange::EMPTY,
        }
    }

    /// Measured size of the first realized child, if any.
    #[must_use]
    pub fn representative_size(&self) -> Option<Size> {
        self.children.first().map(|child| child.desired_size)
    }

    /// The container displaying `index`, if realized.
    #[must_use]
    pub fn container_for(&self, index: usize) -> Option<&C> {
        self.slot_of(index)
            .ok()
            .map(|slot| &self.children[slot].container)
    }

    /// Item index displayed by `container`, if it is realized.
    #[must_use]
    pub fn index_of(&self, container: &C) -> Option<usize>
    where
        C: PartialEq,
    {
        self.children
            .iter()
            .find(|child| child.container == *container)
            .map(|child| child.index)
    }

    fn slot_of(&self, index: usize) -> Result<usize, usize> {
        self.children.binary_search_by_key(&index, |child| child.index)
    }

    /// Reconciles realized containers with `range`.
    ///
    /// Children outside `range` are virtualized first, so recycled containers
    /// are available to the same pass. Missing indices are then generated
    /// through a [`GeneratorSession`], attached at their visual position,
    /// prepared, and measured with the constraint returned by `constraint_for`.
    /// Already realized nested groups are re-measured so they see the current
    /// viewport.
    pub fn realize<G, F>(
        &mut self,
        generator: &mut G,
        range: ItemRange,
        mut constraint_for: F,
    ) -> RealizationReport
    where
        G: ContainerGenerator<Container = C> + ?Sized,
        F: FnMut(usize) -> ChildConstraint,
    {
        let mut report = RealizationReport::default();
        self.virtualize_where(generator, &mut report, |index| !range.contains(index));
        if !range.is_empty() {
            let mut session = GeneratorSession::open(&mut *generator, range.start);
            for index in range.indices() {
                let constraint = constraint_for(index);
                match self.slot_of(index) {
                    Ok(slot) => {
                        session.skip();
                        report.kept += 1;
                        if let ChildConstraint::Nested(_) = constraint {
                            let child = &mut self.children[slot];
                            child.desired_size =
                                session.generator().measure(&mut child.container, constraint);
                        }
                    }
                    Err(slot) => {
                        let Some(generated) = session.next(&mut self.pool) else {
                            pwarn!(index, "container generator produced no container; skipping");
                            report.skipped.push(index);
                            continue;
                        };
                        let mut container = generated.container;
                        if generated.is_new {
                            report.created += 1;
                        } else {
                            report.reused += 1;
                        }
                        let generator = session.generator();
                        let kind = generator.container_kind(index);
                        generator.attach(&container, slot);
                        generator.prepare(&mut container, index);
                        let desired_size = generator.measure(&mut container, constraint);
                        ptrace!(index, slot, is_new = generated.is_new, "realized container");
                        self.children.insert(
                            slot,
                            RealizedChild {
                                index,
                                kind,
                                desired_size,
                                container,
                            },
                        );
                    }
                }
            }
        }
        report
    }

    /// Virtualizes every realized child.
    pub fn virtualize_all<G>(&mut self, generator: &mut G) -> RealizationReport
    where
        G: ContainerGenerator<Container = C> + ?Sized,
    {
        let mut report = RealizationReport::default();
        self.virtualize_where(generator, &mut report, |_| true);
        report
    }

    /// Destroys every pooled container.
    pub fn clear_pool<G>(&mut self, generator: &mut G) -> usize
    where
        G: ContainerGenerator<Container = C> + ?Sized,
    {
        let mut destroyed = 0;
        for container in self.pool.drain() {
            generator.destroy(container);
            destroyed += 1;
        }
        destroyed
    }

    /// Applies an incremental collection change to realized children.
    ///
    /// Children whose items were removed or replaced are virtualized; the
    /// indices of the remaining children are shifted so they keep displaying
    /// the same items. Newly inserted items are realized on the next pass.
    pub fn apply_change<G>(&mut self, generator: &mut G, change: CollectionChange) -> RealizationReport
    where
        G: ContainerGenerator<Container = C> + ?Sized,
    {
        let mut report = RealizationReport::default();
        match change {
            CollectionChange::Add { index, count } => self.shift_from(index, count, true),
            CollectionChange::Remove { index, count } => {
                let end = index.saturating_add(count);
                self.virtualize_where(generator, &mut report, |i| i >= index && i < end);
                self.shift_from(end, count, false);
            }
            CollectionChange::Replace { index, count } => {
                let end = index.saturating_add(count);
                self.virtualize_where(generator, &mut report, |i| i >= index && i < end);
            }
            CollectionChange::Move { from, to, count } => {
                report = self.apply_change(generator, CollectionChange::Remove { index: from, count });
                self.shift_from(to, count, true);
            }
            CollectionChange::Reset => {
                self.virtualize_where(generator, &mut report, |_| true);
            }
        }
        report
    }

    fn shift_from(&mut self, from: usize, count: usize, forward: bool) {
        for child in self.children.iter_mut().filter(|child| child.index >= from) {
            child.index = if forward {
                child.index + count
            } else {
                child.index - count
            };
        }
    }

    /// Walks children in reverse, virtualizing those selected by `predicate`.
    fn virtualize_where<G, P>(&mut self, generator: &mut G, report: &mut RealizationReport, predicate: P)
    where
        G: ContainerGenerator<Container = C> + ?Sized,
        P: Fn(usize) -> bool,
    {
        for slot in (0..self.children.len()).rev() {
            if !predicate(self.children[slot].index) {
                continue;
            }
            let RealizedChild {
                index,
                kind,
                mut container,
                ..
            } = self.children.remove(slot);
            generator.detach(&container, slot);
            match self.mode {
                VirtualizationMode::Recycling => {
                    generator.clear(&mut container, index);
                    self.pool.push(kind, container);
                    report.recycled += 1;
                    ptrace!(index, "recycled container");
                }
                VirtualizationMode::Standard => {
                    generator.destroy(container);
                    report.destroyed += 1;
                    ptrace!(index, "destroyed container");
                }
            }
        }
    }
}
