// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host-facing virtualizing wrap panel.

use alloc::boxed::Box;

use kurbo::{Point, Rect, Size, Vec2};
use smallvec::SmallVec;

use crate::error::PanelError;
use crate::geometry::{Axis, to_f64};
use crate::host::{ChildConstraint, ContainerGenerator, ItemsOwner, NestedConstraints, ScrollOwner};
use crate::layout::{ChildSizeSource, LayoutSnapshot, RowLayout};
use crate::options::PanelOptions;
use crate::range::{CacheWindow, ItemRange, ScrollWindow, resolve_item_range};
use crate::realization::{CollectionChange, RealizationReport, RealizedChild, Realizer};
use crate::scroll::{ScrollAlign, ScrollCommand, ScrollDirection, ScrollGranularity, ScrollState};
use crate::spacing::{RowSpacing, collapsed};

/// A wrap panel that only realizes containers for items near the viewport.
///
/// The host drives it with [`measure`](Self::measure) and
/// [`arrange`](Self::arrange) during its layout passes and forwards scroll
/// input through the scroll commands. `C` is the host's container handle type.
///
/// Every measure pass computes a fresh [`LayoutSnapshot`], resolves the
/// [`ItemRange`] to realize from the offset, viewport, and cache window, and
/// reconciles realized containers with it.
pub struct VirtualizingWrapPanel<C> {
    options: PanelOptions,
    realizer: Realizer<C>,
    scroll: ScrollState,
    snapshot: Option<LayoutSnapshot>,
    resolved: ItemRange,
    last_report: RealizationReport,
    needs_measure: bool,
    scroll_owner: Option<Box<dyn ScrollOwner>>,
}

impl<C: core::fmt::Debug> core::fmt::Debug for VirtualizingWrapPanel<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualizingWrapPanel")
            .field("options", &self.options)
            .field("realizer", &self.realizer)
            .field("scroll", &self.scroll)
            .field("snapshot", &self.snapshot)
            .field("resolved", &self.resolved)
            .field("needs_measure", &self.needs_measure)
            .field("has_scroll_owner", &self.scroll_owner.is_some())
            .finish_non_exhaustive()
    }
}

impl<C> Default for VirtualizingWrapPanel<C> {
    fn default() -> Self {
        Self::new(PanelOptions::default())
    }
}

impl<C> VirtualizingWrapPanel<C> {
    /// Creates a panel with the given options.
    #[must_use]
    pub fn new(options: PanelOptions) -> Self {
        Self {
            options,
            realizer: Realizer::new(options.virtualization_mode),
            scroll: ScrollState::default(),
            snapshot: None,
            resolved: ItemRange::EMPTY,
            last_report: RealizationReport::default(),
            needs_measure: true,
            scroll_owner: None,
        }
    }

    /// Current options.
    #[must_use]
    pub const fn options(&self) -> &PanelOptions {
        &self.options
    }

    /// Replaces the options and invalidates the layout.
    pub fn set_options(&mut self, options: PanelOptions) {
        self.realizer.set_mode(options.virtualization_mode);
        self.options = options;
        self.needs_measure = true;
    }

    /// Installs the scroll viewer notified about geometry changes.
    pub fn set_scroll_owner(&mut self, owner: impl ScrollOwner + 'static) {
        self.scroll_owner = Some(Box::new(owner));
    }

    /// Returns `true` if something changed since the last measure pass.
    #[must_use]
    pub const fn needs_measure(&self) -> bool {
        self.needs_measure
    }

    /// Total scrollable content size.
    #[must_use]
    pub const fn extent(&self) -> Size {
        self.scroll.extent()
    }

    /// Visible window size.
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.scroll.viewport()
    }

    /// Current scroll offset.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.scroll.offset()
    }

    /// Horizontal scroll offset.
    #[must_use]
    pub const fn horizontal_offset(&self) -> f64 {
        self.scroll.offset().x
    }

    /// Vertical scroll offset.
    #[must_use]
    pub const fn vertical_offset(&self) -> f64 {
        self.scroll.offset().y
    }

    /// Layout snapshot of the last measure pass.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&LayoutSnapshot> {
        self.snapshot.as_ref()
    }

    /// Row layout of the last measure pass.
    pub fn row_layout(&self) -> Result<RowLayout, PanelError> {
        self.snapshot
            .map(|snapshot| snapshot.rows)
            .ok_or(PanelError::LayoutNotMeasured)
    }

    /// Range resolved by the last measure pass, cache included.
    #[must_use]
    pub const fn resolved_range(&self) -> ItemRange {
        self.resolved
    }

    /// Indices spanned by the currently realized containers.
    #[must_use]
    pub fn realized_range(&self) -> ItemRange {
        self.realizer.realized_range()
    }

    /// Outcome of the last reconciliation, including skipped indices.
    #[must_use]
    pub const fn last_report(&self) -> &RealizationReport {
        &self.last_report
    }

    /// Realized containers in visual order.
    #[must_use]
    pub fn children(&self) -> &[RealizedChild<C>] {
        self.realizer.children()
    }

    /// Number of containers waiting in the recycle pool.
    #[must_use]
    pub fn pooled_containers(&self) -> usize {
        self.realizer.pooled()
    }

    /// The container displaying `index`, if realized.
    #[must_use]
    pub fn container_for_index(&self, index: usize) -> Option<&C> {
        self.realizer.container_for(index)
    }

    /// Item index displayed by `container`, if realized.
    #[must_use]
    pub fn index_of_container(&self, container: &C) -> Option<usize>
    where
        C: PartialEq,
    {
        self.realizer.index_of(container)
    }

    /// Measure pass: resolves the realized range and reconciles containers.
    ///
    /// Returns the desired size, which is the extent clamped to `available`
    /// on each axis.
    pub fn measure<H>(&mut self, available: Size, host: &mut H) -> Size
    where
        H: ItemsOwner + ContainerGenerator<Container = C>,
    {
        self.needs_measure = false;
        let orientation = self.options.orientation;
        let item_count = host.item_count();
        let nested = host.nested_constraints();

        let source = ChildSizeSource::select(self.options.item_size, self.realizer.representative_size());
        let child_size = match source.size() {
            Some(size) => size,
            None if item_count == 0 => Size::ZERO,
            None => {
                let report = self.realizer.realize(host, ItemRange { start: 0, end: 1 }, |_| {
                    ChildConstraint::Unconstrained
                });
                match self.realizer.representative_size() {
                    Some(size) => size,
                    None => {
                        // Nothing to size the layout by; retry on the next pass.
                        self.last_report = report;
                        self.snapshot = None;
                        self.resolved = ItemRange::EMPTY;
                        self.needs_measure = true;
                        if self.scroll.update(Size::ZERO, finite_or(available, Size::ZERO)) {
                            self.notify_scroll_owner();
                        }
                        return Size::ZERO;
                    }
                }
            }
        };

        let snapshot = LayoutSnapshot::compute(
            orientation,
            child_size,
            available,
            item_count,
            self.options.spacing_mode,
        );
        self.snapshot = Some(snapshot);

        let viewport = match nested {
            Some(constraints) => constraints.viewport.size(),
            None => finite_or(available, snapshot.extent),
        };
        let mut changed = self.scroll.update(snapshot.extent, viewport);
        changed |= self.pin_locked_axes();
        if changed {
            self.notify_scroll_owner();
        }

        let (window, cache) = self.scroll_window(nested);
        let range = if !self.options.virtualizing {
            ItemRange::full(item_count)
        } else if nested.is_some() && !window.reaches_content(&snapshot, cache) {
            ItemRange::EMPTY
        } else {
            resolve_item_range(&snapshot, window, cache)
        };

        let visible = self.visible_window(nested);
        let groups: SmallVec<[usize; 8]> = range.indices().filter(|&i| host.is_group(i)).collect();
        let report = self.realizer.realize(host, range, |index| {
            if groups.contains(&index) {
                ChildConstraint::Nested(nested_constraints_for(&snapshot, index, visible, cache))
            } else {
                ChildConstraint::Unconstrained
            }
        });
        pdebug!(
            item_count,
            items_per_row = snapshot.rows.items_per_row,
            start = range.start,
            end = range.end,
            created = report.created,
            reused = report.reused,
            skipped = report.skipped.len(),
            "measured virtualizing panel"
        );
        self.resolved = range;
        self.last_report = report;

        Size::new(
            available.width.min(snapshot.extent.width),
            available.height.min(snapshot.extent.height),
        )
    }

    /// Arrange pass: positions every realized container.
    ///
    /// When `final_size` has no area, containers are arranged with empty
    /// bounds so they stay logically present without painting.
    pub fn arrange<G>(&mut self, final_size: Size, generator: &mut G) -> Size
    where
        G: ContainerGenerator<Container = C> + ?Sized,
    {
        let Some(snapshot) = self.snapshot else {
            return final_size;
        };
        let orientation = snapshot.orientation;
        let spacing = RowSpacing::compute(
            self.options.spacing_mode,
            orientation.major(final_size),
            snapshot.child_major(),
            snapshot.rows.items_per_row,
            self.options.stretch_items,
            self.options.max_item_major,
        );
        let offset = self.scroll.offset();
        let empty = final_size.width <= 0.0 || final_size.height <= 0.0;
        for child in self.realizer.children_mut() {
            let rect = spacing.item_rect(&snapshot, child.index, offset);
            let rect = if empty { collapsed(rect) } else { rect };
            generator.arrange(&mut child.container, rect);
        }
        final_size
    }

    /// Applies an incremental change of the item collection.
    ///
    /// The item count seen by index queries follows the change right away;
    /// after a [`CollectionChange::Reset`] they fail until the next measure.
    pub fn on_items_changed<G>(&mut self, generator: &mut G, change: CollectionChange) -> RealizationReport
    where
        G: ContainerGenerator<Container = C> + ?Sized,
    {
        self.needs_measure = true;
        self.track_item_count(change);
        self.realizer.apply_change(generator, change)
    }

    /// Destroys every pooled container, returning how many were destroyed.
    pub fn clear_recycle_pool<G>(&mut self, generator: &mut G) -> usize
    where
        G: ContainerGenerator<Container = C> + ?Sized,
    {
        self.realizer.clear_pool(generator)
    }

    /// Virtualizes every realized container, e.g. when the panel is torn down.
    pub fn release_all<G>(&mut self, generator: &mut G) -> RealizationReport
    where
        G: ContainerGenerator<Container = C> + ?Sized,
    {
        self.needs_measure = true;
        self.realizer.virtualize_all(generator)
    }

    /// Sets the offset on `axis`, clamped to the scrollable range.
    ///
    /// Any change invalidates the layout and notifies the scroll owner.
    pub fn set_offset(&mut self, axis: Axis, value: f64) -> Result<(), PanelError> {
        let value = if self.can_scroll(axis) { value } else { 0.0 };
        if self.scroll.set_offset(axis, value)? {
            self.needs_measure = true;
            self.notify_scroll_owner();
        }
        Ok(())
    }

    /// Sets the horizontal offset.
    pub fn set_horizontal_offset(&mut self, value: f64) -> Result<(), PanelError> {
        self.set_offset(Axis::X, value)
    }

    /// Sets the vertical offset.
    pub fn set_vertical_offset(&mut self, value: f64) -> Result<(), PanelError> {
        self.set_offset(Axis::Y, value)
    }

    /// Moves the offset on `axis` by `delta`.
    pub fn scroll_by(&mut self, axis: Axis, delta: f64) -> Result<(), PanelError> {
        self.set_offset(axis, self.scroll.offset_on(axis) + delta)
    }

    /// Executes a scroll command, returning the signed delta it requested.
    pub fn execute(&mut self, command: ScrollCommand) -> Result<f64, PanelError> {
        let child_size = self
            .snapshot
            .map(|snapshot| snapshot.child_size)
            .or(self.options.item_size)
            .unwrap_or(Size::ZERO);
        let delta = command.delta(
            self.options.scroll_unit,
            &self.options.scroll_amounts,
            child_size,
            self.scroll.viewport(),
        );
        self.scroll_by(command.direction.axis(), delta)?;
        Ok(delta)
    }

    /// Scrolls one line up.
    pub fn line_up(&mut self) -> Result<f64, PanelError> {
        self.execute(ScrollCommand::new(ScrollGranularity::Line, ScrollDirection::Up))
    }

    /// Scrolls one line down.
    pub fn line_down(&mut self) -> Result<f64, PanelError> {
        self.execute(ScrollCommand::new(ScrollGranularity::Line, ScrollDirection::Down))
    }

    /// Scrolls one line left.
    pub fn line_left(&mut self) -> Result<f64, PanelError> {
        self.execute(ScrollCommand::new(ScrollGranularity::Line, ScrollDirection::Left))
    }

    /// Scrolls one line right.
    pub fn line_right(&mut self) -> Result<f64, PanelError> {
        self.execute(ScrollCommand::new(ScrollGranularity::Line, ScrollDirection::Right))
    }

    /// Scrolls one wheel notch up.
    pub fn wheel_up(&mut self) -> Result<f64, PanelError> {
        self.execute(ScrollCommand::new(ScrollGranularity::Wheel, ScrollDirection::Up))
    }

    /// Scrolls one wheel notch down.
    pub fn wheel_down(&mut self) -> Result<f64, PanelError> {
        self.execute(ScrollCommand::new(ScrollGranularity::Wheel, ScrollDirection::Down))
    }

    /// Scrolls one wheel notch left.
    pub fn wheel_left(&mut self) -> Result<f64, PanelError> {
        self.execute(ScrollCommand::new(ScrollGranularity::Wheel, ScrollDirection::Left))
    }

    /// Scrolls one wheel notch right.
    pub fn wheel_right(&mut self) -> Result<f64, PanelError> {
        self.execute(ScrollCommand::new(ScrollGranularity::Wheel, ScrollDirection::Right))
    }

    /// Scrolls one page up.
    pub fn page_up(&mut self) -> Result<f64, PanelError> {
        self.execute(ScrollCommand::new(ScrollGranularity::Page, ScrollDirection::Up))
    }

    /// Scrolls one page down.
    pub fn page_down(&mut self) -> Result<f64, PanelError> {
        self.execute(ScrollCommand::new(ScrollGranularity::Page, ScrollDirection::Down))
    }

    /// Scrolls one page left.
    pub fn page_left(&mut self) -> Result<f64, PanelError> {
        self.execute(ScrollCommand::new(ScrollGranularity::Page, ScrollDirection::Left))
    }

    /// Scrolls one page right.
    pub fn page_right(&mut self) -> Result<f64, PanelError> {
        self.execute(ScrollCommand::new(ScrollGranularity::Page, ScrollDirection::Right))
    }

    /// Scrolls the minimum needed to show `target`, given in content coordinates.
    ///
    /// Returns the visible part of `target` afterwards.
    pub fn make_visible(&mut self, target: Rect) -> Rect {
        let before = self.scroll.offset();
        let mut visible = self.scroll.make_visible(target);
        if self.pin_locked_axes() {
            visible = target.abs().intersect(self.scroll.visible_rect());
        }
        if self.scroll.offset() != before {
            self.needs_measure = true;
            self.notify_scroll_owner();
        }
        visible
    }

    /// Scrolls so the row containing `index` starts at the top of the viewport.
    pub fn bring_index_into_view(&mut self, index: usize) -> Result<(), PanelError> {
        self.scroll_index_into_view(index, ScrollAlign::Start)
    }

    /// Scrolls the row containing `index` into view with the given alignment.
    ///
    /// Fails without changing state if no measure pass has happened yet or if
    /// `index` is out of range.
    pub fn scroll_index_into_view(&mut self, index: usize, align: ScrollAlign) -> Result<(), PanelError> {
        let snapshot = self.snapshot.ok_or(PanelError::LayoutNotMeasured)?;
        if index >= snapshot.item_count {
            return Err(PanelError::IndexOutOfRange {
                index,
                count: snapshot.item_count,
            });
        }
        let axis = snapshot.orientation.minor_axis();
        let start = snapshot.row_offset(snapshot.row_of(index));
        let end = start + snapshot.child_minor();
        let target = align.offset_for(
            start,
            end,
            self.scroll.offset_on(axis),
            axis.of_size(self.scroll.viewport()),
        );
        self.set_offset(axis, target)
    }

    /// Items intersecting the viewport, without the cache window.
    #[must_use]
    pub fn visible_range(&self) -> ItemRange {
        let Some(snapshot) = self.snapshot else {
            return ItemRange::EMPTY;
        };
        let (window, _) = self.scroll_window(None);
        resolve_item_range(&snapshot, window, CacheWindow::NONE)
    }

    /// First item intersecting the viewport.
    #[must_use]
    pub fn first_visible_index(&self) -> Option<usize> {
        let range = self.visible_range();
        (!range.is_empty()).then_some(range.start)
    }

    /// Last item intersecting the viewport.
    #[must_use]
    pub fn last_visible_index(&self) -> Option<usize> {
        self.visible_range().last()
    }

    /// Returns `true` if the row holding `index` lies entirely inside the viewport.
    #[must_use]
    pub fn is_index_fully_visible(&self, index: usize) -> bool {
        let Some(snapshot) = self.snapshot else {
            return false;
        };
        if index >= snapshot.item_count {
            return false;
        }
        let axis = snapshot.orientation.minor_axis();
        let start = snapshot.row_offset(snapshot.row_of(index));
        let end = start + snapshot.child_minor();
        let view_start = self.scroll.offset_on(axis);
        let view_end = view_start + axis.of_size(self.scroll.viewport());
        start >= view_start && end <= view_end
    }

    fn track_item_count(&mut self, change: CollectionChange) {
        if change == CollectionChange::Reset {
            self.snapshot = None;
            return;
        }
        let Some(snapshot) = self.snapshot.as_mut() else {
            return;
        };
        let count = match change {
            CollectionChange::Add { count, .. } => snapshot.item_count.saturating_add(count),
            CollectionChange::Remove { count, .. } => snapshot.item_count.saturating_sub(count),
            _ => return,
        };
        snapshot.item_count = count;
        snapshot.rows.row_count = count.div_ceil(snapshot.rows.items_per_row);
    }

    fn can_scroll(&self, axis: Axis) -> bool {
        if axis == self.options.orientation.major_axis() {
            self.options.can_scroll_major
        } else {
            self.options.can_scroll_minor
        }
    }

    /// Forces the offset to zero on axes that may not scroll.
    fn pin_locked_axes(&mut self) -> bool {
        let mut changed = false;
        for axis in [Axis::X, Axis::Y] {
            if !self.can_scroll(axis) {
                // Zero is never rejected.
                changed |= self.scroll.set_offset(axis, 0.0).unwrap_or(false);
            }
        }
        changed
    }

    fn scroll_window(&self, nested: Option<NestedConstraints>) -> (ScrollWindow, CacheWindow) {
        let orientation = self.options.orientation;
        match nested {
            Some(constraints) => (
                ScrollWindow {
                    offset: orientation.minor_pos(constraints.viewport.origin()),
                    viewport: orientation.minor(constraints.viewport.size()),
                },
                constraints.cache,
            ),
            None => (
                ScrollWindow {
                    offset: orientation.minor(self.scroll.offset().to_size()),
                    viewport: orientation.minor(self.scroll.viewport()),
                },
                self.options.cache,
            ),
        }
    }

    /// The visible window in content coordinates.
    fn visible_window(&self, nested: Option<NestedConstraints>) -> Rect {
        nested.map_or_else(|| self.scroll.visible_rect(), |constraints| constraints.viewport)
    }

    fn notify_scroll_owner(&mut self) {
        if let Some(owner) = self.scroll_owner.as_mut() {
            owner.invalidate_scroll_info();
        }
    }
}

/// Viewport and cache handed to the nested panel hosted by item `index`,
/// translated into that item's coordinate space.
fn nested_constraints_for(
    snapshot: &LayoutSnapshot,
    index: usize,
    visible: Rect,
    cache: CacheWindow,
) -> NestedConstraints {
    let orientation = snapshot.orientation;
    let origin: Point = orientation.make_point(
        to_f64(snapshot.column_of(index)) * snapshot.child_major(),
        snapshot.row_offset(snapshot.row_of(index)),
    );
    NestedConstraints {
        viewport: visible - origin.to_vec2(),
        cache,
    }
}

/// Replaces infinite components of `size` with those of `fallback`.
fn finite_or(size: Size, fallback: Size) -> Size {
    Size::new(
        if size.width.is_finite() {
            size.width
        } else {
            fallback.width
        },
        if size.height.is_finite() {
            size.height
        } else {
            fallback.height
        },
    )
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::Cell;

    use kurbo::{Rect, Size};

    use super::VirtualizingWrapPanel;
    use crate::error::PanelError;
    use crate::geometry::{Axis, Orientation};
    use crate::host::NestedConstraints;
    use crate::options::PanelOptions;
    use crate::range::{CacheUnit, CacheWindow, ItemRange};
    use crate::realization::{CollectionChange, VirtualizationMode};
    use crate::scroll::{ScrollAlign, ScrollUnit};
    use crate::spacing::SpacingMode;
    use crate::test_support::{MockContainer, MockHost};

    const VIEWPORT: Size = Size::new(220.0, 120.0);

    fn grid_options() -> PanelOptions {
        PanelOptions::default()
            .with_item_size(Size::new(50.0, 50.0))
            .with_spacing_mode(SpacingMode::None)
            .with_cache(1.0, CacheUnit::Item)
    }

    fn measured(options: PanelOptions, count: usize) -> (VirtualizingWrapPanel<MockContainer>, MockHost) {
        let mut host = MockHost::new(count);
        let mut panel = VirtualizingWrapPanel::new(options);
        panel.measure(VIEWPORT, &mut host);
        (panel, host)
    }

    #[test]
    fn resolves_visible_rows_plus_item_cache() {
        let (panel, host) = measured(grid_options(), 100);
        assert_eq!(panel.row_layout().unwrap().items_per_row, 4);
        assert_eq!(panel.resolved_range(), ItemRange { start: 0, end: 16 });
        assert_eq!(panel.children().len(), 16);
        assert_eq!(host.visual.len(), 16);
        assert_eq!(panel.extent(), Size::new(200.0, 1250.0));
        assert_eq!(panel.viewport(), VIEWPORT);
    }

    #[test]
    fn set_offset_clamps_and_notifies() {
        let (mut panel, mut host) = measured(grid_options(), 100);
        let notified = Rc::new(Cell::new(0));
        let counter = Rc::clone(&notified);
        panel.set_scroll_owner(move || counter.set(counter.get() + 1));

        panel.set_offset(Axis::Y, 10_000.0).unwrap();
        assert_eq!(panel.vertical_offset(), 1130.0);
        assert!(panel.needs_measure());
        assert_eq!(notified.get(), 1);

        // Re-applying an already clamped value changes nothing.
        panel.set_offset(Axis::Y, 1130.0).unwrap();
        assert_eq!(notified.get(), 1);

        panel.measure(VIEWPORT, &mut host);
        assert!(!panel.needs_measure());
        assert_eq!(panel.resolved_range().last(), Some(99));
        assert!(panel.children().iter().all(|child| child.index >= 84));
    }

    #[test]
    fn bring_index_into_view_scrolls_to_its_row() {
        let (mut panel, _host) = measured(grid_options(), 100);
        panel.bring_index_into_view(37).unwrap();
        assert_eq!(panel.vertical_offset(), 450.0);

        assert_eq!(
            panel.bring_index_into_view(100),
            Err(PanelError::IndexOutOfRange {
                index: 100,
                count: 100
            })
        );
        assert_eq!(panel.vertical_offset(), 450.0);

        panel.scroll_index_into_view(37, ScrollAlign::End).unwrap();
        assert_eq!(panel.vertical_offset(), 380.0);
    }

    #[test]
    fn queries_before_measure_are_rejected() {
        let mut panel: VirtualizingWrapPanel<MockContainer> = VirtualizingWrapPanel::default();
        assert_eq!(panel.row_layout(), Err(PanelError::LayoutNotMeasured));
        assert_eq!(
            panel.bring_index_into_view(0),
            Err(PanelError::LayoutNotMeasured)
        );
        assert_eq!(panel.visible_range(), ItemRange::EMPTY);
    }

    #[test]
    fn uniform_spacing_arranges_with_equal_gaps() {
        let options = grid_options().with_spacing_mode(SpacingMode::Uniform);
        let mut host = MockHost::new(100);
        let mut panel = VirtualizingWrapPanel::new(options);
        let desired = panel.measure(Size::new(240.0, 120.0), &mut host);
        assert_eq!(desired, Size::new(240.0, 120.0));
        panel.arrange(Size::new(240.0, 120.0), &mut host);

        assert_eq!(host.arranged_rect(0), Some(Rect::new(8.0, 0.0, 58.0, 50.0)));
        assert_eq!(host.arranged_rect(1), Some(Rect::new(66.0, 0.0, 116.0, 50.0)));
        assert_eq!(host.arranged_rect(4), Some(Rect::new(8.0, 50.0, 58.0, 100.0)));
    }

    #[test]
    fn arrange_subtracts_scroll_offset() {
        let (mut panel, mut host) = measured(grid_options(), 100);
        panel.set_offset(Axis::Y, 75.0).unwrap();
        panel.measure(VIEWPORT, &mut host);
        panel.arrange(VIEWPORT, &mut host);
        assert_eq!(host.arranged_rect(4), Some(Rect::new(0.0, -25.0, 50.0, 25.0)));
    }

    #[test]
    fn zero_final_size_collapses_bounds() {
        let (mut panel, mut host) = measured(grid_options(), 10);
        panel.arrange(Size::ZERO, &mut host);
        let rect = host.arranged_rect(5).unwrap();
        assert_eq!(rect.area(), 0.0);
        assert_eq!(host.arranged.len(), panel.children().len());
    }

    #[test]
    fn measures_first_item_when_size_is_not_configured() {
        let options = PanelOptions::default()
            .with_spacing_mode(SpacingMode::None)
            .with_cache(0.0, CacheUnit::Pixel);
        let mut host = MockHost::new(1000);
        host.child_size = Size::new(100.0, 40.0);
        let mut panel = VirtualizingWrapPanel::new(options);
        panel.measure(Size::new(250.0, 100.0), &mut host);

        let snapshot = *panel.snapshot().unwrap();
        assert_eq!(snapshot.child_size, Size::new(100.0, 40.0));
        assert_eq!(snapshot.rows.items_per_row, 2);
        // Rows 0..=2 intersect a 100px viewport of 40px rows.
        assert_eq!(panel.resolved_range(), ItemRange { start: 0, end: 6 });
        // Each realized item was measured once.
        assert_eq!(host.measured, 6);
    }

    #[test]
    fn failed_first_measurement_realizes_nothing() {
        let options = PanelOptions::default();
        let mut host = MockHost::new(10);
        host.fail_on.push(0);
        let mut panel = VirtualizingWrapPanel::new(options);
        assert_eq!(panel.measure(VIEWPORT, &mut host), Size::ZERO);
        assert!(panel.children().is_empty());
        assert_eq!(panel.last_report().skipped.as_slice(), &[0]);
        assert!(panel.needs_measure());

        host.fail_on.clear();
        panel.measure(VIEWPORT, &mut host);
        assert!(!panel.children().is_empty());
    }

    #[test]
    fn non_virtualizing_realizes_everything() {
        let options = grid_options().with_virtualizing(false);
        let (panel, _host) = measured(options, 60);
        assert_eq!(panel.children().len(), 60);
    }

    #[test]
    fn recycled_containers_carry_fresh_data() {
        let (mut panel, mut host) = measured(grid_options(), 100);
        let created = host.created;
        panel.bring_index_into_view(60).unwrap();
        panel.measure(VIEWPORT, &mut host);
        for child in panel.children() {
            assert_eq!(child.container.item, Some(child.index));
        }
        // Rows 14..=18 are realized; the 16 containers that left are reused
        // and only the surplus is created.
        assert_eq!(panel.last_report().reused, 16);
        assert_eq!(panel.last_report().created, 4);
        assert_eq!(host.created, created + 4);

        panel.bring_index_into_view(0).unwrap();
        panel.measure(VIEWPORT, &mut host);
        let container = panel.container_for_index(3).cloned().unwrap();
        assert_eq!(container.item, Some(3));
        assert_eq!(panel.index_of_container(&container), Some(3));
    }

    #[test]
    fn standard_mode_destroys_on_scroll() {
        let options = grid_options().with_virtualization_mode(VirtualizationMode::Standard);
        let (mut panel, mut host) = measured(options, 100);
        panel.bring_index_into_view(80).unwrap();
        panel.measure(VIEWPORT, &mut host);
        assert_eq!(host.destroyed, 16);
        assert_eq!(panel.pooled_containers(), 0);
    }

    #[test]
    fn scroll_commands_use_configured_unit() {
        let (mut panel, _host) = measured(grid_options(), 100);
        assert_eq!(panel.line_down(), Ok(16.0));
        assert_eq!(panel.wheel_down(), Ok(48.0));
        assert_eq!(panel.vertical_offset(), 64.0);
        assert_eq!(panel.page_down(), Ok(120.0));
        assert_eq!(panel.vertical_offset(), 184.0);
        assert_eq!(panel.line_up(), Ok(-16.0));
        // Content fits horizontally, so horizontal commands are clamped away.
        panel.line_right().unwrap();
        assert_eq!(panel.horizontal_offset(), 0.0);

        let mut options = grid_options().with_scroll_unit(ScrollUnit::Item);
        options.scroll_amounts.wheel_items = 2;
        panel.set_options(options);
        assert_eq!(panel.wheel_down(), Ok(100.0));
        assert_eq!(panel.line_down(), Ok(50.0));
        assert_eq!(panel.vertical_offset(), 318.0);
    }

    #[test]
    fn locked_axis_stays_at_zero() {
        let mut options = grid_options();
        options.can_scroll_minor = false;
        let (mut panel, _host) = measured(options, 100);
        panel.set_offset(Axis::Y, 300.0).unwrap();
        assert_eq!(panel.vertical_offset(), 0.0);
        panel.make_visible(Rect::new(0.0, 500.0, 50.0, 550.0));
        assert_eq!(panel.vertical_offset(), 0.0);
    }

    #[test]
    fn make_visible_scrolls_and_invalidates() {
        let (mut panel, _host) = measured(grid_options(), 100);
        let visible = panel.make_visible(Rect::new(50.0, 400.0, 100.0, 450.0));
        assert_eq!(panel.vertical_offset(), 330.0);
        assert_eq!(visible, Rect::new(50.0, 400.0, 100.0, 450.0));
        assert!(panel.needs_measure());
    }

    #[test]
    fn visible_range_excludes_cache() {
        let (mut panel, mut host) = measured(grid_options(), 100);
        panel.set_offset(Axis::Y, 100.0).unwrap();
        panel.measure(VIEWPORT, &mut host);
        assert_eq!(panel.visible_range(), ItemRange { start: 8, end: 20 });
        assert_eq!(panel.first_visible_index(), Some(8));
        assert_eq!(panel.last_visible_index(), Some(19));
        assert_eq!(panel.resolved_range(), ItemRange { start: 4, end: 24 });
        assert!(panel.is_index_fully_visible(9));
        assert!(!panel.is_index_fully_visible(17));
    }

    #[test]
    fn vertical_orientation_scrolls_horizontally() {
        let options = grid_options().with_orientation(Orientation::Vertical);
        let mut host = MockHost::new(100);
        let mut panel = VirtualizingWrapPanel::new(options);
        panel.measure(Size::new(120.0, 220.0), &mut host);
        assert_eq!(panel.extent(), Size::new(1250.0, 200.0));
        panel.bring_index_into_view(37).unwrap();
        assert_eq!(panel.horizontal_offset(), 450.0);
        assert_eq!(panel.vertical_offset(), 0.0);
    }

    #[test]
    fn nested_constraints_drive_range_and_propagate_to_groups() {
        let mut host = MockHost::new(100);
        host.nested = Some(NestedConstraints {
            viewport: Rect::new(0.0, 500.0, 220.0, 620.0),
            cache: CacheWindow::NONE,
        });
        host.groups.push(41);
        let mut panel = VirtualizingWrapPanel::new(grid_options());
        panel.measure(Size::new(220.0, f64::INFINITY), &mut host);
        // Rows 10..=12 from the parent's viewport, no cache.
        assert_eq!(panel.resolved_range(), ItemRange { start: 40, end: 52 });
        let (index, constraints) = host.nested_measures[0];
        assert_eq!(index, 41);
        // Item 41 sits at (50, 500); the viewport is expressed relative to it.
        assert_eq!(constraints.viewport, Rect::new(-50.0, 0.0, 170.0, 120.0));

        // A parent viewport far away from this panel realizes nothing.
        host.nested = Some(NestedConstraints {
            viewport: Rect::new(0.0, -900.0, 220.0, -780.0),
            cache: CacheWindow::NONE,
        });
        panel.measure(Size::new(220.0, f64::INFINITY), &mut host);
        assert!(panel.children().is_empty());
    }

    #[test]
    fn collection_changes_invalidate_and_shift() {
        let (mut panel, mut host) = measured(grid_options(), 100);
        host.item_count = 104;
        panel.on_items_changed(&mut host, CollectionChange::Add { index: 0, count: 4 });
        assert!(panel.needs_measure());
        assert_eq!(panel.realized_range(), ItemRange { start: 4, end: 20 });
        panel.measure(VIEWPORT, &mut host);
        assert_eq!(panel.realized_range(), ItemRange { start: 0, end: 16 });
        assert_eq!(panel.last_report().created, 0);
        assert_eq!(panel.last_report().reused, 4);

        let report = panel.release_all(&mut host);
        assert_eq!(report.recycled, 16);
        assert_eq!(panel.clear_recycle_pool(&mut host), 16);
    }

    #[test]
    fn removed_indices_are_rejected_before_remeasure() {
        let (mut panel, mut host) = measured(grid_options(), 100);
        host.item_count = 40;
        panel.on_items_changed(
            &mut host,
            CollectionChange::Remove {
                index: 40,
                count: 60,
            },
        );
        assert_eq!(
            panel.bring_index_into_view(80),
            Err(PanelError::IndexOutOfRange {
                index: 80,
                count: 40
            })
        );
        assert_eq!(panel.vertical_offset(), 0.0);
        assert!(!panel.is_index_fully_visible(80));

        host.item_count = 45;
        panel.on_items_changed(&mut host, CollectionChange::Add { index: 40, count: 5 });
        assert_eq!(panel.bring_index_into_view(44), Ok(()));
        assert_eq!(panel.vertical_offset(), 550.0);

        panel.on_items_changed(&mut host, CollectionChange::Reset);
        assert_eq!(
            panel.bring_index_into_view(0),
            Err(PanelError::LayoutNotMeasured)
        );
        panel.measure(VIEWPORT, &mut host);
        assert_eq!(panel.row_layout().unwrap().row_count, 12);
    }

    #[test]
    fn zero_height_children_stay_virtualized() {
        let options = PanelOptions::default()
            .with_spacing_mode(SpacingMode::None)
            .with_cache(1.0, CacheUnit::Item);
        let mut host = MockHost::new(100_000);
        host.child_size = Size::new(50.0, 0.0);
        let mut panel = VirtualizingWrapPanel::new(options);
        panel.measure(VIEWPORT, &mut host);

        assert_eq!(panel.extent(), Size::new(200.0, 0.0));
        // The first row plus one cached row.
        assert_eq!(panel.resolved_range(), ItemRange { start: 0, end: 8 });
        assert_eq!(panel.children().len(), 8);
        assert_eq!(host.created, 8);
    }

    #[test]
    fn zero_width_children_get_a_row_each() {
        let options = PanelOptions::default()
            .with_spacing_mode(SpacingMode::None)
            .with_cache(1.0, CacheUnit::Item);
        let mut host = MockHost::new(100_000);
        host.child_size = Size::new(0.0, 50.0);
        let mut panel = VirtualizingWrapPanel::new(options);
        panel.measure(VIEWPORT, &mut host);

        assert_eq!(panel.row_layout().unwrap().items_per_row, 1);
        assert_eq!(panel.resolved_range(), ItemRange { start: 0, end: 4 });
        assert_eq!(host.created, 4);
    }

    #[test]
    fn zero_viewport_realizes_only_the_cache() {
        let mut host = MockHost::new(100);
        let mut panel = VirtualizingWrapPanel::new(grid_options());
        let desired = panel.measure(Size::new(220.0, 0.0), &mut host);
        assert_eq!(desired, Size::new(200.0, 0.0));
        assert_eq!(panel.viewport(), Size::new(220.0, 0.0));
        assert_eq!(panel.resolved_range(), ItemRange { start: 0, end: 8 });

        panel.set_offset(Axis::Y, 500.0).unwrap();
        assert_eq!(panel.vertical_offset(), 500.0);
        panel.measure(Size::new(220.0, 0.0), &mut host);
        assert_eq!(panel.resolved_range(), ItemRange { start: 36, end: 48 });
    }

    #[test]
    fn empty_collection_has_zero_extent() {
        let (panel, host) = measured(PanelOptions::default(), 0);
        assert_eq!(panel.extent(), Size::ZERO);
        assert!(panel.resolved_range().is_empty());
        assert_eq!(host.created, 0);
    }
}
