// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scrolling through a photo grid with a virtualizing wrap panel.
//!
//! The panel realizes only the tiles near the viewport and recycles the rest
//! as the simulated user scrolls.
//!
//! Run:
//! - `cargo run -p understory_demos --example wrap_panel_sim`
//! - `RUST_LOG=understory_virtualizing_panel=trace cargo run -p understory_demos --example wrap_panel_sim`

use kurbo::Size;
use tracing::info;
use tracing_subscriber::EnvFilter;
use understory_demos::SimHost;
use understory_virtualizing_panel::{
    CacheUnit, CollectionChange, PanelOptions, ScrollAlign, SpacingMode, VirtualizingWrapPanel,
};

const VIEWPORT: Size = Size::new(640.0, 480.0);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .compact()
        .init();

    let mut host = SimHost::new(10_000, Size::new(120.0, 90.0));
    let options = PanelOptions::default()
        .with_spacing_mode(SpacingMode::Uniform)
        .with_cache(1.0, CacheUnit::Page);
    let mut panel = VirtualizingWrapPanel::new(options);
    panel.set_scroll_owner(|| info!("scroll bar needs refresh"));

    layout(&mut panel, &mut host);

    for _ in 0..3 {
        panel.page_down().expect("page scroll");
        layout(&mut panel, &mut host);
    }

    panel
        .scroll_index_into_view(7_500, ScrollAlign::Center)
        .expect("index is in range");
    layout(&mut panel, &mut host);

    host.items.insert(0, "photo-new".to_owned());
    panel.on_items_changed(&mut host, CollectionChange::Add { index: 0, count: 1 });
    layout(&mut panel, &mut host);

    let pooled = panel.pooled_containers();
    let destroyed = panel.clear_recycle_pool(&mut host);
    info!(pooled, destroyed, created = host.created, "done");
}

fn layout(panel: &mut VirtualizingWrapPanel<understory_demos::Tile>, host: &mut SimHost) {
    panel.measure(VIEWPORT, host);
    panel.arrange(VIEWPORT, host);
    let visible = panel.visible_range();
    let first = panel.children().first().map(|child| child.container.clone());
    info!(
        offset = panel.vertical_offset(),
        extent = panel.extent().height,
        visible_start = visible.start,
        visible_end = visible.end,
        realized = panel.children().len(),
        visual = host.visual.len(),
        first_label = ?first.and_then(|tile| tile.item),
        "layout pass"
    );
}
