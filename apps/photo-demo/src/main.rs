//! Headless photo gallery driven through the window controller.
//!
//! A hundred lazily loaded groups, each a sticky header over a justified
//! block of photos, are scrolled through by a scripted gesture. Every pass
//! is logged together with loader and recycler activity.

mod loader;
mod model;

use anyhow::Context;
use vscroll_foundation::prelude::*;
use vscroll_foundation::{Align, PassOutcome, ScrollAlign};
use vscroll_layout::{Point, Size};

use loader::Loader;
use model::{Entry, Model, HEADER_VIEW, PHOTO_VIEW, PLACEHOLDER_VIEW};

type Gallery = WindowController<Entry, ScrollState>;

const SEED: u64 = 0x5eed;
const LOAD_LATENCY: u64 = 3;
const SCROLL_STEP: f32 = 90.0;
const SCROLL_TICKS: u64 = 120;

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let model = Model::generate(SEED);
    log::info!(
        "Generated {} photos in {} groups",
        model.photo_count(),
        model.groups.len()
    );

    let mut gallery: Gallery = WindowController::new(WindowConfig::default());
    for view_type in [HEADER_VIEW, PHOTO_VIEW, PLACEHOLDER_VIEW] {
        gallery.register_view_type(view_type);
    }
    let root = model
        .build_tree(gallery.tree_mut())
        .context("building gallery tree")?;
    gallery.set_root(Some(root));
    gallery.attach_surface(ScrollState::new(Size::new(1200.0, 800.0)));

    let mut loader = Loader::new(LOAD_LATENCY);
    let mut now = 0;

    for _ in 0..SCROLL_TICKS {
        now += 1;
        if let Some(surface) = gallery.surface_mut() {
            surface.scroll_by(0.0, SCROLL_STEP);
        }
        tick(&mut gallery, &model, &mut loader, now)?;
    }

    // Let the last requests land while idle.
    for _ in 0..=LOAD_LATENCY {
        now += 1;
        if let Some(surface) = gallery.surface_mut() {
            surface.settle();
        }
        tick(&mut gallery, &model, &mut loader, now)?;
    }

    let target = Entry::Photo(1234);
    if gallery.scroll_to_element(&target, ScrollAlign::default(), Point::ZERO) {
        tick(&mut gallery, &model, &mut loader, now)?;
        log::info!(
            "Jumped to {}, visible: {}",
            model.label(&target),
            gallery.element_in_viewport(&target, 0.5)
        );
    } else {
        log::info!("{} is not loaded yet", model.label(&target));
    }

    // A resize under the tracker keeps the top item anchored.
    gallery.set_layout_tracker(true);
    if let Some(surface) = gallery.surface_mut() {
        surface.set_inner_size(Size::new(900.0, 800.0));
    }
    gallery.tree_mut().set_needs_layout(root);
    tick(&mut gallery, &model, &mut loader, now)?;
    gallery.set_layout_tracker(false);

    // Last photo of group 24, flush with the bottom edge.
    let last = Entry::Photo(1249);
    let align = ScrollAlign {
        horizontal: Align::Start,
        vertical: Align::End,
    };
    if gallery.scroll_to_element(&last, align, Point::ZERO) {
        tick(&mut gallery, &model, &mut loader, now)?;
        let visibility = gallery.element_visibility(&last);
        log::info!("{} visibility: {:?}", model.label(&last), visibility);
    }

    let stats = gallery.recycler_stats();
    let layout = gallery.tree().stats();
    log::info!(
        "Done: {} groups loaded, {} cancelled, {} slots created, {} rebinds, {} packs, {} repositions",
        loader.completed(),
        loader.cancelled(),
        stats.slots_created,
        stats.rebinds,
        layout.packs,
        layout.repositions
    );
    Ok(())
}

/// Delivers due loads, runs one pass and forwards its requests to the loader.
fn tick(gallery: &mut Gallery, model: &Model, loader: &mut Loader, now: u64) -> anyhow::Result<()> {
    let landed = loader
        .poll(model, gallery.tree_mut(), now)
        .context("delivering loaded groups")?;
    let report = gallery
        .refresh()
        .with_context(|| format!("window pass at tick {now}"))?;

    for placeholder in &report.cancelled {
        loader.cancel(*placeholder);
    }
    for placeholder in &report.load_requests {
        loader.request(gallery.tree(), *placeholder, now);
    }

    if report.outcome == PassOutcome::Completed {
        let position = gallery
            .surface()
            .map(|surface| surface.scroll_position())
            .unwrap_or_default();
        log::debug!(
            "tick {now}: y={:.0} items={} photos={} landed={landed} requested={} cancelled={} in-flight={}{}",
            position.y,
            report.collected,
            gallery.view(PHOTO_VIEW).map_or(0, |view| view.items().len()),
            report.load_requests.len(),
            report.cancelled.len(),
            loader.in_flight(),
            if report.retried { " (anchored)" } else { "" },
        );
        for placement in gallery.placements(HEADER_VIEW) {
            if placement.fixed {
                if let Some(node) = gallery.tree().get(placement.id) {
                    log::trace!("pinned {} at {:?}", model.label(node.data()), placement.display_origin());
                }
            }
        }
    }
    Ok(())
}
