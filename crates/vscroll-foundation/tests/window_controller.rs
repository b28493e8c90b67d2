use vscroll_foundation::prelude::*;
use vscroll_foundation::{Align, PassOutcome, ScrollAlign};
use vscroll_layout::{LayoutError, LoadState, NodeId, Point, Size};

const ROW: ViewType = ViewType::new("row");
const HEADER: ViewType = ViewType::new("header");
const PHOTO: ViewType = ViewType::new("photo");

type Controller = WindowController<usize, ScrollState>;

fn controller() -> Controller {
    let mut controller = WindowController::new(WindowConfig::default());
    controller.register_view_type(ROW);
    controller.attach_surface(ScrollState::new(Size::new(200.0, 200.0)));
    controller
}

fn list(count: usize, row_height: f32) -> (Controller, Vec<NodeId>) {
    let mut controller = controller();
    let tree = controller.tree_mut();
    let root = tree.new_container(usize::MAX, ListLayout::vertical(0.0));
    let items = (0..count)
        .map(|i| {
            let item = tree.new_item(i);
            tree.set_sizing(item, Sizing::fixed_height(row_height)).unwrap();
            tree.set_view_type(item, ROW).unwrap();
            tree.append(root, item).unwrap();
            item
        })
        .collect();
    controller.set_root(Some(root));
    (controller, items)
}

fn scroll(controller: &mut Controller, y: f32) {
    controller.scroll_to(Point::new(0.0, y));
}

fn top_on_screen(controller: &Controller, item: NodeId) -> f32 {
    let top = controller.tree().node(item).unwrap().top();
    top - controller.surface().unwrap().scroll_position().y
}

#[test]
fn first_pass_materializes_the_preloaded_window() {
    let (mut controller, items) = list(100, 50.0);
    let report = controller.refresh().unwrap();

    assert_eq!(report.outcome, PassOutcome::Completed);
    // Idle: one page on each side of [0, 200], edges inclusive.
    assert_eq!(report.window.map(|w| (w.top, w.bottom)), Some((-200.0, 400.0)));
    assert_eq!(controller.view(ROW).unwrap().items(), &items[..=8]);
    assert_eq!(controller.content_size(), Size::new(200.0, 5000.0));
    assert_eq!(
        controller.surface().unwrap().content_size(),
        Size::new(200.0, 5000.0)
    );

    assert_eq!(controller.refresh().unwrap().outcome, PassOutcome::Skipped);
}

#[test]
fn scrolling_translates_without_repacking() {
    let (mut controller, items) = list(100, 50.0);
    controller.refresh().unwrap();
    let packs = controller.tree().stats().packs;

    for step in 1..=40 {
        scroll(&mut controller, step as f32 * 37.0);
        controller.refresh().unwrap();
    }
    assert_eq!(controller.tree().stats().packs, packs);

    let visible = controller.view(ROW).unwrap().items();
    let y = controller.surface().unwrap().scroll_position().y;
    assert!(visible.contains(&items[(y / 50.0) as usize]));
}

#[test]
fn unconfigured_controllers_render_nothing() {
    let mut controller: Controller = WindowController::new(WindowConfig::default());
    assert_eq!(controller.refresh().unwrap().outcome, PassOutcome::Unconfigured);

    let (mut controller, _) = list(10, 50.0);
    controller.detach_surface();
    assert_eq!(controller.refresh().unwrap().outcome, PassOutcome::NoViewport);

    controller.attach_surface(ScrollState::new(Size::new(200.0, 0.0)));
    assert_eq!(controller.refresh().unwrap().outcome, PassOutcome::NoViewport);
    assert!(controller.items().is_empty());
}

#[test]
fn resized_item_above_keeps_the_anchor_in_place() {
    let (mut controller, items) = list(100, 50.0);
    controller.refresh().unwrap();
    scroll(&mut controller, 1010.0);
    controller.refresh().unwrap();
    assert_eq!(top_on_screen(&controller, items[21]), 40.0);

    controller
        .tree_mut()
        .set_sizing(items[5], Sizing::fixed_height(100.0))
        .unwrap();
    let report = controller.refresh().unwrap();

    assert!(report.retried);
    assert_eq!(controller.tree().node(items[21]).unwrap().top(), 1100.0);
    assert_eq!(top_on_screen(&controller, items[21]), 40.0);
}

#[test]
fn removed_anchor_hands_over_to_the_next_item() {
    let (mut controller, items) = list(100, 50.0);
    controller.refresh().unwrap();
    scroll(&mut controller, 1000.0);
    controller.refresh().unwrap();
    assert_eq!(top_on_screen(&controller, items[21]), 50.0);

    controller.tree_mut().remove(items[20]);
    controller.refresh().unwrap();
    assert_eq!(top_on_screen(&controller, items[21]), 50.0);
}

#[test]
fn unresolved_bookmark_is_dropped_silently() {
    let (mut controller, _) = list(100, 50.0);
    controller.refresh().unwrap();
    scroll(&mut controller, 1000.0);
    controller.refresh().unwrap();

    let report = controller
        .refresh_with_bookmark(Bookmark::for_data(12_345))
        .unwrap();
    assert_eq!(report.outcome, PassOutcome::Completed);
    assert!(!report.retried);
    assert_eq!(controller.surface().unwrap().scroll_position().y, 1000.0);
}

#[test]
fn centered_bookmark_scrolls_item_to_the_middle() {
    let (mut controller, items) = list(100, 50.0);
    controller.refresh().unwrap();

    let report = controller.refresh_with_bookmark(Bookmark::centered(40)).unwrap();
    assert!(report.retried);
    // 2000 - (200 - 50) / 2
    assert_eq!(controller.surface().unwrap().scroll_position().y, 1925.0);
    assert!(controller.view(ROW).unwrap().items().contains(&items[40]));
}

#[test]
fn sticky_headers_stack_through_the_controller() {
    let mut controller = controller();
    controller.register_view_type(HEADER);
    let tree = controller.tree_mut();
    let root = tree.new_container(0, ListLayout::vertical(0.0));
    let mut headers = Vec::new();
    for section in 0..3 {
        let header = tree.new_sticky(100 + section);
        tree.set_sizing(header, Sizing::fixed_height(50.0)).unwrap();
        tree.set_view_type(header, HEADER).unwrap();
        tree.append(root, header).unwrap();
        headers.push(header);
        for row in 0..5 {
            let item = tree.new_item(1000 + section * 10 + row);
            tree.set_sizing(item, Sizing::fixed_height(50.0)).unwrap();
            tree.set_view_type(item, ROW).unwrap();
            tree.append(root, item).unwrap();
        }
    }
    controller.set_root(Some(root));
    controller.refresh().unwrap();

    let origin = |controller: &Controller, header: NodeId| {
        controller.placement(header).unwrap().display_origin().y
    };

    scroll(&mut controller, 250.0);
    controller.refresh().unwrap();
    assert_eq!(origin(&controller, headers[0]), 250.0);
    assert_eq!(origin(&controller, headers[1]), 300.0);
    assert!(controller.placement(headers[0]).unwrap().fixed);
    assert!(!controller.placement(headers[1]).unwrap().fixed);
    assert_eq!(controller.sticky_containers(), &[root]);

    // Same window: the pass is skipped but headers still follow the scroll.
    scroll(&mut controller, 301.0);
    assert_eq!(controller.refresh().unwrap().outcome, PassOutcome::Skipped);
    assert_eq!(origin(&controller, headers[1]), 301.0);
    assert_eq!(origin(&controller, headers[0]), 250.0);

    let placements = controller.placements(HEADER);
    assert!(placements.iter().any(|p| p.id == headers[1] && p.fixed));
}

#[test]
fn lazy_loads_are_requested_and_cancelled() {
    let mut controller = controller();
    let tree = controller.tree_mut();
    let root = tree.new_container(usize::MAX, ListLayout::vertical(0.0));
    let placeholders: Vec<NodeId> = (0..100)
        .map(|i| {
            let item = tree.new_placeholder(i, Sizing::fixed_height(50.0));
            tree.set_view_type(item, ROW).unwrap();
            tree.append(root, item).unwrap();
            item
        })
        .collect();
    controller.set_root(Some(root));

    let report = controller.refresh().unwrap();
    assert_eq!(report.load_requests, &placeholders[..=8]);
    assert!(report.cancelled.is_empty());
    assert_eq!(controller.pending().len(), 9);

    scroll(&mut controller, 2000.0);
    let report = controller.refresh().unwrap();
    assert_eq!(report.cancelled, &placeholders[..=8]);
    assert_eq!(
        controller.tree().node(placeholders[0]).unwrap().load_state(),
        Some(LoadState::Idle)
    );
    assert!(report.load_requests.contains(&placeholders[40]));

    // A finished load leaves the pending set on the next pass.
    assert!(controller
        .tree_mut()
        .finish_loading(placeholders[40], Some(Sizing::fixed_height(50.0))));
    controller.refresh().unwrap();
    assert!(!controller.pending().contains(placeholders[40]));
    assert!(controller.pending().contains(placeholders[41]));
}

#[test]
fn failed_pass_keeps_previous_items() {
    let mut controller = controller();
    controller.register_view_type(PHOTO);
    let tree = controller.tree_mut();
    let root = tree.new_container(0, KnuthPlassLayout::vertical(100.0, 0.0));
    let photos: Vec<NodeId> = (0..6)
        .map(|i| {
            let photo = tree.new_item(i + 1);
            tree.set_aspect_ratio(photo, 1.0 + i as f32 * 0.2).unwrap();
            tree.set_view_type(photo, PHOTO).unwrap();
            tree.append(root, photo).unwrap();
            photo
        })
        .collect();
    controller.set_root(Some(root));
    controller.refresh().unwrap();
    let before = controller.view(PHOTO).unwrap().items().to_vec();
    assert!(!before.is_empty());

    controller.tree_mut().set_aspect_ratio(photos[2], -1.0).unwrap();
    let result = controller.refresh();
    assert!(matches!(
        result,
        Err(LayoutError::InvalidAspectRatio { index: 2, .. })
    ));
    assert_eq!(controller.view(PHOTO).unwrap().items(), before.as_slice());
    assert_eq!(controller.window(), None);

    controller.tree_mut().set_aspect_ratio(photos[2], 1.5).unwrap();
    assert_eq!(controller.refresh().unwrap().outcome, PassOutcome::Completed);
}

#[test]
fn recycled_slots_stay_bounded_while_scrolling() {
    let (mut controller, _) = list(200, 50.0);
    controller.refresh().unwrap();

    let mut previous: Vec<(NodeId, usize)> = Vec::new();
    for step in 0..300 {
        scroll(&mut controller, step as f32 * 20.0);
        controller.refresh().unwrap();
        let view = controller.view(ROW).unwrap();
        for (item, slot) in &previous {
            if view.items().contains(item) {
                assert_eq!(view.recycler().slot_of(item), Some(*slot));
            }
        }
        previous = view
            .items()
            .iter()
            .map(|item| (*item, view.recycler().slot_of(item).unwrap()))
            .collect();
    }
    // At most three pages of rows plus the rows touching the window edges.
    assert!(controller.view(ROW).unwrap().recycler().capacity() <= 16);
}

#[test]
fn element_queries_and_navigation() {
    let (mut controller, items) = list(100, 50.0);
    controller.refresh().unwrap();

    assert_eq!(controller.virtual_item(&30), Some(items[30]));
    assert!(controller.scroll_to_element(&30, ScrollAlign::default(), Point::ZERO));
    assert_eq!(controller.surface().unwrap().scroll_position().y, 1500.0);
    assert!(controller.element_in_viewport(&33, 1.0));
    assert_eq!(controller.element_visibility(&34).vertical, 0.0);
    assert!(!controller.element_in_viewport(&2, 0.1));

    let bottom = ScrollAlign {
        vertical: Align::End,
        ..ScrollAlign::default()
    };
    assert!(controller.scroll_to_element(&50, bottom, Point::ZERO));
    assert_eq!(controller.surface().unwrap().scroll_position().y, 2350.0);

    scroll(&mut controller, 2525.0);
    let visibility = controller.element_visibility(&50);
    assert_eq!((visibility.horizontal, visibility.vertical), (1.0, 0.5));

    assert!(!controller.scroll_to_element(&1000, ScrollAlign::default(), Point::ZERO));
}

#[test]
fn layout_tracker_holds_one_anchor_across_passes() {
    let (mut controller, items) = list(100, 50.0);
    controller.refresh().unwrap();
    scroll(&mut controller, 1000.0);
    controller.refresh().unwrap();

    controller.set_layout_tracker(true);
    for (step, above) in [3usize, 4, 6].into_iter().enumerate() {
        controller
            .tree_mut()
            .set_sizing(items[above], Sizing::fixed_height(80.0))
            .unwrap();
        controller.refresh().unwrap();
        assert_eq!(top_on_screen(&controller, items[20]), 0.0);
        assert_eq!(
            controller.surface().unwrap().scroll_position().y,
            1000.0 + 30.0 * (step + 1) as f32
        );
    }
    assert!(controller.tree().node(items[20]).unwrap().is_bookmark());

    controller.set_layout_tracker(false);
    assert!(!controller.tree().node(items[20]).unwrap().is_bookmark());
}
