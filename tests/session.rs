//! End-to-end gallery sessions driven without a terminal: trigger signals
//! go through `update`, pending tickets are fetched from a scripted source
//! and their results fed back, as the event loop does.

use std::time::Duration;

use mosaic::app::{Message, Model, update};
use mosaic::gallery::{Backoff, LoadState, PaginationCoordinator, ScrollTrigger, WidthClass};
use mosaic::source::memory::sample_items;
use mosaic::source::{FetchError, ImageSource, MemorySource, PageResult};
use mosaic::ui::viewport::Scroll;

fn new_model(session: PaginationCoordinator, size: (u16, u16)) -> Model {
    Model::new(session, ScrollTrigger::default(), size)
}

/// Apply current trigger signals and answer at most one fetch.
/// Returns whether a fetch was made.
fn step(model: Model, source: &dyn ImageSource) -> (Model, bool) {
    let mut model = model;
    while let Some(msg) = model.next_trigger() {
        let relayout = matches!(msg, Message::WidthClassChanged(_));
        model = update(model, msg);
        if !relayout {
            break;
        }
    }
    let Some(ticket) = model.take_pending_fetch() else {
        return (model, false);
    };
    let result = source.fetch_page(ticket.request());
    (update(model, Message::PageLoaded(ticket, result)), true)
}

/// Keep scrolling to the bottom until the feed stops fetching.
fn scroll_until_settled(mut model: Model, source: &dyn ImageSource, max_steps: usize) -> Model {
    for _ in 0..max_steps {
        model.viewport.scroll(Scroll::Bottom);
        let (next, fetched) = step(model, source);
        model = next;
        if !fetched {
            break;
        }
    }
    model
}

#[test]
fn test_scrolling_loads_pages_until_exhausted() {
    let source = MemorySource::new()
        .with_page(sample_items(1, 30))
        .with_page(sample_items(31, 30))
        .with_response(Ok(PageResult::end()));
    let model = new_model(PaginationCoordinator::new("mining", 30), (80, 24));

    let model = scroll_until_settled(model, &source, 10);

    assert_eq!(model.session.state(), LoadState::Exhausted);
    assert_eq!(model.session.accumulated_items().len(), 60);
    assert_eq!(model.layout().item_count(), 60);
    let pages: Vec<u32> = source.requests().iter().map(|r| r.page).collect();
    assert_eq!(pages, vec![1, 2, 3]);
    assert!(source.requests().iter().all(|r| r.query == "mining" && r.per_page == 30));

    // Nothing more is requested once exhausted.
    let model = scroll_until_settled(model, &source, 3);
    assert_eq!(source.request_count(), 3);
    assert_eq!(model.session.accumulated_items().len(), 60);
}

#[test]
fn test_layout_keeps_feed_order_within_columns() {
    let source = MemorySource::new()
        .with_page(sample_items(1, 12))
        .with_page(sample_items(13, 12));
    let model = new_model(PaginationCoordinator::new("mining", 12), (130, 40));
    let model = scroll_until_settled(model, &source, 2);

    assert_eq!(model.layout().column_count(), 3);
    for column in model.layout().columns() {
        let ids: Vec<u64> = column
            .items()
            .iter()
            .map(|item| item.id().as_str().parse().unwrap())
            .collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }
}

#[test]
fn test_overlapping_pages_do_not_duplicate_items() {
    let source = MemorySource::new()
        .with_page(sample_items(1, 10))
        .with_page(sample_items(6, 10))
        .with_response(Ok(PageResult::end()));
    let model = new_model(PaginationCoordinator::new("mining", 10), (80, 24));
    let model = scroll_until_settled(model, &source, 5);

    assert_eq!(model.session.accumulated_items().len(), 15);
    assert_eq!(model.layout().item_count(), 15);
}

#[test]
fn test_query_change_mid_flight_discards_old_page() {
    let source = MemorySource::new()
        .with_page(sample_items(1, 10))
        .with_page(sample_items(100, 4));
    let mut model = new_model(PaginationCoordinator::new("mining", 10), (80, 24));

    model = update(model, Message::LoadMoreVisible);
    let stale = model.take_pending_fetch().unwrap();
    let stale_result = source.fetch_page(stale.request());

    model = update(model, Message::QuerySelected("portraits".to_string()));
    model = update(model, Message::PageLoaded(stale, stale_result));
    assert!(model.session.accumulated_items().is_empty());

    let (model, fetched) = step(model, &source);
    assert!(fetched);
    let last = source.requests().last().cloned().unwrap();
    assert_eq!(last.query, "portraits");
    assert_eq!(last.page, 1);
    assert_eq!(model.session.accumulated_items().len(), 4);
}

#[test]
fn test_transient_failure_recovers_after_backoff() {
    let source = MemorySource::new()
        .with_response(Err(FetchError::Transient("connection reset".to_string())))
        .with_page(sample_items(1, 8));
    let session = PaginationCoordinator::with_backoff(
        "mining",
        8,
        Backoff::new(Duration::ZERO, Duration::ZERO),
    );
    let model = new_model(session, (80, 24));

    let (model, _) = step(model, &source);
    assert_eq!(model.session.state(), LoadState::Idle);
    assert!(model.session.last_error().is_some());
    assert!(model.session.accumulated_items().is_empty());

    let (model, fetched) = step(model, &source);
    assert!(fetched);
    assert_eq!(model.session.accumulated_items().len(), 8);
    assert!(model.session.last_error().is_none());
    let pages: Vec<u32> = source.requests().iter().map(|r| r.page).collect();
    assert_eq!(pages, vec![1, 1]);
}

#[test]
fn test_resize_across_breakpoint_relayouts_without_fetch() {
    let source = MemorySource::new().with_page(sample_items(1, 30));
    let model = new_model(PaginationCoordinator::new("mining", 30), (130, 40));
    let (mut model, fetched) = step(model, &source);
    assert!(fetched);
    assert_eq!(model.width_class(), WidthClass::Desktop);
    assert_eq!(model.layout().column_count(), 3);

    model = update(model, Message::Resize(90, 40));
    let (model, fetched) = step(model, &source);
    assert!(!fetched, "sentinel is far below the fold");
    assert_eq!(model.width_class(), WidthClass::Compact);
    assert_eq!(model.layout().column_count(), 2);
    assert_eq!(model.layout().item_count(), 30);
    assert_eq!(source.request_count(), 1);
}

/// One page of 30 cards in three columns, with a source holding nothing more.
fn desktop_gallery() -> (Model, MemorySource) {
    let source = MemorySource::new().with_page(sample_items(1, 30));
    let model = new_model(PaginationCoordinator::new("mining", 30), (130, 40));
    let (model, _) = step(model, &source);
    (model, source)
}

#[test]
fn test_resize_near_desktop_bottom_judges_sentinel_on_new_layout() {
    let (loaded, _) = desktop_gallery();
    let last_offset = loaded
        .viewport
        .total_lines()
        .saturating_sub(loaded.viewport.height() as usize);

    let mut squeezed_offsets = 0;
    for offset in 0..=last_offset {
        let (mut model, source) = desktop_gallery();
        model.viewport.scroll(Scroll::Down(offset));
        if model.next_trigger().is_some() {
            continue;
        }

        model = update(model, Message::Resize(90, 40));
        // Narrower desktop cards pull the sentinel up until the relayout
        if model.trigger_messages().contains(&Message::LoadMoreVisible) {
            squeezed_offsets += 1;
        }
        let (model, fetched) = step(model, &source);
        assert!(!fetched, "offset {offset} fetched after relayout");
        assert_eq!(source.request_count(), 1);
        assert_eq!(model.layout().column_count(), 2);
        assert_eq!(model.session.state(), LoadState::Idle);
    }
    assert!(squeezed_offsets > 0);
}
