use ratatui::Terminal;
use ratatui::backend::TestBackend;

use super::render::card_lines;
use super::viewport::Scroll;
use super::*;
use crate::app::{Message, Model, update};
use crate::gallery::{Dimensions, ImageItem, PaginationCoordinator, ScrollTrigger};
use crate::source::{FetchError, PageResult};
use crate::source::memory::sample_items;

fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).unwrap()
}

fn empty_model(size: (u16, u16)) -> Model {
    Model::new(
        PaginationCoordinator::new("mining", 30),
        ScrollTrigger::default(),
        size,
    )
}

fn model_with_page(count: usize, end: bool, size: (u16, u16)) -> Model {
    let mut model = update(empty_model(size), Message::LoadMoreVisible);
    let ticket = model.take_pending_fetch().unwrap();
    update(
        model,
        Message::PageLoaded(ticket, Ok(PageResult::new(sample_items(1, count), end))),
    )
}

fn rendered_text(model: &Model, width: u16, height: u16) -> String {
    let mut terminal = create_test_terminal(width, height);
    terminal.draw(|frame| render(model, frame)).unwrap();
    let buffer = terminal.backend().buffer();
    buffer.content().iter().map(|c| c.symbol()).collect()
}

fn row_text(terminal: &Terminal<TestBackend>, row: u16) -> String {
    let buffer = terminal.backend().buffer();
    (0..buffer.area.width)
        .map(|col| buffer[(col, row)].symbol())
        .collect()
}

#[test]
fn test_empty_gallery_lists_collections() {
    let model = empty_model((80, 24));
    let content = rendered_text(&model, 80, 24);
    assert!(content.contains("Collections"));
    assert!(content.contains("Mining"));
    assert!(content.contains("Portraits"));
    assert!(content.contains("/ to search"));
}

#[test]
fn test_cards_show_captions() {
    let model = model_with_page(4, false, (80, 24));
    let content = rendered_text(&model, 80, 24);
    assert!(content.contains("Sample photo 1"));
    assert!(content.contains("Sample photo 2"));
}

#[test]
fn test_status_bar_on_last_row() {
    let model = model_with_page(4, false, (80, 24));
    let mut terminal = create_test_terminal(80, 24);
    terminal.draw(|frame| render(&model, frame)).unwrap();
    let status = row_text(&terminal, 23);
    assert!(status.contains("mining"));
    assert!(status.contains("4 images"));
    assert!(status.contains("page 2"));
    assert!(status.contains("2 cols"));
}

#[test]
fn test_status_line_reports_state() {
    let model = model_with_page(4, true, (80, 24));
    assert_eq!(state_label(&model), "end of results");
    let line = status_line(&model);
    assert!(line.starts_with(" mining  [0%]  4 images"));
    assert!(line.ends_with("?:help"));

    let model = update(empty_model((80, 24)), Message::LoadMoreVisible);
    assert_eq!(state_label(&model), "loading…");
}

#[test]
fn test_failure_label_outlives_backoff() {
    let mut model = update(empty_model((80, 24)), Message::LoadMoreVisible);
    let ticket = model.take_pending_fetch().unwrap();
    let mut model = update(
        model,
        Message::PageLoaded(ticket, Err(FetchError::Transient("timeout".to_string()))),
    );
    assert_eq!(state_label(&model), "error: retrying");

    let elapsed = model.session.retry_at().unwrap();
    assert!(model.session.expire_backoff(elapsed));
    assert_eq!(state_label(&model), "error: retrying");
}

#[test]
fn test_sentinel_marks_end_of_results() {
    let mut model = model_with_page(4, true, (80, 24));
    model.viewport.scroll(Scroll::Bottom);
    let content = rendered_text(&model, 80, 24);
    assert!(content.contains("No more images to load"));
}

#[test]
fn test_sentinel_shows_loading() {
    let mut model = model_with_page(4, false, (80, 24));
    model.viewport.scroll(Scroll::Bottom);
    let model = update(model, Message::LoadMoreVisible);
    let content = rendered_text(&model, 80, 24);
    assert!(content.contains("Loading more images..."));
}

#[test]
fn test_toast_renders_above_status_bar() {
    let model = update(
        empty_model((80, 24)),
        Message::QuerySelected("ships".to_string()),
    );
    let mut terminal = create_test_terminal(80, 24);
    terminal.draw(|frame| render(&model, frame)).unwrap();
    assert!(row_text(&terminal, 22).contains("[info] Searching \"ships\""));
    assert!(row_text(&terminal, 23).contains("ships"));
}

#[test]
fn test_query_prompt_renders() {
    let mut model = empty_model((80, 24));
    model.query_input = Some("boats".to_string());
    let mut terminal = create_test_terminal(80, 24);
    terminal.draw(|frame| render(&model, frame)).unwrap();
    assert!(row_text(&terminal, 22).starts_with("/boats"));
}

#[test]
fn test_preview_overlay_shows_details() {
    let model = model_with_page(4, false, (80, 24));
    let model = update(model, Message::SelectCard(0, 0));
    let model = update(model, Message::OpenPreview);
    let content = rendered_text(&model, 80, 24);
    assert!(content.contains("https://images.test/photos/1.jpeg"));
    assert!(content.contains("1067 x 1600"));
    assert!(content.contains("Esc close"));
}

#[test]
fn test_help_overlay_lists_keys() {
    let mut model = empty_model((100, 40));
    model.help_visible = true;
    let content = rendered_text(&model, 100, 40);
    assert!(content.contains("Help"));
    assert!(content.contains("New search"));
    assert!(content.contains("Retry / load more now"));
}

fn credited_item() -> ImageItem {
    ImageItem::new(7_u64, "https://images.test/7.jpeg")
        .with_alt("Open pit at dusk")
        .with_dimensions(Dimensions::new(1920, 1080))
        .with_photographer(Some("R. Vale".to_string()), None)
}

#[test]
fn test_card_lines_place_caption_and_details() {
    let slot = CardSlot { top: 10, height: 6 };
    let lines = card_lines(&credited_item(), slot, 0..100, 30);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0].to_string(), "Open pit at dusk");
    assert_eq!(lines[1].to_string(), "");
    assert_eq!(lines[3].to_string(), "1920x1080 · R. Vale");
}

#[test]
fn test_card_lines_single_row_keeps_caption() {
    let item = ImageItem::new(8_u64, "u").with_alt("Headframe");
    let lines = card_lines(&item, CardSlot { top: 0, height: 3 }, 0..10, 30);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].to_string(), "Headframe");
    assert!(card_lines(&item, CardSlot { top: 0, height: 2 }, 0..10, 30).is_empty());
}

#[test]
fn test_card_lines_cover_only_shown_rows() {
    let item = credited_item();
    let slot = CardSlot {
        top: 0,
        height: 2_000_002,
    };

    let head = card_lines(&item, slot, 0..20, 30);
    assert_eq!(head.len(), 19);
    assert_eq!(head[0].to_string(), "Open pit at dusk");

    let middle = card_lines(&item, slot, 999_990..1_000_010, 30);
    assert_eq!(middle.len(), 20);
    assert!(middle.iter().all(|line| line.to_string().is_empty()));

    let tail = card_lines(&item, slot, 1_999_990..2_000_010, 30);
    assert_eq!(tail.len(), 11);
    assert_eq!(tail[10].to_string(), "1920x1080 · R. Vale");

    assert!(card_lines(&item, slot, 2_000_001..2_000_020, 30).is_empty());
}

#[test]
fn test_very_tall_card_renders_both_ends() {
    let needle = ImageItem::new(1_u64, "https://images.test/1.jpeg")
        .with_alt("Drill core")
        .with_dimensions(Dimensions::new(1, 100_000));
    let mut model = update(empty_model((80, 24)), Message::LoadMoreVisible);
    let ticket = model.take_pending_fetch().unwrap();
    let mut model = update(
        model,
        Message::PageLoaded(ticket, Ok(PageResult::new(vec![needle], true))),
    );
    assert!(model.viewport.total_lines() > 100_000);

    assert!(rendered_text(&model, 80, 24).contains("Drill core"));
    model.viewport.scroll(Scroll::Bottom);
    assert!(rendered_text(&model, 80, 24).contains("1x100000"));
}

#[test]
fn test_truncate_to_width() {
    assert_eq!(truncate_to_width("hello", 10), "hello");
    assert_eq!(truncate_to_width("hello world", 5), "hell…");
    assert_eq!(truncate_to_width("hello", 0), "");
    assert_eq!(truncate_to_width("日本語", 4), "日…");
}
