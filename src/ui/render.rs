use std::ops::Range;

use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::Model;
use crate::gallery::{COLLECTIONS, ImageItem, LoadState};

use super::cards::CardSlot;
use super::{overlays, status, style};

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();

    let prompt_active = model.query_input.is_some();
    let toast_active = model.active_toast().is_some();
    let footer_rows = 1 + u16::from(prompt_active) + u16::from(toast_active);
    let gallery_area = Rect {
        height: area.height.saturating_sub(footer_rows),
        ..area
    };
    let prompt_area = Rect {
        y: area.y + area.height.saturating_sub(1 + u16::from(prompt_active)),
        height: 1,
        ..area
    };
    let toast_area = Rect {
        y: area.y
            + area
                .height
                .saturating_sub(1 + u16::from(prompt_active) + u16::from(toast_active)),
        height: 1,
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };

    frame.render_widget(Clear, gallery_area);
    if model.layout().is_empty() {
        render_empty_gallery(model, frame, gallery_area);
    } else {
        render_gallery(model, frame, gallery_area);
    }

    if toast_active {
        status::render_toast_bar(model, frame, toast_area);
    }
    if prompt_active {
        status::render_query_bar(model, frame, prompt_area);
    }
    status::render_status_bar(model, frame, status_area);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, gallery_area);
    } else if model.preview_visible
        && let Some(item) = model.selected_item()
    {
        overlays::render_preview_overlay(item, frame, gallery_area);
    }
}

fn render_gallery(model: &Model, frame: &mut Frame, area: Rect) {
    let geometry = model.geometry();
    let offset = model.viewport.offset();
    let rows = area.height as usize;
    let selected = model.selected_position();

    for (col_idx, column) in geometry.columns().iter().enumerate() {
        let Some(items) = model.layout().column(col_idx).map(|c| c.items()) else {
            continue;
        };
        for (row_idx, (slot, item)) in column.slots.iter().zip(items).enumerate() {
            if slot.bottom() <= offset {
                continue;
            }
            if slot.top >= offset + rows {
                break;
            }
            let card = VisibleCard {
                slot: *slot,
                x: area.x + column.x,
                width: geometry.column_width(),
                offset,
                rows,
                area_y: area.y,
            };
            render_card(frame, item, &card, selected == Some((col_idx, row_idx)));
        }
    }

    let sentinel = geometry.sentinel_line();
    if sentinel >= offset && sentinel < offset + rows {
        // Within the visible window, so it fits in u16
        #[allow(clippy::cast_possible_truncation)]
        let y = area.y + (sentinel - offset) as u16;
        let line = Line::styled(sentinel_text(model), style::sentinel_style()).centered();
        frame.render_widget(Paragraph::new(line), Rect::new(area.x, y, area.width, 1));
    }
}

/// A card slot mapped onto the visible window.
struct VisibleCard {
    slot: CardSlot,
    x: u16,
    width: u16,
    offset: usize,
    rows: usize,
    area_y: u16,
}

fn render_card(frame: &mut Frame, item: &ImageItem, card: &VisibleCard, selected: bool) {
    let top = card.slot.top;
    let bottom = card.slot.bottom();
    let vis_start = top.max(card.offset);
    let vis_end = bottom.min(card.offset + card.rows);
    if vis_start >= vis_end || card.width < 2 {
        return;
    }

    let mut borders = Borders::LEFT | Borders::RIGHT;
    if vis_start == top {
        borders |= Borders::TOP;
    }
    if vis_end == bottom {
        borders |= Borders::BOTTOM;
    }
    let (fill, fg) = style::card_colors(item);
    let block = Block::default()
        .borders(borders)
        .border_type(if selected {
            BorderType::Thick
        } else {
            BorderType::Rounded
        })
        .border_style(style::card_border_style(selected))
        .style(Style::default().bg(fill).fg(fg));

    let inner_width = card.width.saturating_sub(2) as usize;
    let lines = card_lines(item, card.slot, vis_start..vis_end, inner_width);

    // Both values are bounded by the visible window height
    #[allow(clippy::cast_possible_truncation)]
    let rect = Rect::new(
        card.x,
        card.area_y + (vis_start - card.offset) as u16,
        card.width,
        (vis_end - vis_start) as u16,
    );
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

/// The interior rows of `slot` that fall within `shown`, a range of gallery
/// lines. The caption sits on the first interior row, size and credit on the
/// last; everything between is blank.
pub(super) fn card_lines(
    item: &ImageItem,
    slot: CardSlot,
    shown: Range<usize>,
    width: usize,
) -> Vec<Line<'static>> {
    let first = slot.top + 1;
    let last = slot.bottom().saturating_sub(2);
    let start = shown.start.max(first);
    let end = shown.end.min(last + 1);
    if slot.height < 3 || start >= end {
        return Vec::new();
    }

    let mut lines = vec![Line::raw(""); end - start];
    if (start..end).contains(&first) {
        lines[first - start] = Line::styled(
            truncate_to_width(item.caption(), width),
            Style::default().add_modifier(Modifier::BOLD),
        );
    }
    if last > first && (start..end).contains(&last) {
        let mut detail = item
            .dimensions()
            .map(|d| format!("{}x{}", d.width(), d.height()))
            .unwrap_or_default();
        if let Some(name) = item.photographer() {
            if !detail.is_empty() {
                detail.push_str(" · ");
            }
            detail.push_str(name);
        }
        lines[last - start] = Line::styled(
            truncate_to_width(&detail, width),
            Style::default().add_modifier(Modifier::DIM),
        );
    }
    lines
}

fn sentinel_text(model: &Model) -> String {
    let session = &model.session;
    match session.state() {
        LoadState::Loading => "Loading more images...".to_string(),
        LoadState::Exhausted => "No more images to load".to_string(),
        LoadState::Idle if session.needs_manual_retry() => {
            "Loading failed. Press r to retry".to_string()
        }
        LoadState::Idle if session.last_error().is_some() => "Loading failed. Retrying...".to_string(),
        LoadState::Idle => String::new(),
    }
}

fn render_empty_gallery(model: &Model, frame: &mut Frame, area: Rect) {
    let session = &model.session;
    let headline = match session.state() {
        LoadState::Loading => "Loading images".to_string(),
        LoadState::Exhausted => format!("No images found for \"{}\"", session.query()),
        LoadState::Idle if session.last_error().is_some() => sentinel_text(model),
        LoadState::Idle => String::new(),
    };

    let mut lines = vec![
        Line::styled(headline, style::sentinel_style()).centered(),
        Line::raw(""),
        Line::styled(
            "Collections",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .centered(),
    ];
    for (idx, collection) in COLLECTIONS.iter().enumerate() {
        lines.push(
            Line::from(vec![
                Span::styled(
                    format!("{} ", idx + 1),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    collection.title,
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("  {}", collection.description)),
            ])
            .centered(),
        );
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled("/ to search, ? for help", style::sentinel_style()).centered());

    #[allow(clippy::cast_possible_truncation)]
    let content_height = lines.len() as u16;
    let top = area.y + area.height.saturating_sub(content_height) / 2;
    let rect = Rect::new(
        area.x,
        top,
        area.width,
        content_height.min(area.height),
    );
    frame.render_widget(Paragraph::new(lines), rect);
}

/// Cut `text` to at most `max_width` display cells, ending in `…` when
/// anything was dropped.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}
