use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::app::Model;
use crate::gallery::{COLLECTIONS, ImageItem};

use super::{render::truncate_to_width, style};

/// Full-area detail view of one image.
pub fn render_preview_overlay(item: &ImageItem, frame: &mut Frame, area: Rect) {
    let popup = centered_popup_rect(
        area.width.saturating_sub(4),
        area.height.saturating_sub(2),
        area,
    );
    let title = truncate_to_width(item.caption(), popup.width.saturating_sub(4) as usize);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let details = detail_lines(item);
    #[allow(clippy::cast_possible_truncation)]
    let details_height = (details.len() as u16 + 1).min(inner.height);
    let swatch_height = inner.height.saturating_sub(details_height);

    // Swatch sized to the image's shape inside the space left above the details.
    if swatch_height > 0 {
        let (fill, _) = style::card_colors(item);
        let max_w = f64::from(inner.width);
        let max_h = f64::from(swatch_height);
        let aspect = item.aspect_ratio();
        // Cells are twice as tall as wide
        let mut w = max_w;
        let mut h = w * aspect / 2.0;
        if h > max_h {
            h = max_h;
            w = h * 2.0 / aspect;
        }
        // Clamped to the inner area above
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (w, h) = (w.round().max(1.0) as u16, h.round().max(1.0) as u16);
        let w = w.min(inner.width);
        let h = h.min(swatch_height);
        let swatch = Rect::new(
            inner.x + (inner.width - w) / 2,
            inner.y + (swatch_height - h) / 2,
            w,
            h,
        );
        frame.render_widget(Block::default().style(Style::default().bg(fill)), swatch);
    }

    let details_area = Rect::new(
        inner.x,
        inner.y + swatch_height,
        inner.width,
        details_height,
    );
    frame.render_widget(
        Paragraph::new(details).wrap(Wrap { trim: false }),
        details_area,
    );
}

fn detail_lines(item: &ImageItem) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Yellow);
    let dim = Style::default().fg(Color::Indexed(245));
    let field = |name: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{name:<13}"), label),
            Span::raw(value),
        ])
    };

    let mut lines = Vec::new();
    if !item.alt().is_empty() {
        lines.push(field("Description", item.alt().to_string()));
    }
    if let Some(name) = item.photographer() {
        let credit = match item.photographer_url() {
            Some(url) => format!("{name} ({url})"),
            None => name.to_string(),
        };
        lines.push(field("Photographer", credit));
    }
    let size = item.dimensions().map_or_else(
        || "unknown (shown square)".to_string(),
        |d| format!("{} x {}", d.width(), d.height()),
    );
    lines.push(field("Size", size));
    lines.push(field("Image", item.url().to_string()));
    if let Some(page) = item.page_url() {
        lines.push(field("Page", page.to_string()));
    }
    lines.push(Line::styled(
        "o open  y copy URL  h/l/n/p move  Esc close",
        dim,
    ));
    lines
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::styled("Navigation", section_style));
    lines.push(Line::raw("  j/k or Up/Down      Scroll"));
    lines.push(Line::raw("  Space/PageDown      Page down"));
    lines.push(Line::raw("  b/PageUp            Page up"));
    lines.push(Line::raw("  Ctrl-d / Ctrl-u     Half page"));
    lines.push(Line::raw("  g / G               Top / bottom"));
    lines.push(Line::raw("  Mouse wheel         Scroll"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Selection", section_style));
    lines.push(Line::raw("  h/l, Left/Right     Previous / next column"));
    lines.push(Line::raw("  Tab / Shift-Tab     Next / previous column"));
    lines.push(Line::raw("  n / p               Next / previous in column"));
    lines.push(Line::raw("  Enter, click        Preview"));
    lines.push(Line::raw("  o                   Open image page in browser"));
    lines.push(Line::raw("  y                   Copy image URL"));
    lines.push(Line::raw("  Esc                 Close preview / clear"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Gallery", section_style));
    lines.push(Line::raw("  /                   New search"));
    for (idx, collection) in COLLECTIONS.iter().enumerate() {
        lines.push(Line::raw(format!(
            "  {}                   {}",
            idx + 1,
            collection.title
        )));
    }
    lines.push(Line::raw("  r                   Retry / load more now"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Other", section_style));
    lines.push(Line::raw("  q / Ctrl-c          Quit"));
    lines.push(Line::raw("  ? / F1              Toggle help"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Config", section_style));
    lines.push(Line::raw(format!("  Global: {global_cfg}")));
    lines.push(Line::raw(format!("  Local override: {local_cfg}")));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
