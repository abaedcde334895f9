//! Card colors and bar styles.
//!
//! Cards are painted with the image's average color when the source
//! provides one, with text picked for contrast against it.

use ratatui::style::{Color, Modifier, Style};

use crate::app::ToastLevel;
use crate::gallery::ImageItem;

/// Fill used when an image has no usable average color.
pub const PLACEHOLDER_FILL: Color = Color::Indexed(236);

/// Parse `#rrggbb` (the leading `#` is optional).
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Whether an RGB color reads as light (dark text goes on top).
pub fn is_light(r: u8, g: u8, b: u8) -> bool {
    let luma = (0.2126 * f32::from(r)) + (0.7152 * f32::from(g)) + (0.0722 * f32::from(b));
    luma >= 140.0
}

/// Background fill and foreground for a card.
pub fn card_colors(item: &ImageItem) -> (Color, Color) {
    match item.avg_color().and_then(parse_hex_color) {
        Some(Color::Rgb(r, g, b)) => {
            let fg = if is_light(r, g, b) {
                Color::Black
            } else {
                Color::White
            };
            (Color::Rgb(r, g, b), fg)
        }
        _ => (PLACEHOLDER_FILL, Color::White),
    }
}

pub fn card_border_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Indexed(245))
    }
}

pub fn sentinel_style() -> Style {
    Style::default()
        .fg(Color::Indexed(245))
        .add_modifier(Modifier::ITALIC)
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

pub fn prompt_bar_style() -> Style {
    Style::default().bg(Color::Blue).fg(Color::White)
}

pub fn toast_style(level: ToastLevel) -> (&'static str, Style) {
    match level {
        ToastLevel::Info => ("[info]", status_bar_style()),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#7E6A5C"), Some(Color::Rgb(0x7e, 0x6a, 0x5c)));
        assert_eq!(parse_hex_color("ffffff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
    }

    #[test]
    fn test_card_colors_pick_contrasting_text() {
        let light = ImageItem::new(1_u64, "u").with_avg_color(Some("#F0F0E8".into()));
        let dark = ImageItem::new(2_u64, "u").with_avg_color(Some("#202428".into()));
        let plain = ImageItem::new(3_u64, "u");
        assert_eq!(card_colors(&light).1, Color::Black);
        assert_eq!(card_colors(&dark).1, Color::White);
        assert_eq!(card_colors(&plain), (PLACEHOLDER_FILL, Color::White));
    }
}
