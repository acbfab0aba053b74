use egui::Color32;

use crate::error::{CanvasError, CanvasResult};

const NAMED_COLORS: &[(&str, Color32)] = &[
    ("black", Color32::from_rgb(0x00, 0x00, 0x00)),
    ("silver", Color32::from_rgb(0xc0, 0xc0, 0xc0)),
    ("gray", Color32::from_rgb(0x80, 0x80, 0x80)),
    ("grey", Color32::from_rgb(0x80, 0x80, 0x80)),
    ("white", Color32::from_rgb(0xff, 0xff, 0xff)),
    ("maroon", Color32::from_rgb(0x80, 0x00, 0x00)),
    ("red", Color32::from_rgb(0xff, 0x00, 0x00)),
    ("purple", Color32::from_rgb(0x80, 0x00, 0x80)),
    ("fuchsia", Color32::from_rgb(0xff, 0x00, 0xff)),
    ("green", Color32::from_rgb(0x00, 0x80, 0x00)),
    ("lime", Color32::from_rgb(0x00, 0xff, 0x00)),
    ("olive", Color32::from_rgb(0x80, 0x80, 0x00)),
    ("yellow", Color32::from_rgb(0xff, 0xff, 0x00)),
    ("navy", Color32::from_rgb(0x00, 0x00, 0x80)),
    ("blue", Color32::from_rgb(0x00, 0x00, 0xff)),
    ("teal", Color32::from_rgb(0x00, 0x80, 0x80)),
    ("aqua", Color32::from_rgb(0x00, 0xff, 0xff)),
    ("transparent", Color32::TRANSPARENT),
];

/// Parse a color string as delivered by a color input.
///
/// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` and the basic CSS color
/// names (case-insensitive, surrounding whitespace ignored).
pub fn parse_color(input: &str) -> CanvasResult<Color32> {
    let trimmed = input.trim();
    let invalid = || CanvasError::InvalidColor(input.to_owned());

    if let Some(hex) = trimmed.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(invalid);
    }

    let lower = trimmed.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, color)| *color)
        .ok_or_else(invalid)
}

fn parse_hex(hex: &str) -> Option<Color32> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Color32::from_rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Color32::from_rgba_unmultiplied(
            nibble(0)?,
            nibble(1)?,
            nibble(2)?,
            nibble(3)?,
        )),
        6 => Some(Color32::from_rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color32::from_rgba_unmultiplied(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            byte(6)?,
        )),
        _ => None,
    }
}

/// Format a color as `#rrggbb`, the form color inputs report.
pub fn to_hex(color: Color32) -> String {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    format!("#{r:02x}{g:02x}{b:02x}")
}
