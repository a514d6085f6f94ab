//! Accent color parsing and the fixed palette used by the layouts.

use image::Rgb;
use regex::Regex;
use std::sync::OnceLock;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Teal used by the 1200×630 layout.
pub const OG_DEFAULT_ACCENT: Rgb<u8> = Rgb([0, 148, 143]);
/// Muted red used by the compact layout.
pub const COMPACT_DEFAULT_ACCENT: Rgb<u8> = Rgb([212, 165, 165]);

/// `0xRRGGBB` to a color.
pub const fn hex(rgb: u32) -> Rgb<u8> {
    Rgb([(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8])
}

/// Each channel reduced by `amount`, floored at zero.
pub fn darker(color: Rgb<u8>, amount: u8) -> Rgb<u8> {
    let Rgb([r, g, b]) = color;
    Rgb([
        r.saturating_sub(amount),
        g.saturating_sub(amount),
        b.saturating_sub(amount),
    ])
}

fn rgb_function() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*,\s*(\d+)\s*,\s*(\d+)").ok())
        .as_ref()
}

/// Parse `#RRGGBB`, `rgb(r, g, b)`, or `r,g,b`.
///
/// ```
/// use linkpreview_render::color::parse_color;
/// use image::Rgb;
///
/// assert_eq!(parse_color("#00948F"), Some(Rgb([0, 148, 143])));
/// assert_eq!(parse_color("rgb(212, 165, 165)"), Some(Rgb([212, 165, 165])));
/// assert_eq!(parse_color("10, 20, 30"), Some(Rgb([10, 20, 30])));
/// assert_eq!(parse_color("teal"), None);
/// ```
pub fn parse_color(input: &str) -> Option<Rgb<u8>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(hex_digits) = s.strip_prefix('#') {
        if hex_digits.len() == 6 && hex_digits.chars().all(|c| c.is_ascii_hexdigit()) {
            let value = u32::from_str_radix(hex_digits, 16).ok()?;
            return Some(hex(value));
        }
        return None;
    }

    if s.starts_with("rgb") {
        let caps = rgb_function()?.captures(s)?;
        let channel = |i: usize| caps.get(i)?.as_str().parse::<u8>().ok();
        return Some(Rgb([channel(1)?, channel(2)?, channel(3)?]));
    }

    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() == 3 {
        let mut out = [0u8; 3];
        for (slot, part) in out.iter_mut().zip(&parts) {
            *slot = part.trim().parse().ok()?;
        }
        return Some(Rgb(out));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_hex_and_out_of_range_channels() {
        assert_eq!(parse_color("#0f0"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
        assert_eq!(parse_color("300,0,0"), None);
        assert_eq!(parse_color("1,2"), None);
        assert_eq!(parse_color(""), None);
    }

    #[test]
    fn rgb_function_tolerates_spacing() {
        assert_eq!(parse_color("rgb(1,2,3)"), Some(Rgb([1, 2, 3])));
        assert_eq!(parse_color("  rgb( 1 , 2 , 3 ) "), Some(Rgb([1, 2, 3])));
    }

    #[test]
    fn darker_saturates() {
        assert_eq!(darker(Rgb([0, 148, 20]), 30), Rgb([0, 118, 0]));
    }

    #[test]
    fn hex_splits_channels() {
        assert_eq!(hex(0xd4a5a5), Rgb([212, 165, 165]));
    }
}
