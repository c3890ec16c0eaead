//! Hex color parsing for effect configuration.
//!
//! Effect colors arrive as CSS-style hex strings and are used as
//! normalized RGB triples. Invalid input falls back to the brand default
//! rather than failing the component.

use glam::Vec3;

/// Fallback color used when a hex string does not parse: soft cyan.
pub const DEFAULT_COLOR: Vec3 = Vec3::new(0.66, 0.94, 1.0);

/// Parse a `#RRGGBB` hex string into a normalized RGB triple.
///
/// The leading `#` is optional. Returns `None` for anything that is not
/// exactly six hex digits.
pub fn parse_hex(hex: &str) -> Option<Vec3> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map(|v| v as f32 / 255.0)
    };

    Some(Vec3::new(
        channel(0..2).ok()?,
        channel(2..4).ok()?,
        channel(4..6).ok()?,
    ))
}

/// Parse a hex string, falling back to [`DEFAULT_COLOR`] on invalid input.
pub fn hex_to_rgb(hex: &str) -> Vec3 {
    parse_hex(hex).unwrap_or(DEFAULT_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brand_color() {
        let rgb = hex_to_rgb("#A8F0FF");
        assert!((rgb.x - 0.659).abs() < 0.004);
        assert!((rgb.y - 0.941).abs() < 0.004);
        assert!((rgb.z - 1.0).abs() < 0.004);
    }

    #[test]
    fn test_without_hash() {
        assert_eq!(parse_hex("FF9FFC"), parse_hex("#FF9FFC"));
        assert!(parse_hex("FF9FFC").is_some());
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(parse_hex("#a8f0ff"), parse_hex("#A8F0FF"));
    }

    #[test]
    fn test_invalid_falls_back() {
        assert_eq!(hex_to_rgb(""), DEFAULT_COLOR);
        assert_eq!(hex_to_rgb("#FFF"), DEFAULT_COLOR);
        assert_eq!(hex_to_rgb("#GGGGGG"), DEFAULT_COLOR);
        assert_eq!(hex_to_rgb("#A8F0FF00"), DEFAULT_COLOR);
        assert_eq!(hex_to_rgb("not a color"), DEFAULT_COLOR);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(parse_hex("#000000"), Some(Vec3::ZERO));
        assert_eq!(parse_hex("#FFFFFF"), Some(Vec3::ONE));
    }
}
