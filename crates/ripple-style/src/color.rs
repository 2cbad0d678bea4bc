//! Wave color derivation and classification.
//!
//! The click effect borrows the host's own border (or background) color.
//! Colors that would be invisible or look like a neutral outline (white,
//! greys, anything transparent) are rejected so the effect falls back to
//! its stylesheet default.
//!
//! Classification works on the computed-style *text*, exactly as the host
//! environment reports it; no color arithmetic is involved.

use std::sync::OnceLock;

use regex::Regex;

use crate::{Error, Result};

/// Computed-style property consulted first for the wave color.
pub const BORDER_TOP_COLOR: &str = "border-top-color";
/// Shorthand border color, consulted when the top border reports nothing.
pub const BORDER_COLOR: &str = "border-color";
/// Background color, the last fallback.
pub const BACKGROUND_COLOR: &str = "background-color";

/// The fallback chain, in lookup order.
pub const WAVE_COLOR_PROPERTIES: [&str; 3] = [BORDER_TOP_COLOR, BORDER_COLOR, BACKGROUND_COLOR];

fn rgb_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"rgba?\(\s*(\d*)\s*,\s*(\d*)\s*,\s*(\d*)\s*(,\s*[.\d]*\s*)?\)")
            .expect("rgb pattern is valid")
    })
}

fn transparent_rgba_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"rgba\(\s*\d*\s*,\s*\d*\s*,\s*\d*\s*,\s*0\s*\)")
            .expect("transparent rgba pattern is valid")
    })
}

/// The three channel texts of an `rgb()`/`rgba()` color.
///
/// Channels are kept as written; `"010"` and `"10"` are different channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbTriple {
    pub red: String,
    pub green: String,
    pub blue: String,
}

impl RgbTriple {
    /// Find the first `rgb(r, g, b)` or `rgba(r, g, b, a)` in `color`.
    ///
    /// Fails when no such group exists or a channel is empty.
    pub fn parse(color: &str) -> Result<Self> {
        let captures = rgb_pattern()
            .captures(color)
            .ok_or_else(|| Error::not_rgb(color))?;
        let channel = |index: usize| {
            captures
                .get(index)
                .map(|m| m.as_str())
                .filter(|text| !text.is_empty())
                .map(str::to_string)
        };
        match (channel(1), channel(2), channel(3)) {
            (Some(red), Some(green), Some(blue)) => Ok(Self { red, green, blue }),
            _ => Err(Error::not_rgb(color)),
        }
    }

    /// All three channels are textually identical.
    pub fn is_grey(&self) -> bool {
        self.red == self.green && self.green == self.blue
    }
}

/// Pick the wave color from the three computed-style readings.
///
/// The first non-empty reading wins; the result is empty if all are empty.
pub fn wave_color_from<'a>(border_top: &'a str, border: &'a str, background: &'a str) -> &'a str {
    [border_top, border, background]
        .into_iter()
        .find(|value| !value.is_empty())
        .unwrap_or("")
}

/// Whether `color` is a grey.
///
/// Anything that does not parse as an rgb triple counts as *not* grey, so
/// unfamiliar notations still color the effect.
pub fn is_grey(color: &str) -> bool {
    RgbTriple::parse(color).is_ok_and(|triple| triple.is_grey())
}

/// Whether `color` is the `transparent` keyword or an `rgba()` with zero alpha.
pub fn is_transparent(color: &str) -> bool {
    color == "transparent" || transparent_rgba_pattern().is_match(color)
}

/// Whether `color` should override the effect's default color.
pub fn should_override(color: &str) -> bool {
    let apply = !color.is_empty()
        && color != "#ffffff"
        && color != "rgb(255, 255, 255)"
        && !is_grey(color)
        && !is_transparent(color);
    tracing::trace!(target: "ripple_style::color", color, apply, "classified wave color");
    apply
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_chain_takes_first_non_empty() {
        assert_eq!(wave_color_from("rgb(1, 2, 3)", "red", "blue"), "rgb(1, 2, 3)");
        assert_eq!(wave_color_from("", "red", "blue"), "red");
        assert_eq!(wave_color_from("", "", "blue"), "blue");
        assert_eq!(wave_color_from("", "", ""), "");
    }

    #[test]
    fn parses_rgb_and_rgba() {
        let triple = RgbTriple::parse("rgb(10, 20, 30)").unwrap();
        assert_eq!(triple.red, "10");
        assert_eq!(triple.green, "20");
        assert_eq!(triple.blue, "30");

        let triple = RgbTriple::parse("rgba(1,1,1,0.5)").unwrap();
        assert!(triple.is_grey());
    }

    #[test]
    fn parse_failures_are_typed() {
        assert_eq!(RgbTriple::parse("#123456"), Err(Error::not_rgb("#123456")));
        assert!(RgbTriple::parse("rgb(, 2, 3)").is_err());
    }

    #[test]
    fn equal_channels_are_grey() {
        for color in ["rgb(0, 0, 0)", "rgb(128,128,128)", "rgba(217, 217, 217, 1)"] {
            assert!(is_grey(color), "{color} should be grey");
            assert!(!should_override(color), "{color} should not override");
        }
    }

    #[test]
    fn grey_test_is_textual() {
        assert!(!is_grey("rgb(10, 010, 10)"));
    }

    #[test]
    fn distinct_channels_override() {
        assert!(!is_grey("rgb(1, 2, 3)"));
        assert!(should_override("rgb(1, 2, 3)"));
        assert!(should_override("rgb(1,2,3)"));
    }

    #[test]
    fn unparseable_colors_override() {
        assert!(!is_grey("hsl(120, 50%, 50%)"));
        assert!(should_override("hsl(120, 50%, 50%)"));
        assert!(should_override("#1890ff"));
    }

    #[test]
    fn white_and_transparent_never_override() {
        for color in [
            "",
            "#ffffff",
            "rgb(255, 255, 255)",
            "transparent",
            "rgba(0, 0, 0, 0)",
            "rgba(24, 144, 255, 0)",
            "rgba(24,144,255,0)",
        ] {
            assert!(!should_override(color), "{color:?} should not override");
        }
    }

    #[test]
    fn translucent_color_still_overrides() {
        assert!(!is_transparent("rgba(24, 144, 255, 0.5)"));
        assert!(should_override("rgba(24, 144, 255, 0.5)"));
    }
}
