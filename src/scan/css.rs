use std::sync::LazyLock;

use regex::Regex;

use crate::color::Color;
use crate::pipeline::aggregate::{ColorSample, SampleSource};

/// `property: value` declarations in stylesheets, `<style>` blocks and inline
/// `style` attributes.
static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|[\s{;"'])(-{0,2}[a-z][a-z0-9-]*)\s*:\s*([^;{}"'<>]+)"#)
        .expect("declaration pattern is valid")
});

/// Legacy `bgcolor="..."` HTML attributes.
static BGCOLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bbgcolor\s*=\s*["']?(#?[0-9a-z]+)"#).expect("bgcolor pattern is valid")
});

/// Hex, `rgb()`/`rgba()` and bare words (checked against the named colors).
static COLOR_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)#([0-9a-f]{8}|[0-9a-f]{6}|[0-9a-f]{3,4})\b|rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*[\d.]+%?\s*)?\)|\b([a-z]+)\b",
    )
    .expect("color token pattern is valid")
});

const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::new(0, 0, 0)),
    ("white", Color::new(255, 255, 255)),
    ("red", Color::new(255, 0, 0)),
    ("green", Color::new(0, 128, 0)),
    ("lime", Color::new(0, 255, 0)),
    ("blue", Color::new(0, 0, 255)),
    ("yellow", Color::new(255, 255, 0)),
    ("cyan", Color::new(0, 255, 255)),
    ("aqua", Color::new(0, 255, 255)),
    ("magenta", Color::new(255, 0, 255)),
    ("fuchsia", Color::new(255, 0, 255)),
    ("gray", Color::new(128, 128, 128)),
    ("grey", Color::new(128, 128, 128)),
    ("silver", Color::new(192, 192, 192)),
    ("maroon", Color::new(128, 0, 0)),
    ("olive", Color::new(128, 128, 0)),
    ("navy", Color::new(0, 0, 128)),
    ("purple", Color::new(128, 0, 128)),
    ("teal", Color::new(0, 128, 128)),
    ("orange", Color::new(255, 165, 0)),
    ("pink", Color::new(255, 192, 203)),
    ("brown", Color::new(165, 42, 42)),
    ("gold", Color::new(255, 215, 0)),
    ("indigo", Color::new(75, 0, 130)),
    ("violet", Color::new(238, 130, 238)),
    ("crimson", Color::new(220, 20, 60)),
    ("coral", Color::new(255, 127, 80)),
    ("salmon", Color::new(250, 128, 114)),
    ("tomato", Color::new(255, 99, 71)),
    ("khaki", Color::new(240, 230, 140)),
    ("beige", Color::new(245, 245, 220)),
    ("ivory", Color::new(255, 255, 240)),
    ("whitesmoke", Color::new(245, 245, 245)),
    ("gainsboro", Color::new(220, 220, 220)),
    ("darkgray", Color::new(169, 169, 169)),
    ("darkgrey", Color::new(169, 169, 169)),
    ("lightgray", Color::new(211, 211, 211)),
    ("lightgrey", Color::new(211, 211, 211)),
    ("dimgray", Color::new(105, 105, 105)),
    ("dimgrey", Color::new(105, 105, 105)),
    ("slategray", Color::new(112, 128, 144)),
    ("darkblue", Color::new(0, 0, 139)),
    ("royalblue", Color::new(65, 105, 225)),
    ("steelblue", Color::new(70, 130, 180)),
    ("skyblue", Color::new(135, 206, 235)),
    ("turquoise", Color::new(64, 224, 208)),
    ("darkgreen", Color::new(0, 100, 0)),
    ("seagreen", Color::new(46, 139, 87)),
    ("darkred", Color::new(139, 0, 0)),
    ("firebrick", Color::new(178, 34, 34)),
    ("rebeccapurple", Color::new(102, 51, 153)),
];

fn named_color(word: &str) -> Option<Color> {
    let word = word.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == word)
        .map(|&(_, color)| color)
}

/// Parse one matched hex body (3, 4, 6 or 8 digits); alpha is dropped.
fn hex_color(digits: &str) -> Option<Color> {
    match digits.len() {
        3 | 6 => Color::from_hex(digits).ok(),
        4 => Color::from_hex(&digits[..3]).ok(),
        8 => Color::from_hex(&digits[..6]).ok(),
        _ => None,
    }
}

/// Every color token in a declaration value or attribute.
pub fn color_tokens(value: &str) -> Vec<Color> {
    COLOR_TOKEN
        .captures_iter(value)
        .filter_map(|caps| {
            if let Some(hex) = caps.get(1) {
                hex_color(hex.as_str())
            } else if let (Some(r), Some(g), Some(b)) = (caps.get(2), caps.get(3), caps.get(4)) {
                let channel = |m: regex::Match<'_>| m.as_str().parse::<u16>().ok().map(|v| v.min(255) as u8);
                Some(Color::new(channel(r)?, channel(g)?, channel(b)?))
            } else {
                caps.get(5).and_then(|word| named_color(word.as_str()))
            }
        })
        .collect()
}

/// Background-ish properties: `background*`, and custom properties with a
/// `bg` or `background` segment such as `--bg-color`.
fn is_background_property(property: &str) -> bool {
    let property = property.to_ascii_lowercase();
    property.starts_with("background")
        || property
            .trim_start_matches('-')
            .split('-')
            .any(|part| part == "bg" || part == "background")
}

/// Scan CSS or HTML text for color samples, one per occurrence.
pub fn scan_css(text: &str) -> Vec<ColorSample> {
    let mut samples = Vec::new();

    for caps in DECLARATION.captures_iter(text) {
        let (Some(property), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let source = if is_background_property(property.as_str()) {
            SampleSource::CssBackground
        } else {
            SampleSource::CssText
        };
        samples.extend(
            color_tokens(value.as_str())
                .into_iter()
                .map(|color| ColorSample::new(color, 1.0, source)),
        );
    }

    for caps in BGCOLOR.captures_iter(text) {
        if let Some(value) = caps.get(1) {
            samples.extend(
                color_tokens(value.as_str())
                    .into_iter()
                    .map(|color| ColorSample::new(color, 1.0, SampleSource::CssBackground)),
            );
        }
    }

    samples
}
