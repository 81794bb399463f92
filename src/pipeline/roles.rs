use palette::Hsl;
use tracing::debug;

use crate::color::Color;
use crate::config::EngineConfig;
use crate::pipeline::aggregate::{CandidatePool, ColorSample, SampleSource};
use crate::pipeline::contrast::{better_pole, seek_visible};

/// Hue offsets tried, in order, when the accent has to be synthesized.
/// Starts from the complement of the foreground.
const ACCENT_ROTATIONS: [f32; 12] = [
    180.0, 150.0, 210.0, 120.0, 240.0, 90.0, 270.0, 60.0, 300.0, 30.0, 330.0, 0.0,
];

/// Background, foreground and accent chosen for a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleAssignment {
    pub background: Color,
    pub foreground: Color,
    pub accent: Color,
}

/// Distance an accent must keep from the background and the foreground.
fn distinguish_threshold(config: &EngineConfig) -> f32 {
    config.min_pairwise_distance.max(config.merge_threshold)
}

/// Pick background, foreground and accent from the pool.
///
/// Never fails: a missing or unreadable foreground is replaced by black or
/// white, and a missing accent is synthesized from the foreground's hue.
pub fn select_roles(pool: &CandidatePool, config: &EngineConfig) -> RoleAssignment {
    let candidates = pool.candidates();

    let bg_index = candidates
        .iter()
        .position(|c| c.source == SampleSource::CssBackground)
        .unwrap_or(0);
    let background = candidates
        .get(bg_index)
        .map(|c| c.color)
        .unwrap_or(Color::BLACK);

    let foreground = pick_foreground(candidates, bg_index, background, config);
    let accent = pick_accent(candidates, background, foreground, config)
        .unwrap_or_else(|| synthesize_accent(background, foreground, config));

    debug!(%background, %foreground, %accent, "selected roles");
    RoleAssignment {
        background,
        foreground,
        accent,
    }
}

/// Highest-contrast candidate other than the background, or the better pole
/// when nothing is readable. Ties keep the heavier candidate.
fn pick_foreground(
    candidates: &[ColorSample],
    bg_index: usize,
    background: Color,
    config: &EngineConfig,
) -> Color {
    let mut best: Option<(Color, f32)> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        if i == bg_index {
            continue;
        }
        let ratio = Color::contrast_ratio(&background, &candidate.color);
        if best.map_or(true, |(_, best_ratio)| ratio > best_ratio) {
            best = Some((candidate.color, ratio));
        }
    }

    match best {
        Some((color, ratio)) if ratio >= config.min_readability => color,
        _ => better_pole(background),
    }
}

/// Heaviest candidate far enough from both background and foreground.
fn pick_accent(
    candidates: &[ColorSample],
    background: Color,
    foreground: Color,
    config: &EngineConfig,
) -> Option<Color> {
    let threshold = distinguish_threshold(config);
    candidates
        .iter()
        .map(|c| c.color)
        .find(|&color| is_distinct(color, background, threshold) && is_distinct(color, foreground, threshold))
}

fn is_distinct(a: Color, b: Color, threshold: f32) -> bool {
    let distance = Color::perceptual_distance(&a, &b);
    distance > 0.0 && distance >= threshold
}

/// Fully saturated rotation of the foreground's hue that stands apart from
/// both background and foreground, with lightness moved until it is visible
/// against the background.
pub fn synthesize_accent(background: Color, foreground: Color, config: &EngineConfig) -> Color {
    let threshold = distinguish_threshold(config);
    let base_hue = foreground.hue();

    let rotation = |offset: f32| {
        let hue = (base_hue + offset).rem_euclid(360.0);
        let raw = Color::from_hsl(Hsl::new(hue, 1.0, 0.5));
        seek_visible(raw, background, config.min_visibility).unwrap_or(raw)
    };

    ACCENT_ROTATIONS
        .iter()
        .map(|&offset| rotation(offset))
        .find(|&color| {
            is_distinct(color, background, threshold) && is_distinct(color, foreground, threshold)
        })
        .unwrap_or_else(|| rotation(ACCENT_ROTATIONS[0]))
}
