//! Bounded searches shared by the synthesizer and the adjustment pass.

use palette::Hsl;

use crate::color::Color;
use crate::config::EngineConfig;

/// Bisection steps when searching for a visible lightness.
pub const LIGHTNESS_SEARCH_STEPS: usize = 24;
/// Rounds of pairwise nudging before a tier is accepted as-is.
pub const MAX_SEPARATION_ROUNDS: usize = 32;
/// Lightness granularity of a nudge.
pub const NUDGE_STEP: f32 = 0.005;
/// Upper bound on nudge steps; covers the whole lightness range.
const NUDGE_STEPS: usize = 200;

/// Priority that is never nudged (the black/white poles).
pub const PINNED: f32 = f32::INFINITY;

pub fn is_visible(color: Color, background: Color, min_ratio: f32) -> bool {
    Color::contrast_ratio(&color, &background) >= min_ratio
}

/// Pure white or pure black, whichever contrasts more with `background`.
/// Ties go to black.
pub fn better_pole(background: Color) -> Color {
    let white = Color::contrast_ratio(&Color::WHITE, &background);
    let black = Color::contrast_ratio(&Color::BLACK, &background);
    if white > black {
        Color::WHITE
    } else {
        Color::BLACK
    }
}

/// Move `color`'s HSL lightness toward the better pole until it clears
/// `min_ratio` against `background`, keeping hue and saturation.
///
/// Returns the color unchanged when it already clears the threshold and
/// `None` when not even the pole does.
pub fn seek_visible(color: Color, background: Color, min_ratio: f32) -> Option<Color> {
    let hsl = color.to_hsl();
    let toward_white = better_pole(background) == Color::WHITE;
    bisect_lightness(
        color,
        background,
        min_ratio,
        hsl.lightness,
        if toward_white { 1.0 } else { 0.0 },
        |lightness| Color::from_hsl(Hsl::new(hsl.hue, hsl.saturation, lightness)),
    )
}

/// Like [`seek_visible`], but moves Lab lightness so a tinted color gets
/// lighter or darker without gaining colorfulness. Falls back to the HSL
/// search when the Lab pole is out of reach.
pub fn seek_visible_lab(color: Color, background: Color, min_ratio: f32) -> Option<Color> {
    let toward_white = better_pole(background) == Color::WHITE;
    bisect_lightness(
        color,
        background,
        min_ratio,
        color.to_lab().l,
        if toward_white { 100.0 } else { 0.0 },
        |lightness| color.with_lab_lightness(lightness),
    )
    .or_else(|| seek_visible(color, background, min_ratio))
}

/// Bisect a lightness axis between `start` and `target` for the value
/// closest to `start` that is visible.
fn bisect_lightness(
    color: Color,
    background: Color,
    min_ratio: f32,
    start: f32,
    target: f32,
    at: impl Fn(f32) -> Color,
) -> Option<Color> {
    if is_visible(color, background, min_ratio) {
        return Some(color);
    }

    let mut best = at(target);
    if !is_visible(best, background, min_ratio) {
        return None;
    }

    // Invariant: `far` passes, `near` fails.
    let mut near = start;
    let mut far = target;
    for _ in 0..LIGHTNESS_SEARCH_STEPS {
        let mid = (near + far) / 2.0;
        let candidate = at(mid);
        if is_visible(candidate, background, min_ratio) {
            far = mid;
            best = candidate;
        } else {
            near = mid;
        }
    }
    Some(best)
}

/// Same-tier pairs closer than `min_distance`, in slot order.
pub fn indistinct_pairs(slots: &[Color; 8], min_distance: f32) -> Vec<(usize, usize, f32)> {
    let mut pairs = Vec::new();
    for i in 0..slots.len() {
        for j in (i + 1)..slots.len() {
            let distance = Color::perceptual_distance(&slots[i], &slots[j]);
            if distance < min_distance {
                pairs.push((i, j, distance));
            }
        }
    }
    pairs
}

/// Nudge lower-priority slots apart until every pair is at least
/// `min_pairwise_distance` away, or the round cap is reached.
///
/// The lower-priority slot of a pair moves (ties move the later slot);
/// pinned slots never move. Each slot keeps one direction across rounds,
/// outward from mid-gray first, and turns around for good once that side of
/// the gamut is exhausted. Nudges never break visibility. Returns the pairs
/// that are still too close.
pub fn separate_tier(
    slots: &mut [Color; 8],
    priorities: &[f32; 8],
    background: Color,
    config: &EngineConfig,
) -> Vec<(usize, usize, f32)> {
    let mut directions: [Option<f32>; 8] = [None; 8];

    for _ in 0..MAX_SEPARATION_ROUNDS {
        let pairs = indistinct_pairs(slots, config.min_pairwise_distance);
        if pairs.is_empty() {
            break;
        }

        let mut moved = false;
        for (i, j, _) in pairs {
            if Color::perceptual_distance(&slots[i], &slots[j]) >= config.min_pairwise_distance {
                continue;
            }
            let (victim, anchor) = if priorities[j] <= priorities[i] {
                (j, i)
            } else {
                (i, j)
            };
            if priorities[victim] == PINNED {
                continue;
            }

            let color = slots[victim];
            let outward = *directions[victim].get_or_insert_with(|| {
                if color.to_hsl().lightness >= 0.5 {
                    1.0
                } else {
                    -1.0
                }
            });
            let away_from = slots[anchor];
            let found = [outward, -outward].into_iter().find_map(|direction| {
                nudge(color, away_from, direction, background, config).map(|c| (direction, c))
            });
            if let Some((direction, nudged)) = found {
                directions[victim] = Some(direction);
                slots[victim] = nudged;
                moved = true;
            }
        }
        if !moved {
            break;
        }
    }
    indistinct_pairs(slots, config.min_pairwise_distance)
}

/// Walk `color`'s lightness in `direction` (+1 lighter, -1 darker) to the
/// first visible value at least `min_pairwise_distance` from `away_from`.
fn nudge(
    color: Color,
    away_from: Color,
    direction: f32,
    background: Color,
    config: &EngineConfig,
) -> Option<Color> {
    let hsl = color.to_hsl();
    (1..=NUDGE_STEPS)
        .map(|step| {
            let lightness = (hsl.lightness + direction * NUDGE_STEP * step as f32).clamp(0.0, 1.0);
            Color::from_hsl(Hsl::new(hsl.hue, hsl.saturation, lightness))
        })
        .find(|&moved| {
            moved != color
                && is_visible(moved, background, config.min_visibility)
                && Color::perceptual_distance(&moved, &away_from) >= config.min_pairwise_distance
        })
}
