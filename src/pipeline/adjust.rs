use palette::Hsl;
use tracing::debug;

use crate::color::Color;
use crate::config::EngineConfig;
use crate::pipeline::assign::{default_priorities, pin_poles, AnsiSlot, Palette, Tier};
use crate::pipeline::contrast::{better_pole, seek_visible, separate_tier};
use crate::pipeline::roles::{synthesize_accent, RoleAssignment};
use crate::theme::ThemeWarning;

/// Result of the adjustment pass.
#[derive(Debug, Clone)]
pub struct Adjustment {
    pub roles: RoleAssignment,
    pub palette: Palette,
    pub warnings: Vec<ThemeWarning>,
    /// False when the factors were both 1.0 and nothing was touched.
    pub applied: bool,
}

/// Scale HSL lightness by `brightness` and saturation by `saturation`,
/// clamping both to [0, 1].
pub fn adjust_color(color: Color, brightness: f32, saturation: f32) -> Color {
    let hsl = color.to_hsl();
    Color::from_hsl(Hsl::new(
        hsl.hue,
        (hsl.saturation * saturation).clamp(0.0, 1.0),
        (hsl.lightness * brightness).clamp(0.0, 1.0),
    ))
}

/// Apply the configured brightness/saturation to every role and slot, then
/// restore readability, visibility and pairwise distance.
///
/// Black and white are re-pinned to the adjusted roles. Any slot that ends up
/// differing from its plain scaled value carries a `SlotCorrected` warning.
/// With both factors at 1.0 the input is returned exactly.
pub fn adjust(palette: &Palette, roles: &RoleAssignment, config: &EngineConfig) -> Adjustment {
    if config.is_identity_adjustment() {
        return Adjustment {
            roles: *roles,
            palette: palette.clone(),
            warnings: Vec::new(),
            applied: false,
        };
    }

    let scale = |color: Color| adjust_color(color, config.brightness, config.saturation);
    let mut warnings = Vec::new();

    let background = scale(roles.background);
    let mut foreground = scale(roles.foreground);
    let contrast = Color::contrast_ratio(&background, &foreground);
    if contrast < config.min_readability {
        foreground = better_pole(background);
        warnings.push(ThemeWarning::ForegroundReplaced { contrast });
    }

    let mut accent = scale(roles.accent);
    if collapses(accent, background, config) || collapses(accent, foreground, config) {
        accent = synthesize_accent(background, foreground, config);
        warnings.push(ThemeWarning::AccentReplaced);
    }

    let roles = RoleAssignment {
        background,
        foreground,
        accent,
    };
    let scaled = Palette {
        normal: palette.normal.map(scale),
        bright: palette.bright.map(scale),
    };
    let mut normal = scaled.normal;
    let mut bright = scaled.bright;
    let priorities = default_priorities();

    for (tier, slots) in [(Tier::Normal, &mut normal), (Tier::Bright, &mut bright)] {
        pin_poles(slots, tier, &roles, config, &mut warnings);
        for slot in AnsiSlot::ALL {
            if slot.anchor_hue().is_none() {
                continue;
            }
            let color = &mut slots[slot.index()];
            match seek_visible(*color, background, config.min_visibility) {
                Some(visible) => *color = visible,
                None => warnings.push(ThemeWarning::VisibilityUnreachable { tier, slot }),
            }
        }
        let remaining = separate_tier(slots, &priorities, background, config);
        warnings.extend(ThemeWarning::indistinct(tier, &remaining));
    }

    let adjusted = Palette { normal, bright };
    let corrected: Vec<ThemeWarning> = adjusted
        .iter()
        .filter(|&(tier, slot, color)| {
            color != scaled.get(tier, slot)
                && !warnings.contains(&ThemeWarning::VisibilityUnreachable { tier, slot })
        })
        .map(|(tier, slot, _)| ThemeWarning::SlotCorrected { tier, slot })
        .collect();
    warnings.extend(corrected);

    debug!(
        brightness = config.brightness,
        saturation = config.saturation,
        warnings = warnings.len(),
        "adjusted palette"
    );

    Adjustment {
        roles,
        palette: adjusted,
        warnings,
        applied: true,
    }
}

fn collapses(accent: Color, role: Color, config: &EngineConfig) -> bool {
    accent == role || Color::perceptual_distance(&accent, &role) < config.merge_threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::aggregate::{aggregate, ColorSample, SampleSource};
    use crate::pipeline::assign::assign_slots;
    use crate::pipeline::roles::select_roles;

    fn known_theme() -> (RoleAssignment, Palette) {
        let config = EngineConfig::default();
        let samples = vec![
            ColorSample::new(Color::new(25, 25, 35), 10.0, SampleSource::CssBackground),
            ColorSample::new(Color::new(220, 220, 220), 8.0, SampleSource::CssText),
            ColorSample::new(Color::new(200, 70, 60), 3.0, SampleSource::CssText),
            ColorSample::new(Color::new(70, 120, 200), 3.0, SampleSource::CssText),
        ];
        let pool = aggregate(&samples, &config);
        let roles = select_roles(&pool, &config);
        let palette = assign_slots(&pool, &roles, &config).palette;
        (roles, palette)
    }

    #[test]
    fn identity_returns_input_exactly() {
        let (roles, palette) = known_theme();
        let adjusted = adjust(&palette, &roles, &EngineConfig::default());
        assert!(!adjusted.applied);
        assert_eq!(adjusted.palette, palette);
        assert_eq!(adjusted.roles, roles);
        assert!(adjusted.warnings.is_empty());
    }

    #[test]
    fn adjust_color_scales_lightness_and_saturation() {
        let color = Color::from_hsl(Hsl::new(200.0, 0.6, 0.4));
        let before = color.to_hsl();
        let after = adjust_color(color, 1.2, 0.9).to_hsl();
        assert!((after.lightness - before.lightness * 1.2).abs() < 0.01);
        assert!((after.saturation - before.saturation * 0.9).abs() < 0.02);
    }

    #[test]
    fn adjust_color_clamps() {
        let color = Color::new(240, 240, 240);
        assert_eq!(adjust_color(color, 2.0, 1.0), Color::WHITE);
        let gray = adjust_color(Color::new(200, 40, 40), 1.0, 0.0).to_hsl();
        assert!(gray.saturation < 0.01);
    }

    #[test]
    fn scaled_palette_keeps_constraints() {
        let config = EngineConfig {
            brightness: 1.2,
            saturation: 0.9,
            ..Default::default()
        };
        let (roles, palette) = known_theme();
        let adjusted = adjust(&palette, &roles, &config);
        assert!(adjusted.applied);

        let bg = adjusted.roles.background;
        assert!(Color::contrast_ratio(&bg, &adjusted.roles.foreground) >= config.min_readability);
        for (_, _, color) in adjusted.palette.iter() {
            assert!(Color::contrast_ratio(&color, &bg) >= config.min_visibility);
        }
        for tier in [Tier::Normal, Tier::Bright] {
            let slots = adjusted.palette.tier(tier);
            let close = crate::pipeline::contrast::indistinct_pairs(slots, config.min_pairwise_distance);
            if !close.is_empty() {
                assert!(adjusted.warnings.iter().any(|w| w.is_indistinct()));
            }
        }
    }

    #[test]
    fn poles_follow_adjusted_roles() {
        let config = EngineConfig {
            brightness: 10.0,
            ..Default::default()
        };
        let (roles, palette) = known_theme();
        let adjusted = adjust(&palette, &roles, &config);
        let fg = adjusted.roles.foreground;
        for tier in [Tier::Normal, Tier::Bright] {
            assert_eq!(adjusted.palette.get(tier, AnsiSlot::White), fg, "{} white", tier.name());
        }
        let black = adjusted.palette.get(Tier::Normal, AnsiSlot::Black);
        assert!(
            Color::contrast_ratio(&black, &adjusted.roles.background) >= config.min_visibility
        );
        assert!(black.chroma() < 3.0, "black {black} should stay neutral");
    }

    #[test]
    fn corrected_slots_are_reported() {
        let config = EngineConfig {
            brightness: 1.2,
            saturation: 0.9,
            ..Default::default()
        };
        let (roles, palette) = known_theme();
        let adjusted = adjust(&palette, &roles, &config);
        for (tier, slot, color) in adjusted.palette.iter() {
            let scaled = adjust_color(palette.get(tier, slot), 1.2, 0.9);
            if color != scaled {
                assert!(
                    adjusted
                        .warnings
                        .contains(&ThemeWarning::SlotCorrected { tier, slot }),
                    "{} {} changed from {scaled} to {color} without a warning",
                    tier.name(),
                    slot.name()
                );
            }
        }
    }

    #[test]
    fn washed_out_slots_are_spread_apart() {
        let config = EngineConfig {
            brightness: 3.0,
            ..Default::default()
        };
        let samples = vec![
            ColorSample::new(Color::new(25, 25, 35), 10.0, SampleSource::CssBackground),
            ColorSample::new(Color::new(220, 220, 220), 8.0, SampleSource::CssText),
        ];
        let pool = aggregate(&samples, &config);
        let roles = select_roles(&pool, &config);
        let palette = assign_slots(&pool, &roles, &config).palette;
        let adjusted = adjust(&palette, &roles, &config);

        for tier in [Tier::Normal, Tier::Bright] {
            let slots = adjusted.palette.tier(tier);
            let mut distinct = slots.to_vec();
            distinct.sort();
            distinct.dedup();
            assert!(
                distinct.len() >= 4,
                "{} tier collapsed to {distinct:?}",
                tier.name()
            );
            let close = crate::pipeline::contrast::indistinct_pairs(slots, config.min_pairwise_distance);
            assert!(close.len() < 28);
        }
    }

    #[test]
    fn extreme_brightness_replaces_foreground() {
        let config = EngineConfig {
            brightness: 10.0,
            ..Default::default()
        };
        let (roles, palette) = known_theme();
        let adjusted = adjust(&palette, &roles, &config);
        // Everything washes out to white; the foreground must flip to black.
        assert_eq!(adjusted.roles.background, Color::WHITE);
        assert_eq!(adjusted.roles.foreground, Color::BLACK);
        assert!(adjusted
            .warnings
            .iter()
            .any(|w| matches!(w, ThemeWarning::ForegroundReplaced { .. })));
        assert!(adjusted.warnings.contains(&ThemeWarning::AccentReplaced));
        assert_ne!(adjusted.roles.accent, Color::WHITE);
    }
}
