use palette::Hsl;
use tracing::debug;

use crate::color::Color;
use crate::config::EngineConfig;
use crate::pipeline::aggregate::CandidatePool;
use crate::pipeline::contrast::{is_visible, seek_visible, seek_visible_lab, separate_tier, PINNED};
use crate::pipeline::roles::RoleAssignment;
use crate::theme::ThemeWarning;

/// Half-width of the hue window around each anchor, in degrees.
const HUE_TOLERANCE: f32 = 30.0;
/// Candidates less saturated than this have no meaningful hue.
const MIN_HUE_SATURATION: f32 = 0.15;
/// Saturation floor for slots synthesized from the accent, so a gray accent
/// still yields distinct hues.
const SYNTH_MIN_SATURATION: f32 = 0.45;
/// Fractions of the bright boost tried, in order, until the result is visible.
const BOOST_FACTORS: [f32; 4] = [1.0, 0.75, 0.5, 0.25];

/// The eight ANSI color names, in palette order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnsiSlot {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl AnsiSlot {
    pub const ALL: [AnsiSlot; 8] = [
        AnsiSlot::Black,
        AnsiSlot::Red,
        AnsiSlot::Green,
        AnsiSlot::Yellow,
        AnsiSlot::Blue,
        AnsiSlot::Magenta,
        AnsiSlot::Cyan,
        AnsiSlot::White,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AnsiSlot::Black => "black",
            AnsiSlot::Red => "red",
            AnsiSlot::Green => "green",
            AnsiSlot::Yellow => "yellow",
            AnsiSlot::Blue => "blue",
            AnsiSlot::Magenta => "magenta",
            AnsiSlot::Cyan => "cyan",
            AnsiSlot::White => "white",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical hue, or `None` for the black/white poles.
    pub fn anchor_hue(self) -> Option<f32> {
        match self {
            AnsiSlot::Black | AnsiSlot::White => None,
            AnsiSlot::Red => Some(0.0),
            AnsiSlot::Yellow => Some(60.0),
            AnsiSlot::Green => Some(120.0),
            AnsiSlot::Cyan => Some(180.0),
            AnsiSlot::Blue => Some(240.0),
            AnsiSlot::Magenta => Some(300.0),
        }
    }
}

/// Normal (ANSI 0-7) or bright (ANSI 8-15) half of the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Normal,
    Bright,
}

impl Tier {
    pub fn name(self) -> &'static str {
        match self {
            Tier::Normal => "normal",
            Tier::Bright => "bright",
        }
    }
}

/// The 16 ANSI colors, indexed by [`AnsiSlot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub normal: [Color; 8],
    pub bright: [Color; 8],
}

impl Palette {
    pub fn tier(&self, tier: Tier) -> &[Color; 8] {
        match tier {
            Tier::Normal => &self.normal,
            Tier::Bright => &self.bright,
        }
    }

    pub fn get(&self, tier: Tier, slot: AnsiSlot) -> Color {
        self.tier(tier)[slot.index()]
    }

    /// ANSI colors 0-15.
    pub fn ansi(&self) -> [Color; 16] {
        let mut slots = [Color::BLACK; 16];
        slots[..8].copy_from_slice(&self.normal);
        slots[8..].copy_from_slice(&self.bright);
        slots
    }

    /// Iterate `(tier, slot, color)` over all 16 entries.
    pub fn iter(&self) -> impl Iterator<Item = (Tier, AnsiSlot, Color)> + '_ {
        [Tier::Normal, Tier::Bright].into_iter().flat_map(move |tier| {
            AnsiSlot::ALL
                .into_iter()
                .map(move |slot| (tier, slot, self.get(tier, slot)))
        })
    }
}

/// A synthesized palette plus the relaxations recorded while building it.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub palette: Palette,
    pub warnings: Vec<ThemeWarning>,
}

/// Slot priorities used when the originating weights are unknown:
/// poles pinned, hue slots equal.
pub fn default_priorities() -> [f32; 8] {
    let mut priorities = [0.0; 8];
    priorities[AnsiSlot::Black.index()] = PINNED;
    priorities[AnsiSlot::White.index()] = PINNED;
    priorities
}

/// Map the candidate pool and roles onto the 16 ANSI slots.
pub fn assign_slots(pool: &CandidatePool, roles: &RoleAssignment, config: &EngineConfig) -> Synthesis {
    let background = roles.background;
    let mut warnings = Vec::new();
    let mut normal = [Color::BLACK; 8];
    let mut priorities = default_priorities();
    let mut used = vec![false; pool.len()];

    pin_poles(&mut normal, Tier::Normal, roles, config, &mut warnings);

    for slot in AnsiSlot::ALL {
        let Some(anchor) = slot.anchor_hue() else {
            continue;
        };

        let found = pool.candidates().iter().enumerate().find(|(i, c)| {
            !used[*i] && matches_anchor(c.color, anchor) && is_visible(c.color, background, config.min_visibility)
        });

        match found {
            Some((i, candidate)) => {
                used[i] = true;
                normal[slot.index()] = candidate.color;
                priorities[slot.index()] = candidate.weight;
            }
            None => {
                let base = roles.accent.to_hsl();
                let rotated = Color::from_hsl(Hsl::new(
                    anchor,
                    base.saturation.max(SYNTH_MIN_SATURATION),
                    base.lightness,
                ));
                normal[slot.index()] = match seek_visible(rotated, background, config.min_visibility) {
                    Some(color) => color,
                    None => {
                        warnings.push(ThemeWarning::VisibilityUnreachable {
                            tier: Tier::Normal,
                            slot,
                        });
                        Color::from_hsl(Hsl::new(anchor, 1.0, 0.5))
                    }
                };
                debug!(slot = slot.name(), color = %normal[slot.index()], "synthesized slot");
            }
        }
    }

    let remaining = separate_tier(&mut normal, &priorities, background, config);
    warnings.extend(ThemeWarning::indistinct(Tier::Normal, &remaining));

    let direction = bright_direction(roles);
    let mut bright = normal.map(|color| boost(color, direction, background, config));
    pin_poles(&mut bright, Tier::Bright, roles, config, &mut warnings);
    let remaining = separate_tier(&mut bright, &priorities, background, config);
    warnings.extend(ThemeWarning::indistinct(Tier::Bright, &remaining));

    Synthesis {
        palette: Palette { normal, bright },
        warnings,
    }
}

/// Shortest angular distance between two hues, in degrees.
fn hue_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

fn matches_anchor(color: Color, anchor: f32) -> bool {
    let hsl = color.to_hsl();
    hsl.saturation >= MIN_HUE_SATURATION
        && hue_distance(hsl.hue.into_positive_degrees(), anchor) <= HUE_TOLERANCE
}

/// Bright colors move further from the background: lighter on dark themes,
/// darker on light ones.
fn bright_direction(roles: &RoleAssignment) -> f32 {
    if roles.foreground.relative_luminance() >= roles.background.relative_luminance() {
        1.0
    } else {
        -1.0
    }
}

/// Set a tier's black and white slots from the roles. Black is the
/// background, white the foreground; bright black is normal black lifted
/// toward the foreground side while bright white stays on the foreground.
pub(crate) fn pin_poles(
    slots: &mut [Color; 8],
    tier: Tier,
    roles: &RoleAssignment,
    config: &EngineConfig,
    warnings: &mut Vec<ThemeWarning>,
) {
    let background = roles.background;
    let black = pole_slot(background, background, config, tier, AnsiSlot::Black, warnings);
    slots[AnsiSlot::Black.index()] = match tier {
        Tier::Normal => black,
        Tier::Bright => boost_pole(black, bright_direction(roles), background, config),
    };
    slots[AnsiSlot::White.index()] =
        pole_slot(roles.foreground, background, config, tier, AnsiSlot::White, warnings);
}

/// A black/white slot: the role color itself, moved along Lab lightness
/// toward the opposite pole when it would vanish against the background.
fn pole_slot(
    role: Color,
    background: Color,
    config: &EngineConfig,
    tier: Tier,
    slot: AnsiSlot,
    warnings: &mut Vec<ThemeWarning>,
) -> Color {
    seek_visible_lab(role, background, config.min_visibility).unwrap_or_else(|| {
        warnings.push(ThemeWarning::VisibilityUnreachable { tier, slot });
        role
    })
}

/// Derive a bright slot from its normal counterpart. The boost shrinks until
/// the result is visible; with no boost left the normal color is reused.
fn boost(color: Color, direction: f32, background: Color, config: &EngineConfig) -> Color {
    let hsl = color.to_hsl();
    BOOST_FACTORS
        .iter()
        .map(|&factor| {
            Color::from_hsl(Hsl::new(
                hsl.hue,
                hsl.saturation + config.bright_saturation_boost * factor,
                hsl.lightness + direction * config.bright_lightness_boost * factor,
            ))
        })
        .find(|&boosted| is_visible(boosted, background, config.min_visibility))
        .unwrap_or(color)
}

/// Bright black: the boost applied to Lab lightness only, so a tinted
/// background does not turn into a saturated color.
fn boost_pole(color: Color, direction: f32, background: Color, config: &EngineConfig) -> Color {
    let lightness = color.to_lab().l;
    BOOST_FACTORS
        .iter()
        .map(|&factor| {
            color.with_lab_lightness(lightness + direction * config.bright_lightness_boost * 100.0 * factor)
        })
        .find(|&boosted| is_visible(boosted, background, config.min_visibility))
        .unwrap_or(color)
}
