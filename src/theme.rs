use std::fmt;

use crate::color::Color;
use crate::config::{ConfigError, EngineConfig};
use crate::pipeline::aggregate::ColorSample;
use crate::pipeline::assign::{AnsiSlot, Palette, Tier};
use crate::pipeline::roles::RoleAssignment;

/// A non-fatal relaxation recorded while building a theme.
#[derive(Debug, Clone, PartialEq)]
pub enum ThemeWarning {
    /// Two slots of one tier stayed closer than the pairwise minimum.
    Indistinct {
        tier: Tier,
        first: AnsiSlot,
        second: AnsiSlot,
        distance: f32,
    },
    /// No lightness made the slot visible; a canonical color was used instead.
    VisibilityUnreachable { tier: Tier, slot: AnsiSlot },
    /// Adjustment made the foreground unreadable; it was replaced by black or white.
    ForegroundReplaced { contrast: f32 },
    /// Adjustment collapsed the accent onto another role; it was re-synthesized.
    AccentReplaced,
    /// After scaling, the slot had to be moved to stay pinned, visible or
    /// distinct, so it is not the plain scaled color.
    SlotCorrected { tier: Tier, slot: AnsiSlot },
}

impl ThemeWarning {
    /// One `Indistinct` warning per remaining `(i, j, distance)` pair.
    pub fn indistinct(tier: Tier, pairs: &[(usize, usize, f32)]) -> Vec<ThemeWarning> {
        pairs
            .iter()
            .map(|&(i, j, distance)| ThemeWarning::Indistinct {
                tier,
                first: AnsiSlot::ALL[i],
                second: AnsiSlot::ALL[j],
                distance,
            })
            .collect()
    }

    pub fn is_indistinct(&self) -> bool {
        matches!(self, ThemeWarning::Indistinct { .. })
    }
}

impl fmt::Display for ThemeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeWarning::Indistinct {
                tier,
                first,
                second,
                distance,
            } => write!(
                f,
                "{} {} and {} are hard to tell apart (distance {distance:.1})",
                tier.name(),
                first.name(),
                second.name()
            ),
            ThemeWarning::VisibilityUnreachable { tier, slot } => write!(
                f,
                "{} {} could not reach the visibility minimum; using a canonical color",
                tier.name(),
                slot.name()
            ),
            ThemeWarning::ForegroundReplaced { contrast } => write!(
                f,
                "adjusted foreground contrast {contrast:.2} was too low; replaced with black/white"
            ),
            ThemeWarning::AccentReplaced => {
                write!(f, "adjusted accent collapsed onto another role; re-synthesized")
            }
            ThemeWarning::SlotCorrected { tier, slot } => write!(
                f,
                "{} {} was corrected after brightness/saturation scaling",
                tier.name(),
                slot.name()
            ),
        }
    }
}

/// Optional background image carried through to the serializer.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImage {
    pub path: String,
    /// In [0, 1].
    pub opacity: f32,
}

/// The finished theme handed to a serializer.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub roles: RoleAssignment,
    pub palette: Palette,
    pub background_image: Option<BackgroundImage>,
    pub warnings: Vec<ThemeWarning>,
}

impl Theme {
    /// Run the whole engine over `samples`.
    ///
    /// Fails only when `config` is out of range.
    pub fn generate(
        name: impl Into<String>,
        samples: &[ColorSample],
        config: &EngineConfig,
    ) -> Result<Self, ConfigError> {
        let output = crate::pipeline::run(samples, config)?;
        Ok(Self {
            name: name.into(),
            roles: output.roles,
            palette: output.palette,
            background_image: None,
            warnings: output.warnings,
        })
    }

    pub fn with_background_image(mut self, image: BackgroundImage) -> Self {
        self.background_image = Some(image);
        self
    }

    pub fn background(&self) -> Color {
        self.roles.background
    }

    pub fn foreground(&self) -> Color {
        self.roles.foreground
    }

    pub fn accent(&self) -> Color {
        self.roles.accent
    }

    /// Whether the background is darker than mid-gray.
    pub fn is_dark(&self) -> bool {
        self.roles.background.relative_luminance() < 0.18
    }
}
