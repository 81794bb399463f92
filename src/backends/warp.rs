use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::pipeline::assign::{AnsiSlot, Tier};
use crate::theme::Theme;

use super::{home_dir, ThemeBackend};

/// Warp terminal theme backend (YAML format).
pub struct WarpBackend;

#[derive(Serialize)]
struct WarpTheme<'a> {
    name: &'a str,
    accent: String,
    background: String,
    foreground: String,
    details: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    background_image: Option<WarpBackgroundImage<'a>>,
    terminal_colors: WarpTerminalColors,
}

#[derive(Serialize)]
struct WarpBackgroundImage<'a> {
    path: &'a str,
    opacity: f32,
}

#[derive(Serialize)]
struct WarpTerminalColors {
    normal: WarpSlots,
    bright: WarpSlots,
}

/// One tier of slots, fields in ANSI order.
#[derive(Serialize)]
struct WarpSlots {
    black: String,
    red: String,
    green: String,
    yellow: String,
    blue: String,
    magenta: String,
    cyan: String,
    white: String,
}

impl WarpSlots {
    fn from_tier(theme: &Theme, tier: Tier) -> Self {
        let hex = |slot: AnsiSlot| theme.palette.get(tier, slot).to_hex();
        Self {
            black: hex(AnsiSlot::Black),
            red: hex(AnsiSlot::Red),
            green: hex(AnsiSlot::Green),
            yellow: hex(AnsiSlot::Yellow),
            blue: hex(AnsiSlot::Blue),
            magenta: hex(AnsiSlot::Magenta),
            cyan: hex(AnsiSlot::Cyan),
            white: hex(AnsiSlot::White),
        }
    }
}

impl<'a> WarpTheme<'a> {
    fn from_theme(theme: &'a Theme) -> Self {
        Self {
            name: &theme.name,
            accent: theme.accent().to_hex(),
            background: theme.background().to_hex(),
            foreground: theme.foreground().to_hex(),
            details: if theme.is_dark() { "darker" } else { "lighter" },
            background_image: theme
                .background_image
                .as_ref()
                .map(|image| WarpBackgroundImage {
                    path: &image.path,
                    opacity: image.opacity,
                }),
            terminal_colors: WarpTerminalColors {
                normal: WarpSlots::from_tier(theme, Tier::Normal),
                bright: WarpSlots::from_tier(theme, Tier::Bright),
            },
        }
    }
}

impl ThemeBackend for WarpBackend {
    fn name(&self) -> &str {
        "Warp"
    }

    fn extension(&self) -> &str {
        ".yaml"
    }

    fn themes_dir(&self) -> Result<PathBuf> {
        Ok(home_dir()?.join(".warp").join("themes"))
    }

    fn serialize(&self, theme: &Theme) -> Result<String> {
        let doc = WarpTheme::from_theme(theme);
        serde_yaml::to_string(&doc)
            .with_context(|| format!("failed to serialize Warp theme '{}'", theme.name))
    }
}
