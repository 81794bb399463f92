use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;

use crate::theme::Theme;

use super::{config_home, ThemeBackend};

/// Ghostty terminal theme backend (key-value format).
pub struct GhosttyBackend;

impl ThemeBackend for GhosttyBackend {
    fn name(&self) -> &str {
        "Ghostty"
    }

    fn extension(&self) -> &str {
        ""
    }

    fn themes_dir(&self) -> Result<PathBuf> {
        Ok(config_home()?.join("ghostty").join("themes"))
    }

    fn serialize(&self, theme: &Theme) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "background = {}", theme.background())?;
        writeln!(out, "foreground = {}", theme.foreground())?;
        writeln!(out, "cursor-color = {}", theme.accent())?;
        writeln!(out, "cursor-text = {}", theme.background())?;
        writeln!(out, "selection-background = {}", theme.accent())?;
        writeln!(out, "selection-foreground = {}", theme.background())?;
        for (i, color) in theme.palette.ansi().iter().enumerate() {
            writeln!(out, "palette = {i}={color}")?;
        }
        Ok(out)
    }
}
