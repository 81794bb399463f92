use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use palette::Hsl;

use crate::color::Color;
use crate::pipeline::assign::{AnsiSlot, Tier};
use crate::theme::Theme;

use super::{config_home, ThemeBackend};

/// Zellij terminal multiplexer theme backend (KDL format).
pub struct ZellijBackend;

impl ThemeBackend for ZellijBackend {
    fn name(&self) -> &str {
        "Zellij"
    }

    fn extension(&self) -> &str {
        ".kdl"
    }

    fn themes_dir(&self) -> Result<PathBuf> {
        Ok(config_home()?.join("zellij").join("themes"))
    }

    fn serialize(&self, theme: &Theme) -> Result<String> {
        let orange = derive_orange(theme);
        let key = super::sanitize_filename(&theme.name);

        let mut out = String::new();
        out.push_str("themes {\n");
        writeln!(out, "    {key} {{")?;
        writeln!(out, "        fg \"{}\"", theme.foreground().to_hex())?;
        writeln!(out, "        bg \"{}\"", theme.background().to_hex())?;
        for slot in AnsiSlot::ALL {
            writeln!(
                out,
                "        {} \"{}\"",
                slot.name(),
                theme.palette.get(Tier::Normal, slot).to_hex()
            )?;
        }
        writeln!(out, "        orange \"{}\"", orange.to_hex())?;
        out.push_str("    }\n");
        out.push_str("}\n");

        Ok(out)
    }
}

/// Derive the Zellij-specific "orange" color by averaging the red and yellow
/// slots in HSL space, targeting hue ~30°.
fn derive_orange(theme: &Theme) -> Color {
    let red = theme.palette.get(Tier::Normal, AnsiSlot::Red).to_hsl();
    let yellow = theme.palette.get(Tier::Normal, AnsiSlot::Yellow).to_hsl();

    let lightness = (red.lightness + yellow.lightness) / 2.0;
    let saturation = (red.saturation + yellow.saturation) / 2.0;

    Color::from_hsl(Hsl::new(30.0, saturation, lightness))
}
