//! Theme file formats.

pub mod ghostty;
pub mod warp;
pub mod zellij;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::theme::Theme;

/// A terminal emulator theme format.
pub trait ThemeBackend {
    /// Human-readable name of the target program.
    fn name(&self) -> &str;

    /// File extension including the dot, or an empty string.
    fn extension(&self) -> &str;

    /// Directory the target program loads themes from.
    fn themes_dir(&self) -> Result<PathBuf>;

    /// Render the theme in this format.
    fn serialize(&self, theme: &Theme) -> Result<String>;

    /// Write the theme to an arbitrary path.
    fn write_to(&self, theme: &Theme, path: &Path) -> Result<()> {
        std::fs::write(path, self.serialize(theme)?)
            .with_context(|| format!("failed to write theme to {}", path.display()))?;
        Ok(())
    }

    /// Write the theme into `dir`, creating it if needed. Returns the file path.
    fn install_into(&self, theme: &Theme, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create themes directory: {}", dir.display()))?;
        let path = dir.join(format!("{}{}", sanitize_filename(&theme.name), self.extension()));
        self.write_to(theme, &path)?;
        Ok(path)
    }

    /// Install into [`ThemeBackend::themes_dir`].
    fn install(&self, theme: &Theme) -> Result<PathBuf> {
        let dir = self.themes_dir()?;
        self.install_into(theme, &dir)
    }
}

/// Turn a theme name into a safe file stem: alphanumerics, `_` and `-` kept,
/// whitespace becomes `_`, the rest is dropped. Lowercased; prefixed with
/// `theme_` when empty or starting with `-`.
pub fn sanitize_filename(name: &str) -> String {
    let mut sanitized: String = name
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                Some(c)
            } else if c.is_whitespace() {
                Some('_')
            } else {
                None
            }
        })
        .collect();
    if sanitized.is_empty() || sanitized.starts_with('-') {
        sanitized.insert_str(0, "theme_");
    }
    sanitized.to_lowercase()
}

fn home_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .context("HOME is not set; use --output instead of --install")
}

/// `$XDG_CONFIG_HOME`, falling back to `~/.config`.
fn config_home() -> Result<PathBuf> {
    match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => Ok(home_dir()?.join(".config")),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_spaces_and_drops_symbols() {
        assert_eq!(sanitize_filename("My Cool Site!"), "my_cool_site");
        assert_eq!(sanitize_filename("a/b\\c"), "abc");
    }

    #[test]
    fn sanitize_prefixes_empty_and_dash() {
        assert_eq!(sanitize_filename("***"), "theme_");
        assert_eq!(sanitize_filename("-dash"), "theme_-dash");
    }

    #[test]
    fn install_into_uses_sanitized_name_and_extension() {
        let dir = std::env::temp_dir().join("web-themer-test-install-into");
        let _ = std::fs::remove_dir_all(&dir);
        let theme = test_support::sample_theme("Example Site");

        let path = warp::WarpBackend.install_into(&theme, &dir).unwrap();
        assert_eq!(path, dir.join("example_site.yaml"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, warp::WarpBackend.serialize(&theme).unwrap());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
