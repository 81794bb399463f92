use std::path::PathBuf;

use clap::Parser;

use crate::backends::ghostty::GhosttyBackend;
use crate::backends::warp::WarpBackend;
use crate::backends::zellij::ZellijBackend;
use crate::backends::ThemeBackend;
use crate::config::EngineConfig;
use crate::scan::DEFAULT_IMAGE_COLORS;

/// Generate terminal color themes from a saved website snapshot.
#[derive(Parser, Debug)]
#[command(name = "web-themer", version, about)]
pub struct Args {
    /// Snapshot directory (HTML, CSS and images) or a single page file
    pub source: String,

    /// Theme name (defaults to the snapshot's file stem)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Output theme format
    #[arg(short, long, value_enum, default_value_t = Format::Warp)]
    pub format: Format,

    /// Write theme to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Install theme into the terminal's themes directory
    #[arg(long, conflicts_with = "output")]
    pub install: bool,

    /// Lightness multiplier applied to every color
    #[arg(long, default_value_t = 1.0)]
    pub brightness: f32,

    /// Saturation multiplier applied to every color
    #[arg(long, default_value_t = 1.0)]
    pub saturation: f32,

    /// Perceptual distance below which samples are merged
    #[arg(long, default_value_t = 5.0)]
    pub merge_threshold: f32,

    /// Minimum foreground contrast ratio against the background
    #[arg(long, default_value_t = 4.5)]
    pub min_contrast: f32,

    /// Minimum contrast ratio of every palette slot against the background
    #[arg(long, default_value_t = 3.0)]
    pub min_visibility: f32,

    /// Minimum perceptual distance between slots of one tier
    #[arg(long, default_value_t = 10.0)]
    pub min_distance: f32,

    /// Number of K-means clusters per image
    #[arg(short = 'k', long = "colors", default_value_t = DEFAULT_IMAGE_COLORS)]
    pub colors: usize,

    /// Use the largest page image as the theme's background image
    #[arg(long)]
    pub extract_background: bool,

    /// Background image opacity (0 to 1)
    #[arg(long, default_value_t = 1.0)]
    pub opacity: f32,

    /// Log pipeline decisions to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Warp,
    Ghostty,
    Zellij,
}

impl Format {
    pub fn backend(self) -> Box<dyn ThemeBackend> {
        match self {
            Format::Warp => Box::new(WarpBackend),
            Format::Ghostty => Box::new(GhosttyBackend),
            Format::Zellij => Box::new(ZellijBackend),
        }
    }
}

impl Args {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            brightness: self.brightness,
            saturation: self.saturation,
            merge_threshold: self.merge_threshold,
            min_readability: self.min_contrast,
            min_visibility: self.min_visibility,
            min_pairwise_distance: self.min_distance,
            ..Default::default()
        }
    }

    /// `--name`, or the source's file stem title-cased (`my-site` → `My Site`).
    pub fn theme_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let stem = std::path::Path::new(self.source.trim_end_matches(['/', '\\']))
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let title = title_case(stem);
        if title.is_empty() {
            "Web Theme".to_string()
        } else {
            title
        }
    }
}

fn title_case(stem: &str) -> String {
    stem.split(|c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("web-themer").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_engine_defaults() {
        let args = parse(&["site"]);
        assert_eq!(args.format, Format::Warp);
        assert_eq!(args.colors, DEFAULT_IMAGE_COLORS);
        assert_eq!(args.engine_config(), EngineConfig::default());
    }

    #[test]
    fn flags_flow_into_config() {
        let args = parse(&[
            "site",
            "--brightness",
            "1.2",
            "--saturation",
            "0.9",
            "--min-distance",
            "12",
        ]);
        let config = args.engine_config();
        assert_eq!(config.brightness, 1.2);
        assert_eq!(config.saturation, 0.9);
        assert_eq!(config.min_pairwise_distance, 12.0);
    }

    #[test]
    fn install_conflicts_with_output() {
        let result = Args::try_parse_from(["web-themer", "site", "--install", "-o", "x.yaml"]);
        assert!(result.is_err());
    }

    #[test]
    fn theme_name_from_stem() {
        assert_eq!(parse(&["/tmp/snapshots/my-cool_site/"]).theme_name(), "My Cool Site");
        assert_eq!(parse(&["example.com.html"]).theme_name(), "Example Com");
        assert_eq!(parse(&["x", "--name", "Custom"]).theme_name(), "Custom");
    }

    #[test]
    fn format_selects_backend() {
        assert_eq!(Format::Warp.backend().name(), "Warp");
        assert_eq!(Format::Ghostty.backend().name(), "Ghostty");
        assert_eq!(Format::Zellij.backend().extension(), ".kdl");
    }
}
