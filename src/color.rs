use anyhow::{bail, Result};
use palette::{FromColor, Hsl, IntoColor, Lab, Srgb};

/// Core color type used throughout the engine.
/// Wraps sRGB u8 components and provides conversions to HSL and CIELAB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string like `#ff8800`, `#FF8800` or the short form `#f80`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            bail!("invalid hex color: non-ASCII input");
        }
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16)?;
                let g = u8::from_str_radix(&hex[2..4], 16)?;
                let b = u8::from_str_radix(&hex[4..6], 16)?;
                Ok(Self { r, g, b })
            }
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16)?;
                let g = u8::from_str_radix(&hex[1..2], 16)?;
                let b = u8::from_str_radix(&hex[2..3], 16)?;
                Ok(Self {
                    r: r * 17,
                    g: g * 17,
                    b: b * 17,
                })
            }
            n => bail!("invalid hex color: expected 3 or 6 hex digits, got {n}"),
        }
    }

    /// Serialize to lowercase hex `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn to_srgb_f32(self) -> Srgb<f32> {
        Srgb::new(self.r, self.g, self.b).into_format()
    }

    /// Convert to CIELAB (for deduplication and distinguishability checks).
    pub fn to_lab(self) -> Lab {
        self.to_srgb_f32().into_color()
    }

    /// Create from CIELAB.
    pub fn from_lab(lab: Lab) -> Self {
        let srgb_f32: Srgb<f32> = Srgb::from_color(lab);
        Self::from_srgb_f32_clamped(srgb_f32)
    }

    /// Convert to HSL. Hue in degrees, saturation and lightness in [0, 1].
    pub fn to_hsl(self) -> Hsl {
        self.to_srgb_f32().into_color()
    }

    /// Create from HSL. Saturation and lightness are clamped to [0, 1].
    pub fn from_hsl(hsl: Hsl) -> Self {
        let hsl = Hsl::new(
            hsl.hue,
            hsl.saturation.clamp(0.0, 1.0),
            hsl.lightness.clamp(0.0, 1.0),
        );
        let srgb_f32: Srgb<f32> = Srgb::from_color(hsl);
        Self::from_srgb_f32_clamped(srgb_f32)
    }

    /// Hue in positive degrees `[0, 360)`.
    pub fn hue(self) -> f32 {
        self.to_hsl().hue.into_positive_degrees()
    }

    /// Replace HSL lightness, keeping hue and saturation.
    pub fn with_lightness(self, lightness: f32) -> Color {
        let mut hsl = self.to_hsl();
        hsl.lightness = lightness;
        Color::from_hsl(hsl)
    }

    /// Replace Lab lightness (0..=100), keeping the a/b chroma axes.
    pub fn with_lab_lightness(self, lightness: f32) -> Color {
        let mut lab = self.to_lab();
        lab.l = lightness.clamp(0.0, 100.0);
        Color::from_lab(lab)
    }

    /// Lab chroma, the distance from the neutral axis.
    pub fn chroma(self) -> f32 {
        let lab = self.to_lab();
        lab.a.hypot(lab.b)
    }

    /// Clamp an Srgb<f32> to [0, 1] and convert to Color.
    fn from_srgb_f32_clamped(srgb: Srgb<f32>) -> Self {
        let r = (srgb.red.clamp(0.0, 1.0) * 255.0).round() as u8;
        let g = (srgb.green.clamp(0.0, 1.0) * 255.0).round() as u8;
        let b = (srgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { r, g, b }
    }

    /// WCAG 2.0 relative luminance.
    ///
    /// Linearizes each sRGB channel, then computes the weighted sum.
    pub fn relative_luminance(self) -> f32 {
        fn linearize(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        let r = linearize(self.r);
        let g = linearize(self.g);
        let b = linearize(self.b);
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }

    /// WCAG 2.0 contrast ratio between two colors.
    ///
    /// Returns a value in [1, 21]. Higher means more contrast.
    pub fn contrast_ratio(c1: &Color, c2: &Color) -> f32 {
        let l1 = c1.relative_luminance();
        let l2 = c2.relative_luminance();
        let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
        (lighter + 0.05) / (darker + 0.05)
    }

    /// CIE76 color difference: Euclidean distance in CIELAB.
    pub fn perceptual_distance(c1: &Color, c2: &Color) -> f32 {
        if c1 == c2 {
            return 0.0;
        }
        let a = c1.to_lab();
        let b = c2.to_lab();
        ((a.l - b.l).powi(2) + (a.a - b.a).powi(2) + (a.b - b.b).powi(2)).sqrt()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Color = Color::BLACK;
    const WHITE: Color = Color::WHITE;

    fn assert_close(original: Color, recovered: Color) {
        for (a, b, channel) in [
            (original.r, recovered.r, "R"),
            (original.g, recovered.g, "G"),
            (original.b, recovered.b, "B"),
        ] {
            assert!(
                (a as i16 - b as i16).unsigned_abs() <= 1,
                "{channel} mismatch for {original:?}: {a} vs {b}"
            );
        }
    }

    #[test]
    fn hex_round_trip() {
        let original = Color::from_hex("#ff8800").unwrap();
        assert_eq!(original.r, 255);
        assert_eq!(original.g, 136);
        assert_eq!(original.b, 0);
        assert_eq!(original.to_hex(), "#ff8800");
    }

    #[test]
    fn hex_uppercase_input() {
        let color = Color::from_hex("#FF8800").unwrap();
        assert_eq!(color.to_hex(), "#ff8800");
    }

    #[test]
    fn hex_without_hash() {
        let color = Color::from_hex("aabbcc").unwrap();
        assert_eq!(color.to_hex(), "#aabbcc");
    }

    #[test]
    fn hex_short_form_expands() {
        let color = Color::from_hex("#f80").unwrap();
        assert_eq!(color, Color::new(255, 136, 0));
    }

    #[test]
    fn hex_invalid_length() {
        assert!(Color::from_hex("#ffff").is_err());
    }

    #[test]
    fn hex_invalid_chars() {
        assert!(Color::from_hex("#gggggg").is_err());
    }

    #[test]
    fn hex_non_ascii_is_rejected() {
        assert!(Color::from_hex("#ffé").is_err());
    }

    #[test]
    fn srgb_to_lab_round_trip() {
        let colors = [
            Color::new(200, 100, 50),
            Color::new(0, 255, 0),
            Color::new(128, 128, 128),
            BLACK,
            WHITE,
        ];
        for original in colors {
            assert_close(original, Color::from_lab(original.to_lab()));
        }
    }

    #[test]
    fn srgb_to_hsl_round_trip() {
        let colors = [
            Color::new(200, 100, 50),
            Color::new(0, 255, 0),
            Color::new(18, 18, 18),
            Color::new(1, 2, 3),
            BLACK,
            WHITE,
        ];
        for original in colors {
            assert_close(original, Color::from_hsl(original.to_hsl()));
        }
    }

    #[test]
    fn hsl_components_for_pure_red() {
        let hsl = Color::new(255, 0, 0).to_hsl();
        assert!(hsl.hue.into_positive_degrees().abs() < 0.5);
        assert!((hsl.saturation - 1.0).abs() < 1e-4);
        assert!((hsl.lightness - 0.5).abs() < 1e-3);
    }

    #[test]
    fn lightness_extremes_hit_black_and_white() {
        let red = Color::new(220, 40, 40);
        assert_eq!(red.with_lightness(0.0), BLACK);
        assert_eq!(red.with_lightness(1.0), WHITE);
    }

    #[test]
    fn hue_of_blue_is_240() {
        let hue = Color::new(0, 0, 255).hue();
        assert!((hue - 240.0).abs() < 0.5, "got {hue}");
    }

    #[test]
    fn contrast_ratio_black_white() {
        let ratio = Color::contrast_ratio(&BLACK, &WHITE);
        assert!(
            (ratio - 21.0).abs() < 0.1,
            "black/white contrast should be ~21:1, got {ratio}"
        );
    }

    #[test]
    fn contrast_ratio_same_color() {
        let gray = Color::new(128, 128, 128);
        let ratio = Color::contrast_ratio(&gray, &gray);
        assert!(
            (ratio - 1.0).abs() < 0.001,
            "same color contrast should be 1:1, got {ratio}"
        );
    }

    #[test]
    fn contrast_ratio_is_symmetric() {
        let a = Color::new(200, 50, 50);
        let b = Color::new(50, 200, 50);
        let ratio_ab = Color::contrast_ratio(&a, &b);
        let ratio_ba = Color::contrast_ratio(&b, &a);
        assert!(
            (ratio_ab - ratio_ba).abs() < 0.001,
            "contrast ratio should be symmetric: {ratio_ab} vs {ratio_ba}"
        );
    }

    #[test]
    fn contrast_ratio_mid_gray_vs_black() {
        // sRGB(119,119,119) has relative luminance ~0.184
        let gray = Color::new(119, 119, 119);
        let ratio = Color::contrast_ratio(&gray, &BLACK);
        assert!(
            ratio > 4.5 && ratio < 5.0,
            "mid-gray vs black should be ~4.7:1, got {ratio}"
        );
    }

    #[test]
    fn relative_luminance_black() {
        assert!(BLACK.relative_luminance() < 0.001);
    }

    #[test]
    fn relative_luminance_white() {
        assert!((WHITE.relative_luminance() - 1.0).abs() < 0.001);
    }

    #[test]
    fn perceptual_distance_identity_and_symmetry() {
        let a = Color::new(30, 120, 200);
        let b = Color::new(200, 120, 30);
        assert_eq!(Color::perceptual_distance(&a, &a), 0.0);
        let ab = Color::perceptual_distance(&a, &b);
        let ba = Color::perceptual_distance(&b, &a);
        assert!((ab - ba).abs() < 1e-4);
        assert!(ab > 50.0, "blue vs orange should be far apart, got {ab}");
    }

    #[test]
    fn perceptual_distance_black_white_is_about_100() {
        let d = Color::perceptual_distance(&BLACK, &WHITE);
        assert!((d - 100.0).abs() < 1.0, "got {d}");
    }

    #[test]
    fn lab_lightness_keeps_chroma() {
        let navy = Color::new(20, 22, 31);
        let lifted = navy.with_lab_lightness(50.0);
        assert!((lifted.to_lab().l - 50.0).abs() < 1.0);
        assert!((lifted.chroma() - navy.chroma()).abs() < 1.5);
        assert_eq!(Color::new(128, 128, 128).with_lab_lightness(100.0), WHITE);
    }

    #[test]
    fn display_matches_to_hex() {
        let color = Color::new(171, 205, 239);
        assert_eq!(format!("{color}"), color.to_hex());
    }
}
