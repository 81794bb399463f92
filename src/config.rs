//! Tunable engine parameters.
//!
//! Every run receives an [`EngineConfig`] value; nothing is read from globals
//! or the environment, so concurrent runs with different thresholds never
//! interfere.

/// Highest contrast minimum accepted. Pure black or pure white reaches at
/// least ~4.58:1 against any background, so every value up to this bound is
/// always satisfiable.
pub const MAX_REACHABLE_CONTRAST: f32 = 4.5;

/// Rejected configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {option} must be {expected}, got {value}")]
    InvalidConfiguration {
        option: &'static str,
        value: f32,
        expected: &'static str,
    },
}

/// Thresholds and scaling factors for one engine run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Lightness multiplier applied by the adjustment pass. Finite, > 0.
    pub brightness: f32,
    /// Saturation multiplier applied by the adjustment pass. Finite, >= 0.
    pub saturation: f32,
    /// CIE76 distance below which two samples are merged. [0, 100].
    pub merge_threshold: f32,
    /// Minimum background/foreground contrast ratio. [1, 4.5].
    pub min_readability: f32,
    /// Minimum contrast of every palette slot against the background. [1, 4.5].
    pub min_visibility: f32,
    /// Minimum CIE76 distance between two slots of the same tier. [0, 100].
    pub min_pairwise_distance: f32,
    /// Lightness added when deriving a bright slot. [0, 1].
    pub bright_lightness_boost: f32,
    /// Saturation added when deriving a bright slot. [0, 1].
    pub bright_saturation_boost: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            saturation: 1.0,
            merge_threshold: 5.0,
            min_readability: 4.5,
            min_visibility: 3.0,
            min_pairwise_distance: 10.0,
            bright_lightness_boost: 0.15,
            bright_saturation_boost: 0.10,
        }
    }
}

impl EngineConfig {
    /// Check every option against its documented range.
    ///
    /// Reports the first offending option.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check(
            "brightness",
            self.brightness,
            self.brightness > 0.0,
            "a finite number > 0",
        )?;
        check(
            "saturation",
            self.saturation,
            self.saturation >= 0.0,
            "a finite number >= 0",
        )?;
        check(
            "merge_threshold",
            self.merge_threshold,
            (0.0..=100.0).contains(&self.merge_threshold),
            "within [0, 100]",
        )?;
        check(
            "min_readability",
            self.min_readability,
            (1.0..=MAX_REACHABLE_CONTRAST).contains(&self.min_readability),
            "within [1, 4.5]",
        )?;
        check(
            "min_visibility",
            self.min_visibility,
            (1.0..=MAX_REACHABLE_CONTRAST).contains(&self.min_visibility),
            "within [1, 4.5]",
        )?;
        check(
            "min_pairwise_distance",
            self.min_pairwise_distance,
            (0.0..=100.0).contains(&self.min_pairwise_distance),
            "within [0, 100]",
        )?;
        check(
            "bright_lightness_boost",
            self.bright_lightness_boost,
            (0.0..=1.0).contains(&self.bright_lightness_boost),
            "within [0, 1]",
        )?;
        check(
            "bright_saturation_boost",
            self.bright_saturation_boost,
            (0.0..=1.0).contains(&self.bright_saturation_boost),
            "within [0, 1]",
        )?;
        Ok(())
    }

    /// True when the adjustment pass would leave every color untouched.
    pub fn is_identity_adjustment(&self) -> bool {
        self.brightness == 1.0 && self.saturation == 1.0
    }
}

fn check(
    option: &'static str,
    value: f32,
    in_range: bool,
    expected: &'static str,
) -> Result<(), ConfigError> {
    if value.is_finite() && in_range {
        Ok(())
    } else {
        Err(ConfigError::InvalidConfiguration {
            option,
            value,
            expected,
        })
    }
}
