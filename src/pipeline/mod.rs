//! The color engine: samples in, roles and palette out.
//!
//! Stages run strictly in order and each produces a new value:
//! [`aggregate`] → [`roles`] → [`assign`] → [`adjust`].

pub mod adjust;
pub mod aggregate;
pub mod assign;
pub mod contrast;
pub mod roles;

use tracing::debug;

use crate::config::{ConfigError, EngineConfig};
use crate::theme::ThemeWarning;

use aggregate::ColorSample;
use assign::Palette;
use roles::RoleAssignment;

/// Everything the engine derives from one set of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutput {
    pub roles: RoleAssignment,
    pub palette: Palette,
    pub warnings: Vec<ThemeWarning>,
}

/// Run every stage over `samples`.
///
/// The configuration is validated first; after that the run cannot fail.
pub fn run(samples: &[ColorSample], config: &EngineConfig) -> Result<EngineOutput, ConfigError> {
    config.validate()?;

    let pool = aggregate::aggregate(samples, config);
    let roles = roles::select_roles(&pool, config);
    let synthesis = assign::assign_slots(&pool, &roles, config);
    let adjusted = adjust::adjust(&synthesis.palette, &roles, config);

    // Distinguishability warnings from synthesis describe a palette the
    // adjustment pass has since rebuilt.
    let mut warnings = synthesis.warnings;
    if adjusted.applied {
        warnings.retain(|w| !w.is_indistinct());
    }
    warnings.extend(adjusted.warnings);

    debug!(
        samples = samples.len(),
        warnings = warnings.len(),
        "engine run complete"
    );

    Ok(EngineOutput {
        roles: adjusted.roles,
        palette: adjusted.palette,
        warnings,
    })
}
