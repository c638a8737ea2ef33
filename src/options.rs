use serde::Deserialize;

use crate::error::{PlyError, Result};

pub const DEFAULT_MAX_COORD: f64 = 250.0;
pub const DEFAULT_TARGET_SPAN: f64 = 20.0;

/// Keeps `2 * max_coord`, the widest possible extent, finite.
pub const MAX_MAX_COORD: f64 = f64::MAX / 2.0;
/// Output positions reach `+/-target_span / 2` and are stored as `f32`.
pub const MAX_TARGET_SPAN: f64 = 2.0 * f32::MAX as f64;

/// Tuning for the bounds filter and normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Vertices with `|x|`, `|y|` or `|z|` above this are dropped.
    pub max_coord: f64,
    /// Largest axis extent of the output; the default gives a +/-10 cube.
    pub target_span: f64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_coord: DEFAULT_MAX_COORD,
            target_span: DEFAULT_TARGET_SPAN,
        }
    }
}

impl ParseOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.max_coord > 0.0 && self.max_coord <= MAX_MAX_COORD) {
            return Err(PlyError::InvalidOptions(format!(
                "max_coord must be in (0, {MAX_MAX_COORD:e}], got {}",
                self.max_coord
            )));
        }
        if !(self.target_span > 0.0 && self.target_span <= MAX_TARGET_SPAN) {
            return Err(PlyError::InvalidOptions(format!(
                "target_span must be in (0, {MAX_TARGET_SPAN:e}], got {}",
                self.target_span
            )));
        }
        Ok(())
    }
}
