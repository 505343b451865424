use serde::{Deserialize, Serialize};

use crate::ViewportError;

pub const DEFAULT_ZOOM_STEP: f64 = 1.4;
pub const DEFAULT_ZOOM_MAX_STEP: u32 = 4;

/// Discrete zoom ladder: each step multiplies the scale by `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    pub step: f64,
    pub max_step: u32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_ZOOM_STEP,
            max_step: DEFAULT_ZOOM_MAX_STEP,
        }
    }
}

impl ZoomConfig {
    pub fn new(step: f64, max_step: u32) -> Result<Self, ViewportError> {
        let cfg = Self { step, max_step };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ViewportError> {
        let flat = !(self.step.is_finite() && self.step > 1.0);
        if flat || self.max_step < 1 || !self.max_factor().is_finite() {
            return Err(ViewportError::InvalidZoom {
                step: self.step,
                max_step: self.max_step,
            });
        }
        Ok(())
    }

    /// Scale multiplier (relative to the fit) at zoom level `cur_step`.
    pub fn factor_at(&self, cur_step: u32) -> f64 {
        let exp = i32::try_from(cur_step.saturating_sub(1)).unwrap_or(i32::MAX);
        self.step.powi(exp)
    }

    /// Largest scale multiplier reachable on the ladder.
    pub fn max_factor(&self) -> f64 {
        self.factor_at(self.max_step)
    }

    /// Highest ladder level whose factor does not exceed `factor`, clamped
    /// to the ladder.
    pub fn step_below(&self, factor: f64) -> u32 {
        if !(factor.is_finite() && factor > 0.0) {
            return 1;
        }
        let level = (factor.ln() / self.step.ln() + 1e-9).floor() + 1.0;
        (level.max(1.0) as u32).clamp(1, self.max_step.max(1))
    }
}
