use std::fmt;
use std::sync::Arc;

use foundation::Rgb;
use serde::{Deserialize, Serialize};

/// Maps a raw value into `[0, 1]` given the domain `[min, max]`.
pub type NormalizeFn = dyn Fn(f64, f64, f64) -> f64 + Send + Sync;

/// Exponent of the polynomial normalization, which compresses large outliers.
pub const POLYNOMIAL_EXPONENT: f64 = 0.2;

#[derive(Clone, Default)]
pub enum NormalizeFunction {
    #[default]
    Linear,
    /// `x^0.2` on value and domain before linear normalization.
    Polynomial,
    Custom(Arc<NormalizeFn>),
}

impl NormalizeFunction {
    pub fn custom(f: impl Fn(f64, f64, f64) -> f64 + Send + Sync + 'static) -> Self {
        NormalizeFunction::Custom(Arc::new(f))
    }

    /// Normalized position of `value`, clamped to `[0, 1]`.
    ///
    /// A degenerate domain (`max <= min`) puts values at or above `max` at the
    /// top of the scale and everything else at the bottom.
    pub fn apply(&self, value: f64, min: f64, max: f64) -> f64 {
        let t = match self {
            NormalizeFunction::Linear => linear(value, min, max),
            NormalizeFunction::Polynomial => {
                let p = |v: f64| v.signum() * v.abs().powf(POLYNOMIAL_EXPONENT);
                linear(p(value), p(min), p(max))
            }
            NormalizeFunction::Custom(f) => f(value, min, max),
        };
        if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
    }
}

fn linear(value: f64, min: f64, max: f64) -> f64 {
    if max <= min {
        return if value >= max { 1.0 } else { 0.0 };
    }
    (value - min) / (max - min)
}

impl fmt::Debug for NormalizeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeFunction::Linear => f.write_str("Linear"),
            NormalizeFunction::Polynomial => f.write_str("Polynomial"),
            NormalizeFunction::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Serializable names for the built-in normalizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizeKind {
    #[default]
    Linear,
    Polynomial,
}

impl From<NormalizeKind> for NormalizeFunction {
    fn from(kind: NormalizeKind) -> Self {
        match kind {
            NormalizeKind::Linear => NormalizeFunction::Linear,
            NormalizeKind::Polynomial => NormalizeFunction::Polynomial,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorScaleError {
    NoStops,
}

impl fmt::Display for ColorScaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorScaleError::NoStops => write!(f, "color scale needs at least one color stop"),
        }
    }
}

impl std::error::Error for ColorScaleError {}

/// Evenly spaced color stops over a numeric domain.
#[derive(Debug, Clone)]
pub struct ColorScale {
    colors: Vec<Rgb>,
    min: f64,
    max: f64,
    normalize: NormalizeFunction,
}

impl ColorScale {
    pub fn new(colors: Vec<Rgb>) -> Result<Self, ColorScaleError> {
        if colors.is_empty() {
            return Err(ColorScaleError::NoStops);
        }
        Ok(Self {
            colors,
            min: 0.0,
            max: 1.0,
            normalize: NormalizeFunction::Linear,
        })
    }

    pub fn with_domain(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_normalize(mut self, normalize: NormalizeFunction) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn normalize_function(&self) -> &NormalizeFunction {
        &self.normalize
    }

    pub fn set_min(&mut self, min: f64) {
        self.min = min;
    }

    pub fn set_max(&mut self, max: f64) {
        self.max = max;
    }

    pub fn set_colors(&mut self, colors: Vec<Rgb>) -> Result<(), ColorScaleError> {
        if colors.is_empty() {
            return Err(ColorScaleError::NoStops);
        }
        self.colors = colors;
        Ok(())
    }

    pub fn set_normalize_function(&mut self, normalize: NormalizeFunction) {
        self.normalize = normalize;
    }

    pub fn normalize(&self, value: f64) -> f64 {
        self.normalize.apply(value, self.min, self.max)
    }

    /// Interpolates between the two stops bracketing `t * (stops - 1)`.
    pub fn get_color(&self, value: f64) -> Rgb {
        let last = self.colors.len() - 1;
        if last == 0 {
            return self.colors[0];
        }
        let pos = self.normalize(value) * last as f64;
        let lower = (pos.floor() as usize).min(last - 1);
        let frac = pos - lower as f64;
        self.colors[lower].lerp(self.colors[lower + 1], frac)
    }
}

#[cfg(test)]
mod tests {
    use super::{ColorScale, ColorScaleError, NormalizeFunction, NormalizeKind};
    use foundation::Rgb;
    use pretty_assertions::assert_eq;

    fn gray_scale() -> ColorScale {
        ColorScale::new(vec![Rgb::WHITE, Rgb::BLACK])
            .unwrap()
            .with_domain(0.0, 10.0)
    }

    #[test]
    fn midpoint_is_mid_gray() {
        assert_eq!(gray_scale().get_color(5.0), Rgb::new(128, 128, 128));
    }

    #[test]
    fn endpoints_and_out_of_domain_clamp() {
        let s = gray_scale();
        assert_eq!(s.get_color(0.0), Rgb::WHITE);
        assert_eq!(s.get_color(10.0), Rgb::BLACK);
        assert_eq!(s.get_color(-3.0), Rgb::WHITE);
        assert_eq!(s.get_color(99.0), Rgb::BLACK);
        assert_eq!(s.get_color(f64::NAN), Rgb::WHITE);
    }

    #[test]
    fn three_stops_bracket_correctly() {
        let s = ColorScale::new(vec![
            Rgb::new(255, 0, 0),
            Rgb::new(0, 255, 0),
            Rgb::new(0, 0, 255),
        ])
        .unwrap()
        .with_domain(0.0, 100.0);
        assert_eq!(s.get_color(50.0), Rgb::new(0, 255, 0));
        assert_eq!(s.get_color(25.0), Rgb::new(128, 128, 0));
        assert_eq!(s.get_color(75.0), Rgb::new(0, 128, 128));
        assert_eq!(s.get_color(100.0), Rgb::new(0, 0, 255));
    }

    #[test]
    fn single_stop_is_constant() {
        let s = ColorScale::new(vec![Rgb::new(1, 2, 3)]).unwrap();
        assert_eq!(s.get_color(-1.0), Rgb::new(1, 2, 3));
        assert_eq!(s.get_color(1e9), Rgb::new(1, 2, 3));
    }

    #[test]
    fn degenerate_domain_puts_value_at_top() {
        let s = gray_scale().with_domain(10.0, 10.0);
        assert_eq!(s.get_color(10.0), Rgb::BLACK);
        assert_eq!(s.get_color(9.0), Rgb::WHITE);
    }

    #[test]
    fn polynomial_lifts_small_values() {
        let lin = gray_scale().with_domain(0.0, 1000.0);
        let poly = lin.clone().with_normalize(NormalizeFunction::Polynomial);
        assert!(poly.normalize(10.0) > lin.normalize(10.0));
        assert_eq!(poly.normalize(1000.0), 1.0);
        assert_eq!(poly.normalize(0.0), 0.0);
    }

    #[test]
    fn custom_normalize_is_clamped() {
        let s = gray_scale().with_normalize(NormalizeFunction::custom(|v, _, _| v));
        assert_eq!(s.normalize(0.25), 0.25);
        assert_eq!(s.normalize(7.0), 1.0);
    }

    #[test]
    fn empty_stops_are_rejected() {
        assert_eq!(ColorScale::new(vec![]).unwrap_err(), ColorScaleError::NoStops);
        let mut s = gray_scale();
        assert!(s.set_colors(vec![]).is_err());
        assert_eq!(s.colors().len(), 2);
    }

    #[test]
    fn normalize_kind_names() {
        let k: NormalizeKind = serde_json::from_str("\"polynomial\"").unwrap();
        assert_eq!(k, NormalizeKind::Polynomial);
        assert!(matches!(
            NormalizeFunction::from(NormalizeKind::Linear),
            NormalizeFunction::Linear
        ));
    }
}
