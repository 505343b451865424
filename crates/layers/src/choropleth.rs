use std::collections::BTreeMap;

use foundation::Rgb;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ColorScale;

/// A per-region data point as it arrives in options payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Number(f64),
    Text(String),
    Missing,
}

impl DataValue {
    /// Numeric reading of the value; text is trimmed and parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Number(v) => Some(*v),
            DataValue::Text(s) => s.trim().parse::<f64>().ok(),
            DataValue::Missing => None,
        }
    }

    /// Values that take part in the domain: parseable, finite and non-zero.
    pub fn usable(&self) -> Option<f64> {
        self.as_f64().filter(|v| v.is_finite() && *v != 0.0)
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        DataValue::Number(v)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Scaled(Rgb),
    /// Render with the configured default region fill.
    Default,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Choropleth {
    pub fills: BTreeMap<String, Fill>,
    /// `(min, max)` computed from usable values, if any.
    pub domain: Option<(f64, f64)>,
}

/// Rebinds `scale`'s domain to the usable values and colors every code.
///
/// Zero, NaN and unparseable values are left out of the domain so a missing
/// data point cannot skew it; they map to [`Fill::Default`]. When no value is
/// usable the scale's domain is left as it was.
pub fn compute_fills(scale: &mut ColorScale, values: &BTreeMap<String, DataValue>) -> Choropleth {
    compute_fills_pinned(scale, values, None, None)
}

/// Like [`compute_fills`], but a `Some` bound replaces the derived one.
pub fn compute_fills_pinned(
    scale: &mut ColorScale,
    values: &BTreeMap<String, DataValue>,
    pin_min: Option<f64>,
    pin_max: Option<f64>,
) -> Choropleth {
    let mut domain: Option<(f64, f64)> = None;
    for v in values.values().filter_map(DataValue::usable) {
        domain = Some(match domain {
            None => (v, v),
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
        });
    }
    if let Some((min, max)) = domain {
        scale.set_min(min);
        scale.set_max(max);
    }
    if let Some(min) = pin_min {
        scale.set_min(min);
    }
    if let Some(max) = pin_max {
        scale.set_max(max);
    }
    if pin_min.is_some() || pin_max.is_some() {
        domain = Some((scale.min(), scale.max()));
    }

    let mut fills = BTreeMap::new();
    for (code, value) in values {
        let fill = match value.usable() {
            Some(v) => Fill::Scaled(scale.get_color(v)),
            None => {
                debug!(region = %code, ?value, "value excluded from color domain");
                Fill::Default
            }
        };
        fills.insert(code.clone(), fill);
    }

    Choropleth { fills, domain }
}
