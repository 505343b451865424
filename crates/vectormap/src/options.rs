use std::collections::BTreeMap;

use foundation::Rgb;
use layers::{DataValue, NormalizeKind};
use scene::components::{StateStyles, Style};
use serde::{Deserialize, Serialize};
use viewport::{DEFAULT_ZOOM_MAX_STEP, DEFAULT_ZOOM_STEP, ZoomConfig};

use crate::MapError;

pub const DEFAULT_BACKGROUND_COLOR: &str = "#505050";
pub const DEFAULT_SCALE_COLORS: [Rgb; 2] = [Rgb::new(0xb6, 0xd6, 0xff), Rgb::new(0x00, 0x5a, 0xce)];

/// A marker as written in options: either a bare `[lat, lng]` pair or a
/// config object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkerSpec {
    Point([f64; 2]),
    Config(MarkerConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerConfig {
    pub lat_lng: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Per-marker overrides of the initial style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
}

impl MarkerSpec {
    pub fn lat_lng(&self) -> [f64; 2] {
        match self {
            MarkerSpec::Point(p) => *p,
            MarkerSpec::Config(c) => c.lat_lng,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            MarkerSpec::Point(_) => None,
            MarkerSpec::Config(c) => c.name.as_deref(),
        }
    }

    pub fn style(&self) -> Option<&Style> {
        match self {
            MarkerSpec::Point(_) => None,
            MarkerSpec::Config(c) => c.style.as_ref(),
        }
    }
}

impl From<[f64; 2]> for MarkerSpec {
    fn from(p: [f64; 2]) -> Self {
        MarkerSpec::Point(p)
    }
}

/// Programmatic viewport positioning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FocusOption {
    /// `scale` relative to the fit; `x`/`y` are fractions of the map size.
    Point { scale: f64, x: f64, y: f64 },
    /// Fit the union of these regions' bounding boxes.
    Regions { regions: Vec<String> },
}

/// Construction options, deserializable from the camelCase JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapOptions {
    /// Dataset identifier in the provider.
    pub map: String,
    pub background_color: String,
    /// Initial per-region fill overrides.
    pub colors: BTreeMap<String, String>,
    /// Per-region data driving the color scale.
    pub values: BTreeMap<String, DataValue>,
    pub scale_colors: Vec<Rgb>,
    pub normalize_function: NormalizeKind,
    /// Pins the lower end of the color domain instead of deriving it.
    pub value_min: Option<f64>,
    pub value_max: Option<f64>,
    pub markers: Vec<MarkerSpec>,
    /// Overlaid on the built-in marker styles.
    pub marker_style: StateStyles,
    /// Overlaid on the built-in region styles.
    pub region_style: StateStyles,
    pub regions_selectable: bool,
    pub markers_selectable: bool,
    pub focus: Option<FocusOption>,
    pub zoom_step: f64,
    pub zoom_max_step: u32,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            map: String::new(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            colors: BTreeMap::new(),
            values: BTreeMap::new(),
            scale_colors: DEFAULT_SCALE_COLORS.to_vec(),
            normalize_function: NormalizeKind::Linear,
            value_min: None,
            value_max: None,
            markers: Vec::new(),
            marker_style: StateStyles::default(),
            region_style: StateStyles::default(),
            regions_selectable: false,
            markers_selectable: false,
            focus: None,
            zoom_step: DEFAULT_ZOOM_STEP,
            zoom_max_step: DEFAULT_ZOOM_MAX_STEP,
        }
    }
}

impl MapOptions {
    pub fn for_map(map: impl Into<String>) -> Self {
        Self {
            map: map.into(),
            ..Self::default()
        }
    }

    pub fn from_json_str(payload: &str) -> Result<Self, MapError> {
        serde_json::from_str(payload).map_err(|e| MapError::Options(e.to_string()))
    }

    pub fn zoom(&self) -> Result<ZoomConfig, MapError> {
        Ok(ZoomConfig::new(self.zoom_step, self.zoom_max_step)?)
    }

    pub fn region_styles(&self) -> StateStyles {
        StateStyles::region_defaults().merged(&self.region_style)
    }

    pub fn marker_styles(&self) -> StateStyles {
        StateStyles::marker_defaults().merged(&self.marker_style)
    }
}
