use std::collections::BTreeMap;

use foundation::Aabb2;
use foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// The only projection family the engine implements (Miller cylindrical).
pub const MILLER_PROJECTION: &str = "mill";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionParams {
    #[serde(rename = "type", default = "default_projection_type")]
    pub kind: String,
    #[serde(default)]
    pub central_meridian: f64,
}

fn default_projection_type() -> String {
    MILLER_PROJECTION.to_string()
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            kind: default_projection_type(),
            central_meridian: 0.0,
        }
    }
}

/// One spatial sub-panel of a map.
///
/// `bbox` is in projected (pre-scale) units; `width`/`height`/`left`/`top`
/// place the panel in design space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inset {
    pub bbox: [Vec2; 2],
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
}

impl Inset {
    pub fn bbox(&self) -> Aabb2 {
        Aabb2::new(self.bbox[0], self.bbox[1])
    }

    /// Where this inset is drawn in design space.
    pub fn placement(&self) -> Aabb2 {
        Aabb2::from_origin_size(Vec2::new(self.left, self.top), self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionPath {
    /// Opaque path geometry handed to the rendering backend as-is.
    pub path: String,
    pub name: String,
    /// Design-space extent, used for focusing on regions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Aabb2>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDataset {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub projection: ProjectionParams,
    pub insets: Vec<Inset>,
    pub paths: BTreeMap<String, RegionPath>,
}

impl MapDataset {
    pub fn from_json_str(payload: &str) -> Result<Self, crate::CatalogError> {
        serde_json::from_str(payload).map_err(|e| crate::CatalogError::Parse(e.to_string()))
    }

    pub fn central_meridian(&self) -> f64 {
        self.projection.central_meridian
    }

    pub fn region(&self, code: &str) -> Option<&RegionPath> {
        self.paths.get(code)
    }

    pub fn region_name(&self, code: &str) -> Option<&str> {
        self.paths.get(code).map(|p| p.name.as_str())
    }

    /// Checks the structural invariants the projection code relies on.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(format!("width must be positive, got {}", self.width));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(format!("height must be positive, got {}", self.height));
        }
        if self.projection.kind != MILLER_PROJECTION {
            return Err(format!(
                "unsupported projection '{}' (only '{MILLER_PROJECTION}')",
                self.projection.kind
            ));
        }
        if !self.projection.central_meridian.is_finite() {
            return Err("central meridian must be finite".to_string());
        }
        if self.insets.is_empty() {
            return Err("at least one inset is required".to_string());
        }
        for (i, inset) in self.insets.iter().enumerate() {
            if !inset.bbox().is_valid() {
                return Err(format!("inset {i} has an empty or inverted bbox"));
            }
            if !(inset.width > 0.0 && inset.height > 0.0) {
                return Err(format!("inset {i} must have a positive size"));
            }
            if !(inset.left.is_finite() && inset.top.is_finite()) {
                return Err(format!("inset {i} has a non-finite offset"));
            }
        }
        Ok(())
    }
}
