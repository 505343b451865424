use std::fmt;

use catalog::CatalogError;
use foundation::ColorError;
use layers::ColorScaleError;
use viewport::ViewportError;

#[derive(Debug, Clone, PartialEq)]
pub enum MapError {
    UnknownMap(String),
    UnknownRegion(String),
    /// The region exists but its dataset entry carries no bbox to focus on.
    MissingRegionBounds(String),
    Catalog(CatalogError),
    Viewport(ViewportError),
    ColorScale(ColorScaleError),
    Color(ColorError),
    Options(String),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::UnknownMap(id) => write!(f, "no map dataset registered as '{id}'"),
            MapError::UnknownRegion(code) => write!(f, "unknown region '{code}'"),
            MapError::MissingRegionBounds(code) => {
                write!(f, "region '{code}' has no bbox in its dataset")
            }
            MapError::Catalog(e) => write!(f, "{e}"),
            MapError::Viewport(e) => write!(f, "{e}"),
            MapError::ColorScale(e) => write!(f, "{e}"),
            MapError::Color(e) => write!(f, "{e}"),
            MapError::Options(msg) => write!(f, "invalid map options: {msg}"),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Catalog(e) => Some(e),
            MapError::Viewport(e) => Some(e),
            MapError::ColorScale(e) => Some(e),
            MapError::Color(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CatalogError> for MapError {
    fn from(e: CatalogError) -> Self {
        MapError::Catalog(e)
    }
}

impl From<ViewportError> for MapError {
    fn from(e: ViewportError) -> Self {
        MapError::Viewport(e)
    }
}

impl From<ColorScaleError> for MapError {
    fn from(e: ColorScaleError) -> Self {
        MapError::ColorScale(e)
    }
}

impl From<ColorError> for MapError {
    fn from(e: ColorError) -> Self {
        MapError::Color(e)
    }
}
