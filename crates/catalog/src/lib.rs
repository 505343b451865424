//! Map dataset model and the registry that maps identifiers to datasets.
//!
//! Datasets are immutable once registered. Map instances receive them through
//! [`DatasetProvider`], never through global state.

pub mod dataset;
pub mod registry;

use std::sync::Arc;

pub use dataset::*;
pub use registry::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    NotFound(String),
    Parse(String),
    Io(String),
    Invalid { id: String, reason: String },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::NotFound(id) => write!(f, "map dataset '{id}' not registered"),
            CatalogError::Parse(msg) => write!(f, "map dataset parse error: {msg}"),
            CatalogError::Io(msg) => write!(f, "map dataset I/O error: {msg}"),
            CatalogError::Invalid { id, reason } => {
                write!(f, "map dataset '{id}' is invalid: {reason}")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// Read-only source of map datasets keyed by identifier.
pub trait DatasetProvider {
    fn dataset(&self, id: &str) -> Option<Arc<MapDataset>>;

    fn require(&self, id: &str) -> Result<Arc<MapDataset>, CatalogError> {
        self.dataset(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }
}
