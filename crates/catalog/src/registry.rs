use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::{CatalogError, DatasetProvider, MapDataset};

#[derive(Debug, Clone)]
struct RegistryEntry {
    dataset: Arc<MapDataset>,
    /// blake3 hex digest of the JSON payload, when registered from bytes.
    fingerprint: Option<String>,
}

/// Explicit identifier → dataset registry.
///
/// Lifecycle: create once, register every dataset up front, then hand a
/// reference to map construction. Lookups return shared read-only datasets.
#[derive(Debug, Default, Clone)]
pub struct MapRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl MapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores `dataset` under `id`, replacing any previous entry.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        dataset: MapDataset,
    ) -> Result<Arc<MapDataset>, CatalogError> {
        self.insert(id.into(), dataset, None)
    }

    pub fn register_json(
        &mut self,
        id: impl Into<String>,
        payload: &str,
    ) -> Result<Arc<MapDataset>, CatalogError> {
        let dataset = MapDataset::from_json_str(payload)?;
        let fingerprint = blake3::hash(payload.as_bytes()).to_hex().to_string();
        self.insert(id.into(), dataset, Some(fingerprint))
    }

    pub fn load_file(
        &mut self,
        id: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Arc<MapDataset>, CatalogError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(format!("read {}: {e}", path.display())))?;
        self.register_json(id, &payload)
    }

    pub fn get(&self, id: &str) -> Option<Arc<MapDataset>> {
        self.entries.get(id).map(|e| Arc::clone(&e.dataset))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Registered identifiers in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn fingerprint(&self, id: &str) -> Option<&str> {
        self.entries.get(id).and_then(|e| e.fingerprint.as_deref())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(
        &mut self,
        id: String,
        dataset: MapDataset,
        fingerprint: Option<String>,
    ) -> Result<Arc<MapDataset>, CatalogError> {
        dataset.validate().map_err(|reason| CatalogError::Invalid {
            id: id.clone(),
            reason,
        })?;
        let dataset = Arc::new(dataset);
        info!(
            map = %id,
            regions = dataset.paths.len(),
            insets = dataset.insets.len(),
            "registered map dataset"
        );
        let prev = self.entries.insert(
            id.clone(),
            RegistryEntry {
                dataset: Arc::clone(&dataset),
                fingerprint,
            },
        );
        if prev.is_some() {
            debug!(map = %id, "replaced previously registered dataset");
        }
        Ok(dataset)
    }
}

impl DatasetProvider for MapRegistry {
    fn dataset(&self, id: &str) -> Option<Arc<MapDataset>> {
        self.get(id)
    }
}
