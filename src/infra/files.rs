//! Loading snapshots and tile catalogs from disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use mapprint_api_types::WmtsLayer;
use tracing::debug;

use crate::domain::catalog::TileCatalog;
use crate::domain::snapshot::MapSnapshot;

use super::error::InfraError;

pub fn read_snapshot(path: &Path) -> Result<MapSnapshot, InfraError> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|err| InfraError::snapshot(path.display().to_string(), err.to_string()))
}

/// Read a JSON object of service name to WMTS descriptor.
pub fn read_tile_catalog(path: &Path) -> Result<TileCatalog, InfraError> {
    let text = fs::read_to_string(path)?;
    let entries: BTreeMap<String, WmtsLayer> = serde_json::from_str(&text)
        .map_err(|err| InfraError::catalog(path.display().to_string(), err.to_string()))?;
    let catalog = TileCatalog::new(entries);
    if catalog.is_empty() {
        return Err(InfraError::catalog(
            path.display().to_string(),
            "catalog defines no services",
        ));
    }
    debug!(path = %path.display(), services = catalog.len(), "loaded tile catalog");
    Ok(catalog)
}

/// Catalog from `path` when configured, otherwise the built-in one.
pub fn tile_catalog(path: Option<&Path>) -> Result<TileCatalog, InfraError> {
    match path {
        Some(path) => read_tile_catalog(path),
        None => Ok(TileCatalog::builtin()),
    }
}
