use super::definition::IntegrationDefinition;
use super::resolver::{IntegrationEntry, NodeMeta, ToolCatalog};
use crate::error::SnapshotError;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SnapshotEntry {
    pub name: String,
    pub description: String,
    pub pseudo_node: bool,
    pub resources: Vec<(String, Vec<NodeMeta>)>,
    /// The integration definition as JSON text. Definitions carry free-form JSON
    /// defaults, which bincode cannot encode directly.
    pub definition_json: String,
}

/// A resolved tool catalog in compact binary form.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CatalogSnapshot {
    pub version: u32,
    pub entries: Vec<SnapshotEntry>,
}

impl CatalogSnapshot {
    pub fn from_catalog(catalog: &ToolCatalog) -> Result<Self, SnapshotError> {
        let entries = catalog
            .integrations()
            .map(|entry| {
                let definition_json =
                    serde_json::to_string(&entry.definition).map_err(|e| SnapshotError::Definition {
                        name: entry.name.clone(),
                        message: e.to_string(),
                    })?;
                Ok::<_, SnapshotError>(SnapshotEntry {
                    name: entry.name.clone(),
                    description: entry.description.clone(),
                    pseudo_node: entry.pseudo_node,
                    resources: entry
                        .resources
                        .iter()
                        .map(|(resource, operations)| {
                            (resource.clone(), operations.values().cloned().collect())
                        })
                        .collect(),
                    definition_json,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            version: SNAPSHOT_VERSION,
            entries,
        })
    }

    /// Rebuilds the catalog, with the default schema compiler.
    pub fn into_catalog(self) -> Result<ToolCatalog, SnapshotError> {
        let mut integrations = IndexMap::new();
        for entry in self.entries {
            let definition: IntegrationDefinition = serde_json::from_str(&entry.definition_json)
                .map_err(|e| SnapshotError::Definition {
                    name: entry.name.clone(),
                    message: e.to_string(),
                })?;
            let resources = entry
                .resources
                .into_iter()
                .map(|(resource, operations)| {
                    let operations = operations
                        .into_iter()
                        .map(|meta| (meta.operation_name.clone(), meta))
                        .collect();
                    (resource, operations)
                })
                .collect();
            integrations.insert(
                entry.name.clone(),
                IntegrationEntry {
                    name: entry.name,
                    description: entry.description,
                    pseudo_node: entry.pseudo_node,
                    resources,
                    definition,
                },
            );
        }
        Ok(ToolCatalog::from_entries(integrations))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        encode_to_vec(self, standard()).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Saves the snapshot to a file using the bincode format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|e| SnapshotError::Io {
            path: path.display().to_string(),
            message: format!("could not create file: {}", e),
        })?;
        file.write_all(&bytes).map_err(|e| SnapshotError::Io {
            path: path.display().to_string(),
            message: format!("could not write file: {}", e),
        })?;
        Ok(())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let mut file = fs::File::open(path).map_err(|e| SnapshotError::Io {
            path: path.display().to_string(),
            message: format!("could not open file: {}", e),
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| SnapshotError::Io {
            path: path.display().to_string(),
            message: format!("could not read file: {}", e),
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let (snapshot, _): (Self, usize) =
            decode_from_slice(bytes, standard()).map_err(|e| SnapshotError::Decode(e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Decode(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        Ok(snapshot)
    }
}

impl ToolCatalog {
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        CatalogSnapshot::from_catalog(self)?.save(path)
    }

    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        CatalogSnapshot::from_file(path)?.into_catalog()
    }
}
