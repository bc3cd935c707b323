use std::{fs::File, io::BufReader, path::Path};

use indexmap::IndexMap;
use log::{info, warn};

use crate::data::{MapId, NodeId};
use crate::errors::{Error, Result};

pub type NameMapping = IndexMap<String, u32>;

/// Loads a flat `name -> id` JSON object. A missing file is an empty mapping.
pub fn load_mapping(path: &Path) -> Result<NameMapping> {
    if !path.try_exists()? {
        warn!(path = &*path.to_string_lossy(); "Mapping file not found, using empty mapping");
        return Ok(NameMapping::new());
    }
    let file = File::open(path)?;
    let mapping: NameMapping = serde_json::from_reader(BufReader::new(file))
        .map_err(|err| Error::config(format!("{}: {err}", path.display())))?;
    info!(path = &*path.to_string_lossy(), entries = mapping.len(); "Loaded mapping");
    Ok(mapping)
}

/// Read-only lookup of map and node display names.
#[derive(Debug, Default, Clone)]
pub struct IdResolver {
    map_ids: NameMapping,
    node_ids: NameMapping,
}

impl IdResolver {
    pub fn new(map_ids: NameMapping, node_ids: NameMapping) -> Self {
        IdResolver { map_ids, node_ids }
    }

    pub fn load(map_ids_path: &Path, node_ids_path: &Path) -> Result<Self> {
        Ok(IdResolver::new(
            load_mapping(map_ids_path)?,
            load_mapping(node_ids_path)?,
        ))
    }

    pub fn map_id(&self, map_name: &str) -> Option<MapId> {
        self.map_ids.get(map_name).copied()
    }

    pub fn node_id(&self, node_name: &str) -> Option<NodeId> {
        self.node_ids.get(node_name).copied()
    }
}
