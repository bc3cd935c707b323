use indexmap::IndexMap;

use crate::codec::PackedCoordinate;

pub mod category;
pub mod node;

pub type MapId = u32;
pub type NodeId = u32;

/// Nodes grouped by map id, then by packed coordinate.
///
/// Both levels keep first-seen order. Inserting an existing coordinate replaces
/// the node id in place, so the latest classification of a location wins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NodeGrouping {
    maps: IndexMap<MapId, IndexMap<PackedCoordinate, NodeId>>,
}

impl NodeGrouping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, map_id: MapId, coord: PackedCoordinate, node_id: NodeId) {
        self.maps.entry(map_id).or_default().insert(coord, node_id);
    }

    pub fn get(&self, map_id: MapId, coord: PackedCoordinate) -> Option<NodeId> {
        self.maps.get(&map_id)?.get(&coord).copied()
    }

    pub fn maps(&self) -> impl Iterator<Item = (&MapId, &IndexMap<PackedCoordinate, NodeId>)> {
        self.maps.iter()
    }

    pub fn map_count(&self) -> usize {
        self.maps.len()
    }

    pub fn node_count(&self) -> usize {
        self.maps.values().map(|entries| entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}
