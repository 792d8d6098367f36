//! The neighbor table — registry of configured adjacencies.
//!
//! Shared reading, restricted writing: the rest of the daemon reads
//! liveness state through the `&self` methods, while the mutators are
//! `pub(crate)` so only the liveness engine can flip `status` or touch
//! `timeout_count`.

use std::collections::HashMap;

use crate::name::Name;
use crate::types::NeighborStatus;

/// Identifier of the communication endpoint assigned to a neighbor.
pub type EndpointId = u64;

/// One configured adjacency.
#[derive(Debug, Clone)]
pub struct Neighbor {
    /// Hierarchical name uniquely identifying the neighbor router.
    pub name: Name,
    /// Assigned communication endpoint, if any. A neighbor without one is
    /// never actively probed, but is still answered if it probes us.
    pub endpoint: Option<EndpointId>,
    status: NeighborStatus,
    timeout_count: u32,
}

impl Neighbor {
    /// A new neighbor, `Inactive` until a valid response is first received.
    pub fn new(name: Name, endpoint: Option<EndpointId>) -> Self {
        Self {
            name,
            endpoint,
            status: NeighborStatus::Inactive,
            timeout_count: 0,
        }
    }

    pub fn status(&self) -> NeighborStatus {
        self.status
    }

    pub fn timeout_count(&self) -> u32 {
        self.timeout_count
    }

    pub fn has_endpoint(&self) -> bool {
        self.endpoint.is_some()
    }
}

/// Mapping from neighbor identity to its liveness state.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyList {
    neighbors: HashMap<Name, Neighbor>,
}

impl AdjacencyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a configured neighbor. Replaces any previous entry with the
    /// same identity.
    pub fn insert(&mut self, neighbor: Neighbor) {
        self.neighbors.insert(neighbor.name.clone(), neighbor);
    }

    /// Whether `name` identifies a configured neighbor.
    pub fn is_neighbor(&self, name: &Name) -> bool {
        self.neighbors.contains_key(name)
    }

    pub fn get(&self, name: &Name) -> Option<&Neighbor> {
        self.neighbors.get(name)
    }

    pub fn status_of(&self, name: &Name) -> Option<NeighborStatus> {
        self.neighbors.get(name).map(|n| n.status)
    }

    pub fn timeout_count_of(&self, name: &Name) -> Option<u32> {
        self.neighbors.get(name).map(|n| n.timeout_count)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Neighbor> {
        self.neighbors.values()
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Set the status of a neighbor. No-op for unknown names.
    pub(crate) fn set_status(&mut self, name: &Name, status: NeighborStatus) {
        if let Some(neighbor) = self.neighbors.get_mut(name) {
            neighbor.status = status;
        }
    }

    /// Increment the timeout counter. Returns the new count, or `None` for
    /// unknown names.
    pub(crate) fn increment_timeout_count(&mut self, name: &Name) -> Option<u32> {
        let neighbor = self.neighbors.get_mut(name)?;
        neighbor.timeout_count = neighbor.timeout_count.saturating_add(1);
        Some(neighbor.timeout_count)
    }

    /// Reset the timeout counter to zero. No-op for unknown names.
    pub(crate) fn reset_timeout_count(&mut self, name: &Name) {
        if let Some(neighbor) = self.neighbors.get_mut(name) {
            neighbor.timeout_count = 0;
        }
    }
}
