//! The cluster order: OPTICS' linear walk over the database.

use super::hierarchy::{Cluster, ClusterHierarchy, ClusterModel};
use super::neighbors::ObjectId;
use crate::error::{Error, Result};

/// One step of the cluster order.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusterOrderEntry {
    /// The object visited at this step.
    pub id: ObjectId,
    /// The object it was reached from; `None` when it starts a new component.
    pub predecessor: Option<ObjectId>,
    /// Reachability distance from the predecessor, `+inf` if unreached.
    pub reachability: f64,
    /// Core distance of the object, `+inf` if it is not a core object or the
    /// value is unknown.
    pub core_distance: f64,
}

impl ClusterOrderEntry {
    /// An entry whose core distance is unknown.
    pub fn new(id: ObjectId, predecessor: Option<ObjectId>, reachability: f64) -> Self {
        Self {
            id,
            predecessor,
            reachability,
            core_distance: f64::INFINITY,
        }
    }

    /// Attach a core distance.
    pub fn with_core_distance(mut self, core_distance: f64) -> Self {
        self.core_distance = core_distance;
        self
    }
}

/// Every object of the database exactly once, in traversal order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<ClusterOrderEntry>", into = "Vec<ClusterOrderEntry>")
)]
pub struct ClusterOrder {
    entries: Vec<ClusterOrderEntry>,
}

impl ClusterOrder {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            entries: Vec::with_capacity(n),
        }
    }

    pub(crate) fn push(&mut self, entry: ClusterOrderEntry) {
        self.entries.push(entry);
    }

    /// Build an order from externally produced entries.
    ///
    /// The ids must be a permutation of `0..entries.len()`.
    pub fn from_entries(entries: Vec<ClusterOrderEntry>) -> Result<Self> {
        let len = entries.len();
        let mut seen = vec![false; len];
        for e in &entries {
            match seen.get_mut(e.id.index()) {
                None => return Err(Error::UnknownObject { id: e.id, len }),
                Some(true) => return Err(Error::DuplicateObject { id: e.id }),
                Some(s) => *s = true,
            }
        }
        Ok(Self { entries })
    }

    /// Convenience for synthetic orders: object `i` at position `i`, with the
    /// given reachabilities and each entry reached from its predecessor.
    pub fn from_reachabilities(reachabilities: &[f64]) -> Self {
        let entries = reachabilities
            .iter()
            .enumerate()
            .map(|(i, &r)| {
                let predecessor = if i == 0 || r.is_infinite() {
                    None
                } else {
                    Some(ObjectId::new(i - 1))
                };
                ClusterOrderEntry::new(ObjectId::new(i), predecessor, r)
            })
            .collect();
        Self { entries }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the order is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in order.
    pub fn entries(&self) -> &[ClusterOrderEntry] {
        &self.entries
    }

    /// Entry at `position`.
    pub fn get(&self, position: usize) -> Option<&ClusterOrderEntry> {
        self.entries.get(position)
    }

    /// Iterate entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ClusterOrderEntry> {
        self.entries.iter()
    }

    /// Reachability of every position, for plotting.
    pub fn reachability_plot(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.reachability).collect()
    }

    /// Position of every object: `positions()[id.index()]`.
    pub fn positions(&self) -> Vec<usize> {
        let mut pos = vec![usize::MAX; self.entries.len()];
        for (i, e) in self.entries.iter().enumerate() {
            if let Some(p) = pos.get_mut(e.id.index()) {
                *p = i;
            }
        }
        pos
    }

    /// Position of a single object.
    pub fn position_of(&self, id: ObjectId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Flat DBSCAN clustering at radius `epsilon_prime` read off the order
    /// (Ankerst et al., "ExtractDBSCAN-Clustering").
    ///
    /// Only meaningful for `epsilon_prime` no larger than the epsilon the
    /// order was built with. A run of positions whose reachability is within
    /// `epsilon_prime` forms one cluster; a position with larger reachability
    /// opens a new cluster if its core distance is within `epsilon_prime` and
    /// is noise otherwise.
    pub fn extract_dbscan(&self, epsilon_prime: f64) -> Result<ClusterHierarchy> {
        if epsilon_prime.is_nan() || epsilon_prime < 0.0 {
            return Err(Error::InvalidParameter {
                name: "epsilon_prime",
                message: "must be non-negative",
            });
        }

        let mut groups: Vec<(usize, usize, Vec<ObjectId>)> = Vec::new();
        let mut noise = Vec::new();
        let mut open = false;
        for (pos, e) in self.entries.iter().enumerate() {
            if e.reachability > epsilon_prime {
                if e.core_distance <= epsilon_prime {
                    groups.push((pos, pos, vec![e.id]));
                    open = true;
                } else {
                    noise.push(e.id);
                    open = false;
                }
            } else if let (true, Some(g)) = (open, groups.last_mut()) {
                g.1 = pos;
                g.2.push(e.id);
            } else {
                // Reachable but no cluster is open: the order was built with a
                // smaller epsilon than requested.
                noise.push(e.id);
            }
        }

        let mut hierarchy = ClusterHierarchy::new();
        for (start, end, members) in groups {
            hierarchy.push_root(Cluster::new(
                format!("Cluster_{start}_{end}"),
                members,
                ClusterModel::Density,
            ));
        }
        if !noise.is_empty() {
            hierarchy.push_root(Cluster::noise("Noise", noise, ClusterModel::Density));
        }
        Ok(hierarchy)
    }
}

impl TryFrom<Vec<ClusterOrderEntry>> for ClusterOrder {
    type Error = Error;

    fn try_from(entries: Vec<ClusterOrderEntry>) -> Result<Self> {
        Self::from_entries(entries)
    }
}

impl From<ClusterOrder> for Vec<ClusterOrderEntry> {
    fn from(order: ClusterOrder) -> Self {
        order.entries
    }
}

impl<'a> IntoIterator for &'a ClusterOrder {
    type Item = &'a ClusterOrderEntry;
    type IntoIter = std::slice::Iter<'a, ClusterOrderEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
