//! Cluster hierarchy produced by the density algorithms.
//!
//! Clusters live in an arena; parent-child edges are arena indices. A flat
//! result (DBSCAN) is simply a hierarchy whose roots have no children.

use std::collections::HashSet;

use super::dbscan::NOISE;
use super::neighbors::ObjectId;

/// What produced a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClusterModel {
    /// A contiguous range `[start, end]` of cluster-order positions.
    OrderRange {
        /// First position (inclusive).
        start: usize,
        /// Last position (inclusive).
        end: usize,
    },
    /// A set of density-connected objects.
    Density,
}

/// A cluster node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cluster {
    /// Display name.
    pub name: String,
    /// Objects assigned directly to this cluster (not to its children).
    pub members: Vec<ObjectId>,
    /// Whether this node collects noise.
    pub noise: bool,
    /// Origin of the cluster.
    pub model: ClusterModel,
    /// Arena indices of the child clusters.
    pub children: Vec<usize>,
}

impl Cluster {
    /// A childless cluster.
    pub fn new(name: impl Into<String>, members: Vec<ObjectId>, model: ClusterModel) -> Self {
        Self {
            name: name.into(),
            members,
            noise: false,
            model,
            children: Vec::new(),
        }
    }

    /// A childless noise cluster.
    pub fn noise(name: impl Into<String>, members: Vec<ObjectId>, model: ClusterModel) -> Self {
        Self {
            noise: true,
            ..Self::new(name, members, model)
        }
    }

    /// Number of direct members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the cluster has no direct members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A forest of clusters.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusterHierarchy {
    clusters: Vec<Cluster>,
    roots: Vec<usize>,
}

impl ClusterHierarchy {
    /// An empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cluster to the arena and return its index. Not yet a root.
    pub(crate) fn push(&mut self, cluster: Cluster) -> usize {
        self.clusters.push(cluster);
        self.clusters.len() - 1
    }

    pub(crate) fn set_roots(&mut self, roots: Vec<usize>) {
        self.roots = roots;
    }

    /// Add a childless cluster as a new root and return its index.
    pub(crate) fn push_root(&mut self, cluster: Cluster) -> usize {
        let index = self.push(cluster);
        self.roots.push(index);
        index
    }

    /// All clusters, in creation order.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Number of clusters, noise nodes included.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Whether there are no clusters at all.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Arena indices of the top-level clusters.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Cluster at `index`.
    pub fn get(&self, index: usize) -> Option<&Cluster> {
        self.clusters.get(index)
    }

    /// Children of the cluster at `index`.
    pub fn children(&self, index: usize) -> &[usize] {
        self.clusters
            .get(index)
            .map(|c| c.children.as_slice())
            .unwrap_or(&[])
    }

    /// All descendants of `index` in depth-first pre-order, `index` excluded.
    pub fn descendants(&self, index: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.children(index).iter().rev().copied().collect();
        while let Some(c) = stack.pop() {
            out.push(c);
            stack.extend(self.children(c).iter().rev());
        }
        out
    }

    /// Every object held by the cluster at `index` or any of its descendants.
    pub fn all_members(&self, index: usize) -> Vec<ObjectId> {
        let mut out: Vec<ObjectId> = self
            .get(index)
            .map(|c| c.members.clone())
            .unwrap_or_default();
        for d in self.descendants(index) {
            out.extend_from_slice(&self.clusters[d].members);
        }
        out
    }

    /// Arena indices of the non-noise clusters.
    pub fn non_noise(&self) -> impl Iterator<Item = usize> + '_ {
        self.clusters
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.noise)
            .map(|(i, _)| i)
    }

    /// Objects held by noise clusters.
    pub fn noise(&self) -> Vec<ObjectId> {
        self.clusters
            .iter()
            .filter(|c| c.noise)
            .flat_map(|c| c.members.iter().copied())
            .collect()
    }

    /// One label per object: the arena index of the non-noise cluster that
    /// directly holds the object, or [`NOISE`].
    ///
    /// Objects listed by no cluster, or only by noise clusters, get [`NOISE`].
    pub fn labels(&self, n: usize) -> Vec<usize> {
        let mut labels = vec![NOISE; n];
        for (i, c) in self.clusters.iter().enumerate() {
            if c.noise {
                continue;
            }
            for id in &c.members {
                if let Some(l) = labels.get_mut(id.index()) {
                    *l = i;
                }
            }
        }
        labels
    }

    /// Check structural soundness: every child index is valid, every node is
    /// reachable from exactly one root path, and no object is listed twice.
    pub fn is_consistent(&self) -> bool {
        let mut seen_nodes = vec![false; self.clusters.len()];
        let mut stack: Vec<usize> = self.roots.clone();
        while let Some(i) = stack.pop() {
            match seen_nodes.get_mut(i) {
                Some(seen) if !*seen => *seen = true,
                _ => return false,
            }
            stack.extend_from_slice(&self.clusters[i].children);
        }
        if seen_nodes.iter().any(|s| !s) {
            return false;
        }

        let mut seen_ids = HashSet::new();
        self.clusters
            .iter()
            .flat_map(|c| c.members.iter())
            .all(|id| seen_ids.insert(*id))
    }
}
