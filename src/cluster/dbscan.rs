//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! DBSCAN is a density-based clustering algorithm that groups points based on
//! neighborhood density. Unlike k-means, it:
//!
//! - Discovers clusters of arbitrary shape
//! - Automatically determines the number of clusters
//! - Identifies noise points (outliers)
//!
//! ## Core Concepts
//!
//! - **Epsilon (ε)**: Maximum distance between two points to be neighbors.
//! - **MinPts**: Minimum neighbors within ε (the point itself not counted)
//!   for a point to be "core".
//! - **Core point**: Has at least MinPts neighbors within ε.
//! - **Border point**: Within ε of a core point but not core itself.
//! - **Noise point**: Neither core nor border.
//!
//! ## Algorithm Steps
//!
//! 1. For each unprocessed point P:
//!    - Find neighbors within ε
//!    - If |neighbors| < MinPts, mark as noise (may be reclaimed later)
//!    - Else P is core: start a new cluster from P and its neighbors
//!
//! 2. Expansion: breadth-first over a FIFO work queue. Every core point in
//!    the queue adds its unprocessed or noise neighbors to the cluster and to
//!    the back of the queue.
//!
//! Border points join the first cluster that reaches them and are never
//! reassigned. A cluster that ends up smaller than MinPts is dissolved back
//! into noise.
//!
//! ## Complexity
//!
//! - **Time**: one range query per point; O(n²) with brute force.
//! - **Space**: O(n) for the markers.
//!
//! ## Limitations
//!
//! - Struggles with varying densities (consider OPTICS)
//! - ε parameter is sensitive and dataset-dependent
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.

use std::collections::VecDeque;

use tracing::{debug, trace};

use super::hierarchy::{Cluster, ClusterHierarchy, ClusterModel};
use super::neighbors::{object_ids, NeighborQuery, ObjectId};
use super::traits::{Clustering, NoProgress, Progress};
use crate::error::{Error, Result};

/// DBSCAN clustering algorithm.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dbscan {
    /// Epsilon: maximum distance for neighborhood.
    epsilon: f64,
    /// Minimum neighbors for core point classification.
    min_pts: usize,
}

/// Label of noise objects in flattened label vectors.
pub const NOISE: usize = usize::MAX;

// Per-object state during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unprocessed,
    Noise,
    // Tentatively or finally owned by a cluster.
    Clustered,
}

/// Flat DBSCAN output.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DbscanResult {
    /// Committed clusters in discovery order.
    pub clusters: Vec<Vec<ObjectId>>,
    /// Objects in no cluster, ascending.
    pub noise: Vec<ObjectId>,
}

impl DbscanResult {
    /// One label per object: the cluster's position in `clusters`, or [`NOISE`].
    pub fn labels(&self, n: usize) -> Vec<usize> {
        let mut labels = vec![NOISE; n];
        for (c, members) in self.clusters.iter().enumerate() {
            for id in members {
                if let Some(l) = labels.get_mut(id.index()) {
                    *l = c;
                }
            }
        }
        labels
    }

    /// The same result as a flat [`ClusterHierarchy`], noise as a final
    /// noise cluster when non-empty.
    pub fn into_hierarchy(self) -> ClusterHierarchy {
        let mut hierarchy = ClusterHierarchy::new();
        for (c, members) in self.clusters.into_iter().enumerate() {
            hierarchy.push_root(Cluster::new(
                format!("Cluster_{c}"),
                members,
                ClusterModel::Density,
            ));
        }
        if !self.noise.is_empty() {
            hierarchy.push_root(Cluster::noise("Noise", self.noise, ClusterModel::Density));
        }
        hierarchy
    }
}

impl Dbscan {
    /// Create a new DBSCAN clusterer.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - Maximum distance between two points to be neighbors.
    /// * `min_pts` - Minimum number of neighbors to form a dense region.
    ///
    /// # Typical Values
    ///
    /// - `epsilon`: Often determined by a k-distance plot
    ///   ([`k_distances`](super::k_distances) with k = min_pts).
    /// - `min_pts`: 2 * dimension is a common heuristic.
    pub fn new(epsilon: f64, min_pts: usize) -> Self {
        Self { epsilon, min_pts }
    }

    /// Set epsilon (neighborhood radius).
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set minimum points for core classification.
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    /// Configured epsilon.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Configured `min_pts`.
    pub fn min_pts(&self) -> usize {
        self.min_pts
    }

    /// Reject unusable parameters.
    pub fn validate(&self) -> Result<()> {
        if self.epsilon.is_nan() || self.epsilon < 0.0 {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                message: "must be non-negative",
            });
        }
        if self.min_pts == 0 {
            return Err(Error::InvalidParameter {
                name: "min_pts",
                message: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Partition the database behind `query` into clusters and noise.
    pub fn run<Q>(&self, query: &Q) -> Result<DbscanResult>
    where
        Q: NeighborQuery + ?Sized,
    {
        self.run_with_progress(query, NoProgress)
    }

    /// [`run`](Self::run), reporting each object as it is settled.
    pub fn run_with_progress<Q, P>(&self, query: &Q, mut progress: P) -> Result<DbscanResult>
    where
        Q: NeighborQuery + ?Sized,
        P: Progress,
    {
        self.validate()?;

        let n = query.len();
        debug!(n, epsilon = self.epsilon, min_pts = self.min_pts, "dbscan: start");

        // Nobody can have `min_pts` other objects around: all noise, no queries.
        if n <= self.min_pts {
            progress.on_progress(n, n);
            return Ok(DbscanResult {
                clusters: Vec::new(),
                noise: object_ids(n).collect(),
            });
        }

        let mut marks = vec![Mark::Unprocessed; n];
        let mut settled = 0usize;
        let mut clusters: Vec<Vec<ObjectId>> = Vec::new();

        for point in object_ids(n) {
            if marks[point.index()] != Mark::Unprocessed {
                continue;
            }

            let seeds = self.neighbors(query, point, n)?;
            if seeds.len() < self.min_pts {
                marks[point.index()] = Mark::Noise;
                settled += 1;
                progress.on_progress(settled, n);
                continue;
            }

            // `point` is core: start a cluster from it and its seeds.
            marks[point.index()] = Mark::Clustered;
            let mut current = vec![point];
            let mut queue: VecDeque<ObjectId> = VecDeque::with_capacity(seeds.len());
            for &s in &seeds {
                if claim(&mut marks, s, &mut settled) {
                    current.push(s);
                    queue.push_back(s);
                }
            }

            while let Some(q) = queue.pop_front() {
                let neighborhood = self.neighbors(query, q, n)?;
                if neighborhood.len() < self.min_pts {
                    continue;
                }
                for nb in neighborhood {
                    if claim(&mut marks, nb, &mut settled) {
                        current.push(nb);
                        queue.push_back(nb);
                    }
                }
            }

            settled += 1;
            if current.len() >= self.min_pts {
                trace!(cluster = clusters.len(), size = current.len(), "dbscan: cluster");
                clusters.push(current);
            } else {
                trace!(size = current.len(), "dbscan: cluster too small, reverted to noise");
                for id in current {
                    marks[id.index()] = Mark::Noise;
                }
            }
            progress.on_progress(settled, n);
        }

        let noise: Vec<ObjectId> = object_ids(n)
            .filter(|id| marks[id.index()] == Mark::Noise)
            .collect();

        let covered = clusters.iter().map(Vec::len).sum::<usize>() + noise.len();
        if covered != n {
            return Err(Error::Inconsistent(format!(
                "dbscan settled {covered} of {n} objects"
            )));
        }

        debug!(n, clusters = clusters.len(), noise = noise.len(), "dbscan: done");
        Ok(DbscanResult { clusters, noise })
    }

    /// Range query with ids validated against the database size.
    fn neighbors<Q>(&self, query: &Q, id: ObjectId, n: usize) -> Result<Vec<ObjectId>>
    where
        Q: NeighborQuery + ?Sized,
    {
        let mut out = Vec::new();
        for nb in query.range(id, self.epsilon)? {
            if nb.id.index() >= n {
                return Err(Error::UnknownObject { id: nb.id, len: n });
            }
            if nb.id != id {
                out.push(nb.id);
            }
        }
        Ok(out)
    }
}

/// Move `id` into the cluster being built if it is unprocessed or noise.
fn claim(marks: &mut [Mark], id: ObjectId, settled: &mut usize) -> bool {
    match marks[id.index()] {
        Mark::Unprocessed => {
            *settled += 1;
            marks[id.index()] = Mark::Clustered;
            true
        }
        Mark::Noise => {
            marks[id.index()] = Mark::Clustered;
            true
        }
        Mark::Clustered => false,
    }
}

impl Default for Dbscan {
    fn default() -> Self {
        Self::new(0.5, 5)
    }
}

impl Clustering for Dbscan {
    fn cluster<Q: NeighborQuery + ?Sized>(&self, query: &Q) -> Result<ClusterHierarchy> {
        Ok(self.run(query)?.into_hierarchy())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::cluster::neighbors::{LinearScan, Neighbor, Points};

    fn ids(v: &[usize]) -> Vec<ObjectId> {
        v.iter().copied().map(ObjectId::new).collect()
    }

    fn sorted(c: &[ObjectId]) -> Vec<ObjectId> {
        let mut c = c.to_vec();
        c.sort();
        c
    }

    fn run(data: &[Vec<f64>], epsilon: f64, min_pts: usize) -> DbscanResult {
        let query = LinearScan::new(Points::euclidean(data).unwrap());
        Dbscan::new(epsilon, min_pts).run(&query).unwrap()
    }

    #[test]
    fn test_dbscan_trivial_line() {
        let data: Vec<Vec<f64>> = [0.0, 1.0, 2.0, 3.0, 10.0].iter().map(|&x| vec![x]).collect();
        let result = run(&data, 1.5, 2);
        assert_eq!(result.clusters.len(), 1);
        let mut c = result.clusters[0].clone();
        c.sort();
        assert_eq!(c, ids(&[0, 1, 2, 3]));
        assert_eq!(result.noise, ids(&[4]));
    }

    #[test]
    fn test_dbscan_two_clusters() {
        // Two well-separated clusters
        let data = vec![
            // Cluster 1: around (0, 0)
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            // Cluster 2: around (5, 5)
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![5.0, 5.1],
        ];

        let result = run(&data, 0.3, 2);
        assert_eq!(result.clusters.len(), 2);
        assert!(result.noise.is_empty());

        let labels = result.labels(6);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn test_dbscan_with_noise() {
        // Two clusters plus an outlier
        let data = vec![
            // Cluster 1
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![0.1, 0.1],
            // Outlier
            vec![100.0, 100.0],
            // Cluster 2
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![5.0, 5.1],
            vec![5.1, 5.1],
        ];

        let labels = Dbscan::new(0.3, 3).fit_predict(&data).unwrap();
        assert_eq!(labels.len(), 9);

        // Point 4 (outlier) should be noise
        assert_eq!(labels[4], NOISE);

        // Others should have cluster assignments
        for (i, label) in labels.iter().enumerate() {
            if i != 4 {
                assert_ne!(*label, NOISE);
            }
        }
    }

    #[test]
    fn test_dbscan_all_noise() {
        // Points too far apart
        let data = vec![
            vec![0.0, 0.0],
            vec![10.0, 0.0],
            vec![0.0, 10.0],
            vec![10.0, 10.0],
        ];

        let result = run(&data, 0.5, 2);
        assert!(result.clusters.is_empty());
        assert_eq!(result.noise, ids(&[0, 1, 2, 3]));
    }

    #[test]
    fn test_dbscan_border_point_reclaimed_from_noise() {
        // 0 is visited first and has a single neighbor, so it starts as noise.
        let data: Vec<Vec<f64>> = [0.0, 1.0, 1.5, 2.0].iter().map(|&x| vec![x]).collect();
        let result = run(&data, 1.0, 2);
        assert_eq!(result.clusters.len(), 1);
        assert!(result.clusters[0].contains(&ObjectId::new(0)));
        assert!(result.noise.is_empty());
    }

    #[test]
    fn test_dbscan_min_pts_exceeds_database() {
        struct NoQueries(usize);
        impl NeighborQuery for NoQueries {
            fn len(&self) -> usize {
                self.0
            }
            fn range(&self, _: ObjectId, _: f64) -> Result<Vec<Neighbor>> {
                panic!("fast path must not query");
            }
            fn knn(&self, _: ObjectId, _: usize) -> Result<Vec<Neighbor>> {
                panic!("fast path must not query");
            }
        }

        let result = Dbscan::new(1.0, 5).run(&NoQueries(4)).unwrap();
        assert!(result.clusters.is_empty());
        assert_eq!(result.noise, ids(&[0, 1, 2, 3]));
    }

    #[test]
    fn test_dbscan_skips_seeds_owned_by_earlier_cluster() {
        struct Counting<'a> {
            inner: LinearScan<Points<'a>>,
            queries: Cell<usize>,
        }
        impl NeighborQuery for Counting<'_> {
            fn len(&self) -> usize {
                self.inner.len()
            }
            fn range(&self, id: ObjectId, epsilon: f64) -> Result<Vec<Neighbor>> {
                self.queries.set(self.queries.get() + 1);
                self.inner.range(id, epsilon)
            }
            fn knn(&self, id: ObjectId, k: usize) -> Result<Vec<Neighbor>> {
                self.inner.knn(id, k)
            }
        }

        // Object 4 (x = 2) borders both groups and is taken by the first.
        let data: Vec<Vec<f64>> = [0.0, 0.1, 0.2, 1.0, 2.0, 3.0, 3.8, 3.9]
            .iter()
            .map(|&x| vec![x])
            .collect();
        let query = Counting {
            inner: LinearScan::new(Points::euclidean(&data).unwrap()),
            queries: Cell::new(0),
        };
        let result = Dbscan::new(1.0, 3).run(&query).unwrap();

        assert_eq!(result.clusters.len(), 2);
        assert_eq!(sorted(&result.clusters[0]), ids(&[0, 1, 2, 3, 4]));
        assert_eq!(sorted(&result.clusters[1]), ids(&[5, 6, 7]));
        assert!(result.noise.is_empty());
        // One range query per clustered object, none repeated for object 4.
        assert_eq!(query.queries.get(), 8);
    }

    #[test]
    fn test_dbscan_empty() {
        let data: Vec<Vec<f64>> = vec![];
        let result = run(&data, 0.5, 3);
        assert!(result.clusters.is_empty());
        assert!(result.noise.is_empty());
    }

    #[test]
    fn test_dbscan_invalid_params() {
        let data = vec![vec![0.0, 0.0]];

        assert!(Dbscan::new(-1.0, 3).fit_predict(&data).is_err());
        assert!(Dbscan::new(f64::NAN, 3).fit_predict(&data).is_err());
        assert!(Dbscan::new(0.5, 0).fit_predict(&data).is_err());
    }

    #[test]
    fn test_dbscan_chain() {
        // Chain of points - DBSCAN should connect them
        let data: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64 * 0.3, 0.0]).collect();

        let labels = Dbscan::new(0.5, 2).fit_predict(&data).unwrap();

        // All should be in one cluster (chain is connected)
        let cluster = labels[0];
        assert_ne!(cluster, NOISE);
        for label in labels {
            assert_eq!(label, cluster);
        }
    }

    #[test]
    fn test_dbscan_small_cluster_reverts_to_noise() {
        // Three clusters whose border points 3, 7 and 12 all touch object 9.
        // 9 is core, but every neighbor is already taken, leaving a
        // one-object cluster that is dissolved into noise.
        struct Graph;
        impl NeighborQuery for Graph {
            fn len(&self) -> usize {
                13
            }
            fn range(&self, id: ObjectId, _: f64) -> Result<Vec<Neighbor>> {
                let adj: &[usize] = match id.index() {
                    0 => &[1, 2, 3],
                    1 => &[0, 2],
                    2 => &[0, 1],
                    3 => &[0, 9],
                    4 => &[5, 6, 7],
                    5 => &[4, 6],
                    6 => &[4, 5],
                    7 => &[4, 9],
                    8 => &[10, 11, 12],
                    9 => &[3, 7, 12],
                    10 => &[8, 11],
                    11 => &[8, 10],
                    12 => &[8, 9],
                    _ => &[],
                };
                Ok(adj
                    .iter()
                    .map(|&j| Neighbor::new(ObjectId::new(j), 1.0))
                    .collect())
            }
            fn knn(&self, _: ObjectId, _: usize) -> Result<Vec<Neighbor>> {
                Ok(vec![])
            }
        }

        let result = Dbscan::new(1.0, 3).run(&Graph).unwrap();
        assert_eq!(result.clusters.len(), 3);
        assert_eq!(result.noise, ids(&[9]));
        let labels = result.labels(13);
        assert_eq!(labels[3], labels[0]);
        assert_eq!(labels[7], labels[4]);
        assert_eq!(labels[12], labels[8]);
    }

    #[test]
    fn test_dbscan_hierarchy_is_flat() {
        let data: Vec<Vec<f64>> = [0.0, 1.0, 2.0, 3.0, 10.0].iter().map(|&x| vec![x]).collect();
        let query = LinearScan::new(Points::euclidean(&data).unwrap());
        let h = Dbscan::new(1.5, 2).cluster(&query).unwrap();
        assert_eq!(h.roots(), &[0, 1]);
        assert!(h.get(1).unwrap().noise);
        assert!(h.clusters().iter().all(|c| c.children.is_empty()));
        assert!(h.is_consistent());
    }
}
