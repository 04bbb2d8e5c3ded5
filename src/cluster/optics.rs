//! OPTICS: Ordering Points To Identify the Clustering Structure.
//!
//! # The Algorithm (Ankerst, Breunig, Kriegel, Sander, 1999)
//!
//! OPTICS does not assign labels. It walks the database in an order where each
//! next object is the one closest, in *reachability* terms, to everything
//! visited so far. Plotting reachability along that order gives a
//! "reachability plot" in which clusters appear as valleys; the valleys at
//! every density level are there at once.
//!
//! ## Core Concepts
//!
//! - **Core distance** of `p`: distance to its `min_pts`-th nearest neighbor
//!   within `epsilon`, or undefined (`+inf`) if there are fewer.
//! - **Reachability** of `o` from `p`: `max(core_distance(p), dist(p, o))`.
//!
//! ## Algorithm Steps
//!
//! 1. For each object not yet processed, in enumeration order, push it on a
//!    min-heap with reachability `+inf`.
//! 2. Pop the heap minimum, append it to the order and mark it processed.
//! 3. If it is a core object, offer every unprocessed neighbor to the heap
//!    with its reachability through the popped object; the heap keeps the
//!    smaller value.
//! 4. Repeat until the heap is empty, then continue the outer loop.
//!
//! The traversal is inherently sequential: each pop depends on every earlier
//! expansion.
//!
//! ## Complexity
//!
//! - **Time**: one range query per object plus O(n log n) heap work.
//! - **Space**: O(n).
//!
//! ## References
//!
//! Ankerst et al. (1999). "OPTICS: Ordering Points To Identify the Clustering
//! Structure." SIGMOD '99.

use tracing::{debug, trace};

use super::heap::ReachabilityHeap;
use super::neighbors::{object_ids, NeighborQuery};
use super::order::{ClusterOrder, ClusterOrderEntry};
use super::traits::{NoProgress, Progress};
use super::util::{core_distance, sanitize_distance, sort_neighbors};
use crate::error::{Error, Result};

/// OPTICS cluster-order builder.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Optics {
    /// Maximum neighborhood radius. `+inf` means unbounded.
    epsilon: f64,
    /// Neighbors (excluding the object itself) needed to be core.
    min_pts: usize,
}

impl Optics {
    /// Create a new OPTICS builder.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - Maximum neighborhood radius; `f64::INFINITY` is common.
    /// * `min_pts` - Neighbors required for an object to be core.
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

    /// Compute the cluster order of the database behind `query`.
    pub fn cluster_order<Q>(&self, query: &Q) -> Result<ClusterOrder>
    where
        Q: NeighborQuery + ?Sized,
    {
        self.cluster_order_with_progress(query, NoProgress)
    }

    /// [`cluster_order`](Self::cluster_order), reporting each finalized
    /// object to `progress`.
    pub fn cluster_order_with_progress<Q, P>(&self, query: &Q, mut progress: P) -> Result<ClusterOrder>
    where
        Q: NeighborQuery + ?Sized,
        P: Progress,
    {
        self.validate()?;

        let n = query.len();
        debug!(n, epsilon = self.epsilon, min_pts = self.min_pts, "optics: start");

        // With fewer than `min_pts` other objects nobody can be core.
        let any_core_possible = n > self.min_pts;

        let mut order = ClusterOrder::with_capacity(n);
        let mut processed = vec![false; n];
        let mut heap = ReachabilityHeap::new(n);
        let mut components = 0usize;

        for seed in object_ids(n) {
            if processed[seed.index()] {
                continue;
            }
            components += 1;
            heap.insert_or_improve(seed, None, f64::INFINITY)?;

            while let Some(cur) = heap.pop_minimum() {
                let done = &mut processed[cur.id.index()];
                if *done {
                    return Err(Error::Inconsistent(format!(
                        "object {} popped twice from the reachability heap",
                        cur.id
                    )));
                }
                *done = true;

                let mut neighbors = if any_core_possible {
                    query.range(cur.id, self.epsilon)?
                } else {
                    Vec::new()
                };
                for nb in neighbors.iter_mut() {
                    if nb.id.index() >= n {
                        return Err(Error::UnknownObject { id: nb.id, len: n });
                    }
                    nb.distance = sanitize_distance(nb.distance);
                }
                neighbors.retain(|nb| nb.id != cur.id);
                sort_neighbors(&mut neighbors);

                let core = core_distance(&neighbors, self.min_pts);
                order.push(
                    ClusterOrderEntry::new(cur.id, cur.predecessor, cur.reachability)
                        .with_core_distance(core),
                );
                progress.on_progress(order.len(), n);

                if !core.is_finite() {
                    continue;
                }
                for nb in &neighbors {
                    if processed[nb.id.index()] {
                        continue;
                    }
                    let reachability = core.max(nb.distance);
                    if heap.insert_or_improve(nb.id, Some(cur.id), reachability)? {
                        trace!(id = %nb.id, from = %cur.id, reachability, "optics: improved");
                    }
                }
            }
        }

        if order.len() != n {
            return Err(Error::Inconsistent(format!(
                "cluster order has {} entries for {} objects",
                order.len(),
                n
            )));
        }

        debug!(n, components, "optics: done");
        Ok(order)
    }
}

impl Default for Optics {
    fn default() -> Self {
        Self::new(f64::INFINITY, 5)
    }
}
