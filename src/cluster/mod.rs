//! Density-based clustering over distance and neighbor oracles.
//!
//! ## Flat vs Hierarchical
//!
//! **DBSCAN** answers one question: at radius ε, which objects are
//! density-connected? The result is a flat partition into clusters and noise.
//!
//! **OPTICS** answers it for every radius up to ε at once. It produces a
//! *cluster order*, a linear walk over the database annotated with
//! reachability distances. Valleys in the reachability plot are clusters;
//! valleys inside valleys are nested clusters.
//!
//! **Xi** reads the hierarchy off the cluster order by looking for steep
//! drops and rises in reachability.
//!
//! ## Algorithms (implemented)
//!
//! ### DBSCAN
//!
//! Breadth-first expansion from core objects. Border objects go to the first
//! cluster that reaches them.
//!
//! ### OPTICS
//!
//! Greedy expansion driven by an updatable min-heap of reachability
//! distances. Strictly sequential.
//!
//! ### Xi extraction
//!
//! A single forward scan over the cluster order that pairs steep down areas
//! with steep up areas and builds a tree of clusters.
//!
//! ## Data access
//!
//! None of the algorithms touch raw vectors. They see the database through
//! [`NeighborQuery`] (range and kNN queries), usually [`LinearScan`] over a
//! [`DistanceOracle`] such as [`Points`] or [`DistanceMatrix`].
//!
//! ## Usage
//!
//! ```rust
//! use density_order::cluster::{
//!     Clustering, Dbscan, LinearScan, Optics, Points, Xi, NOISE,
//! };
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![0.0, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//!     vec![10.0, 10.1],
//! ];
//!
//! // Flat clustering with DBSCAN
//! let labels = Dbscan::new(0.5, 2).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[3]);
//! assert!(labels.iter().all(|&l| l != NOISE));
//!
//! // Cluster order, then a hierarchy from it
//! let query = LinearScan::new(Points::euclidean(&data).unwrap());
//! let order = Optics::new(f64::INFINITY, 2).cluster_order(&query).unwrap();
//! assert_eq!(order.len(), data.len());
//! let xi = Xi::new(0.1, 2).extract(&order).unwrap();
//! assert!(xi.hierarchy.is_consistent());
//! ```

mod dbscan;
mod heap;
mod hierarchy;
mod neighbors;
mod optics;
mod order;
mod traits;
mod util;
mod xi;

pub use dbscan::{Dbscan, DbscanResult, NOISE};
pub use heap::{Candidate, ReachabilityHeap};
pub use hierarchy::{Cluster, ClusterHierarchy, ClusterModel};
pub use neighbors::{
    k_distances, object_ids, DistanceMatrix, DistanceOracle, FnDistance, LinearScan, Metric,
    Neighbor, NeighborQuery, ObjectId, Points,
};
pub use optics::Optics;
pub use order::{ClusterOrder, ClusterOrderEntry};
pub use traits::{Clustering, LogProgress, NoProgress, Progress};
pub use util::sanitize_distance;
pub use xi::{OpticsXi, SteepArea, SteepDownArea, SteepUpArea, Xi, XiResult};
