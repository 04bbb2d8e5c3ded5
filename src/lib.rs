//! Density-based cluster ordering and extraction.
//!
//! `density-order` is a small library of density clustering algorithms that
//! work over any object database reachable through a distance or neighbor
//! oracle.
//!
//! The primary public API is under [`cluster`], which provides:
//! - OPTICS (cluster order with reachability and core distances)
//! - Xi extraction (cluster hierarchy from a cluster order)
//! - DBSCAN (flat density clustering with noise)

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;

pub use cluster::{
    Cluster, ClusterHierarchy, ClusterOrder, ClusterOrderEntry, Clustering, Dbscan, LinearScan,
    NeighborQuery, ObjectId, Optics, OpticsXi, Points, Xi, NOISE,
};
pub use error::{Error, Result};
