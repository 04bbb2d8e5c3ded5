use super::hierarchy::ClusterHierarchy;
use super::neighbors::{LinearScan, NeighborQuery, Points};
use crate::error::Result;

/// Common interface for the density clustering algorithms.
pub trait Clustering {
    /// Cluster the database behind `query`.
    fn cluster<Q: NeighborQuery + ?Sized>(&self, query: &Q) -> Result<ClusterHierarchy>;

    /// Cluster dense vectors by Euclidean brute force and return one label
    /// per input point, [`NOISE`](super::NOISE) for noise.
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        let query = LinearScan::new(Points::euclidean(data)?);
        let hierarchy = self.cluster(&query)?;
        Ok(hierarchy.labels(data.len()))
    }
}

/// Observer for long-running traversals.
///
/// Called after each object is finalized. The default does nothing.
pub trait Progress {
    /// `processed` of `total` objects are done.
    fn on_progress(&mut self, processed: usize, total: usize) {
        let _ = (processed, total);
    }
}

/// A [`Progress`] that ignores every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {}

/// A [`Progress`] that emits a `tracing` event every `every` objects and on
/// completion.
#[derive(Debug, Clone)]
pub struct LogProgress {
    task: &'static str,
    every: usize,
}

impl LogProgress {
    /// Report progress of `task` every `every` objects.
    pub fn new(task: &'static str, every: usize) -> Self {
        Self {
            task,
            every: every.max(1),
        }
    }
}

impl Progress for LogProgress {
    fn on_progress(&mut self, processed: usize, total: usize) {
        if processed % self.every == 0 || processed == total {
            tracing::info!(task = self.task, processed, total, "progress");
        }
    }
}

impl<P: Progress + ?Sized> Progress for &mut P {
    fn on_progress(&mut self, processed: usize, total: usize) {
        (**self).on_progress(processed, total);
    }
}
