//! Distance and neighbor oracles.
//!
//! The density algorithms never look at raw data. They see a fixed, enumerable
//! database of objects through two seams:
//!
//! - [`DistanceOracle`]: a pairwise distance between two object ids.
//! - [`NeighborQuery`]: range and k-nearest-neighbor queries.
//!
//! [`LinearScan`] turns any distance oracle into a neighbor query by brute
//! force. A spatial index would implement [`NeighborQuery`] directly.
//!
//! Neighborhoods never contain the query object itself, so `min_pts` counts
//! *other* objects throughout the crate.

use std::fmt;

use super::util::{self, sanitize_distance, sort_neighbors};
use crate::error::{Error, Result};

/// Identifier of an object in the database: its insertion index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ObjectId(usize);

impl ObjectId {
    /// Wrap an insertion index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// The insertion index.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for ObjectId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Iterate all ids of a database of `len` objects, in enumeration order.
pub fn object_ids(len: usize) -> impl Iterator<Item = ObjectId> {
    (0..len).map(ObjectId)
}

/// A neighbor returned by a [`NeighborQuery`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// The neighbor.
    pub id: ObjectId,
    /// Its distance to the query object.
    pub distance: f64,
}

impl Neighbor {
    /// Create a neighbor record.
    pub fn new(id: ObjectId, distance: f64) -> Self {
        Self { id, distance }
    }
}

/// Pairwise distance between two objects.
///
/// Must be non-negative. `+inf` (or NaN) means "no defined distance"; both
/// are treated as unreachable.
pub trait DistanceOracle {
    /// Number of objects the oracle knows about.
    fn len(&self) -> usize;

    /// Whether the oracle has no objects.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distance between `a` and `b`.
    fn distance(&self, a: ObjectId, b: ObjectId) -> Result<f64>;
}

impl<T: DistanceOracle + ?Sized> DistanceOracle for &T {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn distance(&self, a: ObjectId, b: ObjectId) -> Result<f64> {
        (**self).distance(a, b)
    }
}

/// Range and k-nearest-neighbor queries over a fixed database.
///
/// Calls are synchronous and side-effect free from the caller's view.
pub trait NeighborQuery {
    /// Number of objects in the database. Ids are `0..len`.
    fn len(&self) -> usize;

    /// Whether the database is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All objects within `epsilon` (inclusive) of `id`, excluding `id`,
    /// sorted ascending by distance.
    fn range(&self, id: ObjectId, epsilon: f64) -> Result<Vec<Neighbor>>;

    /// The `k` nearest objects to `id`, excluding `id`, sorted ascending.
    /// Returns `min(k, len - 1)` neighbors.
    fn knn(&self, id: ObjectId, k: usize) -> Result<Vec<Neighbor>>;
}

impl<T: NeighborQuery + ?Sized> NeighborQuery for &T {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn range(&self, id: ObjectId, epsilon: f64) -> Result<Vec<Neighbor>> {
        (**self).range(id, epsilon)
    }

    fn knn(&self, id: ObjectId, k: usize) -> Result<Vec<Neighbor>> {
        (**self).knn(id, k)
    }
}

/// Vector distance functions understood by [`Points`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Metric {
    /// L2 distance.
    #[default]
    Euclidean,
    /// L1 distance.
    Manhattan,
}

impl Metric {
    /// Distance between two equally sized vectors.
    #[inline]
    pub fn eval(self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Metric::Euclidean => util::squared_euclidean(a, b).sqrt(),
            Metric::Manhattan => util::manhattan(a, b),
        }
    }
}

/// Dense vectors with a metric.
#[derive(Debug, Clone, Copy)]
pub struct Points<'a> {
    data: &'a [Vec<f64>],
    metric: Metric,
}

impl<'a> Points<'a> {
    /// Wrap `data`, checking that every row has the same dimensionality.
    pub fn new(data: &'a [Vec<f64>], metric: Metric) -> Result<Self> {
        if let Some(first) = data.first() {
            let d = first.len();
            for point in data.iter().skip(1) {
                if point.len() != d {
                    return Err(Error::DimensionMismatch {
                        expected: d,
                        found: point.len(),
                    });
                }
            }
        }
        Ok(Self { data, metric })
    }

    /// Euclidean points.
    pub fn euclidean(data: &'a [Vec<f64>]) -> Result<Self> {
        Self::new(data, Metric::Euclidean)
    }

    /// The configured metric.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    fn row(&self, id: ObjectId) -> Result<&'a [f64]> {
        self.data
            .get(id.index())
            .map(Vec::as_slice)
            .ok_or(Error::UnknownObject {
                id,
                len: self.data.len(),
            })
    }
}

impl DistanceOracle for Points<'_> {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn distance(&self, a: ObjectId, b: ObjectId) -> Result<f64> {
        Ok(self.metric.eval(self.row(a)?, self.row(b)?))
    }
}

/// A precomputed symmetric distance table.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    dists: Vec<f64>,
}

impl DistanceMatrix {
    /// Build from a row-major `n * n` table.
    pub fn new(n: usize, dists: Vec<f64>) -> Result<Self> {
        if n.checked_mul(n) != Some(dists.len()) {
            return Err(Error::InvalidParameter {
                name: "dists",
                message: "must contain exactly n * n entries",
            });
        }
        Ok(Self { n, dists })
    }

    /// Evaluate `f(i, j)` for every pair `i < j` and mirror it.
    pub fn from_fn(n: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut dists = vec![0.0f64; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = f(i, j);
                dists[i * n + j] = d;
                dists[j * n + i] = d;
            }
        }
        Self { n, dists }
    }

    /// Precompute all pairwise distances of another oracle.
    pub fn from_oracle<D: DistanceOracle>(oracle: &D) -> Result<Self> {
        let n = oracle.len();
        let mut dists = vec![0.0f64; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = oracle.distance(ObjectId(i), ObjectId(j))?;
                dists[i * n + j] = d;
                dists[j * n + i] = d;
            }
        }
        Ok(Self { n, dists })
    }

    fn check(&self, id: ObjectId) -> Result<usize> {
        if id.index() < self.n {
            Ok(id.index())
        } else {
            Err(Error::UnknownObject { id, len: self.n })
        }
    }
}

impl DistanceOracle for DistanceMatrix {
    fn len(&self) -> usize {
        self.n
    }

    fn distance(&self, a: ObjectId, b: ObjectId) -> Result<f64> {
        let (i, j) = (self.check(a)?, self.check(b)?);
        Ok(self.dists[i * self.n + j])
    }
}

/// Adapt a closure over insertion indices into a [`DistanceOracle`].
#[derive(Clone)]
pub struct FnDistance<F> {
    len: usize,
    f: F,
}

impl<F> FnDistance<F>
where
    F: Fn(usize, usize) -> f64,
{
    /// `len` objects, distance given by `f`.
    pub fn new(len: usize, f: F) -> Self {
        Self { len, f }
    }
}

impl<F> fmt::Debug for FnDistance<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDistance").field("len", &self.len).finish()
    }
}

impl<F> DistanceOracle for FnDistance<F>
where
    F: Fn(usize, usize) -> f64,
{
    fn len(&self) -> usize {
        self.len
    }

    fn distance(&self, a: ObjectId, b: ObjectId) -> Result<f64> {
        for id in [a, b] {
            if id.index() >= self.len {
                return Err(Error::UnknownObject { id, len: self.len });
            }
        }
        Ok((self.f)(a.index(), b.index()))
    }
}

/// Brute-force neighbor queries over any [`DistanceOracle`].
///
/// O(n) distance evaluations per query.
#[derive(Debug, Clone)]
pub struct LinearScan<D> {
    oracle: D,
}

impl<D: DistanceOracle> LinearScan<D> {
    /// Scan `oracle`'s objects on every query.
    pub fn new(oracle: D) -> Self {
        Self { oracle }
    }

    /// The wrapped oracle.
    pub fn oracle(&self) -> &D {
        &self.oracle
    }

    fn scan(&self, id: ObjectId) -> Result<Vec<Neighbor>> {
        let n = self.oracle.len();
        if id.index() >= n {
            return Err(Error::UnknownObject { id, len: n });
        }
        let mut out = Vec::with_capacity(n.saturating_sub(1));
        for other in object_ids(n) {
            if other == id {
                continue;
            }
            let d = sanitize_distance(self.oracle.distance(id, other)?);
            out.push(Neighbor::new(other, d));
        }
        Ok(out)
    }
}

impl<D: DistanceOracle> NeighborQuery for LinearScan<D> {
    fn len(&self) -> usize {
        self.oracle.len()
    }

    fn range(&self, id: ObjectId, epsilon: f64) -> Result<Vec<Neighbor>> {
        let mut out = self.scan(id)?;
        out.retain(|nb| nb.distance <= epsilon);
        sort_neighbors(&mut out);
        Ok(out)
    }

    fn knn(&self, id: ObjectId, k: usize) -> Result<Vec<Neighbor>> {
        let mut out = self.scan(id)?;
        sort_neighbors(&mut out);
        out.truncate(k);
        Ok(out)
    }
}

/// The k-distance of every object, sorted descending.
///
/// Plotting this curve and picking the "knee" is the usual way to choose
/// `epsilon` for [`Dbscan`](super::Dbscan) with `min_pts = k`. Objects with
/// fewer than `k` other objects in the database report `+inf`.
pub fn k_distances<Q: NeighborQuery + ?Sized>(query: &Q, k: usize) -> Result<Vec<f64>> {
    if k == 0 {
        return Err(Error::InvalidParameter {
            name: "k",
            message: "must be at least 1",
        });
    }
    let mut out = Vec::with_capacity(query.len());
    for id in object_ids(query.len()) {
        let mut nn = query.knn(id, k)?;
        sort_neighbors(&mut nn);
        out.push(util::core_distance(&nn, k));
    }
    out.sort_by(|a, b| b.total_cmp(a));
    Ok(out)
}
