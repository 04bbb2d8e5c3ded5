use super::neighbors::Neighbor;

#[inline]
pub(crate) fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[inline]
pub(crate) fn manhattan(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

/// Map anything that is not a finite, non-negative number to `+inf`.
///
/// NaN and negative values are how oracles report an undefined distance; the
/// algorithms only ever compare distances, so "undefined" and "unreachable"
/// are the same thing to them.
#[inline]
pub fn sanitize_distance(d: f64) -> f64 {
    if d >= 0.0 {
        d
    } else {
        f64::INFINITY
    }
}

/// Sort neighbors ascending by distance, breaking ties by id.
pub(crate) fn sort_neighbors(neighbors: &mut [Neighbor]) {
    neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.id.cmp(&b.id)));
}

/// Core distance from a sorted neighborhood: the distance to the
/// `min_pts`-th neighbor, or `+inf` if the neighborhood is too small.
pub(crate) fn core_distance(sorted: &[Neighbor], min_pts: usize) -> f64 {
    debug_assert!(min_pts > 0);
    if sorted.len() < min_pts {
        f64::INFINITY
    } else {
        sorted[min_pts - 1].distance
    }
}
