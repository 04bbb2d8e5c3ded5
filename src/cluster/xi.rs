//! Xi extraction: a cluster hierarchy from an OPTICS cluster order.
//!
//! # The Algorithm (Ankerst et al., 1999, section 4.3)
//!
//! In a reachability plot a cluster is a valley: it opens with a *steep down
//! area* and closes with a *steep up area*. A position `i` is
//!
//! - **xi-steep down** if `r(i) * (1 - xi) >= r(i + 1)`,
//! - **xi-steep up** if `r(i) <= r(i + 1) * (1 - xi)`.
//!
//! A steep area is a maximal run starting and ending at steep points, allowing
//! up to `min_pts` non-steep steps in the same direction in between.
//!
//! The scan keeps a working set of steep down areas that can still open a
//! cluster, together with the maximum reachability seen in between (`mib`).
//! Every steep up area is matched against the working set from the most
//! recent area backwards, so inner valleys are found before the valleys
//! that contain them, and each new cluster adopts the earlier clusters whose
//! ranges it covers.
//!
//! Each object is a direct member of at most one cluster: the innermost one
//! that claimed it first. Whatever nobody claims ends up in one trailing
//! catch-all cluster that parents the top-level clusters.
//!
//! The comparisons (`>=` vs `>`) below decide which boundary points belong to
//! a cluster and are kept exactly as stated.

use tracing::{debug, trace};

use super::hierarchy::{Cluster, ClusterHierarchy, ClusterModel};
use super::neighbors::{NeighborQuery, ObjectId};
use super::optics::Optics;
use super::order::ClusterOrder;
use super::traits::{Clustering, NoProgress, Progress};
use super::util::sanitize_distance;
use crate::error::{Error, Result};

/// Xi cluster extractor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Xi {
    /// Steepness threshold, in `(0, 1)`.
    xi: f64,
    /// Minimum cluster length, and the flat-step tolerance of steep areas.
    min_pts: usize,
}

/// A steep down area `[start, end]` of cluster-order positions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SteepDownArea {
    /// First position.
    pub start: usize,
    /// Last steep position.
    pub end: usize,
    /// Reachability at `start`.
    pub maximum: f64,
    /// Largest reachability seen between the end of this area and the
    /// current scan position. Never decreases.
    pub mib: f64,
}

impl SteepDownArea {
    fn raise_mib(&mut self, mib: f64) {
        if mib > self.mib {
            self.mib = mib;
        }
    }
}

/// A steep up area `[start, end]` of cluster-order positions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SteepUpArea {
    /// First steep position.
    pub start: usize,
    /// Last steep position.
    pub end: usize,
    /// Reachability right after `end` (the top of the ascent), `+inf` past
    /// the end of the order.
    pub maximum: f64,
}

/// A steep area found during the scan.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SteepArea {
    /// Descending run.
    Down(SteepDownArea),
    /// Ascending run.
    Up(SteepUpArea),
}

impl SteepArea {
    /// First position.
    pub fn start(&self) -> usize {
        match self {
            SteepArea::Down(d) => d.start,
            SteepArea::Up(u) => u.start,
        }
    }

    /// Last position.
    pub fn end(&self) -> usize {
        match self {
            SteepArea::Down(d) => d.end,
            SteepArea::Up(u) => u.end,
        }
    }

    /// Reachability bound of the area.
    pub fn maximum(&self) -> f64 {
        match self {
            SteepArea::Down(d) => d.maximum,
            SteepArea::Up(u) => u.maximum,
        }
    }
}

/// Output of [`Xi::extract`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XiResult {
    /// The extracted clusters.
    pub hierarchy: ClusterHierarchy,
    /// Every steep area in discovery order, down areas with their final `mib`.
    pub steep_areas: Vec<SteepArea>,
}

/// Reachability lookups along the order.
struct Plot {
    reach: Vec<f64>,
}

impl Plot {
    fn at(&self, i: usize) -> Result<f64> {
        self.reach.get(i).copied().ok_or_else(|| {
            Error::Inconsistent(format!(
                "xi scan at position {i} of a {}-entry order",
                self.reach.len()
            ))
        })
    }

    /// Reachability of the successor of `i`, `+inf` past the end.
    fn after(&self, i: usize) -> f64 {
        self.reach.get(i + 1).copied().unwrap_or(f64::INFINITY)
    }

    fn steep_down(&self, i: usize, ixi: f64) -> bool {
        let cur = self.reach[i];
        match self.reach.get(i + 1) {
            Some(&next) if next.is_finite() => cur * ixi >= next,
            _ => false,
        }
    }

    fn steep_up(&self, i: usize, ixi: f64) -> bool {
        let cur = self.reach[i];
        if cur.is_infinite() {
            return false;
        }
        match self.reach.get(i + 1) {
            Some(&next) if next.is_finite() => cur <= next * ixi,
            _ => true,
        }
    }
}

impl Xi {
    /// Create a new extractor.
    ///
    /// # Arguments
    ///
    /// * `xi` - Relative drop in reachability that counts as steep, in `(0, 1)`.
    /// * `min_pts` - Minimum number of positions a cluster must span.
    pub fn new(xi: f64, min_pts: usize) -> Self {
        Self { xi, min_pts }
    }

    /// Set the steepness threshold.
    pub fn with_xi(mut self, xi: f64) -> Self {
        self.xi = xi;
        self
    }

    /// Set the minimum cluster length.
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    /// Configured xi.
    pub fn xi(&self) -> f64 {
        self.xi
    }

    /// Configured `min_pts`.
    pub fn min_pts(&self) -> usize {
        self.min_pts
    }

    /// Reject unusable parameters.
    pub fn validate(&self) -> Result<()> {
        if !(self.xi > 0.0 && self.xi < 1.0) {
            return Err(Error::InvalidParameter {
                name: "xi",
                message: "must be in (0, 1)",
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

    /// Extract the cluster hierarchy of `order`.
    pub fn extract(&self, order: &ClusterOrder) -> Result<XiResult> {
        self.extract_observed(order, |_| {})
    }

    /// [`Xi::extract`], calling `on_filter` with every steep area after each
    /// working-set update.
    pub(crate) fn extract_observed<F>(
        &self,
        order: &ClusterOrder,
        mut on_filter: F,
    ) -> Result<XiResult>
    where
        F: FnMut(&[SteepArea]),
    {
        self.validate()?;

        let n = order.len();
        if n == 0 {
            return Ok(XiResult::default());
        }
        debug!(n, xi = self.xi, min_pts = self.min_pts, "xi: start");

        let ixi = 1.0 - self.xi;
        let plot = Plot {
            reach: order
                .iter()
                .map(|e| sanitize_distance(e.reachability))
                .collect(),
        };
        let ids: Vec<ObjectId> = order.iter().map(|e| e.id).collect();

        let mut steep_areas: Vec<SteepArea> = Vec::new();
        // Indices into `steep_areas` of the down areas still able to open a cluster.
        let mut active: Vec<usize> = Vec::new();
        let mut hierarchy = ClusterHierarchy::new();
        // (arena index, start, end) of clusters not yet adopted by a parent.
        let mut current: Vec<(usize, usize, usize)> = Vec::new();
        let mut claimed = vec![false; n];
        let mut mib = 0.0f64;

        let mut index = 0;
        while index < n {
            mib = mib.max(plot.at(index)?);

            // The last position never starts a descent, but the end of the
            // order counts as an ascent to +inf.
            if index + 1 < n && plot.steep_down(index, ixi) {
                update_filter(mib, ixi, &mut steep_areas, &mut active);
                on_filter(&steep_areas);

                let start = index;
                let mut end = index;
                let mut i = index + 1;
                while i < n {
                    if plot.steep_down(i, ixi) {
                        end = i;
                    } else if !plot.steep_down(i, 1.0) || i - end > self.min_pts {
                        break;
                    }
                    i += 1;
                }

                let area = SteepDownArea {
                    start,
                    end,
                    maximum: plot.at(start)?,
                    mib: 0.0,
                };
                trace!(start, end, maximum = area.maximum, "xi: steep down");
                active.push(steep_areas.len());
                steep_areas.push(SteepArea::Down(area));

                index = end + 1;
                mib = plot.at(index)?;
                continue;
            }

            if plot.steep_up(index, ixi) {
                update_filter(mib, ixi, &mut steep_areas, &mut active);
                on_filter(&steep_areas);

                let start = index;
                let mut end = index;
                let mut i = index + 1;
                while i < n && plot.after(end).is_finite() {
                    if plot.steep_up(i, ixi) {
                        end = i;
                    } else if !plot.steep_up(i, 1.0) || i - end > self.min_pts {
                        break;
                    }
                    i += 1;
                }

                let up = SteepUpArea {
                    start,
                    end,
                    maximum: plot.after(end),
                };
                trace!(start, end, maximum = up.maximum, "xi: steep up");
                steep_areas.push(SteepArea::Up(up));
                mib = up.maximum;

                // Most recent first, so nested clusters precede their parents.
                for &a in active.iter().rev() {
                    let SteepArea::Down(down) = steep_areas[a] else {
                        return Err(Error::Inconsistent(format!(
                            "steep area {a} in the working set is not a down area"
                        )));
                    };
                    if mib * ixi < down.mib {
                        continue;
                    }

                    let (cstart, cend) = self.cluster_bounds(&plot, &down, &up)?;
                    if cend - cstart + 1 < self.min_pts {
                        continue;
                    }

                    let mut members = Vec::new();
                    for &id in &ids[cstart..=cend] {
                        let slot = claimed.get_mut(id.index()).ok_or(Error::UnknownObject {
                            id,
                            len: n,
                        })?;
                        if !*slot {
                            *slot = true;
                            members.push(id);
                        }
                    }
                    trace!(cstart, cend, new_members = members.len(), "xi: cluster");

                    let mut cluster = Cluster::new(
                        format!("Cluster_{cstart}_{cend}"),
                        members,
                        ClusterModel::OrderRange {
                            start: cstart,
                            end: cend,
                        },
                    );
                    let (nested, rest): (Vec<_>, Vec<_>) = current
                        .into_iter()
                        .partition(|&(_, s, e)| cstart <= s && e <= cend);
                    cluster.children = nested.into_iter().map(|(c, _, _)| c).collect();
                    current = rest;
                    current.push((hierarchy.push(cluster), cstart, cend));
                }

                index = end + 1;
                continue;
            }

            index += 1;
        }

        let top: Vec<usize> = current.iter().map(|&(c, _, _)| c).collect();
        let unclaimed: Vec<ObjectId> = ids
            .iter()
            .copied()
            .filter(|id| !claimed[id.index()])
            .collect();

        if unclaimed.is_empty() {
            hierarchy.set_roots(top);
        } else {
            let model = ClusterModel::OrderRange {
                start: 0,
                end: n - 1,
            };
            let mut all = if plot.at(n - 1)?.is_infinite() {
                Cluster::noise("Noise", unclaimed, model)
            } else {
                Cluster::new("Cluster", unclaimed, model)
            };
            all.children = top;
            let root = hierarchy.push(all);
            hierarchy.set_roots(vec![root]);
        }

        debug!(
            clusters = hierarchy.len(),
            steep_areas = steep_areas.len(),
            "xi: done"
        );
        Ok(XiResult {
            hierarchy,
            steep_areas,
        })
    }

    /// Cluster range for a down/up pair, trimmed on the side whose bound is
    /// markedly higher than the other.
    fn cluster_bounds(
        &self,
        plot: &Plot,
        down: &SteepDownArea,
        up: &SteepUpArea,
    ) -> Result<(usize, usize)> {
        let ixi = 1.0 - self.xi;
        let mut cstart = down.start;
        let mut cend = up.end;

        if down.maximum * ixi >= up.maximum {
            while cstart < down.end && plot.at(cstart + 1)? > up.maximum {
                cstart += 1;
            }
        } else if up.maximum * ixi >= down.maximum {
            while cend > up.start && plot.at(cend - 1)? > down.maximum {
                cend -= 1;
            }
        }
        Ok((cstart, cend))
    }
}

impl Default for Xi {
    fn default() -> Self {
        Self::new(0.05, 5)
    }
}

/// Drop down areas that the in-between maximum has overtaken and raise the
/// `mib` of the rest.
fn update_filter(mib: f64, ixi: f64, steep_areas: &mut [SteepArea], active: &mut Vec<usize>) {
    active.retain(|&a| match &mut steep_areas[a] {
        SteepArea::Down(d) if d.maximum * ixi > mib => {
            d.raise_mib(mib);
            true
        }
        _ => false,
    });
}

/// OPTICS followed by Xi extraction, sharing `min_pts`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpticsXi {
    epsilon: f64,
    min_pts: usize,
    xi: f64,
}

impl OpticsXi {
    /// Create the combined pipeline.
    pub fn new(epsilon: f64, min_pts: usize, xi: f64) -> Self {
        Self {
            epsilon,
            min_pts,
            xi,
        }
    }

    /// Set epsilon (neighborhood radius).
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set `min_pts` for both stages.
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    /// Set the steepness threshold.
    pub fn with_xi(mut self, xi: f64) -> Self {
        self.xi = xi;
        self
    }

    /// The ordering stage.
    pub fn optics(&self) -> Optics {
        Optics::new(self.epsilon, self.min_pts)
    }

    /// The extraction stage.
    pub fn extractor(&self) -> Xi {
        Xi::new(self.xi, self.min_pts)
    }

    /// Run both stages. Parameters of both are checked before any query.
    pub fn fit<Q>(&self, query: &Q) -> Result<(ClusterOrder, XiResult)>
    where
        Q: NeighborQuery + ?Sized,
    {
        self.fit_with_progress(query, NoProgress)
    }

    /// [`fit`](Self::fit), reporting ordering progress to `progress`.
    pub fn fit_with_progress<Q, P>(&self, query: &Q, progress: P) -> Result<(ClusterOrder, XiResult)>
    where
        Q: NeighborQuery + ?Sized,
        P: Progress,
    {
        let optics = self.optics();
        let xi = self.extractor();
        optics.validate()?;
        xi.validate()?;

        let order = optics.cluster_order_with_progress(query, progress)?;
        let result = xi.extract(&order)?;
        Ok((order, result))
    }
}

impl Default for OpticsXi {
    fn default() -> Self {
        Self::new(f64::INFINITY, 5, 0.05)
    }
}

impl Clustering for OpticsXi {
    fn cluster<Q: NeighborQuery + ?Sized>(&self, query: &Q) -> Result<ClusterHierarchy> {
        let (_, result) = self.fit(query)?;
        Ok(result.hierarchy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::neighbors::{LinearScan, Points};
    use crate::cluster::NOISE;
    use proptest::prelude::*;

    const INF: f64 = f64::INFINITY;

    fn range_of(h: &ClusterHierarchy, i: usize) -> (usize, usize) {
        match h.get(i).unwrap().model {
            ClusterModel::OrderRange { start, end } => (start, end),
            ClusterModel::Density => panic!("xi clusters carry order ranges"),
        }
    }

    fn find(h: &ClusterHierarchy, start: usize, end: usize) -> Option<usize> {
        (0..h.len()).find(|&i| range_of(h, i) == (start, end))
    }

    #[test]
    fn synthetic_valley() {
        let order = ClusterOrder::from_reachabilities(&[INF, 1.0, 1.0, 5.0, 1.0, 1.0, INF]);
        let result = Xi::new(0.5, 1).extract(&order).unwrap();
        let h = &result.hierarchy;

        // The valley before the peak, without the peak.
        let left = find(h, 0, 2).expect("cluster [0, 2]");
        let members: Vec<usize> = h.get(left).unwrap().members.iter().map(|id| id.index()).collect();
        assert_eq!(members, vec![0, 1, 2]);
        assert!(!members.contains(&3));

        // The peak opens the next valley.
        let right = find(h, 3, 5).expect("cluster [3, 5]");
        let outer = find(h, 0, 5).expect("cluster [0, 5]");
        assert_eq!(h.children(outer), &[left, right]);
        assert!(h.get(outer).unwrap().members.is_empty());

        // The final unreached object is noise and parents everything.
        assert_eq!(h.roots().len(), 1);
        let root = h.roots()[0];
        let root_cluster = h.get(root).unwrap();
        assert!(root_cluster.noise);
        assert_eq!(root_cluster.members, vec![ObjectId::new(6)]);
        assert_eq!(h.children(root), &[outer]);
        assert!(h.is_consistent());

        // Steep areas around the peak.
        assert!(result.steep_areas.contains(&SteepArea::Up(SteepUpArea {
            start: 2,
            end: 2,
            maximum: 5.0
        })));
        assert!(result
            .steep_areas
            .iter()
            .any(|a| matches!(a, SteepArea::Down(d) if d.start == 3 && d.end == 3 && d.maximum == 5.0)));
    }

    #[test]
    fn min_pts_rejects_short_clusters() {
        let order = ClusterOrder::from_reachabilities(&[INF, 1.0, 1.0, 5.0, 1.0, 1.0, INF]);
        let result = Xi::new(0.5, 4).extract(&order).unwrap();
        let h = &result.hierarchy;
        assert!(find(h, 0, 2).is_none());
        assert!(find(h, 3, 5).is_none());
        assert!(h.is_consistent());
    }

    #[test]
    fn last_valley_closes_at_end_of_order() {
        let order = ClusterOrder::from_reachabilities(&[INF, 1.0, 1.0, 5.0, 1.0, 1.0]);
        let result = Xi::new(0.5, 1).extract(&order).unwrap();
        let h = &result.hierarchy;

        let left = find(h, 0, 2).expect("cluster [0, 2]");
        let right = find(h, 3, 5).expect("cluster [3, 5]");
        let outer = find(h, 0, 5).expect("cluster [0, 5]");
        assert_eq!(h.roots(), &[outer]);
        assert_eq!(h.children(outer), &[left, right]);
        let members: Vec<usize> = h.get(right).unwrap().members.iter().map(|id| id.index()).collect();
        assert_eq!(members, vec![3, 4, 5]);
        assert!(h.noise().is_empty());
        assert!(h.is_consistent());

        assert!(result.steep_areas.contains(&SteepArea::Up(SteepUpArea {
            start: 5,
            end: 5,
            maximum: INF
        })));
    }

    #[test]
    fn catch_all_is_plain_cluster_when_order_ends_reachable() {
        let order = ClusterOrder::from_reachabilities(&[INF, 1.0, 1.0, 8.0, 8.0, 8.0]);
        let result = Xi::new(0.5, 7).extract(&order).unwrap();
        let h = &result.hierarchy;
        assert_eq!(h.len(), 1);
        let root = h.get(h.roots()[0]).unwrap();
        assert!(!root.noise);
        assert_eq!(root.name, "Cluster");
        assert_eq!(root.members.len(), 6);
    }

    #[test]
    fn flat_order_is_one_noise_cluster() {
        let order = ClusterOrder::from_reachabilities(&[INF, INF, INF]);
        let result = Xi::new(0.1, 2).extract(&order).unwrap();
        assert!(result.steep_areas.is_empty());
        let h = &result.hierarchy;
        assert_eq!(h.len(), 1);
        assert_eq!(h.noise().len(), 3);
    }

    #[test]
    fn empty_order() {
        let result = Xi::default().extract(&ClusterOrder::default()).unwrap();
        assert!(result.hierarchy.is_empty());
        assert!(result.steep_areas.is_empty());
    }

    #[test]
    fn invalid_xi() {
        let order = ClusterOrder::from_reachabilities(&[INF]);
        for xi in [0.0, 1.0, -0.5, 2.0, f64::NAN] {
            assert!(Xi::new(xi, 2).extract(&order).is_err(), "xi = {xi}");
        }
        assert!(Xi::new(0.5, 0).extract(&order).is_err());
    }

    #[test]
    fn filter_raises_mib_and_drops_dominated_areas() {
        let mut areas = vec![
            SteepArea::Down(SteepDownArea {
                start: 0,
                end: 0,
                maximum: 10.0,
                mib: 1.0,
            }),
            SteepArea::Down(SteepDownArea {
                start: 2,
                end: 2,
                maximum: 4.0,
                mib: 3.5,
            }),
        ];
        let mut active = vec![0, 1];

        update_filter(3.0, 0.5, &mut areas, &mut active);
        assert_eq!(active, vec![0]);
        let SteepArea::Down(d) = areas[0] else { panic!() };
        assert_eq!(d.mib, 3.0);

        update_filter(2.0, 0.5, &mut areas, &mut active);
        let SteepArea::Down(d) = areas[0] else { panic!() };
        assert_eq!(d.mib, 3.0, "mib never decreases");
    }

    #[test]
    fn two_blobs_end_to_end() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![0.1, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 10.0],
            vec![10.0, 10.1],
            vec![10.1, 10.1],
        ];
        let labels = OpticsXi::new(INF, 2, 0.1).fit_predict(&data).unwrap();
        assert_eq!(labels.len(), 8);
        assert!(labels[..4].iter().all(|&l| l == labels[0] && l != NOISE));
        assert!(labels[4..].iter().all(|&l| l == labels[4] && l != NOISE));
        assert_ne!(labels[0], labels[4]);
    }

    #[test]
    fn two_blobs_are_separate_order_ranges() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![0.1, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 10.0],
            vec![10.0, 10.1],
            vec![10.1, 10.1],
        ];
        let query = LinearScan::new(Points::euclidean(&data).unwrap());
        let (order, result) = OpticsXi::new(INF, 2, 0.1).fit(&query).unwrap();
        let h = &result.hierarchy;

        // The order walks blob A, then jumps to blob B.
        assert!(order.iter().take(4).all(|e| e.id.index() < 4));

        let a = find(h, 0, 3).expect("blob A");
        let b = find(h, 4, 7).expect("blob B");
        let mut a_ids: Vec<usize> = h.all_members(a).iter().map(|id| id.index()).collect();
        let mut b_ids: Vec<usize> = h.all_members(b).iter().map(|id| id.index()).collect();
        a_ids.sort_unstable();
        b_ids.sort_unstable();
        assert_eq!(a_ids, vec![0, 1, 2, 3]);
        assert_eq!(b_ids, vec![4, 5, 6, 7]);

        // Neither blob parents the other.
        assert!(!h.descendants(a).contains(&b));
        assert!(!h.descendants(b).contains(&a));
        for &root in h.roots() {
            assert!(!h.get(root).unwrap().noise);
            assert!(h.get(root).unwrap().members.is_empty());
        }
        assert!(h.is_consistent());
    }

    proptest! {
        #[test]
        fn prop_mib_never_decreases_within_a_run(
            reach in prop::collection::vec(
                prop_oneof![Just(INF), 0.0f64..100.0],
                0..40
            ),
            xi in 0.01f64..0.99,
            min_pts in 1usize..5
        ) {
            let order = ClusterOrder::from_reachabilities(&reach);
            let mut last: Vec<f64> = Vec::new();
            let mut ok = true;
            Xi::new(xi, min_pts)
                .extract_observed(&order, |areas| {
                    for (i, area) in areas.iter().enumerate() {
                        let SteepArea::Down(d) = area else { continue };
                        if i >= last.len() {
                            last.resize(i + 1, 0.0);
                        }
                        ok &= d.mib >= last[i];
                        last[i] = d.mib;
                    }
                })
                .unwrap();
            prop_assert!(ok, "a down area's mib decreased");
        }
    }

    #[test]
    fn fit_validates_before_querying() {
        let data = vec![vec![0.0]];
        let query = LinearScan::new(Points::euclidean(&data).unwrap());
        assert!(OpticsXi::new(INF, 2, 1.5).fit(&query).is_err());
    }
}
