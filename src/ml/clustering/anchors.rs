use log::debug;
use ndarray::{Array1, ArrayView2};
use rand::seq::index;
use rand::Rng;

use super::accumulator::DistanceAccumulator;
use super::distance::{distance_row, Distance};
use crate::error::Result;

/// One iteration's anchors: points near `u` and points near `v` are expected
/// to land in different clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorPair {
    pub u: usize,
    pub v: usize,
}

/// Context for choosing the partner `v` of an anchor `u` chosen earlier in
/// the same iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartnerSearch {
    /// The already-chosen `u` of this iteration.
    pub anchor: usize,
    /// 1-based iteration index.
    pub iteration: usize,
    pub n_clusters: usize,
}

impl PartnerSearch {
    /// Weight on the distance to `u`: `n_clusters - 2i + 2`.
    ///
    /// Large in early iterations (globally distant pairs), shrinking to 2 or
    /// 3 in the last one (pairs distant relative to the fixed anchors).
    pub fn weight(&self) -> f64 {
        self.n_clusters as f64 - 2.0 * self.iteration as f64 + 2.0
    }
}

/// Index of the largest value. Ties go to the first occurrence.
pub fn argmax_first(values: &Array1<f64>) -> usize {
    let mut best = 0;
    let mut best_val = f64::NEG_INFINITY;
    for (i, &v) in values.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best = i;
        }
    }
    best
}

/// Draws `sample_size` distinct candidate indices, sorted ascending so that
/// exact ties resolve to the lowest index.
pub fn sample_candidates<R: Rng + ?Sized>(n: usize, sample_size: usize, rng: &mut R) -> Vec<usize> {
    if sample_size >= n {
        return (0..n).collect();
    }
    let mut picked = index::sample(rng, n, sample_size).into_vec();
    picked.sort_unstable();
    picked
}

/// Farthest pair among `candidates` (row-major scan, first occurrence wins).
/// A single candidate pairs with itself.
pub fn farthest_pair<D: Distance>(
    metric: &D,
    data: ArrayView2<f64>,
    candidates: &[usize],
) -> (usize, usize) {
    let mut best = (candidates[0], candidates[0]);
    let mut best_dist = 0.0;
    for (a, &i) in candidates.iter().enumerate() {
        for &j in &candidates[a + 1..] {
            let d = metric.distance(data.row(i), data.row(j));
            if d > best_dist {
                best_dist = d;
                best = (i, j);
            }
        }
    }
    best
}

/// Picks the first anchor and starts the accumulator with it.
///
/// `sample_size` candidates are drawn and the farthest pair among them is
/// found; the anchor is then the point of the whole dataset with the largest
/// summed distance to both members of that pair.
///
/// `data` must be non-empty.
pub fn select_first<D: Distance, R: Rng + ?Sized>(
    metric: &D,
    data: ArrayView2<f64>,
    sample_size: usize,
    rng: &mut R,
) -> Result<(usize, DistanceAccumulator)> {
    let candidates = sample_candidates(data.nrows(), sample_size, rng);
    let (a, b) = farthest_pair(metric, data, &candidates);
    let scores = distance_row(metric, data.row(a), data) + distance_row(metric, data.row(b), data);
    let anchor = argmax_first(&scores);
    debug!(
        "first anchor {} (farthest sampled pair ({}, {}) among {} candidates)",
        anchor,
        a,
        b,
        candidates.len()
    );
    let acc = DistanceAccumulator::initialize(metric, anchor, data)?;
    Ok((anchor, acc))
}

/// Picks the next anchor by weighted farthest-point search over the
/// accumulator's aggregate distances, then appends it to the accumulator.
///
/// With a `partner` search the distance to that iteration's `u` is added with
/// weight [`PartnerSearch::weight`], and every chosen index (including `u`)
/// is zeroed before the maximization.
pub fn select_next<D: Distance>(
    acc: &mut DistanceAccumulator,
    metric: &D,
    data: ArrayView2<f64>,
    partner: Option<PartnerSearch>,
) -> Result<usize> {
    let mut scores = acc.aggregate().clone();
    if let Some(p) = partner {
        let w = p.weight();
        scores.scaled_add(w, &distance_row(metric, data.row(p.anchor), data));
        for &j in acc.chosen() {
            scores[j] = 0.0;
        }
        scores[p.anchor] = 0.0;
    }
    let anchor = argmax_first(&scores);
    debug!(
        "next anchor {} (score {:.6}, partner of {:?})",
        anchor,
        scores[anchor],
        partner.map(|p| p.anchor)
    );
    acc.append(metric, anchor, data)?;
    Ok(anchor)
}
