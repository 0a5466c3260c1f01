use approx::abs_diff_eq;
use ndarray::{Array1, Array2, ArrayView1};

use super::distance::Distance;

/// Normalized distances within this of zero count as ties with the nearest center.
pub const TIE_TOLERANCE: f64 = 1e-8;

/// How anchor pairs map onto cluster labels.
///
/// With an even cluster count every pair is hard: `u_i -> 2i`, `v_i -> 2i + 1`
/// and the ambiguous bucket is `2k`. With an odd count the last pair is never
/// margin-tested; its labels `2k - 2` and `2k - 1` double as the ambiguous
/// bucket, split by whichever of the two anchors is nearer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelLayout {
    n_clusters: usize,
    n_pairs: usize,
}

impl LabelLayout {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            n_pairs: n_clusters / 2,
        }
    }

    pub fn is_odd(&self) -> bool {
        self.n_clusters % 2 == 1
    }

    pub fn n_pairs(&self) -> usize {
        self.n_pairs
    }

    /// Pairs whose anchors take part in the margin test.
    pub fn hard_pairs(&self) -> usize {
        if self.is_odd() {
            self.n_pairs.saturating_sub(1)
        } else {
            self.n_pairs
        }
    }

    /// Label owned by the `u` (or `v`) anchor of `pair`.
    pub fn anchor_label(&self, pair: usize, is_v: bool) -> usize {
        2 * pair + usize::from(is_v)
    }

    /// Label of hard center `idx`, where centers are ordered
    /// `u_0 .. u_{h-1}, v_0 .. v_{h-1}`.
    pub fn center_label(&self, idx: usize) -> usize {
        let h = self.hard_pairs();
        if idx < h {
            2 * idx
        } else {
            2 * (idx % h) + 1
        }
    }

    /// Base label for points failing the margin test.
    pub fn ambiguous_label(&self) -> usize {
        2 * self.hard_pairs()
    }

    /// Number of distinct labels `predict` can emit.
    pub fn n_labels(&self) -> usize {
        if self.is_odd() {
            2 * self.n_pairs
        } else {
            2 * self.n_pairs + 1
        }
    }
}

/// Outcome of labelling one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// Passed the margin test for a single anchor.
    Hard(usize),
    /// Fell in the ambiguous region (already split for odd cluster counts).
    Ambiguous(usize),
}

impl Assignment {
    pub fn label(&self) -> usize {
        match *self {
            Assignment::Hard(l) | Assignment::Ambiguous(l) => l,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Assignment::Ambiguous(_))
    }
}

/// Running mean and point count per label.
#[derive(Debug, Clone, PartialEq)]
pub struct Centroids {
    means: Array2<f64>,
    counts: Vec<usize>,
}

impl Centroids {
    /// One centroid per anchor label, placed on the anchor with count 1.
    /// The even-layout ambiguous bucket starts empty.
    pub fn seed(layout: &LabelLayout, u_points: &Array2<f64>, v_points: &Array2<f64>) -> Self {
        let dim = u_points.ncols();
        let mut means = Array2::zeros((layout.n_labels(), dim));
        let mut counts = vec![0; layout.n_labels()];
        for pair in 0..layout.n_pairs() {
            let (u, v) = (layout.anchor_label(pair, false), layout.anchor_label(pair, true));
            means.row_mut(u).assign(&u_points.row(pair));
            means.row_mut(v).assign(&v_points.row(pair));
            counts[u] = 1;
            counts[v] = 1;
        }
        Self { means, counts }
    }

    /// Folds `point` into the running mean of `label`.
    pub fn update(&mut self, label: usize, point: ArrayView1<f64>) {
        self.counts[label] += 1;
        let c = self.counts[label] as f64;
        self.means
            .row_mut(label)
            .zip_mut_with(&point, |m, &x| *m += (x - *m) / c);
    }

    pub fn mean(&self, label: usize) -> ArrayView1<'_, f64> {
        self.means.row(label)
    }

    pub fn count(&self, label: usize) -> usize {
        self.counts[label]
    }

    pub fn means(&self) -> &Array2<f64> {
        &self.means
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Labels non-anchor points from a fitted set of anchor pairs.
#[derive(Debug, Clone)]
pub struct LabelAssigner {
    layout: LabelLayout,
    u_points: Array2<f64>,
    v_points: Array2<f64>,
    /// `alpha * distance(u_p, v_p)` for each hard pair `p`.
    margins: Array1<f64>,
    centroid_search: bool,
}

impl LabelAssigner {
    /// `u_points` and `v_points` hold one anchor per row, in pair order.
    /// With `centroid_search` the nearest-center search measures against the
    /// running centroids whenever they are supplied.
    pub fn new<D: Distance>(
        metric: &D,
        layout: LabelLayout,
        alpha: f64,
        u_points: Array2<f64>,
        v_points: Array2<f64>,
        centroid_search: bool,
    ) -> Self {
        let margins = (0..layout.hard_pairs())
            .map(|p| alpha * metric.distance(u_points.row(p), v_points.row(p)))
            .collect();
        Self {
            layout,
            u_points,
            v_points,
            margins,
            centroid_search,
        }
    }

    pub fn layout(&self) -> &LabelLayout {
        &self.layout
    }

    pub fn margins(&self) -> &Array1<f64> {
        &self.margins
    }

    pub fn u_point(&self, pair: usize) -> ArrayView1<'_, f64> {
        self.u_points.row(pair)
    }

    pub fn v_point(&self, pair: usize) -> ArrayView1<'_, f64> {
        self.v_points.row(pair)
    }

    pub fn u_points(&self) -> &Array2<f64> {
        &self.u_points
    }

    pub fn v_points(&self) -> &Array2<f64> {
        &self.v_points
    }

    fn center(&self, idx: usize) -> ArrayView1<'_, f64> {
        let h = self.layout.hard_pairs();
        if idx < h {
            self.u_points.row(idx)
        } else {
            self.v_points.row(idx - h)
        }
    }

    /// Labels `point`, which must not be an anchor.
    pub fn assign<D: Distance>(
        &self,
        metric: &D,
        point: ArrayView1<f64>,
        centroids: Option<&Centroids>,
    ) -> Assignment {
        let h = self.layout.hard_pairs();
        if h > 0 {
            let dists: Vec<f64> = (0..2 * h)
                .map(|idx| match centroids {
                    Some(c) if self.centroid_search => {
                        metric.distance(point, c.mean(self.layout.center_label(idx)))
                    }
                    _ => metric.distance(point, self.center(idx)),
                })
                .collect();

            let mut idx = 0;
            for (j, &d) in dists.iter().enumerate() {
                if d < dists[idx] {
                    idx = j;
                }
            }
            let d_min = dists[idx];
            let ties = dists
                .iter()
                .filter(|&&d| abs_diff_eq!(d - d_min, 0.0, epsilon = TIE_TOLERANCE))
                .count();
            let margin = self.margins[idx % h];
            let clear = dists
                .iter()
                .enumerate()
                .all(|(j, &d)| j == idx || d - d_min >= margin);
            if ties == 1 && clear {
                return Assignment::Hard(self.layout.center_label(idx));
            }
        }

        let mut label = self.layout.ambiguous_label();
        if self.layout.is_odd() {
            let last = self.layout.n_pairs() - 1;
            let (to_u, to_v) = match centroids {
                Some(c) => (
                    metric.distance(point, c.mean(self.layout.anchor_label(last, false))),
                    metric.distance(point, c.mean(self.layout.anchor_label(last, true))),
                ),
                None => (
                    metric.distance(point, self.u_points.row(last)),
                    metric.distance(point, self.v_points.row(last)),
                ),
            };
            if to_v < to_u {
                label += 1;
            }
        }
        Assignment::Ambiguous(label)
    }
}
