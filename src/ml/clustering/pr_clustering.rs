use std::collections::HashSet;

use log::{debug, error, info, warn};
use ndarray::{Array2, ArrayView1, Axis};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use super::anchors::{select_first, select_next, AnchorPair, PartnerSearch};
use super::assign::{Centroids, LabelAssigner, LabelLayout};
use super::config::PrClusteringConfig;
use super::distance::{Distance, Euclidean};
use crate::error::{Error, Result};

/// Dense point matrix: one row per point, one column per dimension.
pub type Dataset = Array2<f64>;

/// Builds a [`Dataset`] from row vectors, rejecting ragged or empty input.
pub fn dataset_from_rows(rows: &[Vec<f64>]) -> Result<Dataset> {
    if rows.is_empty() {
        return Err(Error::InvalidInput("empty dataset".into()));
    }
    let dim = rows[0].len();
    if dim == 0 {
        return Err(Error::InvalidInput(
            "points must have at least one dimension".into(),
        ));
    }
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != dim) {
        return Err(Error::InvalidInput(format!(
            "point {} has dimension {}, expected {}",
            i,
            row.len(),
            dim
        )));
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Ok(Array2::from_shape_vec((rows.len(), dim), flat)?)
}

/// Everything `fit` leaves behind for `predict`.
#[derive(Debug, Clone)]
struct FittedModel {
    pairs: Vec<AnchorPair>,
    assigner: LabelAssigner,
    centroids: Option<Centroids>,
}

impl FittedModel {
    /// The hard label of row `index` when that row is one of the fitted anchors.
    fn anchor_label(&self, index: usize, point: ArrayView1<f64>) -> Option<usize> {
        let layout = self.assigner.layout();
        self.pairs.iter().enumerate().find_map(|(i, p)| {
            if p.u == index && self.assigner.u_point(i) == point {
                Some(layout.anchor_label(i, false))
            } else if p.v == index && self.assigner.v_point(i) == point {
                Some(layout.anchor_label(i, true))
            } else {
                None
            }
        })
    }
}

/// PR clustering model.
///
/// `fit` picks `n_clusters / 2` pairs of mutually distant anchor points;
/// `predict` labels each point with the anchor it is unambiguously nearest to,
/// or with the ambiguous bucket when it sits inside some pair's margin.
///
/// # Example
///
/// ```
/// use ndarray::arr2;
/// use prclust::{PrClustering, PrClusteringConfig, SamplingMode};
///
/// let data = arr2(&[[0.0, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]]);
/// let config = PrClusteringConfig::new(2)
///     .with_alpha(0.1)
///     .with_sampling_mode(SamplingMode::All);
/// let mut model = PrClustering::new(config).unwrap();
/// let labels = model.fit_predict(&data).unwrap();
///
/// assert_eq!(labels[0], labels[1]);
/// assert_eq!(labels[2], labels[3]);
/// assert_ne!(labels[0], labels[2]);
/// ```
#[derive(Debug, Clone)]
pub struct PrClustering<D: Distance = Euclidean> {
    config: PrClusteringConfig,
    metric: D,
    fitted: Option<FittedModel>,
    labels: Option<Vec<usize>>,
}

impl PrClustering<Euclidean> {
    /// Creates an unfitted model using Euclidean distance.
    pub fn new(config: PrClusteringConfig) -> Result<Self> {
        Self::with_distance(config, Euclidean)
    }
}

impl<D: Distance> PrClustering<D> {
    /// Creates an unfitted model with a caller-supplied metric.
    pub fn with_distance(config: PrClusteringConfig, metric: D) -> Result<Self> {
        config.validate()?;
        if config.use_margin_of_min_distance && !config.use_centroids {
            warn!("use_margin_of_min_distance has no effect without use_centroids");
        }
        Ok(Self {
            config,
            metric,
            fitted: None,
            labels: None,
        })
    }

    pub fn config(&self) -> &PrClusteringConfig {
        &self.config
    }

    pub fn metric(&self) -> &D {
        &self.metric
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Number of distinct labels `predict` can emit.
    pub fn n_labels(&self) -> usize {
        LabelLayout::new(self.config.n_clusters).n_labels()
    }

    /// The dedicated ambiguous label. `None` for odd cluster counts, where the
    /// ambiguous region is split between the last pair's labels.
    pub fn ambiguous_label(&self) -> Option<usize> {
        let layout = LabelLayout::new(self.config.n_clusters);
        (!layout.is_odd()).then(|| layout.ambiguous_label())
    }

    pub fn anchor_pairs(&self) -> Result<&[AnchorPair]> {
        self.fitted
            .as_ref()
            .map(|f| f.pairs.as_slice())
            .ok_or(Error::NotFitted)
    }

    pub fn u_centers(&self) -> Result<Vec<usize>> {
        Ok(self.anchor_pairs()?.iter().map(|p| p.u).collect())
    }

    pub fn v_centers(&self) -> Result<Vec<usize>> {
        Ok(self.anchor_pairs()?.iter().map(|p| p.v).collect())
    }

    /// Running centroids, when centroid tracking is enabled and the model is fitted.
    pub fn centroids(&self) -> Option<&Centroids> {
        self.fitted.as_ref().and_then(|f| f.centroids.as_ref())
    }

    /// Labels produced by the most recent `predict`.
    pub fn labels(&self) -> Option<&[usize]> {
        self.labels.as_deref()
    }

    fn check_points(&self, data: &Dataset) -> Result<()> {
        if data.nrows() == 0 {
            return Err(Error::InvalidInput("empty dataset".into()));
        }
        if data.ncols() == 0 {
            return Err(Error::InvalidInput(
                "points must have at least one dimension".into(),
            ));
        }
        if let Some(pos) = data.iter().position(|x| !x.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "point {} has a non-finite coordinate",
                pos / data.ncols()
            )));
        }
        Ok(())
    }

    fn check_fit_input(&self, data: &Dataset) -> Result<()> {
        self.check_points(data)?;
        let n = data.nrows();
        let k = self.config.n_clusters;
        if n < k {
            return Err(Error::InvalidInput(format!(
                "dataset has {} points, fewer than n_clusters = {}",
                n, k
            )));
        }
        if n == k {
            return Err(Error::InvalidConfiguration(format!(
                "n_clusters = {} must be smaller than the dataset size",
                k
            )));
        }
        let first = data.row(0);
        if data.axis_iter(Axis(0)).all(|row| row == first) {
            return Err(Error::InvalidInput(
                "all points coincide; no distinct anchors exist".into(),
            ));
        }
        Ok(())
    }

    /// Selects the anchor pairs. Any previous fit is discarded first.
    pub fn fit(&mut self, data: &Dataset) -> Result<()> {
        self.fitted = None;
        self.labels = None;
        self.check_fit_input(data)?;

        let view = data.view();
        let n_clusters = self.config.n_clusters;
        let n_pairs = self.config.n_pairs();
        let sample_size = self.config.sampling_mode.sample_size(data.nrows());
        info!(
            "fitting PR clustering: {} points, {} clusters, {} anchor pairs, {} candidates",
            data.nrows(),
            n_clusters,
            n_pairs,
            sample_size
        );

        let mut rng = match self.config.random_seed {
            Some(s) => ChaCha20Rng::seed_from_u64(s),
            None => ChaCha20Rng::from_entropy(),
        };

        let (first, mut acc) = select_first(&self.metric, view, sample_size, &mut rng)?;
        let mut pairs = Vec::with_capacity(n_pairs);
        for i in 1..=n_pairs {
            let u = if i == 1 {
                first
            } else {
                select_next(&mut acc, &self.metric, view, None)?
            };
            let partner = PartnerSearch {
                anchor: u,
                iteration: i,
                n_clusters,
            };
            let v = select_next(&mut acc, &self.metric, view, Some(partner))?;
            debug!("pair {}: u = {}, v = {}", i, u, v);
            pairs.push(AnchorPair { u, v });
        }

        let expected = 2 * n_pairs;
        let distinct: HashSet<usize> = pairs.iter().flat_map(|p| [p.u, p.v]).collect();
        if pairs.len() != n_pairs || distinct.len() != expected {
            error!(
                "anchor selection produced {} distinct anchors, expected {}: {:?}",
                distinct.len(),
                expected,
                pairs
            );
            return Err(Error::AnchorCollision {
                expected,
                found: distinct.len(),
            });
        }

        let us: Vec<usize> = pairs.iter().map(|p| p.u).collect();
        let vs: Vec<usize> = pairs.iter().map(|p| p.v).collect();
        let layout = LabelLayout::new(n_clusters);
        let assigner = LabelAssigner::new(
            &self.metric,
            layout,
            self.config.alpha,
            data.select(Axis(0), &us),
            data.select(Axis(0), &vs),
            self.config.use_margin_of_min_distance,
        );
        let centroids = self
            .config
            .use_centroids
            .then(|| Centroids::seed(&layout, assigner.u_points(), assigner.v_points()));

        info!("fitted {} anchor pairs: {:?}", pairs.len(), pairs);
        self.fitted = Some(FittedModel {
            pairs,
            assigner,
            centroids,
        });
        Ok(())
    }

    /// Labels every row of `data` in index order.
    ///
    /// Rows that are fitted anchors (same index, same coordinates) take their
    /// own hard label. With centroid tracking every other assignment updates
    /// the running mean of its label before the next row is labelled.
    pub fn predict(&mut self, data: &Dataset) -> Result<Vec<usize>> {
        let fitted = self.fitted.as_mut().ok_or(Error::NotFitted)?;
        if data.nrows() == 0 {
            return Err(Error::InvalidInput("empty dataset".into()));
        }
        let dim = fitted.assigner.u_points().ncols();
        if data.ncols() != dim {
            return Err(Error::InvalidInput(format!(
                "points have dimension {}, model was fitted on {}",
                data.ncols(),
                dim
            )));
        }
        if data.iter().any(|x| !x.is_finite()) {
            return Err(Error::InvalidInput(
                "dataset contains non-finite coordinates".into(),
            ));
        }

        let mut labels = Vec::with_capacity(data.nrows());
        let mut ambiguous = 0;
        for (j, point) in data.axis_iter(Axis(0)).enumerate() {
            if let Some(label) = fitted.anchor_label(j, point) {
                labels.push(label);
                continue;
            }
            let assignment = fitted
                .assigner
                .assign(&self.metric, point, fitted.centroids.as_ref());
            if assignment.is_ambiguous() {
                ambiguous += 1;
            }
            if let Some(c) = fitted.centroids.as_mut() {
                c.update(assignment.label(), point);
            }
            labels.push(assignment.label());
        }
        debug!(
            "predicted {} points, {} in the ambiguous region",
            labels.len(),
            ambiguous
        );

        self.labels = Some(labels.clone());
        Ok(labels)
    }

    /// `fit` followed by `predict` on the same data.
    pub fn fit_predict(&mut self, data: &Dataset) -> Result<Vec<usize>> {
        self.fit(data)?;
        self.predict(data)
    }
}

/// Runs PR clustering with Euclidean distance, returning one label per row.
///
/// # Example
///
/// ```
/// use prclust::{dataset_from_rows, pr_clustering, PrClusteringConfig};
///
/// let data = dataset_from_rows(&[
///     vec![1.0, 2.0],
///     vec![1.5, 1.8],
///     vec![5.0, 8.0],
///     vec![8.0, 8.0],
///     vec![1.2, 2.1],
/// ])
/// .unwrap();
/// let config = PrClusteringConfig::new(2).with_random_seed(42);
/// let labels = pr_clustering(&data, &config).unwrap();
/// assert_eq!(labels.len(), 5);
/// ```
pub fn pr_clustering(data: &Dataset, config: &PrClusteringConfig) -> Result<Vec<usize>> {
    PrClustering::new(config.clone())?.fit_predict(data)
}
