//! # PR clustering
//!
//! Partitions points by repeatedly choosing pairs of mutually distant anchor
//! points and assigning every other point to the nearer anchor, subject to a
//! margin test against the pair's own separation. Points that fail the test
//! for every pair land in an ambiguous bucket instead of being forced into
//! the nearest cluster.
//!
//! Unlike centroid-refinement methods there is no iteration to convergence:
//! `fit` is a greedy farthest-point search over a masked, growing distance
//! matrix, deterministic for a fixed seed.
//!
//! ```
//! use ndarray::arr2;
//! use prclust::{PrClustering, PrClusteringConfig, SamplingMode};
//!
//! let data = arr2(&[[0.0, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0], [5.0, 0.5]]);
//! let config = PrClusteringConfig::new(2)
//!     .with_sampling_mode(SamplingMode::All)
//!     .with_random_seed(7);
//! let mut model = PrClustering::new(config).unwrap();
//! let labels = model.fit_predict(&data).unwrap();
//! assert_eq!(labels.len(), 5);
//! ```
pub mod error;
pub mod ml;

pub use error::{Error, Result};
pub use ml::clustering::*;
