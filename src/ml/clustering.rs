pub mod accumulator;
pub mod anchors;
pub mod assign;
pub mod config;
pub mod distance;
pub mod pr_clustering;


// Re-export public types and functions
pub use accumulator::DistanceAccumulator;
pub use anchors::{select_first, select_next, AnchorPair, PartnerSearch};
pub use assign::{Assignment, Centroids, LabelAssigner, LabelLayout};
pub use config::{PrClusteringConfig, SamplingMode};
pub use distance::{distance_fn, Chebyshev, Distance, Euclidean, FnDistance, Manhattan};
pub use pr_clustering::{dataset_from_rows, pr_clustering, Dataset, PrClustering};
