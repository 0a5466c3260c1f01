use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A pairwise distance over two points of the same dimension.
///
/// Implementations are expected to be non-negative and symmetric. Nothing
/// checks this; a metric breaking the contract yields unspecified (but
/// memory-safe) clusterings.
pub trait Distance: Sync {
    fn distance(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64;
}

/// Euclidean (L2) norm of the difference. The default metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl Distance for Euclidean {
    fn distance(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
        a.iter()
            .zip(b.iter())
            .fold(0.0, |acc, (&x, &y)| acc + (x - y).powi(2))
            .sqrt()
    }
}

/// Manhattan (L1) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Manhattan;

impl Distance for Manhattan {
    fn distance(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
        a.iter().zip(b.iter()).map(|(&x, &y)| (x - y).abs()).sum()
    }
}

/// Chebyshev (L-infinity) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Chebyshev;

impl Distance for Chebyshev {
    fn distance(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(&x, &y)| (x - y).abs())
            .fold(0.0, f64::max)
    }
}

/// A closure used as a metric. Build one with [`distance_fn`].
#[derive(Debug, Clone, Copy)]
pub struct FnDistance<F>(F);

/// Wraps a caller-supplied closure as a [`Distance`].
///
/// ```
/// use prclust::{distance_fn, Distance};
///
/// let sq = distance_fn(|a, b| {
///     (&a - &b).mapv(|d| d * d).sum()
/// });
/// let a = ndarray::arr1(&[0.0, 0.0]);
/// let b = ndarray::arr1(&[3.0, 4.0]);
/// assert_eq!(sq.distance(a.view(), b.view()), 25.0);
/// ```
pub fn distance_fn<F>(f: F) -> FnDistance<F>
where
    F: Fn(ArrayView1<f64>, ArrayView1<f64>) -> f64 + Sync,
{
    FnDistance(f)
}

impl<F> Distance for FnDistance<F>
where
    F: Fn(ArrayView1<f64>, ArrayView1<f64>) -> f64 + Sync,
{
    fn distance(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
        (self.0)(a, b)
    }
}

/// Distances from `point` to every row of `data`, in row order.
#[cfg(not(feature = "parallel"))]
pub fn distance_row<D: Distance>(
    metric: &D,
    point: ArrayView1<f64>,
    data: ArrayView2<f64>,
) -> Array1<f64> {
    data.axis_iter(Axis(0))
        .map(|row| metric.distance(point, row))
        .collect()
}

/// Distances from `point` to every row of `data`, in row order.
#[cfg(feature = "parallel")]
pub fn distance_row<D: Distance>(
    metric: &D,
    point: ArrayView1<f64>,
    data: ArrayView2<f64>,
) -> Array1<f64> {
    // collect() on an indexed parallel iterator keeps row order
    let values: Vec<f64> = (0..data.len_of(Axis(0)))
        .into_par_iter()
        .map(|j| metric.distance(point, data.row(j)))
        .collect();
    Array1::from(values)
}
