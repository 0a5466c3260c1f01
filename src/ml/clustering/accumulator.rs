use ndarray::{Array1, Array2, ArrayView2};

use super::distance::{distance_row, Distance};
use crate::error::Result;

/// Running distance matrix between the anchors chosen so far and every point.
///
/// Row `r` holds the distances from the `r`-th chosen anchor to all `N`
/// points. Columns belonging to chosen anchors are zero in every row, so
/// their aggregate is zero and they never win a later maximization.
#[derive(Debug, Clone)]
pub struct DistanceAccumulator {
    rows: Array2<f64>,
    totals: Array1<f64>,
    chosen: Vec<usize>,
}

impl DistanceAccumulator {
    /// Starts the matrix with the distance row of the first anchor.
    pub fn initialize<D: Distance>(
        metric: &D,
        anchor: usize,
        data: ArrayView2<f64>,
    ) -> Result<Self> {
        let mut acc = Self {
            rows: Array2::zeros((0, data.nrows())),
            totals: Array1::zeros(data.nrows()),
            chosen: Vec::new(),
        };
        acc.append(metric, anchor, data)?;
        Ok(acc)
    }

    /// Appends the distance row of a newly chosen anchor and masks the
    /// columns of every anchor chosen so far.
    pub fn append<D: Distance>(
        &mut self,
        metric: &D,
        anchor: usize,
        data: ArrayView2<f64>,
    ) -> Result<()> {
        let row = distance_row(metric, data.row(anchor), data);
        self.rows.push_row(row.view())?;
        self.totals += &row;
        if !self.chosen.contains(&anchor) {
            self.chosen.push(anchor);
        }
        for &j in &self.chosen {
            self.rows.column_mut(j).fill(0.0);
            self.totals[j] = 0.0;
        }
        Ok(())
    }

    /// Column sums: each point's total distance to all chosen anchors.
    pub fn aggregate(&self) -> &Array1<f64> {
        &self.totals
    }

    /// Anchor indices in the order they were chosen.
    pub fn chosen(&self) -> &[usize] {
        &self.chosen
    }

    pub fn rows(&self) -> &Array2<f64> {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.nrows() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::clustering::distance::Euclidean;
    use approx::assert_abs_diff_eq;
    use ndarray::{arr2, Axis};

    fn line() -> Array2<f64> {
        arr2(&[[0.0], [1.0], [3.0], [7.0]])
    }

    #[test]
    fn test_initialize_masks_anchor() {
        let data = line();
        let acc = DistanceAccumulator::initialize(&Euclidean, 1, data.view()).unwrap();
        assert_eq!(acc.len(), 1);
        assert_eq!(acc.chosen(), &[1]);
        let agg = acc.aggregate();
        assert_abs_diff_eq!(agg[0], 1.0);
        assert_abs_diff_eq!(agg[1], 0.0);
        assert_abs_diff_eq!(agg[2], 2.0);
        assert_abs_diff_eq!(agg[3], 6.0);
    }

    #[test]
    fn test_append_masks_all_chosen_columns() {
        let data = line();
        let mut acc = DistanceAccumulator::initialize(&Euclidean, 0, data.view()).unwrap();
        acc.append(&Euclidean, 3, data.view()).unwrap();

        assert_eq!(acc.len(), 2);
        for r in 0..acc.len() {
            assert_eq!(acc.rows()[[r, 0]], 0.0);
            assert_eq!(acc.rows()[[r, 3]], 0.0);
        }
        let agg = acc.aggregate();
        // point 1: |1-0| + |1-7|, point 2: |3-0| + |3-7|
        assert_abs_diff_eq!(agg[1], 7.0);
        assert_abs_diff_eq!(agg[2], 7.0);
        assert_eq!(agg[0], 0.0);
        assert_eq!(agg[3], 0.0);
    }

    #[test]
    fn test_totals_match_column_sums() {
        let data = arr2(&[[0.0, 0.0], [2.0, 1.0], [5.0, 5.0], [9.0, 0.5], [4.0, 8.0]]);
        let mut acc = DistanceAccumulator::initialize(&Euclidean, 2, data.view()).unwrap();
        acc.append(&Euclidean, 0, data.view()).unwrap();
        acc.append(&Euclidean, 4, data.view()).unwrap();

        let sums = acc.rows().sum_axis(Axis(0));
        for j in 0..data.nrows() {
            assert_abs_diff_eq!(acc.aggregate()[j], sums[j], epsilon = 1e-12);
        }
    }
}
