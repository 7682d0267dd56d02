use ndarray::{Array2, ArrayView2, Axis, s};

use crate::{InputId, RegressionErr, Result};

/// An in-memory supervised dataset: a feature matrix and the dependent variables
/// for the same observations, one observation per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: Array2<f64>,
    y: Array2<f64>,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `x` - The feature matrix, `n x p`.
    /// * `y` - The dependent variables, `n x k`.
    ///
    /// # Returns
    /// A new `Dataset` or an error if any dimension is zero, the row counts
    /// differ or some value isn't finite.
    pub fn new(x: Array2<f64>, y: Array2<f64>) -> Result<Self> {
        if x.nrows() == 0 {
            return Err(RegressionErr::EmptyInput { what: "dataset" });
        }

        if x.ncols() == 0 {
            return Err(RegressionErr::EmptyInput { what: "features" });
        }

        if y.ncols() == 0 {
            return Err(RegressionErr::EmptyInput {
                what: "dependent variables",
            });
        }

        if y.nrows() != x.nrows() {
            return Err(RegressionErr::SizeMismatch {
                what: "dependent variable rows",
                got: y.nrows(),
                expected: x.nrows(),
            });
        }

        if x.iter().any(|v| !v.is_finite()) {
            return Err(RegressionErr::NonFinite { what: "features" });
        }

        if y.iter().any(|v| !v.is_finite()) {
            return Err(RegressionErr::NonFinite {
                what: "dependent variables",
            });
        }

        Ok(Self { x, y })
    }

    /// Creates a new `Dataset` from a flat row-major buffer where every row holds
    /// `x_size` features followed by `y_size` dependent variables.
    pub fn from_flat(data: &[f64], x_size: usize, y_size: usize) -> Result<Self> {
        let row = x_size + y_size;

        if row == 0 || data.is_empty() {
            return Err(RegressionErr::EmptyInput { what: "dataset" });
        }

        if data.len() % row != 0 {
            return Err(RegressionErr::SizeMismatch {
                what: "flat dataset length",
                got: data.len(),
                expected: data.len().next_multiple_of(row),
            });
        }

        let rows = data.len() / row;
        let full = ArrayView2::from_shape((rows, row), data).map_err(|_| {
            RegressionErr::SizeMismatch {
                what: "flat dataset length",
                got: data.len(),
                expected: rows * row,
            }
        })?;

        let x = full.slice(s![.., ..x_size]).to_owned();
        let y = full.slice(s![.., x_size..]).to_owned();
        Self::new(x, y)
    }

    /// The feature matrix.
    pub fn x(&self) -> ArrayView2<'_, f64> {
        self.x.view()
    }

    /// The dependent variables.
    pub fn y(&self) -> ArrayView2<'_, f64> {
        self.y.view()
    }

    /// The input matrix selected by `id`.
    ///
    /// # Returns
    /// The features for `InputId::DATA`, the dependent variables for
    /// `InputId::DEPENDENT_VARIABLES` and `UnknownId` otherwise.
    pub fn input(&self, id: InputId) -> Result<ArrayView2<'_, f64>> {
        match id {
            InputId::DATA => Ok(self.x.view()),
            InputId::DEPENDENT_VARIABLES => Ok(self.y.view()),
            other => Err(RegressionErr::UnknownId {
                kind: "input",
                value: other.value(),
            }),
        }
    }

    /// The number of observations.
    pub fn rows(&self) -> usize {
        self.x.nrows()
    }

    /// The number of features per observation.
    pub fn features(&self) -> usize {
        self.x.ncols()
    }

    /// The number of dependent variables per observation.
    pub fn responses(&self) -> usize {
        self.y.ncols()
    }

    /// Splits the dataset in consecutive blocks of at most `size` rows, the way
    /// data arrives in online training.
    pub fn blocks(&self, size: usize) -> impl Iterator<Item = Dataset> + '_ {
        let size = size.max(1);

        self.x
            .axis_chunks_iter(Axis(0), size)
            .zip(self.y.axis_chunks_iter(Axis(0), size))
            .map(|(x, y)| Self {
                x: x.to_owned(),
                y: y.to_owned(),
            })
    }

    /// Splits the dataset into `parts` shards of (almost) the same amount of rows.
    ///
    /// # Returns
    /// The shards, or an error if `parts` is zero or greater than the number of rows.
    pub fn split(&self, parts: usize) -> Result<Vec<Dataset>> {
        if parts == 0 || parts > self.rows() {
            return Err(RegressionErr::SizeMismatch {
                what: "dataset shards",
                got: parts,
                expected: self.rows(),
            });
        }

        let base = self.rows() / parts;
        let extra = self.rows() % parts;
        let mut start = 0;
        let mut shards = Vec::with_capacity(parts);

        for i in 0..parts {
            let end = start + base + usize::from(i < extra);
            shards.push(Self {
                x: self.x.slice(s![start..end, ..]).to_owned(),
                y: self.y.slice(s![start..end, ..]).to_owned(),
            });
            start = end;
        }

        Ok(shards)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn from_flat_splits_features_and_responses() {
        let data = [1.0, 2.0, 10.0, 3.0, 4.0, 20.0];
        let ds = Dataset::from_flat(&data, 2, 1).unwrap();

        assert_eq!(ds.x(), array![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(ds.y(), array![[10.0], [20.0]]);
        assert_eq!(ds.rows(), 2);
        assert_eq!(ds.features(), 2);
        assert_eq!(ds.responses(), 1);
    }

    #[test]
    fn inputs_are_selected_by_identifier() {
        let ds = Dataset::from_flat(&[1.0, 2.0, 10.0], 2, 1).unwrap();

        assert_eq!(ds.input(InputId::DATA).unwrap(), ds.x());
        assert_eq!(ds.input(InputId::DEPENDENT_VARIABLES).unwrap(), ds.y());
        assert!(matches!(
            ds.input(InputId::new(2)),
            Err(RegressionErr::UnknownId { value: 2, .. })
        ));
    }

    #[test]
    fn from_flat_rejects_partial_rows() {
        let data = [1.0, 2.0, 10.0, 3.0];
        assert!(matches!(
            Dataset::from_flat(&data, 2, 1),
            Err(RegressionErr::SizeMismatch { .. })
        ));
    }

    #[test]
    fn invalid_datasets_are_rejected() {
        let empty = Array2::<f64>::zeros((0, 2));
        assert!(Dataset::new(empty, Array2::zeros((0, 1))).is_err());

        let x = array![[1.0], [2.0]];
        assert!(Dataset::new(x.clone(), array![[1.0]]).is_err());
        assert!(Dataset::new(x.clone(), Array2::zeros((2, 0))).is_err());
        assert!(matches!(
            Dataset::new(array![[1.0], [f64::NAN]], array![[1.0], [2.0]]),
            Err(RegressionErr::NonFinite { what: "features" })
        ));
    }

    #[test]
    fn blocks_cover_every_row_in_order() {
        let data: Vec<f64> = (0..10).map(f64::from).collect();
        let ds = Dataset::from_flat(&data, 1, 1).unwrap();

        let blocks: Vec<_> = ds.blocks(2).collect();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].x(), array![[0.0], [2.0]]);
        assert_eq!(blocks[2].rows(), 1);
        assert_eq!(blocks[2].y(), array![[9.0]]);
    }

    #[test]
    fn split_balances_rows() {
        let data: Vec<f64> = (0..14).map(f64::from).collect();
        let ds = Dataset::from_flat(&data, 1, 1).unwrap();

        let shards = ds.split(3).unwrap();
        let sizes: Vec<_> = shards.iter().map(Dataset::rows).collect();
        assert_eq!(sizes, [3, 2, 2]);
        assert_eq!(shards[1].x(), array![[6.0], [8.0]]);

        assert!(ds.split(0).is_err());
        assert!(ds.split(8).is_err());
    }
}
