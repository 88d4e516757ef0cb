use crate::core::models::shape::ShapeError;
use nalgebra::{DMatrix, DVector};

/// Numeric constants of a functional, either shared by every grid point or predicted per point.
#[derive(Debug, Clone, PartialEq)]
pub enum Constants {
    /// One row broadcast to every grid point (a classical functional).
    Shared(DVector<f64>),
    /// One row per grid point (N x C), e.g. the output of a constants-predicting model.
    PerPoint(DMatrix<f64>),
}

impl Constants {
    pub fn shared(values: &[f64]) -> Self {
        Constants::Shared(DVector::from_column_slice(values))
    }

    pub fn n_columns(&self) -> usize {
        match self {
            Constants::Shared(values) => values.len(),
            Constants::PerPoint(matrix) => matrix.ncols(),
        }
    }

    /// Checks that the constants cover `n_points` rows and at least `required` columns.
    pub fn check(&self, n_points: usize, required: usize) -> Result<(), ShapeError> {
        if self.n_columns() < required {
            return Err(ShapeError::new(
                "constants columns",
                format!("at least {required}"),
                self.n_columns(),
            ));
        }
        match self {
            Constants::PerPoint(matrix) if matrix.nrows() != n_points => Err(ShapeError::new(
                "constants rows",
                n_points,
                matrix.nrows(),
            )),
            _ => Ok(()),
        }
    }

    /// Returns the constants row of `point`, using `buf` as scratch space for per-point rows.
    #[inline]
    pub fn row<'a>(&'a self, point: usize, buf: &'a mut Vec<f64>) -> &'a [f64] {
        match self {
            Constants::Shared(values) => values.as_slice(),
            Constants::PerPoint(matrix) => {
                buf.clear();
                buf.extend(matrix.row(point).iter().copied());
                buf.as_slice()
            }
        }
    }

    /// Materializes the constants as an N x C matrix.
    pub fn to_matrix(&self, n_points: usize) -> DMatrix<f64> {
        match self {
            Constants::Shared(values) => {
                DMatrix::from_fn(n_points, values.len(), |_, col| values[col])
            }
            Constants::PerPoint(matrix) => matrix.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_constants_broadcast_to_any_row() {
        let constants = Constants::shared(&[1.0, 2.0]);
        let mut buf = Vec::new();
        assert_eq!(constants.row(0, &mut buf), &[1.0, 2.0]);
        assert_eq!(constants.row(999, &mut buf), &[1.0, 2.0]);
        assert_eq!(constants.check(1000, 2), Ok(()));
    }

    #[test]
    fn per_point_constants_return_their_own_row() {
        let matrix = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let constants = Constants::PerPoint(matrix);
        let mut buf = Vec::new();
        assert_eq!(constants.row(1, &mut buf), &[3.0, 4.0]);
    }

    #[test]
    fn check_rejects_too_few_columns() {
        let err = Constants::shared(&[1.05]).check(3, 21).unwrap_err();
        assert_eq!(err.context, "constants columns");
    }

    #[test]
    fn check_rejects_wrong_row_count() {
        let constants = Constants::PerPoint(DMatrix::zeros(4, 1));
        assert_eq!(constants.check(5, 1).unwrap_err().context, "constants rows");
    }

    #[test]
    fn to_matrix_tiles_shared_row() {
        let matrix = Constants::shared(&[1.0, 2.0]).to_matrix(3);
        assert_eq!(matrix.shape(), (3, 2));
        assert_eq!(matrix[(2, 1)], 2.0);
    }
}
