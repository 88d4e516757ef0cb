//! Sources of functional constants.
//!
//! A constants-predicting model is an external collaborator: anything that maps per-point grid
//! features to a row of constants per point can implement [`ConstantsPredictor`]. The raw output
//! of such a model is passed through [`apply_output_head`], which constrains it to the physically
//! admissible region of the target functional.

use crate::core::functionals::reference::{PBE_REFERENCE, XALPHA_REFERENCE};
use crate::core::functionals::{Constants, FunctionalKind, pbe, vwn};
use crate::core::models::shape::{ShapeError, ensure_len};
use nalgebra::DMatrix;
use std::f64::consts::E;

/// Maps grid features (N x F) to functional constants.
pub trait ConstantsPredictor: Send + Sync {
    fn predict(&self, grid: &DMatrix<f64>) -> Result<Constants, ShapeError>;
}

/// Returns the same constants for every grid point, ignoring the features.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedConstants(pub Constants);

impl FixedConstants {
    pub fn new(values: &[f64]) -> Self {
        Self(Constants::shared(values))
    }
}

impl ConstantsPredictor for FixedConstants {
    fn predict(&self, _grid: &DMatrix<f64>) -> Result<Constants, ShapeError> {
        Ok(self.0.clone())
    }
}

/// `(b, c)` column pairs of the SVWN3 layout whose fit must keep `4c - b^2 > 0`.
const SVWN3_DISCRIMINANT_PAIRS: [(usize, usize); 5] = [(2, 4), (3, 5), (11, 14), (12, 15), (13, 16)];
const DISCRIMINANT_MARGIN: f64 = 1e-5;

/// Sigmoid rescaled to map `0 -> 1` and `+inf -> 4`.
#[inline]
pub fn scaled_sigmoid(x: f64) -> f64 {
    let shift = (E - 3.0) / 3.0;
    (1.0 + E + shift) / (1.0 + shift + (-0.5 * x + 1.0).exp())
}

/// Constrains raw per-point model output to valid constants of `kind`.
///
/// - SVWN3 (21 columns): every `c` of a VWN fit is replaced by `|c| + b^2/4 + 1e-5` so the fit's
///   discriminant stays positive.
/// - PBE (24 columns, or 2 columns trained in place of columns 4 and 5 with every other column
///   held at its reference value): scaled sigmoid, then multiplied by the reference constants.
/// - X-Alpha (1 column): scaled by the reference value.
pub fn apply_output_head(kind: FunctionalKind, raw: &DMatrix<f64>) -> Result<DMatrix<f64>, ShapeError> {
    match kind {
        FunctionalKind::Svwn3 => {
            ensure_len("SVWN3 head columns", vwn::N_CONSTANTS, raw.ncols())?;
            let mut out = raw.clone();
            for mut row in out.row_iter_mut() {
                for (b, c) in SVWN3_DISCRIMINANT_PAIRS {
                    row[c] = row[c].abs() + row[b] * row[b] / 4.0 + DISCRIMINANT_MARGIN;
                }
            }
            Ok(out)
        }
        FunctionalKind::Pbe => {
            let scaled = raw.map(scaled_sigmoid);
            let full = match raw.ncols() {
                pbe::N_CONSTANTS => scaled,
                2 => {
                    let mut full = DMatrix::from_element(raw.nrows(), pbe::N_CONSTANTS, 1.0);
                    full.columns_mut(4, 2).copy_from(&scaled);
                    full
                }
                found => {
                    return Err(ShapeError::new(
                        "PBE head columns",
                        format!("2 or {}", pbe::N_CONSTANTS),
                        found,
                    ));
                }
            };
            Ok(DMatrix::from_fn(full.nrows(), full.ncols(), |i, j| full[(i, j)] * PBE_REFERENCE[j]))
        }
        FunctionalKind::XAlpha => {
            ensure_len("XALPHA head columns", 1, raw.ncols())?;
            Ok(raw * XALPHA_REFERENCE[0])
        }
    }
}
