//! Training objectives over pipeline outputs.

use super::backsplit::backsplit;
use crate::core::functionals::FunctionalKind;
use crate::core::functionals::reference::{PBE_TRAINABLE_COLUMNS, reference_constants};
use crate::core::models::batch::BatchedReaction;
use crate::core::models::shape::{ShapeError, ensure_len};
use crate::core::units::HARTREE_TO_KCAL;
use nalgebra::{DMatrix, DVector};

fn ensure_non_empty(context: &str, len: usize) -> Result<(), ShapeError> {
    if len == 0 {
        Err(ShapeError::new(context, "at least one value", 0))
    } else {
        Ok(())
    }
}

pub fn mean_absolute_error(predicted: &[f64], reference: &[f64]) -> Result<f64, ShapeError> {
    ensure_len("reference energies", predicted.len(), reference.len())?;
    ensure_non_empty("predicted energies", predicted.len())?;
    let total: f64 = predicted.iter().zip(reference).map(|(p, r)| (p - r).abs()).sum();
    Ok(total / predicted.len() as f64)
}

/// Derivative of [`mean_absolute_error`] with respect to every prediction: `sign(p - r) / n`,
/// zero where prediction and reference agree.
pub fn mean_absolute_error_gradient(predicted: &[f64], reference: &[f64]) -> Result<Vec<f64>, ShapeError> {
    ensure_len("reference energies", predicted.len(), reference.len())?;
    ensure_non_empty("predicted energies", predicted.len())?;
    let n = predicted.len() as f64;
    Ok(predicted
        .iter()
        .zip(reference)
        .map(|(p, r)| {
            let diff = p - r;
            if diff == 0.0 { 0.0 } else { diff.signum() / n }
        })
        .collect())
}

/// Auxiliary loss between predicted and reference local energies, in kcal/mol:
/// `627.5095 / n_mol * sum_mol sqrt(sum (p - r)^2) / len_mol`.
///
/// Molecules without grid points contribute zero but are still counted in `n_mol`.
pub fn local_energy_loss(
    batch: &BatchedReaction,
    predicted: &DVector<f64>,
    reference: &DVector<f64>,
) -> Result<f64, ShapeError> {
    ensure_len("reference local energies", predicted.len(), reference.len())?;
    let predicted_segments = backsplit(batch, predicted)?;
    let reference_segments = backsplit(batch, reference)?;
    if predicted_segments.is_empty() {
        return Ok(0.0);
    }

    let total: f64 = predicted_segments
        .iter()
        .zip(&reference_segments)
        .filter(|(p, _)| !p.is_empty())
        .map(|(p, r)| (&p.local_energies - &r.local_energies).norm() / p.len() as f64)
        .sum();
    Ok(HARTREE_TO_KCAL * total / predicted_segments.len() as f64)
}

/// Reference constants of `kind` tiled to `n_points` rows, the regression target of constant
/// predictors during pretraining.
///
/// With `trainable_only`, PBE targets keep only the columns predictors are trained on.
pub fn pretraining_targets(kind: FunctionalKind, n_points: usize, trainable_only: bool) -> DMatrix<f64> {
    let reference = reference_constants(kind);
    if trainable_only && kind == FunctionalKind::Pbe {
        DMatrix::from_fn(n_points, PBE_TRAINABLE_COLUMNS.len(), |_, j| {
            reference[PBE_TRAINABLE_COLUMNS[j]]
        })
    } else {
        DMatrix::from_fn(n_points, reference.len(), |_, j| reference[j])
    }
}

pub fn mean_squared_error(predicted: &DMatrix<f64>, target: &DMatrix<f64>) -> Result<f64, ShapeError> {
    ensure_len("target rows", predicted.nrows(), target.nrows())?;
    ensure_len("target columns", predicted.ncols(), target.ncols())?;
    ensure_non_empty("predictions", predicted.len())?;
    Ok((predicted - target).norm_squared() / predicted.len() as f64)
}
