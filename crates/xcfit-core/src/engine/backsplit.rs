use crate::core::models::batch::BatchedReaction;
use crate::core::models::ids::ComponentKey;
use crate::core::models::shape::{ShapeError, ensure_len};
use nalgebra::{DMatrixView, DVector, DVectorView};
use std::ops::Range;

/// The rows of one molecule within a batch, borrowed from the batch arrays.
#[derive(Debug, Clone)]
pub struct MoleculeSegment<'a> {
    pub key: ComponentKey,
    pub rows: Range<usize>,
    pub local_energies: DVectorView<'a, f64>,
    pub weights: DVectorView<'a, f64>,
    pub densities: DMatrixView<'a, f64>,
}

impl MoleculeSegment<'_> {
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Splits the flat per-point arrays of `batch` back into one segment per component.
///
/// Component `i` owns rows `[backsplit_ind[i - 1], backsplit_ind[i])` (starting at 0). Segments
/// are keyed by name and position, so repeated names stay distinct.
pub fn backsplit<'a>(
    batch: &'a BatchedReaction,
    local_energies: &'a DVector<f64>,
) -> Result<Vec<MoleculeSegment<'a>>, ShapeError> {
    let n_points = batch.n_points();
    ensure_len("local energies", n_points, local_energies.len())?;
    ensure_len("densities rows", n_points, batch.densities.nrows())?;
    ensure_len("backsplit_ind", batch.n_components(), batch.backsplit_ind.len())?;

    let mut start = 0;
    let mut segments = Vec::with_capacity(batch.n_components());
    for (key, &stop) in batch.component_keys().zip(&batch.backsplit_ind) {
        if stop < start || stop > n_points {
            return Err(ShapeError::new(
                format!("backsplit_ind[{}]", key.occurrence),
                format!("offset within {start}..={n_points}"),
                stop,
            ));
        }
        let len = stop - start;
        segments.push(MoleculeSegment {
            key,
            rows: start..stop,
            local_energies: local_energies.rows(start, len),
            weights: batch.weights.rows(start, len),
            densities: batch.densities.rows(start, len),
        });
        start = stop;
    }
    Ok(segments)
}
