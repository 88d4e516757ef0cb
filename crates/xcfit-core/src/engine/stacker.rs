use crate::core::models::batch::BatchedReaction;
use crate::core::models::reaction::Reaction;
use crate::core::models::shape::ShapeError;
use crate::engine::error::EngineError;
use nalgebra::{DMatrix, DVector};
use std::borrow::Borrow;
use tracing::{debug, instrument};

/// Concatenates reactions into one batch.
///
/// Components, coefficients and HF energies are concatenated; per-row arrays are row-stacked;
/// every reaction's `backsplit_ind` is shifted by the rows of the reactions before it; and
/// `reaction_indices[r]` spans the components of reaction `r`. The inputs are not modified.
#[instrument(skip_all, name = "stack_reactions", fields(reactions = reactions.len()))]
pub fn stack<R: Borrow<Reaction>>(reactions: &[R]) -> Result<BatchedReaction, EngineError> {
    let reactions: Vec<&Reaction> = reactions.iter().map(<R as Borrow<Reaction>>::borrow).collect();
    let Some(&first) = reactions.first() else {
        return Err(ShapeError::new("reactions", "at least one reaction", 0).into());
    };

    for (i, reaction) in reactions.iter().enumerate() {
        reaction
            .validate()
            .map_err(|e| e.within(format!("reaction {i}")))?;
        check_columns(i, "grid columns", first.grid.ncols(), reaction.grid.ncols())?;
        check_columns(i, "gradients columns", first.gradients.ncols(), reaction.gradients.ncols())?;
    }

    let n_points: usize = reactions.iter().map(|r| r.n_points()).sum();
    let n_components: usize = reactions.iter().map(|r| r.n_components()).sum();

    let mut components = Vec::with_capacity(n_components);
    let mut coefficients = Vec::with_capacity(n_components);
    let mut hf_energies = Vec::with_capacity(n_components);
    let mut backsplit_ind = Vec::with_capacity(n_components);
    let mut reaction_indices = Vec::with_capacity(reactions.len());
    let mut row_offset = 0;

    for reaction in &reactions {
        let start = components.len();
        components.extend(reaction.components.iter().cloned());
        coefficients.extend_from_slice(&reaction.coefficients);
        hf_energies.extend_from_slice(&reaction.hf_energies);
        backsplit_ind.extend(reaction.backsplit_ind.iter().map(|&stop| stop + row_offset));
        reaction_indices.push(start..components.len());
        row_offset += reaction.n_points();
    }

    let batch = BatchedReaction {
        components,
        coefficients,
        grid: vstack(reactions.iter().map(|r| &r.grid), n_points, first.grid.ncols()),
        densities: vstack(reactions.iter().map(|r| &r.densities), n_points, 2),
        gradients: vstack(
            reactions.iter().map(|r| &r.gradients),
            n_points,
            first.gradients.ncols(),
        ),
        weights: vstack_vectors(reactions.iter().map(|r| &r.weights), n_points),
        backsplit_ind,
        hf_energies,
        reaction_indices: Some(reaction_indices),
        labels: reactions.iter().map(|r| r.energy).collect(),
    };

    debug!(
        points = n_points,
        components = n_components,
        "Stacked reactions into one batch."
    );
    Ok(batch)
}

fn check_columns(reaction: usize, context: &str, expected: usize, found: usize) -> Result<(), ShapeError> {
    if expected == found {
        Ok(())
    } else {
        Err(ShapeError::new(context, expected, found).within(format!("reaction {reaction}")))
    }
}

/// Row-stacks matrices that all have `n_cols` columns and `n_rows` rows in total.
pub(crate) fn vstack<'a>(
    blocks: impl Iterator<Item = &'a DMatrix<f64>>,
    n_rows: usize,
    n_cols: usize,
) -> DMatrix<f64> {
    let mut out = DMatrix::zeros(n_rows, n_cols);
    let mut row = 0;
    for block in blocks {
        out.view_mut((row, 0), block.shape()).copy_from(block);
        row += block.nrows();
    }
    out
}

pub(crate) fn vstack_vectors<'a>(blocks: impl Iterator<Item = &'a DVector<f64>>, n_rows: usize) -> DVector<f64> {
    let mut out = DVector::zeros(n_rows);
    let mut row = 0;
    for block in blocks {
        out.rows_mut(row, block.len()).copy_from(block);
        row += block.len();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::reaction::fixtures::uniform_reaction;

    fn two_reactions() -> Vec<Reaction> {
        vec![
            uniform_reaction(&["A", "B"], &[-1.0, 2.0], &[3, 2]).with_energy(1.5),
            uniform_reaction(&["C", "A", "D"], &[1.0, 1.0, -1.0], &[1, 4, 2]),
        ]
    }

    #[test]
    fn concatenates_components_in_order() {
        let batch = stack(&two_reactions()).unwrap();
        assert_eq!(batch.components, vec!["A", "B", "C", "A", "D"]);
        assert_eq!(batch.coefficients, vec![-1.0, 2.0, 1.0, 1.0, -1.0]);
        assert_eq!(batch.hf_energies.len(), 5);
        assert_eq!(batch.labels, vec![Some(1.5), None]);
    }

    #[test]
    fn shifts_offsets_by_prior_rows() {
        let batch = stack(&two_reactions()).unwrap();
        assert_eq!(batch.backsplit_ind, vec![3, 5, 6, 10, 12]);
        assert_eq!(batch.reaction_indices, Some(vec![0..2, 2..5]));
        assert_eq!(batch.n_points(), 12);
        assert_eq!(batch.validate(), Ok(()));
    }

    #[test]
    fn stacked_offsets_are_non_decreasing_and_end_at_row_count() {
        let reactions = vec![
            uniform_reaction(&["A"], &[1.0], &[0]),
            uniform_reaction(&["B", "C"], &[1.0, -1.0], &[5, 0]),
            uniform_reaction(&["D"], &[1.0], &[7]),
        ];
        let batch = stack(&reactions).unwrap();
        assert!(batch.backsplit_ind.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(batch.backsplit_ind.last().copied(), Some(batch.n_points()));
    }

    #[test]
    fn row_stacks_per_point_arrays() {
        let mut reactions = two_reactions();
        reactions[1].densities[(0, 1)] = 0.7;
        reactions[1].weights[3] = 9.0;
        let batch = stack(&reactions).unwrap();
        assert_eq!(batch.densities.shape(), (12, 2));
        assert_eq!(batch.densities[(5, 1)], 0.7);
        assert_eq!(batch.weights[8], 9.0);
    }

    #[test]
    fn empty_input_is_a_shape_mismatch() {
        assert!(matches!(stack::<Reaction>(&[]), Err(EngineError::ShapeMismatch(_))));
    }

    #[test]
    fn invalid_reaction_is_named_in_the_error() {
        let mut reactions = two_reactions();
        reactions[1].hf_energies.pop();
        match stack(&reactions) {
            Err(EngineError::ShapeMismatch(err)) => assert_eq!(err.context, "reaction 1: hf_energies"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn gradient_column_disagreement_is_rejected() {
        let mut reactions = two_reactions();
        reactions[0] = reactions[0].clone().with_gradients(DMatrix::zeros(5, 3));
        match stack(&reactions) {
            Err(EngineError::ShapeMismatch(err)) => {
                assert_eq!(err.context, "reaction 1: gradients columns")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
