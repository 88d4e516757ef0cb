use super::ids::ComponentKey;
use super::reaction::{Reaction, segment_ranges, validate_offsets, validate_rows};
use super::shape::{ShapeError, ensure_len};
use nalgebra::{DMatrix, DVector};
use std::ops::Range;

/// Several reactions concatenated into one set of per-row arrays.
///
/// Components, coefficients and HF energies are concatenated in reaction order; the per-row
/// arrays are row-stacked; `backsplit_ind` holds global offsets into the stacked rows.
/// `reaction_indices[r]` is the half-open range of reaction `r` in the component list. When it
/// is `None` the whole component list forms a single reaction.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchedReaction {
    pub components: Vec<String>,
    pub coefficients: Vec<f64>,
    pub grid: DMatrix<f64>,
    pub densities: DMatrix<f64>,
    pub gradients: DMatrix<f64>,
    pub weights: DVector<f64>,
    pub backsplit_ind: Vec<usize>,
    pub hf_energies: Vec<f64>,
    pub reaction_indices: Option<Vec<Range<usize>>>,
    /// Reference energy of every reaction, in reaction order. Optional metadata: may be empty,
    /// and is not checked by [`validate`](Self::validate).
    pub labels: Vec<Option<f64>>,
}

impl BatchedReaction {
    #[inline]
    pub fn n_points(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn n_components(&self) -> usize {
        self.components.len()
    }

    pub fn n_reactions(&self) -> usize {
        self.reaction_indices.as_ref().map_or(1, Vec::len)
    }

    /// Component ranges of every reaction, resolving single-reaction mode.
    pub fn reaction_ranges(&self) -> Vec<Range<usize>> {
        match &self.reaction_indices {
            Some(ranges) => ranges.clone(),
            None => vec![0..self.n_components()],
        }
    }

    /// Grid-row range of every component, in component order.
    pub fn component_ranges(&self) -> Vec<Range<usize>> {
        segment_ranges(&self.backsplit_ind)
    }

    pub fn component_keys(&self) -> impl Iterator<Item = ComponentKey> + '_ {
        self.components
            .iter()
            .enumerate()
            .map(|(i, name)| ComponentKey::new(name.as_str(), i))
    }

    pub fn validate(&self) -> Result<(), ShapeError> {
        let n_components = self.n_components();
        ensure_len("coefficients", n_components, self.coefficients.len())?;
        ensure_len("hf_energies", n_components, self.hf_energies.len())?;
        ensure_len("backsplit_ind", n_components, self.backsplit_ind.len())?;
        validate_offsets(&self.backsplit_ind, self.n_points())?;
        validate_rows(
            self.n_points(),
            &self.grid,
            &self.densities,
            &self.gradients,
        )?;

        if let Some(ranges) = &self.reaction_indices {
            for range in ranges {
                if range.start > range.end || range.end > n_components {
                    return Err(ShapeError::new(
                        "reaction_indices",
                        format!("ranges within 0..{n_components}"),
                        format!("{range:?}"),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl From<Reaction> for BatchedReaction {
    fn from(reaction: Reaction) -> Self {
        Self {
            components: reaction.components,
            coefficients: reaction.coefficients,
            grid: reaction.grid,
            densities: reaction.densities,
            gradients: reaction.gradients,
            weights: reaction.weights,
            backsplit_ind: reaction.backsplit_ind,
            hf_energies: reaction.hf_energies,
            reaction_indices: None,
            labels: vec![reaction.energy],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::reaction::fixtures::uniform_reaction;

    #[test]
    fn single_reaction_conversion_spans_all_components() {
        let batch = BatchedReaction::from(
            uniform_reaction(&["A", "B", "C"], &[1.0, 1.0, -1.0], &[1, 2, 3]).with_energy(4.2),
        );
        assert_eq!(batch.reaction_indices, None);
        assert_eq!(batch.n_reactions(), 1);
        assert_eq!(batch.reaction_ranges(), vec![0..3]);
        assert_eq!(batch.labels, vec![Some(4.2)]);
        assert_eq!(batch.validate(), Ok(()));
    }

    #[test]
    fn component_keys_disambiguate_repeated_names() {
        let batch = BatchedReaction::from(uniform_reaction(&["H", "H2", "H"], &[2.0, -1.0, 0.0], &[1, 1, 1]));
        let keys: Vec<_> = batch.component_keys().collect();
        assert_eq!(keys[0], ComponentKey::new("H", 0));
        assert_eq!(keys[2], ComponentKey::new("H", 2));
        assert_ne!(keys[0], keys[2]);
    }

    #[test]
    fn out_of_bounds_reaction_range_is_rejected() {
        let mut batch = BatchedReaction::from(uniform_reaction(&["A", "B"], &[1.0, -1.0], &[1, 1]));
        batch.reaction_indices = Some(vec![0..1, 1..3]);
        assert_eq!(batch.validate().unwrap_err().context, "reaction_indices");
    }

    #[test]
    fn labels_are_not_required_to_match_reactions() {
        let mut batch = BatchedReaction::from(uniform_reaction(&["A", "B"], &[1.0, -1.0], &[1, 1]));
        batch.reaction_indices = Some(vec![0..1, 1..2]);
        batch.labels = vec![];
        assert_eq!(batch.validate(), Ok(()));
    }
}
