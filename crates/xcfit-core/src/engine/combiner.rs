use crate::core::models::energies::MoleculeEnergies;
use crate::core::models::shape::{ShapeError, ensure_len};
use crate::core::units::hartree_to_kcal;
use std::ops::Range;

/// Reaction energies in kcal/mol.
///
/// Each reaction `[start, end)` sums `coefficients[j] * energies[j]` over its components, paired
/// by position. With `reaction_indices = None` all components form a single reaction.
pub fn combine(
    reaction_indices: Option<&[Range<usize>]>,
    coefficients: &[f64],
    molecule_energies: &MoleculeEnergies,
) -> Result<Vec<f64>, ShapeError> {
    let n_components = coefficients.len();
    ensure_len("molecule energies", n_components, molecule_energies.len())?;

    let energies: Vec<f64> = molecule_energies.values().collect();
    let whole = [0..n_components];
    let ranges = reaction_indices.unwrap_or(&whole);

    ranges
        .iter()
        .map(|range| {
            if range.start > range.end || range.end > n_components {
                return Err(ShapeError::new(
                    "reaction_indices",
                    format!("ranges within 0..{n_components}"),
                    format!("{range:?}"),
                ));
            }
            let hartree: f64 = coefficients[range.clone()]
                .iter()
                .zip(&energies[range.clone()])
                .map(|(c, e)| c * e)
                .sum();
            Ok(hartree_to_kcal(hartree))
        })
        .collect()
}
