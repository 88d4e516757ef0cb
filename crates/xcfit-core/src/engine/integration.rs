use super::backsplit::MoleculeSegment;
use crate::core::models::Dispersions;
use crate::core::models::energies::MoleculeEnergies;
use crate::core::models::shape::{ShapeError, ensure_len};
use tracing::trace;

/// Quadrature of the local energy of one molecule: `sum(e * (rho_a + rho_b) * w)` in Hartree.
pub fn electronic_energy(segment: &MoleculeSegment<'_>) -> f64 {
    segment
        .local_energies
        .iter()
        .zip(segment.weights.iter())
        .zip(segment.densities.row_iter())
        .map(|((e, w), rho)| e * (rho[0] + rho[1]) * w)
        .sum()
}

/// Total energy of every molecule: electronic energy plus HF energy plus, when `dispersions`
/// has an entry for the molecule's identifier, its dispersion correction.
///
/// The result is in segment order.
pub fn integrate(
    segments: &[MoleculeSegment<'_>],
    hf_energies: &[f64],
    dispersions: Option<&Dispersions>,
) -> Result<MoleculeEnergies, ShapeError> {
    ensure_len("hf_energies", segments.len(), hf_energies.len())?;

    let mut energies = MoleculeEnergies::with_capacity(segments.len());
    for (segment, hf) in segments.iter().zip(hf_energies) {
        let electronic = electronic_energy(segment);
        let dispersion = dispersions
            .and_then(|d| d.get(&segment.key.name))
            .copied()
            .unwrap_or(0.0);
        trace!(molecule = %segment.key, electronic, hf, dispersion, "Integrated molecule.");
        energies.push(segment.key.clone(), electronic + hf + dispersion);
    }
    Ok(energies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::batch::BatchedReaction;
    use crate::core::models::ids::ComponentKey;
    use crate::core::models::reaction::fixtures::uniform_reaction;
    use crate::engine::backsplit::backsplit;
    use nalgebra::DVector;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn single_molecule_quadrature() {
        let batch = BatchedReaction::from(uniform_reaction(&["A"], &[1.0], &[3]));
        let e = DVector::from_element(3, -0.5);
        let segments = backsplit(&batch, &e).unwrap();
        let energies = integrate(&segments, &batch.hf_energies, None).unwrap();
        assert!((energies.get(&ComponentKey::new("A", 0)).unwrap() - (-0.3)).abs() < TOLERANCE);
    }

    #[test]
    fn scaling_local_energies_scales_electronic_energy() {
        let mut reaction = uniform_reaction(&["A", "B"], &[1.0, 1.0], &[4, 3]);
        reaction.weights = DVector::from_fn(7, |i, _| 0.1 + i as f64);
        let batch = BatchedReaction::from(reaction);
        let e = DVector::from_fn(7, |i, _| -0.3 - 0.05 * i as f64);
        let scaled = &e * 2.5;

        let base = backsplit(&batch, &e).unwrap();
        let scaled_segments = backsplit(&batch, &scaled).unwrap();
        for (a, b) in base.iter().zip(&scaled_segments) {
            assert!((electronic_energy(b) - 2.5 * electronic_energy(a)).abs() < TOLERANCE);
        }
    }

    #[test]
    fn adds_hf_and_matching_dispersion() {
        let mut reaction = uniform_reaction(&["A", "B"], &[1.0, 1.0], &[1, 1]);
        reaction.hf_energies = vec![-1.0, -2.0];
        let batch = BatchedReaction::from(reaction);
        let e = DVector::zeros(2);
        let segments = backsplit(&batch, &e).unwrap();
        let dispersions = Dispersions::from([("B".to_string(), -0.25)]);

        let energies = integrate(&segments, &batch.hf_energies, Some(&dispersions)).unwrap();
        let values: Vec<f64> = energies.values().collect();
        assert_eq!(values, vec![-1.0, -2.25]);
    }

    #[test]
    fn empty_segment_contributes_only_hf() {
        let batch = BatchedReaction::from(uniform_reaction(&["A", "B"], &[1.0, 1.0], &[0, 2]));
        let e = DVector::from_element(2, -1.0);
        let segments = backsplit(&batch, &e).unwrap();
        let energies = integrate(&segments, &[0.5, 0.0], None).unwrap();
        assert_eq!(energies.values().next(), Some(0.5));
    }

    #[test]
    fn hf_energy_count_must_match_segments() {
        let batch = BatchedReaction::from(uniform_reaction(&["A"], &[1.0], &[1]));
        let e = DVector::zeros(1);
        let segments = backsplit(&batch, &e).unwrap();
        let err = integrate(&segments, &[0.0, 0.0], None).unwrap_err();
        assert_eq!(err.context, "hf_energies");
    }
}
