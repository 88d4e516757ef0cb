use crate::core::models::batch::BatchedReaction;
use crate::core::models::shape::{ShapeError, ensure_len};
use crate::core::units::HARTREE_TO_KCAL;
use nalgebra::DVector;

/// Gradient of a scalar loss with respect to every local energy of `batch`.
///
/// `upstream[r]` is the derivative of the loss with respect to the energy of reaction `r`
/// (kcal/mol). Reaction energies are linear in the local energies, so
/// `dL/de[p] = 627.5095 * coefficient(p) * (rho_a + rho_b)[p] * w[p] * upstream[reaction(p)]`
/// holds exactly. Points of components outside every reaction get zero.
pub fn local_energy_gradient(batch: &BatchedReaction, upstream: &[f64]) -> Result<DVector<f64>, ShapeError> {
    batch.validate()?;
    let reaction_ranges = batch.reaction_ranges();
    ensure_len("upstream gradient", reaction_ranges.len(), upstream.len())?;

    let component_rows = batch.component_ranges();
    let mut gradient = DVector::zeros(batch.n_points());
    for (range, &dl_de) in reaction_ranges.iter().zip(upstream) {
        for component in range.clone() {
            let scale = HARTREE_TO_KCAL * batch.coefficients[component] * dl_de;
            for p in component_rows[component].clone() {
                let rho = batch.densities[(p, 0)] + batch.densities[(p, 1)];
                gradient[p] += scale * rho * batch.weights[p];
            }
        }
    }
    Ok(gradient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::reaction::fixtures::uniform_reaction;
    use crate::engine::backsplit::backsplit;
    use crate::engine::combiner::combine;
    use crate::engine::integration::integrate;
    use crate::engine::stacker::stack;
    use nalgebra::DMatrix;

    fn reaction_energies(batch: &BatchedReaction, local_energies: &DVector<f64>) -> Vec<f64> {
        let segments = backsplit(batch, local_energies).unwrap();
        let molecules = integrate(&segments, &batch.hf_energies, None).unwrap();
        combine(batch.reaction_indices.as_deref(), &batch.coefficients, &molecules).unwrap()
    }

    fn loss(batch: &BatchedReaction, local_energies: &DVector<f64>, upstream: &[f64]) -> f64 {
        reaction_energies(batch, local_energies)
            .iter()
            .zip(upstream)
            .map(|(e, u)| e * u)
            .sum()
    }

    #[test]
    fn matches_finite_differences() {
        let mut first = uniform_reaction(&["A", "B"], &[-1.0, 2.0], &[3, 2]);
        first.densities = DMatrix::from_fn(5, 2, |i, j| 0.05 + 0.02 * i as f64 + 0.01 * j as f64);
        first.weights = DVector::from_fn(5, |i, _| 0.3 + 0.2 * i as f64);
        let second = uniform_reaction(&["C", "A"], &[1.0, -0.5], &[1, 3]);
        let batch = stack(&[first, second]).unwrap();

        let e = DVector::from_fn(batch.n_points(), |i, _| -0.4 - 0.01 * i as f64);
        let upstream = [0.7, -1.3];
        let gradient = local_energy_gradient(&batch, &upstream).unwrap();

        let h = 1e-6;
        for p in 0..batch.n_points() {
            let mut plus = e.clone();
            plus[p] += h;
            let mut minus = e.clone();
            minus[p] -= h;
            let numeric = (loss(&batch, &plus, &upstream) - loss(&batch, &minus, &upstream)) / (2.0 * h);
            assert!(
                (numeric - gradient[p]).abs() < 1e-5 * gradient[p].abs().max(1.0),
                "point {p}: numeric {numeric}, analytic {}",
                gradient[p]
            );
        }
    }

    #[test]
    fn single_reaction_gradient_uses_whole_component_list() {
        let batch = BatchedReaction::from(uniform_reaction(&["A", "B"], &[-1.0, 2.0], &[1, 1]));
        let gradient = local_energy_gradient(&batch, &[1.0]).unwrap();
        assert!((gradient[0] - (-627.5095 * 0.2)).abs() < 1e-9);
        assert!((gradient[1] - (2.0 * 627.5095 * 0.2)).abs() < 1e-9);
    }

    #[test]
    fn upstream_length_must_match_reactions() {
        let batch = BatchedReaction::from(uniform_reaction(&["A"], &[1.0], &[1]));
        let err = local_energy_gradient(&batch, &[1.0, 2.0]).unwrap_err();
        assert_eq!(err.context, "upstream gradient");
    }
}
