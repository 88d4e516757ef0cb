use super::shape::{ShapeError, ensure_len};
use nalgebra::{DMatrix, DVector};
use std::ops::Range;

/// One chemical equation together with the grid data of all of its components.
///
/// All per-row arrays (`grid`, `densities`, `gradients`, `weights`) are concatenated across
/// components in the order of `components`; `backsplit_ind[i]` is the row where component `i`
/// ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    pub components: Vec<String>,
    pub coefficients: Vec<f64>,
    /// Per-point features fed to constant predictors (N x F, F may be 0).
    pub grid: DMatrix<f64>,
    /// Spin densities, column 0 alpha and column 1 beta (N x 2).
    pub densities: DMatrix<f64>,
    /// Contracted density gradients `sigma_aa, sigma_ab, sigma_bb` (N x 3, or N x 0 for LDA data).
    pub gradients: DMatrix<f64>,
    pub weights: DVector<f64>,
    pub backsplit_ind: Vec<usize>,
    pub hf_energies: Vec<f64>,
    /// Reference reaction energy in kcal/mol, if known.
    pub energy: Option<f64>,
}

impl Reaction {
    pub fn new(
        components: Vec<String>,
        coefficients: Vec<f64>,
        densities: DMatrix<f64>,
        weights: DVector<f64>,
        backsplit_ind: Vec<usize>,
        hf_energies: Vec<f64>,
    ) -> Self {
        let n_points = densities.nrows();
        Self {
            components,
            coefficients,
            grid: DMatrix::zeros(n_points, 0),
            densities,
            gradients: DMatrix::zeros(n_points, 0),
            weights,
            backsplit_ind,
            hf_energies,
            energy: None,
        }
    }

    pub fn with_gradients(mut self, gradients: DMatrix<f64>) -> Self {
        self.gradients = gradients;
        self
    }

    pub fn with_grid(mut self, grid: DMatrix<f64>) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_energy(mut self, energy: f64) -> Self {
        self.energy = Some(energy);
        self
    }

    #[inline]
    pub fn n_components(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn n_points(&self) -> usize {
        self.weights.len()
    }

    /// Row range of every component, in component order.
    pub fn component_ranges(&self) -> Vec<Range<usize>> {
        segment_ranges(&self.backsplit_ind)
    }

    /// Checks every length and offset invariant of the record.
    pub fn validate(&self) -> Result<(), ShapeError> {
        let n_components = self.n_components();
        if n_components == 0 {
            return Err(ShapeError::new("components", "at least one component", 0));
        }
        ensure_len("coefficients", n_components, self.coefficients.len())?;
        ensure_len("hf_energies", n_components, self.hf_energies.len())?;
        ensure_len("backsplit_ind", n_components, self.backsplit_ind.len())?;

        let n_points = self.n_points();
        validate_offsets(&self.backsplit_ind, n_points)?;
        validate_rows(
            n_points,
            &self.grid,
            &self.densities,
            &self.gradients,
        )
    }
}

pub(crate) fn segment_ranges(backsplit_ind: &[usize]) -> Vec<Range<usize>> {
    let mut start = 0;
    backsplit_ind
        .iter()
        .map(|&stop| {
            let range = start..stop;
            start = stop;
            range
        })
        .collect()
}

pub(crate) fn validate_offsets(backsplit_ind: &[usize], n_points: usize) -> Result<(), ShapeError> {
    if let Some(pair) = backsplit_ind.windows(2).find(|pair| pair[1] < pair[0]) {
        return Err(ShapeError::new(
            "backsplit_ind",
            format!("non-decreasing offsets (>= {})", pair[0]),
            pair[1],
        ));
    }
    let last = backsplit_ind.last().copied().unwrap_or(0);
    ensure_len("backsplit_ind final offset", n_points, last)
}

pub(crate) fn validate_rows(
    n_points: usize,
    grid: &DMatrix<f64>,
    densities: &DMatrix<f64>,
    gradients: &DMatrix<f64>,
) -> Result<(), ShapeError> {
    ensure_len("grid rows", n_points, grid.nrows())?;
    ensure_len("densities rows", n_points, densities.nrows())?;
    ensure_len("densities columns", 2, densities.ncols())?;
    ensure_len("gradients rows", n_points, gradients.nrows())
}


#[cfg(test)]
mod tests {
    use super::fixtures::uniform_reaction;
    use super::*;

    #[test]
    fn valid_reaction_passes_validation() {
        let reaction = uniform_reaction(&["A", "B"], &[-1.0, 2.0], &[3, 2]);
        assert_eq!(reaction.validate(), Ok(()));
        assert_eq!(reaction.n_points(), 5);
        assert_eq!(reaction.component_ranges(), vec![0..3, 3..5]);
    }

    #[test]
    fn coefficient_count_mismatch_is_rejected() {
        let mut reaction = uniform_reaction(&["A", "B"], &[-1.0, 2.0], &[3, 2]);
        reaction.coefficients.pop();
        let err = reaction.validate().unwrap_err();
        assert_eq!(err.context, "coefficients");
    }

    #[test]
    fn hf_energy_count_mismatch_is_rejected() {
        let mut reaction = uniform_reaction(&["A"], &[1.0], &[3]);
        reaction.hf_energies.push(1.0);
        assert_eq!(reaction.validate().unwrap_err().context, "hf_energies");
    }

    #[test]
    fn decreasing_offsets_are_rejected() {
        let mut reaction = uniform_reaction(&["A", "B"], &[-1.0, 2.0], &[3, 2]);
        reaction.backsplit_ind = vec![4, 3];
        assert_eq!(reaction.validate().unwrap_err().context, "backsplit_ind");
    }

    #[test]
    fn final_offset_must_equal_row_count() {
        let mut reaction = uniform_reaction(&["A", "B"], &[-1.0, 2.0], &[3, 2]);
        reaction.backsplit_ind = vec![3, 4];
        let err = reaction.validate().unwrap_err();
        assert_eq!(err.context, "backsplit_ind final offset");
        assert_eq!(err.expected, "5");
        assert_eq!(err.found, "4");
    }

    #[test]
    fn densities_must_have_two_spin_columns() {
        let mut reaction = uniform_reaction(&["A"], &[1.0], &[3]);
        reaction.densities = DMatrix::from_element(3, 1, 0.2);
        assert_eq!(reaction.validate().unwrap_err().context, "densities columns");
    }

    #[test]
    fn gradient_rows_must_match_points() {
        let reaction =
            uniform_reaction(&["A"], &[1.0], &[3]).with_gradients(DMatrix::zeros(2, 3));
        assert_eq!(reaction.validate().unwrap_err().context, "gradients rows");
    }

    #[test]
    fn empty_component_list_is_rejected() {
        let reaction = Reaction::new(
            vec![],
            vec![],
            DMatrix::zeros(0, 2),
            DVector::zeros(0),
            vec![],
            vec![],
        );
        assert_eq!(reaction.validate().unwrap_err().context, "components");
    }

    #[test]
    fn zero_row_component_is_allowed() {
        let reaction = uniform_reaction(&["A", "B", "C"], &[1.0, 1.0, 1.0], &[2, 0, 1]);
        assert_eq!(reaction.validate(), Ok(()));
        assert_eq!(reaction.component_ranges(), vec![0..2, 2..2, 2..3]);
    }
}
