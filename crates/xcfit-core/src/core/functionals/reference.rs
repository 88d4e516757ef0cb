//! Reference constants of the classical functionals.

use super::kind::FunctionalKind;
use super::lda::LDA_X_FACTOR;

pub const SVWN3_REFERENCE: [f64; 21] = [
    0.0310907,
    0.01554535,
    3.72744,
    7.06042,
    12.9352,
    18.0578,
    -0.10498,
    -0.32500,
    0.0310907,
    0.01554535,
    -0.016_886_863_940_389_63, // -1 / (6 pi^2)
    13.0720,
    20.1231,
    1.06835,
    42.7198,
    101.578,
    11.4813,
    -0.409286,
    -0.743294,
    -0.228344,
    1.0,
];

pub const PBE_REFERENCE: [f64; 24] = [
    0.066_724_550_603_149_22,
    0.031_090_690_869_654_9, // (1 - ln 2) / pi^2
    1.709921,
    7.5957,
    14.1189,
    10.357,
    3.5876,
    6.1977,
    3.6231,
    1.6382,
    3.3662,
    0.88026,
    0.49294,
    0.62517,
    0.49671,
    0.031091,
    0.015545,
    0.016887,
    0.21370,
    0.20548,
    0.11125,
    LDA_X_FACTOR,
    0.8040,
    0.219_514_972_764_517_1,
];

pub const XALPHA_REFERENCE: [f64; 1] = [1.05];

/// Columns of the PBE row that constant-predicting models are trained on: `beta`, `gamma`,
/// `kappa` and `mu`.
pub const PBE_TRAINABLE_COLUMNS: [usize; 4] = [0, 1, 22, 23];

pub fn reference_constants(kind: FunctionalKind) -> &'static [f64] {
    match kind {
        FunctionalKind::Svwn3 => &SVWN3_REFERENCE,
        FunctionalKind::XAlpha => &XALPHA_REFERENCE,
        FunctionalKind::Pbe => &PBE_REFERENCE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn derived_entries_match_their_definitions() {
        assert!((SVWN3_REFERENCE[10] + 1.0 / (6.0 * PI * PI)).abs() < 1e-15);
        assert!((PBE_REFERENCE[1] - (1.0 - 2.0_f64.ln()) / (PI * PI)).abs() < 1e-15);
    }

    #[test]
    fn reference_sizes_match_functional_layouts() {
        assert_eq!(reference_constants(FunctionalKind::Svwn3).len(), 21);
        assert_eq!(reference_constants(FunctionalKind::Pbe).len(), 24);
        assert_eq!(reference_constants(FunctionalKind::XAlpha), &[1.05]);
    }
}
