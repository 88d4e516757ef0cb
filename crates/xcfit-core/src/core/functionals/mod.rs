//! # Functionals Module
//!
//! This module provides the local energy evaluators: pointwise exchange-correlation functionals
//! that map the spin densities (and, for GGAs, the contracted density gradients) of a grid point
//! together with a row of numeric constants to an energy per particle in Hartree.
//!
//! ## Overview
//!
//! Functionals are parameterized by constants so that a model can predict them per grid point.
//! The built-in functionals reproduce their classical definitions with the
//! [`reference`] constants:
//!
//! - **X-Alpha** ([`lda::xalpha`]) - Slater exchange scaled by one constant
//! - **SVWN3** ([`vwn::svwn3`]) - Slater exchange plus VWN3 correlation, 21 constants
//! - **PBE** ([`pbe::pbe`]) - PBE exchange plus PW92 correlation with gradient correction, 24 constants
//!
//! ## Dispatch
//!
//! A requested `(rung, functional)` pair is resolved once, at construction, into a
//! [`Functional`] holding a plain function pointer. Unsupported pairs fail with
//! [`UnsupportedFunctional`] before any grid data is touched. Custom evaluators implement
//! [`LocalEnergyFunctional`] directly.

use crate::core::models::shape::{ShapeError, ensure_len};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod constants;
pub mod kind;
pub mod lda;
pub mod pbe;
pub mod pw92;
pub mod reference;
pub mod vwn;

pub use constants::Constants;
pub use kind::{FunctionalKind, FunctionalSpec, Rung, UnsupportedFunctional};

/// Total densities below this value evaluate to zero energy.
pub const DENSITY_THRESHOLD: f64 = 1e-15;

/// Where the pointwise evaluation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComputeTarget {
    /// Sequential evaluation on the calling thread.
    #[default]
    Cpu,
    /// Data-parallel evaluation across grid points on the rayon thread pool.
    Accelerator,
}

/// Inputs of one grid point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointInput {
    pub rho_a: f64,
    pub rho_b: f64,
    /// `sigma_aa, sigma_ab, sigma_bb`; zero for LDA evaluation.
    pub sigma: [f64; 3],
    /// Replacement for the analytic exchange enhancement factor.
    pub enhancement: Option<f64>,
}

impl PointInput {
    #[inline]
    pub fn density(&self) -> f64 {
        self.rho_a + self.rho_b
    }
}

pub type PointFn = fn(&PointInput, &[f64]) -> f64;

/// Per-row inputs of a whole batch.
#[derive(Debug, Clone, Copy)]
pub struct GridInputs<'a> {
    pub densities: &'a DMatrix<f64>,
    pub gradients: Option<&'a DMatrix<f64>>,
    pub enhancement: Option<&'a DVector<f64>>,
}

impl GridInputs<'_> {
    #[inline]
    pub fn n_points(&self) -> usize {
        self.densities.nrows()
    }

    #[inline]
    fn point(&self, i: usize) -> PointInput {
        let sigma = self
            .gradients
            .map_or([0.0; 3], |g| [g[(i, 0)], g[(i, 1)], g[(i, 2)]]);
        PointInput {
            rho_a: self.densities[(i, 0)],
            rho_b: self.densities[(i, 1)],
            sigma,
            enhancement: self.enhancement.map(|e| e[i]),
        }
    }

    fn validate(&self, needs_gradients: bool) -> Result<(), ShapeError> {
        let n = self.n_points();
        ensure_len("densities columns", 2, self.densities.ncols())?;
        if needs_gradients {
            let gradients = self
                .gradients
                .ok_or_else(|| ShapeError::new("gradients", "N x 3 contracted gradients", "none"))?;
            ensure_len("gradients rows", n, gradients.nrows())?;
            ensure_len("gradients columns", 3, gradients.ncols())?;
        }
        if let Some(enhancement) = self.enhancement {
            ensure_len("enhancement", n, enhancement.len())?;
        }
        Ok(())
    }
}

/// A pointwise local energy functional evaluated over a whole grid at once.
///
/// Implementations return one energy per particle (Hartree) per grid row. The pipeline calls
/// [`evaluate`](Self::evaluate) exactly once per batch.
pub trait LocalEnergyFunctional: Send + Sync {
    fn name(&self) -> String;

    /// Minimum number of constant columns.
    fn n_constants(&self) -> usize;

    fn needs_gradients(&self) -> bool;

    fn evaluate(
        &self,
        inputs: &GridInputs<'_>,
        constants: &Constants,
        target: ComputeTarget,
    ) -> Result<DVector<f64>, ShapeError>;
}

/// A built-in functional resolved from a [`FunctionalSpec`].
#[derive(Debug, Clone, Copy)]
pub struct Functional {
    spec: FunctionalSpec,
    n_constants: usize,
    point_fn: PointFn,
}

impl Functional {
    pub fn resolve(spec: FunctionalSpec) -> Result<Self, UnsupportedFunctional> {
        let (n_constants, point_fn): (usize, PointFn) = match (spec.rung, spec.kind) {
            (Rung::Lda, FunctionalKind::Svwn3) => (vwn::N_CONSTANTS, vwn::svwn3),
            (Rung::Lda, FunctionalKind::XAlpha) => (1, lda::xalpha),
            (Rung::Gga, FunctionalKind::Pbe) => (pbe::N_CONSTANTS, pbe::pbe),
            (rung, kind) => return Err(UnsupportedFunctional { rung, kind }),
        };
        Ok(Self {
            spec,
            n_constants,
            point_fn,
        })
    }

    pub fn spec(&self) -> FunctionalSpec {
        self.spec
    }

    /// Every `(rung, functional)` pair that resolves.
    pub fn supported() -> Vec<FunctionalSpec> {
        [FunctionalSpec::SVWN3, FunctionalSpec::XALPHA, FunctionalSpec::PBE].to_vec()
    }
}

impl LocalEnergyFunctional for Functional {
    fn name(&self) -> String {
        self.spec.to_string()
    }

    fn n_constants(&self) -> usize {
        self.n_constants
    }

    fn needs_gradients(&self) -> bool {
        self.spec.rung == Rung::Gga
    }

    fn evaluate(
        &self,
        inputs: &GridInputs<'_>,
        constants: &Constants,
        target: ComputeTarget,
    ) -> Result<DVector<f64>, ShapeError> {
        inputs.validate(self.needs_gradients())?;
        constants.check(inputs.n_points(), self.n_constants)?;
        Ok(evaluate_pointwise(self.point_fn, inputs, constants, target))
    }
}

/// Applies `point_fn` to every row of `inputs`.
pub fn evaluate_pointwise(
    point_fn: PointFn,
    inputs: &GridInputs<'_>,
    constants: &Constants,
    target: ComputeTarget,
) -> DVector<f64> {
    let values: Vec<f64> = match target {
        ComputeTarget::Cpu => evaluate_serial(point_fn, inputs, constants),
        ComputeTarget::Accelerator => evaluate_parallel(point_fn, inputs, constants),
    };
    DVector::from_vec(values)
}

fn evaluate_serial(point_fn: PointFn, inputs: &GridInputs<'_>, constants: &Constants) -> Vec<f64> {
    let mut buf = Vec::with_capacity(constants.n_columns());
    (0..inputs.n_points())
        .map(|i| point_fn(&inputs.point(i), constants.row(i, &mut buf)))
        .collect()
}

#[cfg(feature = "parallel")]
fn evaluate_parallel(point_fn: PointFn, inputs: &GridInputs<'_>, constants: &Constants) -> Vec<f64> {
    (0..inputs.n_points())
        .into_par_iter()
        .map_init(
            || Vec::with_capacity(constants.n_columns()),
            |buf, i| point_fn(&inputs.point(i), constants.row(i, buf)),
        )
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn evaluate_parallel(point_fn: PointFn, inputs: &GridInputs<'_>, constants: &Constants) -> Vec<f64> {
    tracing::warn!("Accelerator target requested without the `parallel` feature; evaluating on CPU.");
    evaluate_serial(point_fn, inputs, constants)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn densities(n: usize) -> DMatrix<f64> {
        DMatrix::from_fn(n, 2, |i, j| 0.05 + 0.01 * i as f64 + 0.02 * j as f64)
    }

    #[test]
    fn resolves_supported_pairs() {
        for spec in Functional::supported() {
            let functional = Functional::resolve(spec).unwrap();
            assert_eq!(functional.spec(), spec);
        }
        assert_eq!(Functional::resolve(FunctionalSpec::SVWN3).unwrap().n_constants(), 21);
        assert_eq!(Functional::resolve(FunctionalSpec::PBE).unwrap().n_constants(), 24);
        assert!(Functional::resolve(FunctionalSpec::PBE).unwrap().needs_gradients());
        assert!(!Functional::resolve(FunctionalSpec::XALPHA).unwrap().needs_gradients());
    }

    #[test]
    fn unsupported_pairs_are_rejected() {
        let err = Functional::resolve(FunctionalSpec::new(Rung::Gga, FunctionalKind::Svwn3)).unwrap_err();
        assert_eq!(
            err,
            UnsupportedFunctional {
                rung: Rung::Gga,
                kind: FunctionalKind::Svwn3
            }
        );
        assert!(Functional::resolve(FunctionalSpec::new(Rung::Lda, FunctionalKind::Pbe)).is_err());
    }

    #[test]
    fn evaluates_one_value_per_point() {
        let d = densities(7);
        let inputs = GridInputs {
            densities: &d,
            gradients: None,
            enhancement: None,
        };
        let functional = Functional::resolve(FunctionalSpec::XALPHA).unwrap();
        let values = functional
            .evaluate(&inputs, &Constants::shared(&reference::XALPHA_REFERENCE), ComputeTarget::Cpu)
            .unwrap();
        assert_eq!(values.len(), 7);
        assert!(values.iter().all(|v| *v < 0.0));
    }

    #[test]
    fn pointwise_values_line_up_with_rows_on_both_targets() {
        let d = densities(9);
        let inputs = GridInputs {
            densities: &d,
            gradients: None,
            enhancement: None,
        };
        let constants = Constants::shared(&reference::XALPHA_REFERENCE);
        for target in [ComputeTarget::Cpu, ComputeTarget::Accelerator] {
            let values = evaluate_pointwise(lda::xalpha, &inputs, &constants, target);
            assert_eq!(values.len(), 9);
            for i in 0..9 {
                assert_eq!(values[i], lda::xalpha(&inputs.point(i), &reference::XALPHA_REFERENCE));
            }
        }
    }

    #[test]
    fn accelerator_target_matches_cpu_target() {
        let d = densities(64);
        let g = DMatrix::from_element(64, 3, 0.01);
        let inputs = GridInputs {
            densities: &d,
            gradients: Some(&g),
            enhancement: None,
        };
        let functional = Functional::resolve(FunctionalSpec::PBE).unwrap();
        let constants = Constants::shared(&reference::PBE_REFERENCE);
        let cpu = functional.evaluate(&inputs, &constants, ComputeTarget::Cpu).unwrap();
        let acc = functional
            .evaluate(&inputs, &constants, ComputeTarget::Accelerator)
            .unwrap();
        assert_eq!(cpu, acc);
    }

    #[test]
    fn per_point_constants_are_used_row_by_row() {
        let d = densities(3);
        let inputs = GridInputs {
            densities: &d,
            gradients: None,
            enhancement: None,
        };
        let functional = Functional::resolve(FunctionalSpec::XALPHA).unwrap();
        let unit = functional
            .evaluate(&inputs, &Constants::shared(&[1.0]), ComputeTarget::Cpu)
            .unwrap();
        let scales = DMatrix::from_column_slice(3, 1, &[1.0, 2.0, 3.0]);
        let scaled = functional
            .evaluate(&inputs, &Constants::PerPoint(scales), ComputeTarget::Cpu)
            .unwrap();
        for i in 0..3 {
            assert!((scaled[i] - (i as f64 + 1.0) * unit[i]).abs() < 1e-14);
        }
    }

    #[test]
    fn gga_without_gradients_is_a_shape_error() {
        let d = densities(3);
        let inputs = GridInputs {
            densities: &d,
            gradients: None,
            enhancement: None,
        };
        let functional = Functional::resolve(FunctionalSpec::PBE).unwrap();
        let err = functional
            .evaluate(&inputs, &Constants::shared(&reference::PBE_REFERENCE), ComputeTarget::Cpu)
            .unwrap_err();
        assert_eq!(err.context, "gradients");
    }

    #[test]
    fn too_few_constants_is_a_shape_error() {
        let d = densities(3);
        let inputs = GridInputs {
            densities: &d,
            gradients: None,
            enhancement: None,
        };
        let functional = Functional::resolve(FunctionalSpec::SVWN3).unwrap();
        let err = functional
            .evaluate(&inputs, &Constants::shared(&[1.0; 20]), ComputeTarget::Cpu)
            .unwrap_err();
        assert_eq!(err.context, "constants columns");
    }

    #[test]
    fn enhancement_length_must_match_points() {
        let d = densities(3);
        let g = DMatrix::zeros(3, 3);
        let e = DVector::from_element(2, 1.0);
        let inputs = GridInputs {
            densities: &d,
            gradients: Some(&g),
            enhancement: Some(&e),
        };
        let functional = Functional::resolve(FunctionalSpec::PBE).unwrap();
        let err = functional
            .evaluate(&inputs, &Constants::shared(&reference::PBE_REFERENCE), ComputeTarget::Cpu)
            .unwrap_err();
        assert_eq!(err.context, "enhancement");
    }
}
