use super::backsplit::backsplit;
use super::combiner::combine;
use super::config::EvaluationConfig;
use super::diagnostics::{DiagnosticSink, NullSink};
use super::error::EngineError;
use super::integration::integrate;
use super::stacker::stack;
use crate::core::functionals::{ComputeTarget, Constants, Functional, GridInputs, LocalEnergyFunctional};
use crate::core::models::Dispersions;
use crate::core::models::batch::BatchedReaction;
use crate::core::models::energies::MoleculeEnergies;
use crate::core::models::reaction::Reaction;
use nalgebra::{DMatrix, DVector};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Output of one pipeline call.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionEnergies {
    /// One energy per reaction, in kcal/mol.
    pub reaction_energies_kcal: Vec<f64>,
    /// Energy per particle of every grid point of the batch, in Hartree.
    pub local_energies: DVector<f64>,
    /// Total energy of every molecule, in Hartree.
    pub molecule_energies: MoleculeEnergies,
}

/// Evaluates reaction energies of a batch: one functional call over all grid points, then
/// backsplit, quadrature and stoichiometric combination.
pub struct EnergyPipeline {
    functional: Box<dyn LocalEnergyFunctional>,
    target: ComputeTarget,
    sink: Arc<dyn DiagnosticSink>,
}

impl EnergyPipeline {
    /// Resolves the configured functional. Fails before any computation if the
    /// `(rung, functional)` pair is not supported.
    pub fn new(config: &EvaluationConfig) -> Result<Self, EngineError> {
        let functional = Functional::resolve(config.functional)?;
        Ok(Self::with_functional(functional, config.target))
    }

    pub fn with_functional(functional: impl LocalEnergyFunctional + 'static, target: ComputeTarget) -> Self {
        Self {
            functional: Box::new(functional),
            target,
            sink: Arc::new(NullSink),
        }
    }

    /// Sets where the intermediate arrays of a diverged evaluation are sent.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn functional(&self) -> &dyn LocalEnergyFunctional {
        self.functional.as_ref()
    }

    pub fn target(&self) -> ComputeTarget {
        self.target
    }

    /// Evaluates the functional once over every grid point of `batch`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ShapeMismatch`] if the constants, gradients or enhancement factors
    /// do not fit the batch, and [`EngineError::NumericalDivergence`] if any local energy is NaN.
    #[instrument(skip_all, name = "local_energies", fields(points = batch.n_points()))]
    pub fn local_energies(
        &self,
        batch: &BatchedReaction,
        constants: &Constants,
        enhancement: Option<&DVector<f64>>,
    ) -> Result<DVector<f64>, EngineError> {
        let needs_gradients = self.functional.needs_gradients();
        if enhancement.is_some() && !needs_gradients {
            debug!(
                functional = %self.functional.name(),
                "Ignoring exchange enhancement factors for a functional without gradient terms."
            );
        }

        let inputs = GridInputs {
            densities: &batch.densities,
            gradients: needs_gradients.then_some(&batch.gradients),
            enhancement: enhancement.filter(|_| needs_gradients),
        };
        let local_energies = self.functional.evaluate(&inputs, constants, self.target)?;

        let nan_count = local_energies.iter().filter(|e| e.is_nan()).count();
        if nan_count > 0 {
            let total = local_energies.len();
            error!(nan_count, total, "NaN detected in local energies.");
            self.capture_divergence(batch, constants, &local_energies);
            return Err(EngineError::NumericalDivergence { nan_count, total });
        }
        Ok(local_energies)
    }

    /// Evaluates the reaction energies of `batch`.
    #[instrument(skip_all, name = "energy_pipeline", fields(
        functional = %self.functional.name(),
        reactions = batch.n_reactions(),
        points = batch.n_points()
    ))]
    pub fn evaluate(
        &self,
        batch: &BatchedReaction,
        constants: &Constants,
        dispersions: Option<&Dispersions>,
        enhancement: Option<&DVector<f64>>,
    ) -> Result<ReactionEnergies, EngineError> {
        batch.validate()?;
        let local_energies = self.local_energies(batch, constants, enhancement)?;

        let segments = backsplit(batch, &local_energies)?;
        let molecule_energies = integrate(&segments, &batch.hf_energies, dispersions)?;
        let reaction_energies_kcal = combine(
            batch.reaction_indices.as_deref(),
            &batch.coefficients,
            &molecule_energies,
        )?;

        info!(
            molecules = molecule_energies.len(),
            reactions = reaction_energies_kcal.len(),
            "Evaluated reaction energies."
        );
        Ok(ReactionEnergies {
            reaction_energies_kcal,
            local_energies,
            molecule_energies,
        })
    }

    /// Stacks `reactions` into one batch and evaluates it.
    pub fn evaluate_reactions(
        &self,
        reactions: &[Reaction],
        constants: &Constants,
        dispersions: Option<&Dispersions>,
        enhancement: Option<&DVector<f64>>,
    ) -> Result<ReactionEnergies, EngineError> {
        let batch = stack(reactions)?;
        self.evaluate(&batch, constants, dispersions, enhancement)
    }

    fn capture_divergence(&self, batch: &BatchedReaction, constants: &Constants, local_energies: &DVector<f64>) {
        let n = batch.n_points();
        let captures = [
            ("local_energies", column(local_energies)),
            ("densities", batch.densities.clone()),
            ("weights", column(&batch.weights)),
            ("constants", constants.to_matrix(n)),
        ];
        for (label, values) in &captures {
            if let Err(e) = self.sink.capture(label, values) {
                error!(label, error = %e, "Failed to capture diagnostic tensor.");
            }
        }
    }
}

fn column(values: &DVector<f64>) -> DMatrix<f64> {
    DMatrix::from_column_slice(values.len(), 1, values.as_slice())
}
