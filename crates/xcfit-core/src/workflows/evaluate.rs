use crate::core::functionals::Constants;
use crate::core::functionals::reference::reference_constants;
use crate::core::io::LabeledReaction;
use crate::core::models::Dispersions;
use crate::core::predictor::ConstantsPredictor;
use crate::engine::config::{ConfigError, DatasetEvaluationConfig, EvaluationConfig};
use crate::engine::diagnostics::{DiagnosticSink, DiagnosticsError};
use crate::engine::error::EngineError;
use crate::engine::loss::{local_energy_loss, mean_absolute_error};
use crate::engine::pipeline::EnergyPipeline;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::stacker::stack;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReactionPrediction {
    pub id: String,
    pub predicted_kcal: f64,
    pub reference_kcal: Option<f64>,
}

impl ReactionPrediction {
    pub fn error_kcal(&self) -> Option<f64> {
        self.reference_kcal.map(|r| self.predicted_kcal - r)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub predictions: Vec<ReactionPrediction>,
    /// Mean absolute error over the labelled reactions, kcal/mol.
    pub mae_kcal: Option<f64>,
    /// Mean local-energy loss over batches against the reference functional, kcal/mol.
    pub local_energy_loss: Option<f64>,
}

#[derive(Serialize)]
struct ReportRow<'a> {
    id: &'a str,
    predicted_kcal: f64,
    reference_kcal: Option<f64>,
    error_kcal: Option<f64>,
}

impl EvaluationReport {
    /// Writes one CSV row per reaction; unlabelled reactions leave the reference and error
    /// columns empty.
    pub fn write_csv(&self, path: &Path) -> Result<(), DiagnosticsError> {
        let mut writer = csv::Writer::from_path(path)?;
        for prediction in &self.predictions {
            writer.serialize(ReportRow {
                id: &prediction.id,
                predicted_kcal: prediction.predicted_kcal,
                reference_kcal: prediction.reference_kcal,
                error_kcal: prediction.error_kcal(),
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Evaluates every reaction of `dataset` in batches of `config.batch_size`, with constants
/// predicted per batch from the stacked grid features. Arrays of a diverged batch go to `sink`.
#[instrument(skip_all, name = "evaluation_workflow", fields(reactions = dataset.len()))]
pub fn run(
    dataset: &[LabeledReaction],
    config: &DatasetEvaluationConfig,
    predictor: &dyn ConstantsPredictor,
    dispersions: Option<&Dispersions>,
    sink: Arc<dyn DiagnosticSink>,
    reporter: &ProgressReporter,
) -> Result<EvaluationReport, EngineError> {
    if config.batch_size == 0 {
        return Err(ConfigError::InvalidParameter {
            name: "batch_size",
            reason: "must be at least 1".to_string(),
        }
        .into());
    }
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    let pipeline = EnergyPipeline::new(&config.evaluation)?.with_sink(sink.clone());
    let reference = config
        .reference_functional
        .map(|spec| {
            let pipeline = EnergyPipeline::new(&EvaluationConfig {
                functional: spec,
                target: config.evaluation.target,
            })?
            .with_sink(sink.clone());
            Ok::<_, EngineError>((pipeline, Constants::shared(reference_constants(spec.kind))))
        })
        .transpose()?;
    reporter.report(Progress::PhaseFinish);

    info!(
        functional = %config.evaluation.functional,
        batch_size = config.batch_size,
        "Starting dataset evaluation."
    );
    reporter.report(Progress::PhaseStart { name: "Evaluation" });
    reporter.report(Progress::EvaluationStart {
        total_reactions: dataset.len() as u64,
    });

    let mut predictions = Vec::with_capacity(dataset.len());
    let mut batch_losses = Vec::new();
    for chunk in dataset.chunks(config.batch_size) {
        let reactions: Vec<_> = chunk.iter().map(|labeled| &labeled.reaction).collect();
        let batch = stack(&reactions)?;
        let constants = predictor.predict(&batch.grid)?;
        let result = pipeline.evaluate(&batch, &constants, dispersions, None)?;

        if let Some((reference_pipeline, reference_constants)) = &reference {
            let reference_energies = reference_pipeline.local_energies(&batch, reference_constants, None)?;
            batch_losses.push(local_energy_loss(
                &batch,
                &result.local_energies,
                &reference_energies,
            )?);
        }

        predictions.extend(
            chunk
                .iter()
                .zip(&result.reaction_energies_kcal)
                .map(|(labeled, &predicted_kcal)| ReactionPrediction {
                    id: labeled.id.clone(),
                    predicted_kcal,
                    reference_kcal: labeled.reaction.energy,
                }),
        );
        reporter.report(Progress::BatchFinish {
            reactions: chunk.len() as u64,
        });
    }
    reporter.report(Progress::EvaluationFinish);
    reporter.report(Progress::PhaseFinish);

    let (predicted, labels): (Vec<f64>, Vec<f64>) = predictions
        .iter()
        .filter_map(|p| p.reference_kcal.map(|r| (p.predicted_kcal, r)))
        .unzip();
    let mae_kcal = if labels.is_empty() {
        warn!("No reaction in the dataset carries a reference energy; MAE is not available.");
        reporter.report(Progress::Message(
            "No labelled reactions: MAE is not available.".to_string(),
        ));
        None
    } else {
        Some(mean_absolute_error(&predicted, &labels)?)
    };
    let local_energy_loss =
        (!batch_losses.is_empty()).then(|| batch_losses.iter().sum::<f64>() / batch_losses.len() as f64);

    info!(
        reactions = predictions.len(),
        mae_kcal = ?mae_kcal,
        local_energy_loss = ?local_energy_loss,
        "Dataset evaluation complete."
    );
    Ok(EvaluationReport {
        predictions,
        mae_kcal,
        local_energy_loss,
    })
}
