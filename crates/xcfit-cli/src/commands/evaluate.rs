use crate::cli::EvaluateArgs;
use crate::config::{AppConfig, PartialAppConfig};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use std::sync::Arc;
use tracing::{info, warn};
use xcfit::core::io::{load_dataset, load_dispersions};
use xcfit::core::predictor::FixedConstants;
use xcfit::engine::diagnostics::{DiagnosticSink, DirectorySink, NullSink};
use xcfit::engine::progress::ProgressReporter;
use xcfit::workflows::{self, evaluate::EvaluationReport};

pub fn run(args: EvaluateArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialAppConfig::from_file(path)?,
        None => PartialAppConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;
    execute(&config, true)
}

fn execute(config: &AppConfig, show_progress: bool) -> Result<()> {
    info!("Loading dataset from {:?}", &config.dataset_path);
    let dataset = load_dataset(&config.dataset_path).map_err(|source| CliError::Dataset {
        path: config.dataset_path.clone(),
        source,
    })?;
    let dispersions = config
        .dispersions_path
        .as_ref()
        .map(|path| {
            info!("Loading dispersion corrections from {:?}", path);
            load_dispersions(path).map_err(|source| CliError::Dataset {
                path: path.clone(),
                source,
            })
        })
        .transpose()?;

    let sink: Arc<dyn DiagnosticSink> = match &config.diagnostics_dir {
        Some(dir) => Arc::new(DirectorySink::new(dir)),
        None => Arc::new(NullSink),
    };
    let predictor = FixedConstants::new(&config.constants);

    let progress_handler = CliProgressHandler::new();
    let reporter = if show_progress {
        ProgressReporter::with_callback(progress_handler.get_callback())
    } else {
        ProgressReporter::new()
    };

    println!(
        "Evaluating {} reaction(s) with {}...",
        dataset.len(),
        config.core_config.evaluation.functional
    );
    let report = workflows::evaluate::run(
        &dataset,
        &config.core_config,
        &predictor,
        dispersions.as_ref(),
        sink,
        &reporter,
    )?;

    print_summary(&report);

    if let Some(path) = &config.report_path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        report.write_csv(path).map_err(|source| CliError::Report {
            path: path.clone(),
            source,
        })?;
        info!("Wrote per-reaction report to {:?}", path);
        println!("✓ Report written to: {}", path.display());
    }
    Ok(())
}

fn print_summary(report: &EvaluationReport) {
    match report.mae_kcal {
        Some(mae) => println!("MAE: {mae:.4} kcal/mol"),
        None => {
            warn!("Dataset carries no reference energies.");
            println!("MAE: n/a (no labelled reactions)");
        }
    }
    if let Some(loss) = report.local_energy_loss {
        println!("Local-energy loss: {loss:.4} kcal/mol");
    }
}
