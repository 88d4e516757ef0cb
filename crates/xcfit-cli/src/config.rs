mod defaults;
mod models;

pub use models::AppConfig;

use crate::cli::{EvaluateArgs, TargetArg};
use crate::error::{CliError, Result};
use crate::utils::parser::{parse_assignment, parse_functional_spec};
use clap::ValueEnum;
use defaults::DefaultsConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;
use xcfit::core::functionals::ComputeTarget;
use xcfit::core::functionals::reference::reference_constants;
use xcfit::engine::config::DatasetEvaluationConfigBuilder;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialFunctionalConfig {
    name: Option<String>,
    constants: Option<Vec<f64>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialEvaluationConfig {
    batch_size: Option<usize>,
    target: Option<ComputeTarget>,
    reference: Option<String>,
    dispersions: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialOutputConfig {
    report: Option<PathBuf>,
    diagnostics_dir: Option<PathBuf>,
}

/// Settings read from a TOML file; every field may be absent.
///
/// ```toml
/// [functional]
/// name = "GGA/PBE"
///
/// [evaluation]
/// batch-size = 16
/// target = "accelerator"
///
/// [output]
/// report = "report.csv"
/// ```
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialAppConfig {
    functional: Option<PartialFunctionalConfig>,
    evaluation: Option<PartialEvaluationConfig>,
    output: Option<PartialOutputConfig>,
    /// Relative paths in the file are resolved against this directory.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl PartialAppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    pub fn merge_with_cli(mut self, args: &EvaluateArgs) -> Result<AppConfig> {
        self.apply_set_values(&args.set_values)?;

        let defaults = DefaultsConfig::default();
        let functional = self.functional.take().unwrap_or_default();
        let evaluation = self.evaluation.take().unwrap_or_default();
        let output = self.output.take().unwrap_or_default();
        let from_file = |path: Option<PathBuf>| path.map(|p| self.resolve_path(p));

        let functional_name = args.functional.clone().or(functional.name).ok_or_else(|| {
            CliError::Config(
                "A functional is required either in the config file (`functional.name`) or via --functional."
                    .to_string(),
            )
        })?;
        let spec = parse_functional_spec(&functional_name)?;
        let reference = args
            .reference
            .clone()
            .or(evaluation.reference)
            .map(|name| parse_functional_spec(&name))
            .transpose()?;

        let constants = args
            .constants
            .clone()
            .or(functional.constants)
            .unwrap_or_else(|| reference_constants(spec.kind).to_vec());
        if constants.is_empty() {
            return Err(CliError::Config("`functional.constants` must not be empty.".to_string()));
        }

        let core_config = DatasetEvaluationConfigBuilder::new()
            .functional(spec)
            .target(
                args.target
                    .map(ComputeTarget::from)
                    .or(evaluation.target)
                    .unwrap_or(defaults.target),
            )
            .batch_size(
                args.batch_size
                    .or(evaluation.batch_size)
                    .unwrap_or(defaults.batch_size),
            )
            .reference_functional(reference)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(AppConfig {
            dataset_path: args.dataset.clone(),
            dispersions_path: args.dispersions.clone().or(from_file(evaluation.dispersions)),
            constants,
            report_path: args.output.clone().or(from_file(output.report)),
            diagnostics_dir: args.diagnostics_dir.clone().or(from_file(output.diagnostics_dir)),
            core_config,
        })
    }

    fn resolve_path(&self, path: PathBuf) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        }
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value) = parse_assignment(kv_pair)?;
            let invalid = |kind: &str| CliError::Config(format!("Invalid {kind} value for {key}: {value}"));

            match key {
                "functional.name" => {
                    self.functional.get_or_insert_with(Default::default).name = Some(value.to_string());
                }
                "functional.constants" => {
                    let constants = value
                        .split(',')
                        .map(|v| f64::from_str(v.trim()))
                        .collect::<std::result::Result<Vec<_>, _>>()
                        .map_err(|_| invalid("float list"))?;
                    self.functional.get_or_insert_with(Default::default).constants = Some(constants);
                }
                "evaluation.batch-size" => {
                    self.evaluation.get_or_insert_with(Default::default).batch_size =
                        Some(value.parse().map_err(|_| invalid("integer"))?);
                }
                "evaluation.target" => {
                    let target = TargetArg::from_str(value, true).map_err(|_| invalid("target"))?;
                    self.evaluation.get_or_insert_with(Default::default).target = Some(target.into());
                }
                "evaluation.reference" => {
                    self.evaluation.get_or_insert_with(Default::default).reference = Some(value.to_string());
                }
                "evaluation.dispersions" => {
                    self.evaluation.get_or_insert_with(Default::default).dispersions = Some(PathBuf::from(value));
                }
                "output.report" => {
                    self.output.get_or_insert_with(Default::default).report = Some(PathBuf::from(value));
                }
                "output.diagnostics-dir" => {
                    self.output.get_or_insert_with(Default::default).diagnostics_dir = Some(PathBuf::from(value));
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{key}'"
                    )));
                }
            }
        }
        Ok(())
    }
}
