use std::path::PathBuf;
use xcfit::engine::config::DatasetEvaluationConfig;

/// Fully merged settings of one `evaluate` run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub dispersions_path: Option<PathBuf>,
    /// Constants shared by every grid point.
    pub constants: Vec<f64>,
    pub report_path: Option<PathBuf>,
    pub diagnostics_dir: Option<PathBuf>,
    pub core_config: DatasetEvaluationConfig,
}
