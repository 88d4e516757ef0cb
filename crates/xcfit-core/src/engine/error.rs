use thiserror::Error;

use super::config::ConfigError;
use super::diagnostics::DiagnosticsError;
use crate::core::functionals::UnsupportedFunctional;
use crate::core::models::shape::ShapeError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    ShapeMismatch(#[from] ShapeError),

    #[error("Numerical divergence: {nan_count} of {total} local energies are NaN")]
    NumericalDivergence { nan_count: usize, total: usize },

    #[error(transparent)]
    UnsupportedFunctional(#[from] UnsupportedFunctional),

    #[error("Failed to write diagnostics: {source}")]
    Diagnostics {
        #[from]
        source: DiagnosticsError,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
