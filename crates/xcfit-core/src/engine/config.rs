use crate::core::functionals::{ComputeTarget, FunctionalSpec};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Settings of one [`EnergyPipeline`](super::pipeline::EnergyPipeline).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationConfig {
    pub functional: FunctionalSpec,
    pub target: ComputeTarget,
}

#[derive(Default)]
pub struct EvaluationConfigBuilder {
    functional: Option<FunctionalSpec>,
    target: Option<ComputeTarget>,
}

impl EvaluationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn functional(mut self, spec: FunctionalSpec) -> Self {
        self.functional = Some(spec);
        self
    }
    pub fn target(mut self, target: ComputeTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn build(self) -> Result<EvaluationConfig, ConfigError> {
        Ok(EvaluationConfig {
            functional: self
                .functional
                .ok_or(ConfigError::MissingParameter("functional"))?,
            target: self.target.unwrap_or_default(),
        })
    }
}

/// Settings of the dataset evaluation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetEvaluationConfig {
    pub evaluation: EvaluationConfig,
    /// Reactions stacked into one pipeline call.
    pub batch_size: usize,
    /// Functional whose local energies serve as the target of the local-energy loss.
    pub reference_functional: Option<FunctionalSpec>,
}

#[derive(Default)]
pub struct DatasetEvaluationConfigBuilder {
    functional: Option<FunctionalSpec>,
    target: Option<ComputeTarget>,
    batch_size: Option<usize>,
    reference_functional: Option<FunctionalSpec>,
}

impl DatasetEvaluationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn functional(mut self, spec: FunctionalSpec) -> Self {
        self.functional = Some(spec);
        self
    }
    pub fn target(mut self, target: ComputeTarget) -> Self {
        self.target = Some(target);
        self
    }
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }
    pub fn reference_functional(mut self, spec: Option<FunctionalSpec>) -> Self {
        self.reference_functional = spec;
        self
    }

    pub fn build(self) -> Result<DatasetEvaluationConfig, ConfigError> {
        let mut evaluation = EvaluationConfigBuilder::new();
        if let Some(spec) = self.functional {
            evaluation = evaluation.functional(spec);
        }
        if let Some(target) = self.target {
            evaluation = evaluation.target(target);
        }

        let batch_size = self
            .batch_size
            .ok_or(ConfigError::MissingParameter("batch_size"))?;
        if batch_size == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "batch_size",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(DatasetEvaluationConfig {
            evaluation: evaluation.build()?,
            batch_size,
            reference_functional: self.reference_functional,
        })
    }
}
