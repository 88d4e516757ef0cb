use xcfit::core::functionals::ComputeTarget;

/// Values used when neither the config file nor the command line sets them.
pub struct DefaultsConfig {
    pub batch_size: usize,
    pub target: ComputeTarget,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            batch_size: 16,
            target: ComputeTarget::Cpu,
        }
    }
}
