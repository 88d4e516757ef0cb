use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use xcfit::core::functionals::ComputeTarget;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "xcfit developers",
    version,
    about = "xcfit CLI - Batched evaluation of reaction energies with parameterized exchange-correlation functionals.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used by the accelerator target.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate the reaction energies of a dataset and report errors against its labels.
    Evaluate(EvaluateArgs),
    /// List the supported (rung, functional) pairs with their constant layouts.
    Functionals,
}

/// Arguments for the `evaluate` subcommand.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    // --- Core Arguments ---
    /// Path to the reaction dataset in JSON format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub dataset: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path for the per-reaction CSV report.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    // --- Functional Overrides ---
    /// Functional to evaluate, as 'RUNG/NAME' (e.g., 'GGA/PBE') or a bare name.
    #[arg(short, long, value_name = "SPEC")]
    pub functional: Option<String>,

    /// Comma-separated constants shared by every grid point.
    /// Defaults to the reference constants of the functional.
    #[arg(long, value_name = "FLOATS", value_delimiter = ',', allow_hyphen_values = true)]
    pub constants: Option<Vec<f64>>,

    // --- Evaluation Overrides ---
    /// Number of reactions stacked into one pipeline call.
    #[arg(short, long, value_name = "INT")]
    pub batch_size: Option<usize>,

    /// Where the pointwise functional is evaluated.
    #[arg(short, long, value_enum, value_name = "TARGET")]
    pub target: Option<TargetArg>,

    /// Functional with reference constants whose local energies are compared against.
    #[arg(long, value_name = "SPEC")]
    pub reference: Option<String>,

    /// JSON map of molecule names to dispersion corrections in Hartree.
    #[arg(long, value_name = "PATH")]
    pub dispersions: Option<PathBuf>,

    /// Directory receiving the intermediate arrays of a diverged batch.
    #[arg(long, value_name = "PATH")]
    pub diagnostics_dir: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S evaluation.batch-size=16
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetArg {
    Cpu,
    Accelerator,
}

impl From<TargetArg> for ComputeTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Cpu => ComputeTarget::Cpu,
            TargetArg::Accelerator => ComputeTarget::Accelerator,
        }
    }
}
