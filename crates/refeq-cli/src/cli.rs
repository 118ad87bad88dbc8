use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use refeq_types::{ComparisonMode, ComparisonModes};

#[derive(Parser)]
#[command(name = "refeq", version, about = "Structural equivalence of JSON and TOML documents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
    /// TOML file with engine configuration.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare an expected document with an actual one
    Compare(CompareArgs),
    /// Print the effective comparison modes
    Modes(ModeArgs),
}

#[derive(Args)]
pub struct CompareArgs {
    pub expected: PathBuf,
    pub actual: PathBuf,
    #[command(flatten)]
    pub modes: ModeArgs,
    /// Stop at the first divergence instead of building the full tree
    #[arg(long)]
    pub stop_at_first: bool,
}

#[derive(Args, Clone, Debug, Default)]
pub struct ModeArgs {
    /// Compare sequences regardless of element order
    #[arg(long)]
    pub lenient_order: bool,
    /// Treat default expected values as "don't care"
    #[arg(long)]
    pub ignore_defaults: bool,
    /// Only check presence of date and time values
    #[arg(long)]
    pub lenient_dates: bool,
    /// Shorthand for --lenient-order --ignore-defaults
    #[arg(long)]
    pub lenient: bool,
}

impl ModeArgs {
    /// OR the flags onto `base`.
    pub fn apply(&self, base: ComparisonModes) -> ComparisonModes {
        let mut modes = base;
        if self.lenient {
            modes = modes.union(ComparisonModes::lenient());
        }
        if self.lenient_order {
            modes = modes.with(ComparisonMode::LenientOrder);
        }
        if self.ignore_defaults {
            modes = modes.with(ComparisonMode::IgnoreDefaults);
        }
        if self.lenient_dates {
            modes = modes.with(ComparisonMode::LenientDates);
        }
        modes
    }
}
