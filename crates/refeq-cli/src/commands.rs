use std::process::ExitCode;

use colored::Colorize;

use refeq_diff::Difference;
use refeq_engine::{EngineConfig, EquivalenceEngine};
use refeq_types::ComparisonModes;

use crate::cli::*;
use crate::document;

/// What a successful command reports through the exit status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Equivalent,
    Different,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Equivalent => ExitCode::SUCCESS,
            Self::Different => ExitCode::from(1),
        }
    }
}

pub fn run_command(cli: Cli) -> anyhow::Result<Outcome> {
    let config = document::load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Compare(args) => cmd_compare(args, config, &cli.format),
        Command::Modes(args) => cmd_modes(args, &config, &cli.format),
    }
}

fn cmd_compare(args: CompareArgs, config: EngineConfig, format: &OutputFormat) -> anyhow::Result<Outcome> {
    let (modes, difference) = compare(&args, config)?;
    let outcome = if difference.is_some() { Outcome::Different } else { Outcome::Equivalent };
    match format {
        OutputFormat::Text => println!("{}", verdict(difference.as_ref(), modes)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&difference)?),
    }
    Ok(outcome)
}

fn cmd_modes(args: ModeArgs, config: &EngineConfig, format: &OutputFormat) -> anyhow::Result<Outcome> {
    let modes = args.apply(config.modes);
    match format {
        OutputFormat::Text => {
            println!("Modes: {}", modes.to_string().cyan());
            match config.max_best_match_pool {
                Some(limit) => println!("Best-match pool limit: {}", limit.to_string().bold()),
                None => println!("Best-match pool limit: {}", "none".dimmed()),
            }
        }
        OutputFormat::Json => {
            let effective = EngineConfig { modes, ..config.clone() };
            println!("{}", serde_json::to_string_pretty(&effective)?);
        }
    }
    Ok(Outcome::Equivalent)
}

/// Load both documents and compare them under the configured modes plus
/// the command-line flags.
pub fn compare(
    args: &CompareArgs,
    config: EngineConfig,
) -> anyhow::Result<(ComparisonModes, Option<Difference>)> {
    let modes = args.modes.apply(config.modes);
    let expected = document::load(&args.expected)?;
    let actual = document::load(&args.actual)?;
    let engine = EquivalenceEngine::new(config);
    let difference = engine.difference_with(&expected, &actual, modes, args.stop_at_first)?;
    Ok((modes, difference))
}

/// One-line summary of a comparison.
pub fn verdict(difference: Option<&Difference>, modes: ComparisonModes) -> String {
    match difference {
        None => format!("{} equivalent ({})", "✓".green().bold(), modes),
        Some(d) => {
            let count = d.divergence_count();
            let noun = if count == 1 { "divergence" } else { "divergences" };
            format!(
                "{} {} {} ({}): {}",
                "✗".red().bold(),
                count.to_string().bold(),
                noun,
                modes,
                d
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};

    use refeq_types::{ComparisonMode, Value};

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    fn args(expected: PathBuf, actual: PathBuf) -> CompareArgs {
        CompareArgs { expected, actual, modes: ModeArgs::default(), stop_at_first: false }
    }

    #[test]
    fn identical_documents_are_equivalent() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.json", r#"{"name": "x", "tags": [1, 2]}"#);
        let b = write(dir.path(), "b.json", r#"{"tags": [1, 2], "name": "x"}"#);
        let (_, d) = compare(&args(a, b), EngineConfig::default()).unwrap();
        assert!(d.is_none());
    }

    #[test]
    fn reordered_list_needs_lenient_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.json", "[1, 2, 3]");
        let b = write(dir.path(), "b.json", "[3, 1, 2]");
        let mut compare_args = args(a, b);
        let (_, strict) = compare(&compare_args, EngineConfig::default()).unwrap();
        assert!(strict.is_some());

        compare_args.modes.lenient_order = true;
        let (modes, lenient) = compare(&compare_args, EngineConfig::default()).unwrap();
        assert!(modes.contains(ComparisonMode::LenientOrder));
        assert!(lenient.is_none());
    }

    #[test]
    fn config_modes_apply_without_flags() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.json", r#"{"n": 0}"#);
        let b = write(dir.path(), "b.json", r#"{"n": 7}"#);
        let config = EngineConfig {
            modes: ComparisonModes::strict().with(ComparisonMode::IgnoreDefaults),
            ..EngineConfig::default()
        };
        let (_, d) = compare(&args(a, b), config).unwrap();
        assert!(d.is_none());
    }

    #[test]
    fn json_and_toml_documents_compare() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.json", r#"{"title": "t", "at": "2024-01-02T03:04:05Z"}"#);
        let b = write(dir.path(), "b.toml", "title = \"t\"\nat = 2025-06-07T08:09:10Z\n");
        let mut compare_args = args(a, b);
        let (_, strict) = compare(&compare_args, EngineConfig::default()).unwrap();
        let strict = strict.unwrap();
        assert!(strict.value_difference(&"at".into()).is_some());

        compare_args.modes.lenient_dates = true;
        let (_, lenient) = compare(&compare_args, EngineConfig::default()).unwrap();
        assert!(lenient.is_none());
    }

    #[test]
    fn verdict_lines() {
        let modes = ComparisonModes::strict();
        assert!(verdict(None, modes).contains("equivalent"));

        let d = Difference::leaf("Different values", Value::Int(1), Value::Int(2));
        let line = verdict(Some(&d), modes);
        assert!(line.contains("divergence"));
        assert!(line.contains("Different values"));
    }

    #[test]
    fn missing_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.json", "1");
        let err = compare(&args(a, dir.path().join("nope.json")), EngineConfig::default());
        assert!(err.is_err());
    }

    #[test]
    fn modes_command_succeeds() {
        let outcome = cmd_modes(ModeArgs::default(), &EngineConfig::default(), &OutputFormat::Json);
        assert_eq!(outcome.unwrap(), Outcome::Equivalent);
    }
}
