//! `micella`: TC/L bile-salt micelle interaction probability for one compound.

mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use micella_core::{ErrorKind, MicellaError};
use micella_model::{MicellaConfig, ModelVariant, Predictor, ReferenceSet};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::report::{json_err, json_ok, Report};

/// Metoprolol.
const DEFAULT_SMILES: &str = "CC(C)NCC(COC1=CC=C(C=C1)CCOC)O";
const DEFAULT_FILTER: &str = "micella=info,warn";

#[derive(Parser, Debug)]
#[command(name = "micella", version)]
#[command(about = "Predict taurocholate/lecithin micelle interaction from a SMILES string", long_about = None)]
struct Cli {
    /// Compound structure as SMILES
    #[arg(default_value = DEFAULT_SMILES)]
    smiles: String,

    /// Coefficient set (v1 or v2); overrides the config file
    #[arg(long)]
    variant: Option<ModelVariant>,

    /// TOML config file (defaults to MICELLA_CONFIG when set)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print a JSON envelope instead of the text report
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(report) => {
            if cli.json {
                println!("{}", json_ok(&report));
            } else {
                print!("{}", report.to_text());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            let kind = error_kind(&err);
            let label = kind.map_or("other", ErrorKind::as_str);
            if cli.json {
                println!("{}", json_err(label, format!("{err:#}")));
            } else {
                eprintln!("error [{label}]: {err:#}");
            }
            ExitCode::from(exit_code(kind))
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        1 => EnvFilter::new("micella=debug,warn"),
        _ => EnvFilter::new("micella=trace,info"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load configuration and reference data, then score the compound.
fn run(cli: &Cli) -> anyhow::Result<Report> {
    let mut config =
        MicellaConfig::resolve(cli.config.as_deref()).context("loading configuration")?;
    if let Some(variant) = cli.variant {
        config.model.variant = variant;
    }
    debug!(?config, "configuration resolved");

    let predictor = Predictor::from_config(&config).context("building predictor")?;
    // Configured tables are checked for every variant; only v2 reports against them.
    let references = ReferenceSet::load(&config.reference).context("loading reference tables")?;
    if let Some(refs) = &references {
        info!(populations = refs.populations().len(), "reference tables loaded");
    }

    let prediction = predictor
        .predict(&cli.smiles)
        .with_context(|| format!("scoring '{}'", cli.smiles))?;
    let comparison = references
        .filter(|_| config.model.variant == ModelVariant::V2)
        .map(|refs| refs.compare(&prediction.descriptors));
    Ok(Report::new(prediction, comparison))
}

fn error_kind(err: &anyhow::Error) -> Option<ErrorKind> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<MicellaError>())
        .map(MicellaError::kind)
}

fn exit_code(kind: Option<ErrorKind>) -> u8 {
    match kind {
        Some(ErrorKind::InvalidStructure) => 2,
        Some(ErrorKind::DescriptorUnavailable) => 3,
        Some(ErrorKind::Configuration) => 4,
        Some(ErrorKind::Io) | None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("micella").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let c = cli(&[]);
        assert_eq!(c.smiles, DEFAULT_SMILES);
        assert_eq!(c.variant, None);
        assert!(!c.json);
        assert_eq!(c.verbose, 0);
    }

    #[test]
    fn flags() {
        let c = cli(&["CCO", "--variant", "v2", "--json", "-vv"]);
        assert_eq!(c.smiles, "CCO");
        assert_eq!(c.variant, Some(ModelVariant::V2));
        assert!(c.json);
        assert_eq!(c.verbose, 2);
        assert!(Cli::try_parse_from(["micella", "--variant", "v9"]).is_err());
    }

    #[test]
    fn default_compound_report() {
        let report = run(&cli(&["--config", "/dev/null"])).unwrap();
        let text = report.to_text();
        assert!(text.starts_with("Structure: "));
        assert!(text.contains("\nlogD: "));
        assert!(text.contains("\nCrippenMR: "));
        assert!(text.contains("\nTC/L interaction probability: "));
        assert!(report.comparison.is_none());
    }

    #[test]
    fn exit_codes_follow_error_kind() {
        let invalid = run(&cli(&["C1CC", "--config", "/dev/null"])).unwrap_err();
        assert_eq!(error_kind(&invalid), Some(ErrorKind::InvalidStructure));
        assert_eq!(exit_code(error_kind(&invalid)), 2);

        let untyped = run(&cli(&["[Xe]", "--config", "/dev/null"])).unwrap_err();
        assert_eq!(exit_code(error_kind(&untyped)), 3);

        let missing = run(&cli(&["--config", "/nonexistent/micella.toml"])).unwrap_err();
        assert_eq!(exit_code(error_kind(&missing)), 4);

        let dir = tempfile::tempdir().unwrap();
        let unreadable = run(&cli(&["--config", dir.path().to_str().unwrap()])).unwrap_err();
        assert_eq!(error_kind(&unreadable), Some(ErrorKind::Io));
        assert_eq!(exit_code(error_kind(&unreadable)), 1);

        assert_eq!(exit_code(None), 1);
    }

    #[test]
    fn variant_two_with_references_adds_comparison() {
        let mut table = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(table, "rd_logD,rd_MR\n0.5,60.0\n2.0,90.0\n3.5,130.0").unwrap();
        table.flush().unwrap();
        let mut config = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(config, "[reference]\ntraining = {:?}", table.path()).unwrap();
        config.flush().unwrap();
        let config_path = config.path().to_str().unwrap().to_string();

        let v2 = run(&cli(&["--variant", "v2", "--config", &config_path])).unwrap();
        let plot = v2.comparison.as_ref().unwrap();
        assert_eq!(plot.series.len(), 2);
        assert!(v2.to_text().contains("Compound vs. modeling set"));

        let v1 = run(&cli(&["--config", &config_path])).unwrap();
        assert!(v1.comparison.is_none());
    }

    #[test]
    fn broken_reference_table_fails_for_every_variant() {
        let mut table = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(table, "logd,mr\n0.5,60.0").unwrap();
        table.flush().unwrap();
        let mut config = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(config, "[reference]\ntraining = {:?}", table.path()).unwrap();
        config.flush().unwrap();
        let config_path = config.path().to_str().unwrap().to_string();

        for variant in ["v1", "v2"] {
            let err = run(&cli(&["--variant", variant, "--config", &config_path])).unwrap_err();
            assert_eq!(exit_code(error_kind(&err)), 4, "{variant}");
        }
    }
}
