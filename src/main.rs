//! ramlsync CLI - Command-line interface
//!
//! Commands:
//!   generate - Generate Spring MVC sources from a RAML contract
//!   check    - Run style checks on a contract
//!   verify   - Compare a published contract with an implementation
//!   schema   - Print the JSON schema of ramlsync.yaml

use clap::{Args, Parser, Subcommand};
use ramlsync::style::NameCase;
use ramlsync::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "ramlsync", version, about = "RAML contract tooling for Spring MVC")]
struct Cli {
    /// Configuration file (default: ./ramlsync.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Exit non-zero when any issue is reported
    #[arg(long, global = true)]
    strict: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate controllers (and body classes) from a contract
    Generate(GenerateArgs),
    /// Style-check a contract
    Check(CheckArgs),
    /// Compare a published contract with an implementation-derived one
    Verify(VerifyArgs),
    /// Print the JSON schema of ramlsync.yaml
    Schema,
}

#[derive(Args)]
struct GenerateArgs {
    /// RAML contract
    raml: PathBuf,

    /// Root directory for generated sources
    #[arg(long, short)]
    output_dir: Option<PathBuf>,

    /// Java package of generated controllers
    #[arg(long)]
    base_package: Option<String>,

    /// Controller rule identifier
    #[arg(long)]
    rule: Option<String>,

    /// Rule option as key=value (repeatable)
    #[arg(long = "rule-config", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    rule_config: Vec<(String, String)>,

    /// Write into a fresh timestamped folder
    #[arg(long)]
    timestamp_folder: bool,
}

#[derive(Args)]
struct CheckArgs {
    /// Published contract
    published: PathBuf,

    /// Implementation-derived contract, style-checked unless code style is ignored
    #[arg(long)]
    implemented: Option<PathBuf>,

    /// Also style-check the implementation-derived contract
    #[arg(long)]
    check_code_style: bool,

    /// Parameter naming convention
    #[arg(long, value_parser = parse_name_case)]
    parameter_case: Option<NameCase>,
}

#[derive(Args)]
struct VerifyArgs {
    /// Published contract
    published: PathBuf,

    /// Implementation-derived contract
    implemented: PathBuf,

    /// Also style-check the implementation-derived contract
    #[arg(long)]
    check_code_style: bool,
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))
}

fn parse_name_case(s: &str) -> std::result::Result<NameCase, String> {
    match s.to_ascii_lowercase().as_str() {
        "camel" => Ok(NameCase::Camel),
        "snake" => Ok(NameCase::Snake),
        "kebab" => Ok(NameCase::Kebab),
        "any" => Ok(NameCase::Any),
        other => Err(format!("unknown case '{}' (camel, snake, kebab, any)", other)),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Command::Generate(args) => cmd_generate(&cli, args),
        Command::Check(args) => cmd_check(&cli, args),
        Command::Verify(args) => cmd_verify(&cli, args),
        Command::Schema => cmd_schema(),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<ProjectConfig> {
    match &cli.config {
        Some(path) => ProjectConfig::load_from_file(path),
        None => Ok(ProjectConfig::load_from_dir(Path::new("."))?.unwrap_or_default()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `Ok(false)` means the command ran but `--strict` rejects the outcome
fn cmd_generate(cli: &Cli, args: &GenerateArgs) -> Result<bool> {
    let mut config = load_config(cli)?.generate;
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(package) = &args.base_package {
        config.extractor.base_package = package.clone();
    }
    if let Some(rule) = &args.rule {
        config.rule = rule.clone();
    }
    config.rule_configuration.extend(args.rule_config.iter().cloned());
    config.add_timestamp_folder |= args.timestamp_folder;

    let contract = ContractModel::load(&args.raml)?;
    let report = generate(&contract, &config)?;

    if cli.json {
        print_json(&report)?;
    } else {
        println!(
            "Generated {} controller(s) with rule {} into {}",
            report.controllers,
            report.rule,
            report.output_dir.display()
        );
        if let Some(fallback) = &report.rule_fallback {
            println!("  ! {}", fallback);
        }
        for err in &report.extraction_errors {
            println!("  ! {}", err);
        }
        for err in &report.application_errors {
            println!("  ✗ {}", err);
        }
        for file in &report.files {
            println!("  {}", file.display());
        }
    }

    Ok(!(cli.strict && !report.is_clean()))
}

fn cmd_check(cli: &Cli, args: &CheckArgs) -> Result<bool> {
    let mut config = load_config(cli)?.check;
    if args.check_code_style {
        config.ignore_code_style = false;
    }
    if let Some(case) = args.parameter_case {
        config.parameter_case = case;
    }
    if args.implemented.is_none() && !config.ignore_code_style {
        warn!("no implementation contract given, only the published contract is checked");
    }

    let published = ContractModel::load(&args.published)?;
    let implemented = match &args.implemented {
        Some(path) => ContractModel::load(path)?,
        None => ContractModel::default(),
    };

    let coordinator = StyleCheckCoordinator::from_config(&config)?;
    let report = coordinator.check(&published, &implemented);

    if cli.json {
        print_json(&report)?;
    } else {
        for issue in report.issues() {
            println!("{}", issue);
        }
        for failure in &report.failures {
            println!("  ✗ {} failed at {}: {}", failure.checker, failure.pointer, failure.message);
        }
        println!(
            "{} warning(s), {} error(s)",
            report.warnings.len(),
            report.errors.len()
        );
    }

    Ok(!(cli.strict && !report.is_clean()))
}

fn cmd_verify(cli: &Cli, args: &VerifyArgs) -> Result<bool> {
    let project = load_config(cli)?;
    let mut style = project.check;
    if args.check_code_style {
        style.ignore_code_style = false;
    }

    let published = ContractModel::load(&args.published)?;
    let implemented = ContractModel::load(&args.implemented)?;

    let report = ContractVerifier::new(project.verify)
        .with_style(StyleCheckCoordinator::from_config(&style)?)
        .verify(&published, &implemented);

    if cli.json {
        print_json(&report)?;
    } else {
        for issue in report.issues() {
            println!("{}", issue);
        }
        let mark = if report.passed { "✓" } else { "✗" };
        println!(
            "{} {} resource(s), {} action(s) compared: {} error(s), {} warning(s)",
            mark,
            report.resources_compared,
            report.actions_compared,
            report.errors.len(),
            report.warnings.len()
        );
    }

    Ok(!(cli.strict && report.issues().next().is_some()))
}

fn cmd_schema() -> Result<bool> {
    println!("{}", config_schema()?);
    Ok(true)
}
