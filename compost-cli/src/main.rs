//! compost - Inferência fuzzy de maturidade do composto
//! Command-line interface for scoring compost readings

mod readings;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use compost_fis::{
    FisConfig, Fuzzification, InferenceEngine, InferenceResult, Measurements, OdorLevel, QualityLabel, Variable,
};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "compost")]
#[command(author = "SIL Contributors")]
#[command(version = "2026.10.19")]
#[command(about = "Compost maturity scoring with a Mamdani fuzzy engine", long_about = None)]
struct Cli {
    /// Engine configuration (compost.toml / compost.json); searched upwards from the current dir when omitted
    #[arg(short, long, global = true, value_name = "FILE", env = "COMPOST_CONFIG")]
    config: Option<PathBuf>,

    /// Merge the ammonia/odor safety overrides into the active configuration
    #[arg(long, global = true, default_value_t = false)]
    safety: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single reading
    Infer {
        /// Temperature (°C)
        #[arg(short = 't', long)]
        temperature: Option<f64>,

        /// Moisture (%)
        #[arg(short = 'm', long, alias = "moisture")]
        humidity: Option<f64>,

        /// Acidity (pH)
        #[arg(short, long, alias = "acidity")]
        ph: Option<f64>,

        /// Ammonia (ppm)
        #[arg(short, long)]
        ammonia: Option<f64>,

        /// Odor level
        #[arg(short, long, value_enum)]
        odor: Option<OdorArg>,

        /// Print JSON instead of the human summary
        #[arg(long)]
        json: bool,
    },

    /// Score a JSON array or JSON-lines file of readings, one JSON result per line
    Batch {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Validate a configuration document
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the active term catalog and rule base
    Catalog {
        #[arg(short, long, value_enum, default_value_t = Format::Toml)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OdorArg {
    Earthy,
    Noticeable,
    Putrid,
}

impl From<OdorArg> for OdorLevel {
    fn from(arg: OdorArg) -> Self {
        match arg {
            OdorArg::Earthy => OdorLevel::Earthy,
            OdorArg::Noticeable => OdorLevel::Noticeable,
            OdorArg::Putrid => OdorLevel::Putrid,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Toml,
    Json,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "compost_fis=info,compost=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Infer {
            temperature,
            humidity,
            ph,
            ammonia,
            odor,
            json,
        } => {
            let config = resolve_config(cli.config.as_deref(), cli.safety)?;
            let engine = config.build().context("invalid engine configuration")?;

            let mut args = BTreeMap::new();
            args.insert(Variable::Temperature, temperature);
            args.insert(Variable::Humidity, humidity);
            args.insert(Variable::Acidity, ph);
            args.insert(Variable::Ammonia, ammonia);
            args.insert(Variable::Odor, odor.map(|o| OdorLevel::from(o).value()));

            infer_command(&engine, readings::measurements_from_args(args), json)
        }

        Commands::Batch { input } => {
            let config = resolve_config(cli.config.as_deref(), cli.safety)?;
            let engine = config.build().context("invalid engine configuration")?;
            batch_command(&engine, &input)
        }

        Commands::Check { file } => check_command(&file),

        Commands::Catalog { format } => {
            let config = resolve_config(cli.config.as_deref(), cli.safety)?;
            let text = match format {
                Format::Toml => config.to_toml_string()?,
                Format::Json => config.to_json_string()?,
            };
            println!("{}", text);
            Ok(())
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Explicit file > compost.toml found upwards > built-in tables;
/// `--safety` merges the ammonia/odor overrides into whichever wins
fn resolve_config(path: Option<&Path>, safety: bool) -> Result<FisConfig> {
    let config = load_config(path)?;
    if safety {
        tracing::info!("standard safety overrides enabled");
        return Ok(config.with_standard_safety());
    }
    Ok(config)
}

fn load_config(path: Option<&Path>) -> Result<FisConfig> {
    if let Some(path) = path {
        tracing::info!(path = %path.display(), "loading engine configuration");
        return FisConfig::from_file(path).with_context(|| format!("failed to load {}", path.display()));
    }

    let cwd = std::env::current_dir()?;
    if let Some((config, found)) = FisConfig::find_and_load(&cwd)? {
        tracing::info!(path = %found.display(), "using discovered engine configuration");
        return Ok(config);
    }

    Ok(FisConfig::standard())
}

// ============================================================================
// Commands
// ============================================================================

fn infer_command(engine: &InferenceEngine, measurements: Measurements, as_json: bool) -> Result<()> {
    let result = engine.infer(&measurements)?;
    let memberships = engine.fuzzify(&measurements);

    if as_json {
        let doc = json!({
            "measurements": measurements,
            "memberships": memberships.degrees,
            "result": result,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    print_report(&measurements, &memberships, &result);
    Ok(())
}

fn batch_command(engine: &InferenceEngine, input: &Path) -> Result<()> {
    let content = fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;
    let batch = readings::parse_batch(&content)?;

    let mut failures = 0usize;
    for reading in &batch {
        let outcome = reading
            .measurements
            .as_ref()
            .map_err(|e| format!("{:#}", e))
            .and_then(|m| engine.infer(m).map_err(|e| e.to_string()));

        match outcome {
            Ok(result) => println!("{}", json!({ "line": reading.line, "result": result })),
            Err(error) => {
                failures += 1;
                tracing::warn!(line = reading.line, %error, "reading rejected");
                println!("{}", json!({ "line": reading.line, "error": error }));
            }
        }
    }

    tracing::info!(total = batch.len(), failures, "batch complete");

    if failures > 0 {
        anyhow::bail!("{} of {} readings failed", failures, batch.len());
    }
    Ok(())
}

fn check_command(file: &Path) -> Result<()> {
    let config = FisConfig::from_file(file).with_context(|| format!("failed to load {}", file.display()))?;
    let method = config.defuzzification;
    let engine = config.build()?;

    println!("{} {}", "Valid".green().bold(), file.display().to_string().cyan());
    println!(
        "  {} input variables, {} output terms",
        engine.catalog().inputs.len(),
        engine.catalog().output.terms.len()
    );
    println!(
        "  {} rules, {} safety rules",
        engine.rules().rules.len(),
        engine.rules().safety.len()
    );
    println!("  defuzzification: {:?}", method);
    let required: Vec<&str> = engine.required_inputs().iter().map(Variable::name).collect();
    println!("  required inputs: {}", required.join(", "));
    Ok(())
}

// ============================================================================
// Output
// ============================================================================

fn paint_label(label: QualityLabel) -> ColoredString {
    let text = label.as_str();
    match label {
        QualityLabel::Poor => text.red().bold(),
        QualityLabel::Moderate => text.yellow().bold(),
        QualityLabel::Good => text.green().bold(),
        QualityLabel::Excellent => text.bright_green().bold(),
        QualityLabel::Undetermined => text.dimmed(),
    }
}

fn print_report(measurements: &Measurements, memberships: &Fuzzification, result: &InferenceResult) {
    println!("{}", "Readings:".bold());
    for (variable, value) in measurements.iter() {
        let dominant = memberships
            .dominant(variable)
            .map(|(term, mu)| format!("{} ({:.2})", term, mu))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<12} {:>8.2} {:<4} {}",
            variable.name(),
            value,
            variable.unit(),
            dominant.cyan()
        );
    }
    println!();

    println!("{}", "Firing strengths:".bold());
    for (term, strength) in &result.firing_strengths {
        println!("  {:<12} {:.3}", term, strength);
    }
    println!();

    println!("{} {:.2} / 100", "Score  :".bold(), result.score);
    println!("{} {}", "Quality:".bold(), paint_label(result.label));
    if result.vetoed {
        println!("  {}", "safety override fired, score capped".red());
    }
    if result.is_undetermined() {
        println!("  {}", "no rule matched these readings".dimmed());
    }
}
