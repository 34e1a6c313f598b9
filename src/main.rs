use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use numerox::config::AppConfig;
use numerox::data::Data;
use numerox::metrics::Report;
use numerox::models::{Model, ModelKind};
use numerox::util::{history, tournament_iter, HistoryEntry};

#[derive(Parser)]
#[command(name = "numerox")]
#[command(version = "0.1.0")]
#[command(about = "Tournament model adapters, fingerprints and lookups", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "numerox.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List tournament ids and names
    Tournaments,
    /// Show the tournament changelog
    History,
    /// Print a model's name and parameters
    Describe {
        /// Model name; defaults to the configured model
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Fit and predict on generated data, then score the predictions
    Run {
        /// Model name; defaults to the configured model
        #[arg(short, long)]
        model: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the effective configuration as TOML
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config))?;
    debug!("Config: {:?}", config);

    match cli.command {
        Commands::Tournaments => {
            for (id, name) in tournament_iter() {
                println!("{:>2}  {}", id, name);
            }
        }
        Commands::History => print_history(history()),
        Commands::Describe { model } => {
            let model = select_model(&config, model.as_deref())?;
            println!("{}", model.describe());
        }
        Commands::Run { model, json } => {
            let model = select_model(&config, model.as_deref())?;
            check_config(&config)?;
            run_model(&config, &model, json)?;
        }
        Commands::Init { force } => write_config(&config, &cli.config, force)?,
    }

    Ok(())
}

/// Configured model, or the named adapter. A name matching the configured
/// kind keeps the configured params; any other name uses adapter defaults.
fn select_model(config: &AppConfig, name: Option<&str>) -> Result<ModelKind> {
    match name {
        Some(name) if name != config.model.kind() => {
            let model = name.parse::<ModelKind>()?;
            info!("Using {} defaults", model.name());
            Ok(model)
        }
        _ => Ok(config.model.build()?),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    if let Err(errors) = config.validate() {
        for e in &errors {
            warn!("Invalid config: {}", e);
        }
        bail!("{} config error(s)", errors.len());
    }
    Ok(())
}

fn run_model(config: &AppConfig, model: &ModelKind, json: bool) -> Result<()> {
    let (dfit, dpre) = config
        .data
        .synthetic()
        .pair(config.data.fit_rows, config.data.predict_rows)?;
    info!(
        "Generated data: fit {} rows [{}], predict {} rows [{}]",
        dfit.len(),
        &dfit.hash().to_hex()[..12],
        dpre.len(),
        &dpre.hash().to_hex()[..12]
    );

    let (prediction, fingerprint) = model.run(&dfit, &dpre)?;
    info!("Fingerprint: {}", fingerprint);

    let report = Report::evaluate(model.to_string(), &prediction, &dpre)?;
    if !report.is_consistent() {
        warn!("{} did not beat the 0.5 benchmark", model.name());
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}

fn print_history(entries: &[HistoryEntry]) {
    let [t, r, c] = HistoryEntry::COLUMNS;
    println!("{:>10} {:>5}  {}", t, r, c);
    for entry in entries {
        println!("{}", entry);
    }
}

fn write_config(config: &AppConfig, path: &str, force: bool) -> Result<()> {
    let path = if path.ends_with(".toml") {
        path.to_string()
    } else {
        format!("{}.toml", path)
    };
    if std::path::Path::new(&path).exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path);
    }
    let text = toml::to_string_pretty(config)?;
    std::fs::write(&path, text).with_context(|| format!("failed to write {}", path))?;
    info!("Wrote {}", path);
    Ok(())
}
