//! CANYON-MED - Main Entry Point

use anyhow::{Context, Result};
use api::{init_logging, init_metrics, run_server, AppConfig, AppState};
use clap::{Args, Parser, Subcommand};
use feature_encoder::ProfileBatch;
use inference_engine::PredictorSet;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;
use weight_store::Property;

/// Neural network estimates of Mediterranean carbonate system and nutrients
#[derive(Debug, Parser)]
#[command(name = "canyon-med", version, about)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, short, env = "CANYON_MED_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the weight directory
    #[arg(long, global = true)]
    weights_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve estimates over HTTP
    Serve {
        /// Listen address, overriding `server.addr`
        #[arg(long)]
        addr: Option<String>,
    },
    /// Estimate properties for a single sample and print them as JSON
    Estimate(EstimateArgs),
}

#[derive(Debug, Args)]
struct EstimateArgs {
    /// Observation date (UTC), e.g. 2014-04-09 or "2014-04-09 12:30"
    #[arg(long)]
    date: String,
    /// Latitude (°N)
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,
    /// Longitude (°E)
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,
    /// Pressure (dbar)
    #[arg(long, allow_negative_numbers = true)]
    pres: f64,
    /// In-situ temperature (°C)
    #[arg(long, allow_negative_numbers = true)]
    temp: f64,
    /// Practical salinity
    #[arg(long, allow_negative_numbers = true)]
    psal: f64,
    /// Dissolved oxygen (µmol/kg)
    #[arg(long, allow_negative_numbers = true)]
    doxy: f64,
    /// Properties to estimate (default: all)
    #[arg(long = "property", value_delimiter = ',')]
    properties: Vec<Property>,
}

impl EstimateArgs {
    fn batch(&self) -> ProfileBatch {
        ProfileBatch {
            date: vec![self.date.clone()],
            lat: vec![self.lat],
            lon: vec![self.lon],
            pres: vec![self.pres],
            temp: vec![self.temp],
            psal: vec![self.psal],
            doxy: vec![self.doxy],
        }
    }
}

fn load_predictors(config: &AppConfig, properties: &[Property]) -> Result<PredictorSet> {
    let store = config.weight_store();
    PredictorSet::load_properties(&store, properties, &config.engine)
        .with_context(|| format!("failed to load weights from {}", config.weights_dir.display()))
}

fn estimate(config: &AppConfig, args: &EstimateArgs) -> Result<()> {
    let properties = if args.properties.is_empty() {
        Property::ALL.to_vec()
    } else {
        args.properties.clone()
    };
    let predictors = load_predictors(config, &properties)?;
    let samples = args.batch().into_samples().context("invalid sample")?;

    let mut output = BTreeMap::new();
    for property in properties {
        let estimates = predictors.predict(property, &samples)?;
        output.insert(property, estimates.first().copied().unwrap_or(f64::NAN));
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(dir) = cli.weights_dir {
        config.weights_dir = dir;
    }
    init_logging(&config.logging);

    match cli.command {
        Command::Serve { addr } => {
            info!("=== CANYON-MED v{} ===", env!("CARGO_PKG_VERSION"));
            let addr = addr.unwrap_or_else(|| config.server.addr.clone());
            let metrics = init_metrics().context("failed to install metrics recorder")?;
            let predictors = load_predictors(&config, &Property::ALL)?;
            run_server(&addr, AppState::new(predictors, Some(metrics)))
                .await
                .with_context(|| format!("server on {} failed", addr))?;
        }
        Command::Estimate(args) => estimate(&config, &args)?,
    }

    Ok(())
}
