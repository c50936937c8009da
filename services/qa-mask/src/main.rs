//! QA band mask tool.
//!
//! Reads a Landsat 8 or MODIS QA raster, decodes the requested bit-field
//! conditions and writes a 0/1 mask raster.

mod pipeline;
mod raster;
mod recipe;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pipeline::MaskRequest;
use qa_masker::{CompareOp, Condition, MaskerConfig, Sensor, SensorProfile};
use recipe::MaskRecipe;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "qa-mask")]
#[command(about = "Generate masks from satellite quality-assessment bands")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mask a single condition, e.g. `--condition cloud --value high --operator ">="`
    Mask {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long, default_value = "landsat8")]
        sensor: Sensor,
        #[arg(short, long)]
        condition: String,
        /// Numeric value or confidence name (high, medium, low, ...)
        #[arg(long)]
        value: String,
        /// One of =, >, >=, <, <= (or eq, gt, ge, lt, le)
        #[arg(long, default_value = "=")]
        operator: CompareOp,
    },
    /// Mask pixels matching every `--where name=value` exactly
    Multi {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long, default_value = "landsat8")]
        sensor: Sensor,
        #[arg(long = "where", required = true)]
        conditions: Vec<String>,
    },
    /// Run a YAML mask recipe
    Recipe {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Print a sensor's bit table as JSON
    Profile {
        #[arg(short, long, default_value = "landsat8")]
        sensor: Sensor,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs);

    let config = MaskerConfig::from_env();
    config.validate()?;

    match args.command {
        Command::Mask {
            input,
            output,
            sensor,
            condition,
            value,
            operator,
        } => {
            let profile = sensor.profile();
            let value = profile.resolve_value(&condition, &value)?;
            info!(%sensor, %condition, value, op = %operator, "Masking single condition");
            let request = MaskRequest::Single {
                condition,
                value,
                op: operator,
            };
            pipeline::mask_file(&input, &output, &profile, config, &request)?;
        }
        Command::Multi {
            input,
            output,
            sensor,
            conditions,
        } => {
            let profile = sensor.profile();
            let conditions = parse_conditions(&profile, &conditions)?;
            info!(%sensor, terms = conditions.len(), "Masking composite condition");
            pipeline::mask_file(
                &input,
                &output,
                &profile,
                config,
                &MaskRequest::Multi(conditions),
            )?;
        }
        Command::Recipe { file } => {
            let recipe = MaskRecipe::from_yaml(&file)?;
            let profile = recipe.profile()?;
            let config = recipe.masker_config()?;
            info!(recipe = %file.display(), profile = %profile.name(), "Running recipe");
            pipeline::mask_file(
                &recipe.input,
                &recipe.output,
                &profile,
                config,
                &MaskRequest::Multi(recipe.conditions),
            )?;
        }
        Command::Profile { sensor } => {
            let definition = sensor.profile().to_definition();
            let json = serde_json::to_string_pretty(&definition)
                .context("failed to serialize profile")?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn parse_conditions(profile: &SensorProfile, raw: &[String]) -> Result<Vec<Condition>> {
    raw.iter()
        .map(|s| {
            Condition::parse(profile, s).with_context(|| format!("invalid condition '{}'", s))
        })
        .collect()
}
