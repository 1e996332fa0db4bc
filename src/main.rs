use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::PathBuf;

use steptrack::logging::{init_logging, LogFormat};
use steptrack::{
    ActivityCalculator, AppConfig, BodyParameters, ErrorSeverity, RecordParser, TrackerError,
};

/// StepTrack - Step Count Activity Metrics CLI
///
/// Turns step records into distance, average speed and calories burned.
#[derive(Parser)]
#[command(name = "steptrack")]
#[command(author = "StepTrack Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Step count activity metrics CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log output format (pretty, json, compact)
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

/// Body parameters shared by the summary commands
#[derive(clap::Args)]
struct BodyArgs {
    /// Weight in kilograms (defaults to the config value)
    #[arg(short, long)]
    weight: Option<f64>,

    /// Height in centimeters (defaults to the config value)
    #[arg(long)]
    height: Option<f64>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise daily step records (STEPS,DURATION)
    Day {
        /// Records such as 6000,2h30m
        #[arg(required = true)]
        records: Vec<String>,

        #[command(flatten)]
        body: BodyArgs,
    },

    /// Summarise training records (STEPS,ACTIVITY,DURATION)
    Training {
        /// Records such as 3000,running,25m
        #[arg(required = true)]
        records: Vec<String>,

        #[command(flatten)]
        body: BodyArgs,
    },

    /// Show or initialise the configuration file
    Config {
        /// Print the active configuration
        #[arg(short, long)]
        show: bool,

        /// Write a default configuration file
        #[arg(short, long)]
        init: bool,

        /// Print the configuration file path
        #[arg(short, long)]
        path: bool,

        /// Overwrite an existing file when used with --init
        #[arg(long, requires = "init")]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_config_path);
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_or_default(),
    };

    let mut log_config = config.logging.clone().with_verbosity(cli.verbose);
    if let Some(format) = cli.log_format {
        log_config.format = format;
    }
    init_logging(&log_config)?;

    let calculator = ActivityCalculator::new(config.constants).with_day_stride(config.day.stride);

    match cli.command {
        Commands::Day { records, body } => {
            let params = body_parameters(&config, &body);
            for raw in &records {
                match body.format {
                    OutputFormat::Text => {
                        let summary =
                            calculator.day_action_summary(raw, params.weight_kg, params.height_cm);
                        if !summary.is_empty() {
                            println!("{}", summary);
                        }
                    }
                    OutputFormat::Json => {
                        // Same soft-failure contract as the text summary
                        let metrics = RecordParser::parse_day_steps(raw)
                            .map_err(TrackerError::from)
                            .and_then(|record| calculator.day_metrics(&record, &params));
                        match metrics {
                            Ok(metrics) => println!("{}", serde_json::to_string(&metrics)?),
                            Err(e) => e.report(raw),
                        }
                    }
                }
            }
        }

        Commands::Training { records, body } => {
            let params = body_parameters(&config, &body);
            for raw in &records {
                match summarise_training(&calculator, raw, &params, body.format) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        let tracker_error = e.downcast_ref::<TrackerError>();
                        let message = tracker_error
                            .map(TrackerError::user_message)
                            .unwrap_or_else(|| e.to_string());
                        match tracker_error.map(TrackerError::severity) {
                            Some(ErrorSeverity::Warning) => {
                                eprintln!("{} {}", "!".yellow().bold(), message.yellow())
                            }
                            _ => eprintln!("{} {}", "✗".red().bold(), message.red()),
                        }
                        std::process::exit(1);
                    }
                }
            }
        }

        Commands::Config {
            show,
            init,
            path,
            force,
        } => {
            if path {
                println!("{}", config_path.display());
            }
            if init {
                if config_path.exists() && !force {
                    anyhow::bail!(
                        "{} already exists; pass --force to overwrite it",
                        config_path.display()
                    );
                }
                let mut fresh = AppConfig::default();
                fresh.save_to_file(&config_path)?;
                println!(
                    "{} {}",
                    "✓ Configuration written to".green(),
                    config_path.display()
                );
            }
            if show || !(init || path) {
                println!("{}", "Active configuration:".white().bold());
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

fn summarise_training(
    calculator: &ActivityCalculator,
    raw: &str,
    params: &BodyParameters,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let summary = calculator.training_summary(raw, params.weight_kg, params.height_cm)?;
            Ok(format!("{}\n", summary))
        }
        OutputFormat::Json => {
            let record = RecordParser::parse_training(raw).map_err(TrackerError::from)?;
            let metrics = calculator.training_metrics(&record, params)?;
            Ok(serde_json::to_string(&metrics)?)
        }
    }
}

fn body_parameters(config: &AppConfig, args: &BodyArgs) -> BodyParameters {
    let defaults = BodyParameters::from(config.body);
    BodyParameters::new(
        args.weight.unwrap_or(defaults.weight_kg),
        args.height.unwrap_or(defaults.height_cm),
    )
}
