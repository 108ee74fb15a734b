// DAQ CLI - Command-line runner
// Copyright (c) 2025 Omar El-Gohary
//
// Licensed under AGPL-3.0.

//! # DAQ
//!
//! Runs the sensor simulation and prints every cycle to the console.
//! Alerts are appended to a log file.
//!
//! ## Usage
//!
//! ```bash
//! # Stock plant, five cycles
//! daq
//!
//! # Reproducible run with a longer window
//! daq --seed 42 --cycles 20 --capacity 8
//!
//! # Sensors and rules from a JSON file
//! daq --config plant.json --log-file alerts.txt
//! ```

mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use daq::{Acquisition, DaqConfig, FileAlertSink};
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

/// Industrial DAQ simulation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of sampling cycles
    #[arg(short = 'n', long)]
    cycles: Option<usize>,

    /// Readings averaged per sensor
    #[arg(short = 'w', long)]
    capacity: Option<usize>,

    /// Alert log file
    #[arg(short, long)]
    log_file: Option<PathBuf>,

    /// Random seed for reproducible runs
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    /// Load the configuration file (or defaults) and apply flag overrides.
    fn into_config(self) -> daq::Result<DaqConfig> {
        let mut config = match &self.config {
            Some(path) => DaqConfig::from_json_file(path)?,
            None => DaqConfig::default(),
        };

        if let Some(cycles) = self.cycles {
            config = config.with_cycles(cycles);
        }
        if let Some(capacity) = self.capacity {
            config = config.with_history_capacity(capacity);
        }
        if let Some(path) = self.log_file {
            config = config.with_log_path(path);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::from_default_env().add_directive(parse_level(&args.log_level).into())
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("DAQ v{}", daq::VERSION);

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let sink = FileAlertSink::new(&config.log_path);
    let mut acquisition = match Acquisition::from_config(&config, sink) {
        Ok(acquisition) => acquisition,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("{}", report::BANNER);
    let stats = acquisition.run(config.cycles, |cycle| {
        print!("{}", report::render_cycle(cycle));
    });

    info!(
        "{} samples, {} alerts, {} not persisted",
        stats.samples, stats.alerts, stats.sink_failures
    );
    ExitCode::SUCCESS
}
