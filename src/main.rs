mod catalog;
mod config;
mod job;
mod predict;
mod report;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::catalog::CelestrakClient;
use crate::config::{JobConfig, TargetSource};

#[derive(Parser)]
#[command(name = "pass-o-mat")]
#[command(about = "Satellite pass and ephemeris prediction")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a job file
    Validate { job: String },
    /// Predict passes and write the pass and ephemeris reports
    Predict {
        job: String,
        /// Never contact the element-set catalog
        #[arg(long)]
        offline: bool,
        /// Override the pass report path
        #[arg(long)]
        passes: Option<PathBuf>,
        /// Override the ephemeris report path
        #[arg(long)]
        ephemeris: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { job } => validate(&job),
        Commands::Predict {
            job,
            offline,
            passes,
            ephemeris,
        } => predict(&job, offline, passes, ephemeris).await,
    }
}

fn validate(path: &str) -> ExitCode {
    let job = match JobConfig::from_file(path) {
        Ok(job) => job,
        Err(e) => {
            eprintln!("Invalid job: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let target = match job.target.source() {
        Ok(TargetSource::Inline(_)) => "inline TLE".to_string(),
        Ok(TargetSource::File(path)) => format!("TLE file {}", path.display()),
        Ok(TargetSource::Catalog(id)) => format!("NORAD {} from catalog", id),
        Err(e) => {
            eprintln!("Invalid job: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Job is valid");
    println!(
        "  station: {} ({}, {} m)",
        job.station.name.as_deref().unwrap_or("unnamed"),
        job.station.coordinates,
        job.station.altitude_m
    );
    println!("  target: {}", target);
    println!(
        "  window: {} -> {} every {}",
        job.window.start, job.window.end, job.window.step
    );
    println!(
        "  min elevation: {} deg, light time: {}, gaps: {}",
        job.min_elevation_deg, job.light_time, job.gap_policy
    );
    ExitCode::SUCCESS
}

async fn predict(
    path: &str,
    offline: bool,
    passes_path: Option<PathBuf>,
    ephemeris_path: Option<PathBuf>,
) -> ExitCode {
    let job = match JobConfig::from_file(path) {
        Ok(job) => job,
        Err(e) => {
            eprintln!("Invalid job: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let catalog = if offline {
        None
    } else {
        let client = job
            .catalog
            .timeout()
            .map_err(|e| e.to_string())
            .and_then(|timeout| {
                CelestrakClient::new(&job.catalog.base_url, timeout).map_err(|e| e.to_string())
            });
        match client {
            Ok(client) => Some(client),
            Err(e) => {
                eprintln!("Catalog client error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    };

    let (passes, ephemeris) = match crate::job::run_job(&job, catalog.as_ref(), chrono::Utc::now()).await
    {
        Ok(reports) => reports,
        Err(e) => {
            eprintln!("Prediction failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let passes_path = passes_path.unwrap_or_else(|| job.output.passes.clone());
    let ephemeris_path = ephemeris_path.unwrap_or_else(|| job.output.ephemeris.clone());
    if let Err(e) = crate::job::write_reports(&passes, &ephemeris, &passes_path, &ephemeris_path) {
        eprintln!("Failed to write reports: {}", e);
        return ExitCode::FAILURE;
    }

    println!(
        "{} (NORAD {}): {} passes, {:.1} s visible",
        passes.metadata.satellite.name,
        passes.metadata.satellite.norad_id,
        passes.statistics.total_passes,
        passes.statistics.visible_time_total
    );
    for pass in &passes.passes {
        println!(
            "  {}: {} -> {} max {:.2} deg ({:.0} s)",
            pass.pass_id, pass.start, pass.end, pass.max_elevation, pass.duration_sec
        );
    }
    ExitCode::SUCCESS
}
