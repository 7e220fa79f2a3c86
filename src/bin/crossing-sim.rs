//! Run a fast-forwarded intersection simulation and print every light change.
//!
//! Run with: cargo run --bin crossing-sim -- --duration-secs 1800

use anyhow::{Context, Result};
use clap::Parser;
use crossing::simulation::{self, SimulationConfig, SimulationReport};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "crossing-sim", about = "Simulate a four-way traffic intersection")]
struct Args {
    /// Total simulated time, in seconds.
    #[arg(long)]
    duration_secs: Option<u64>,

    /// Full light cycle length, in seconds.
    #[arg(long)]
    turn_secs: Option<u64>,

    /// Yellow phase length, in seconds.
    #[arg(long)]
    yellow_secs: Option<u64>,

    /// JSON simulation config; flags given alongside it take precedence.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the report as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn simulation_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => SimulationConfig::default(),
        };

        if let Some(secs) = self.duration_secs {
            config.duration_ms = millis(secs, "--duration-secs")?;
        }
        if let Some(secs) = self.turn_secs {
            config.turn_ms = millis(secs, "--turn-secs")?;
        }
        if let Some(secs) = self.yellow_secs {
            config.yellow_ms = millis(secs, "--yellow-secs")?;
        }
        Ok(config)
    }
}

fn millis(secs: u64, flag: &str) -> Result<u64> {
    secs.checked_mul(1000)
        .with_context(|| format!("{flag} {secs} is too large"))
}

fn minutes(at: Duration) -> String {
    format!("{} min", at.as_secs_f64() / 60.0)
}

fn print_table(report: &SimulationReport) {
    println!(
        "{:>3}  {:<10}  {:<7} {:<7} {:<7} {:<7}",
        "#", "Time", "North", "East", "South", "West"
    );
    println!("{}", "-".repeat(48));
    for row in report.rows() {
        let colors: Vec<&str> = row.colors().map(|color| color.name()).collect();
        println!(
            "{:>3}  {:<10}  {:<7} {:<7} {:<7} {:<7}",
            row.index,
            minutes(row.at),
            colors[0],
            colors[1],
            colors[2],
            colors[3]
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.simulation_config()?;

    eprintln!("Starting simulation...");
    let report = simulation::run(&config).context("invalid simulation configuration")?;
    eprintln!("Simulation finished\n");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Simulation Results\n");
        print_table(&report);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args =
            Args::try_parse_from(["crossing-sim", "--turn-secs", "60", "--yellow-secs", "5"])
                .unwrap();
        let config = args.simulation_config().unwrap();
        assert_eq!(config.turn_ms, 60_000);
        assert_eq!(config.yellow_ms, 5_000);
        assert_eq!(config.duration_ms, SimulationConfig::default().duration_ms);
    }

    #[test]
    fn oversized_seconds_are_rejected() {
        let secs = u64::MAX.to_string();
        let args =
            Args::try_parse_from(["crossing-sim", "--duration-secs", secs.as_str()]).unwrap();
        let err = args.simulation_config().unwrap_err();
        assert!(err.to_string().contains("--duration-secs"));
    }
}
