use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use stratus_core::{Config, WeatherPipeline, WeatherSnapshot};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "stratus", version, about = "Current weather lookup")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Adjust and persist lookup settings.
    Configure,

    /// Show the current-hour weather for a place.
    Show {
        /// Place name, e.g. "Tokyo" or "New York".
        place: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { place } => show(&place).await,
        }
    }
}

async fn show(place: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let pipeline = WeatherPipeline::from_config(&config)?;

    let now = Local::now().naive_local();
    let snapshot = pipeline
        .current_weather(place, now)
        .await
        .with_context(|| format!("Could not fetch weather for \"{place}\""))?;

    print_snapshot(&snapshot);

    Ok(())
}

fn print_snapshot(snapshot: &WeatherSnapshot) {
    println!("{}", snapshot.location_name);
    println!("  {} as of {}", snapshot.condition, snapshot.observed_time);
    println!("  Temperature: {:.1} °C", snapshot.temperature_c);
    println!("  Humidity:    {} %", snapshot.humidity_pct);
    println!("  Wind speed:  {:.1} km/h", snapshot.wind_speed_kmh);
    if !snapshot.exact_hour {
        println!("  (current hour not in forecast range, showing first available hour)");
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    config.timezone = Text::new("Forecast timezone (IANA name):")
        .with_initial_value(&config.timezone)
        .prompt()?;

    config.request_timeout_secs = CustomType::<u64>::new("Request timeout in seconds:")
        .with_default(config.request_timeout_secs)
        .prompt()?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}
