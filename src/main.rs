use anyhow::Result;
use clap::{Parser, Subcommand};

use roadrisk::config::AppConfig;
use roadrisk::logger;
use roadrisk::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "roadrisk", about = "Accident probability prediction over the city grid")]
struct Cli {
    /// TOML config file.
    #[arg(long, default_value = "config/default.toml")]
    config: std::path::PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score the sampled grid for a date and print predictions as JSON.
    Predict {
        /// Target date, `YYYY-MM-DD` or an ISO-8601 date-time.
        #[arg(long)]
        date: String,
    },
    /// Fetch current canonical weather for every region and print as JSON.
    Weather {
        /// Request timestamp, ISO-8601.
        #[arg(long)]
        at: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_from(&cli.config)?;
    logger::init_logging(&config.monitoring)?;

    let pipeline = Pipeline::new(config)?;
    tracing::info!(grid_points = pipeline.grid_size(), "Pipeline ready");

    match cli.command {
        Command::Predict { date } => {
            let response = pipeline.predict(&date).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Weather { at } => {
            let weather = pipeline.current_weather(&at).await?;
            println!("{}", serde_json::to_string_pretty(&weather)?);
        }
    }

    Ok(())
}
