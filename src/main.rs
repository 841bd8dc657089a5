use clap::Parser;
use moodreel::core::config::{self, CliOverrides};
use moodreel::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "moodreel", about = "Emotion-aware movie recommendation chat")]
struct Args {
    /// Base URL of the recommendation service
    #[arg(long)]
    api_url: Option<String>,

    /// Minimum rating for recommended movies
    #[arg(long)]
    threshold: Option<f64>,

    /// Number of movies to request per turn
    #[arg(long)]
    top_k: Option<u32>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to moodreel.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("moodreel.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Falling back to default config: {}", e);
        config::MoodreelConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            base_url: args.api_url,
            rating_threshold: args.threshold,
            top_k: args.top_k,
        },
    );

    log::info!("Moodreel starting up against {}", resolved.base_url);

    tui::run(resolved)
}
