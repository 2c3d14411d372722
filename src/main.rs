use anyhow::Result;
use weather_text::{PipelineOrchestrator, STATUS_SUCCESS, WeatherTextConfig, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let config = WeatherTextConfig::load()?;
    logging::init(&config.logging)?;

    tracing::info!(
        "Starting weather text v{} for {:.4}, {:.4}",
        weather_text::VERSION,
        config.weather.latitude,
        config.weather.longitude
    );

    let pipeline = PipelineOrchestrator::from_config(&config)?;
    let status = pipeline.run_to_status().await;
    println!("{status}");

    if status != STATUS_SUCCESS {
        std::process::exit(1);
    }
    Ok(())
}
