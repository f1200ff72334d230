use anyhow::{Error, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use case_notify_service::{config::Config, processor::EventProcessor};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::load()?;

    let processor = EventProcessor::from_config(&config)?;
    processor.verify_template_configuration().await?;

    info!("Configuration validated. Worker is ready to start.");

    Ok(())
}
