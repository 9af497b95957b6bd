//! Standard 'main' for a Telamon service
//! Bootstraps subscription workers from configuration

use anyhow::Result;
use config::{Config, Environment, File};
use std::sync::Arc;
use telamon_process::Process;
use tracing::info;

/// Standard main
#[tokio::main]
pub async fn main() -> Result<()> {
    // Initialise tracing
    tracing_subscriber::fmt::init();

    info!("Telamon subscription service");

    // Read the config
    let config = Arc::new(
        Config::builder()
            .add_source(File::with_name("main/telamon"))
            .add_source(Environment::with_prefix("TELAMON"))
            .build()?,
    );

    // Create the process
    let process = Process::create(config).await;

    // Run it
    process.run().await?;

    // Bye!
    info!("Exiting");
    Ok(())
}
