use clap::Parser;
use std::error::Error;

use khushoo_reminder::{command_handler, load_env_file, Cli, LayeredSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // A missing .env is fine; the process environment may already be set.
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let source = match &cli.env_file {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            LayeredSource {
                overrides: load_env_file(path)?,
            }
        }
        None => LayeredSource::default(),
    };

    if let Err(e) = command_handler(cli.command, &source).await {
        if e.is_fatal() {
            log::error!("Configuration error, not starting: {}", e);
        }
        return Err(e.into());
    }

    Ok(())
}
