use clap::Parser;
use log::debug;

use multiup::cli::Cli;
use multiup::config::ConfigManager;
use multiup::error::Error;

async fn run(cli: Cli) -> Result<(), Error> {
    let config = ConfigManager::load(cli.config)?;
    debug!("Using config path {}", config.config_path().display());

    cli.command.execute(&config).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
