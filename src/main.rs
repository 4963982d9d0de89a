mod cli;

use std::path::PathBuf;

use clap::Parser;
use cli::{Cli, Commands};
use fruitbox::config::Config;
use fruitbox::observability;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    observability::init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => {
            let mut config = load_config(args.config)?;
            if let Some(address) = args.address {
                config.server.bind_addr = address;
            }
            fruitbox::api::run(config).await?
        }
        Commands::Config(args) => {
            let config = load_config(args.config)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<Config, fruitbox::config::ConfigError> {
    match path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}
