use super::models::Config;
use config::{ConfigError, Environment, File, Map};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "FRUITBOX_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/fruitbox.toml";
const ENV_PREFIX: &str = "FRUITBOX";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    let dotenv = collect_dotenv(dotenvy::dotenv_iter());

    let config_path = env::var(CONFIG_ENV_VAR)
        .ok()
        .or_else(|| dotenv.get(CONFIG_ENV_VAR).cloned())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    load_from_sources(config_path, dotenv)
}

/// Same layering as [`load`], with an explicit TOML file
pub fn load_from_path(config_path: PathBuf) -> Result<Config, ConfigError> {
    load_from_sources(config_path, collect_dotenv(dotenvy::dotenv_iter()))
}

fn collect_dotenv<I>(iter: dotenvy::Result<I>) -> Map<String, String>
where
    I: Iterator<Item = dotenvy::Result<(String, String)>>,
{
    let Ok(iter) = iter else {
        return Map::new();
    };

    iter.filter_map(|item| match item {
        Ok(pair) => Some(pair),
        Err(err) => {
            tracing::warn!("Skipping malformed .env entry: {}", err);
            None
        }
    })
    .collect()
}

/// Build the configuration from a TOML path and .env variables
///
/// Process environment variables override `.env` entries.
pub fn load_from_sources(
    config_path: PathBuf,
    dotenv: Map<String, String>,
) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    let mut variables = dotenv;
    variables.extend(env::vars());

    // FRUITBOX__SERVER__BIND_ADDR -> server.bind_addr
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .source(Some(variables)),
    );

    let config = builder.build()?;
    config.try_deserialize()
}
