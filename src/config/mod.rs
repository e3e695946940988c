mod types;

pub use types::*;

use crate::Result;
use std::env;
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(&config_path).await?;
    let config = parse(&config_str)?;

    Ok(apply_env_overrides(config, |key| env::var(key).ok()))
}

pub fn parse(config_str: &str) -> Result<Config> {
    Ok(serde_yaml::from_str(config_str)?)
}

/// Environment values win over the file. `lookup` is injected so tests don't
/// have to mutate the process environment.
pub fn apply_env_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(api_key) = lookup("LLM_API_KEY").filter(|v| !v.is_empty()) {
        config.llm.api_key = api_key;
    }
    if let Some(db_path) = lookup("HISTORY_DB_PATH").filter(|v| !v.is_empty()) {
        config.server.database_path = db_path;
    }
    config
}
