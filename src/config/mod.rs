mod types;

pub use types::*;

use crate::Result;
use std::env;
use tracing::{debug, warn};

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    let mut config = load_from(&config_path).await?;
    config.apply_overrides(|key| env::var(key).ok());

    Ok(config)
}

pub async fn load_from(config_path: &str) -> Result<Config> {
    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(config_path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

impl Config {
    /// Applies `PORT` and `LLM_API_KEY` on top of the file values.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid PORT value: {}", port),
            }
        }

        if let Some(api_key) = lookup("LLM_API_KEY") {
            self.llm.api_key = api_key;
        }
    }
}
