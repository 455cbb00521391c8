use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

const DEFAULT_DATABASE: &str = "news_app";
const DEFAULT_SERVER_SELECTION_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone)]
pub struct StoriesConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
}

#[derive(Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub server_selection_timeout: Duration,
    /// Abort startup when the first connection attempt fails instead of
    /// serving with a closed readiness gate.
    pub fail_fast: bool,
}

// The URI usually embeds credentials.
impl std::fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoConfig")
            .field("uri", &"[REDACTED]")
            .field("database", &self.database)
            .field("server_selection_timeout", &self.server_selection_timeout)
            .field("fail_fast", &self.fail_fast)
            .finish()
    }
}

impl StoriesConfig {
    pub fn load() -> Result<Self, AppError> {
        // Loads .env and the APP__ prefixed server settings
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = lookup("MONGO_URI")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!("MONGO_URI is required but not set"))
            })?;

        let database = lookup("MONGO_DB_NAME").unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let timeout_ms = match lookup("MONGO_SERVER_SELECTION_TIMEOUT_MS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "Invalid MONGO_SERVER_SELECTION_TIMEOUT_MS '{}': {}",
                    raw,
                    e
                ))
            })?,
            None => DEFAULT_SERVER_SELECTION_TIMEOUT_MS,
        };

        let fail_fast = match lookup("MONGO_FAIL_FAST") {
            Some(raw) => parse_bool("MONGO_FAIL_FAST", &raw)?,
            None => false,
        };

        Ok(StoriesConfig {
            common,
            mongodb: MongoConfig {
                uri,
                database,
                server_selection_timeout: Duration::from_millis(timeout_ms),
                fail_fast,
            },
        })
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::ConfigError(anyhow::anyhow!(
            "Invalid boolean for {}: {}",
            key,
            raw
        ))),
    }
}
