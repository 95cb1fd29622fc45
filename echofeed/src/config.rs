use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};
use url::Url;

/// Process configuration, loaded from the environment.
///
/// Service endpoints and keys live here so nothing in the library reads
/// the environment ambiently.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL.
    pub redis_url: String,
    /// Key prefix namespacing all documents and indexes.
    pub key_prefix: String,
    /// Hosted language model endpoint.
    pub model_endpoint: Url,
    /// Named model identifier sent with each completion request.
    pub model_name: String,
    /// Optional bearer token for the model endpoint.
    pub model_api_key: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        let endpoint: String = try_load("ECHOFEED_MODEL_ENDPOINT", "http://localhost:9090/v1/complete");
        Self {
            redis_url: try_load("ECHOFEED_REDIS_URL", "redis://127.0.0.1:6379"),
            key_prefix: try_load("ECHOFEED_KEY_PREFIX", "echo"),
            model_endpoint: Url::parse(&endpoint)
                .map_err(|e| warn!("Invalid ECHOFEED_MODEL_ENDPOINT value: {e}"))
                .expect("Environment misconfigured!"),
            model_name: try_load("ECHOFEED_MODEL_NAME", "gemini-1.5-flash-latest"),
            model_api_key: env::var("ECHOFEED_MODEL_API_KEY").ok(),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
