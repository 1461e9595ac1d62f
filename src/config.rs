use tracing::warn;

pub const API_URL_VAR: &str = "REDAT_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base url of the fare backend.
    pub api_url: String,
}

impl Config {
    /// Reads the backend base url from `REDAT_API_URL`, falling back to
    /// the local default when unset or empty.
    pub fn from_env() -> Self {
        match std::env::var(API_URL_VAR) {
            Ok(value) if !value.is_empty() => Self { api_url: value },
            _ => {
                warn!("{API_URL_VAR} is not set. Using default localhost URL.");
                Default::default()
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}
