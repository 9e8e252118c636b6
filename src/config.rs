//! Session configuration for the console.
//!
//! The session (API base URL + bearer token) is explicit and threaded into
//! the client, never read from ambient storage — the engine stays testable
//! without a simulated browser environment.

use std::fs;

use serde::{Deserialize, Serialize};
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8000";

/// On-disk shape of `~/.legalops/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// Everything a client needs to talk to the backend.
#[derive(Debug, Clone)]
pub struct Session {
    pub base_url: Url,
    /// Attached as `Authorization: Bearer <token>` when present. Public
    /// intake/lead-capture endpoints work without one.
    pub token: Option<String>,
}

impl Session {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Resolve the session: `LEGALOPS_API_URL`/`LEGALOPS_TOKEN` env vars win,
    /// then `~/.legalops/config.json`, then the localhost default.
    pub fn resolve() -> Result<Self, String> {
        if let Ok(raw) = std::env::var("LEGALOPS_API_URL") {
            let base_url =
                Url::parse(&raw).map_err(|e| format!("Invalid LEGALOPS_API_URL: {}", e))?;
            return Ok(Self {
                base_url,
                token: std::env::var("LEGALOPS_TOKEN").ok(),
            });
        }

        match load_config_file()? {
            Some(cfg) => {
                let base_url = Url::parse(&cfg.api_url)
                    .map_err(|e| format!("Invalid apiUrl in config: {}", e))?;
                Ok(Self {
                    base_url,
                    token: cfg.token,
                })
            }
            None => Ok(Self {
                base_url: Url::parse(DEFAULT_API_URL).expect("default URL is valid"),
                token: std::env::var("LEGALOPS_TOKEN").ok(),
            }),
        }
    }
}

fn load_config_file() -> Result<Option<ConfigFile>, String> {
    let home = dirs::home_dir().ok_or("Could not find home directory")?;
    let config_path = home.join(".legalops").join("config.json");

    if !config_path.exists() {
        return Ok(None);
    }

    let content =
        fs::read_to_string(&config_path).map_err(|e| format!("Failed to read config: {}", e))?;

    let config: ConfigFile =
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))?;

    Ok(Some(config))
}
