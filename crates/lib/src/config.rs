//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.cxhook/config.json`) and environment.
//! Every section is optional; a missing file means defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Outbound joke API settings (used by the `joke` tag).
    #[serde(default)]
    pub joke: JokeConfig,
}

/// Server bind address and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Port for the webhook (default 8080). Overridden by PORT env.
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_server_bind")]
    pub bind: String,
}

fn default_server_port() -> u16 {
    8080
}

fn default_server_bind() -> String {
    "127.0.0.1".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            bind: default_server_bind(),
        }
    }
}

/// Joke API endpoint, content filters, timeout and the reply used when the API fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JokeConfig {
    /// Endpoint queried with GET. Overridden by CXHOOK_JOKE_URL env.
    #[serde(default = "default_joke_url")]
    pub url: String,

    /// Categories excluded via the `blacklistFlags` query parameter.
    #[serde(default = "default_blacklist_flags")]
    pub blacklist_flags: Vec<String>,

    /// Whole-request timeout in milliseconds.
    #[serde(default = "default_joke_timeout_ms")]
    pub timeout_ms: u64,

    /// Message returned to the agent when the joke API is unreachable or errors.
    #[serde(default = "default_joke_fallback")]
    pub fallback: String,
}

fn default_joke_url() -> String {
    "https://v2.jokeapi.dev/joke/Any".to_string()
}

fn default_blacklist_flags() -> Vec<String> {
    ["nsfw", "religious", "political", "racist", "sexist", "explicit"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_joke_timeout_ms() -> u64 {
    5_000
}

fn default_joke_fallback() -> String {
    "Sorry, I couldn't think of a joke right now.".to_string()
}

impl Default for JokeConfig {
    fn default() -> Self {
        Self {
            url: default_joke_url(),
            blacklist_flags: default_blacklist_flags(),
            timeout_ms: default_joke_timeout_ms(),
            fallback: default_joke_fallback(),
        }
    }
}

impl JokeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    })
}

/// Resolve the listen port: env PORT overrides config (hosted function runtimes set it).
pub fn resolve_port(config: &Config) -> u16 {
    match non_empty_env("PORT") {
        Some(p) => match p.parse() {
            Ok(port) => port,
            Err(_) => {
                log::warn!("ignoring invalid PORT value {:?}", p);
                config.server.port
            }
        },
        None => config.server.port,
    }
}

/// Resolve the joke endpoint: env CXHOOK_JOKE_URL overrides config.
pub fn resolve_joke_url(config: &Config) -> String {
    non_empty_env("CXHOOK_JOKE_URL").unwrap_or_else(|| config.joke.url.trim().to_string())
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("CXHOOK_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".cxhook").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the given path, else the default path (or CXHOOK_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}
