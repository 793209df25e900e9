//! JokeAPI client (https://v2.jokeapi.dev by default).
//! Single-part jokes in plain-text format, filtered by blacklist flags.

use crate::config::JokeConfig;
use crate::jokes::JokeSource;
use async_trait::async_trait;
use std::time::Duration;

/// Client for the JokeAPI HTTP endpoint.
#[derive(Clone)]
pub struct JokeApiClient {
    url: String,
    blacklist_flags: Vec<String>,
    client: reqwest::Client,
}

#[derive(Debug, thiserror::Error)]
pub enum JokeError {
    #[error("joke request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("joke api error: {0} {1}")]
    Status(reqwest::StatusCode, String),
}

impl JokeApiClient {
    /// Build a client for `url`; `timeout` bounds the whole request including the body read.
    pub fn new(
        url: impl Into<String>,
        blacklist_flags: Vec<String>,
        timeout: Duration,
    ) -> Result<Self, JokeError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            blacklist_flags,
            client,
        })
    }

    /// Build from the `joke` config section; `url` is the already-resolved endpoint (env override applied).
    pub fn from_config(config: &JokeConfig, url: impl Into<String>) -> Result<Self, JokeError> {
        Self::new(url, config.blacklist_flags.clone(), config.timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(3);
        if !self.blacklist_flags.is_empty() {
            query.push(("blacklistFlags", self.blacklist_flags.join(",")));
        }
        query.push(("format", "txt".to_string()));
        query.push(("type", "single".to_string()));
        query
    }

    /// GET the endpoint and return the body text.
    pub async fn fetch_joke(&self) -> Result<String, JokeError> {
        let res = self.client.get(&self.url).query(&self.query()).send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(JokeError::Status(status, body));
        }
        Ok(res.text().await?)
    }
}

#[async_trait]
impl JokeSource for JokeApiClient {
    async fn fetch(&self) -> Result<String, JokeError> {
        self.fetch_joke().await
    }
}
