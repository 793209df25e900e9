//! Joke source abstraction and the JokeAPI client.
//!
//! The `joke` tag handler only sees `JokeSource`, so tests can swap the HTTP client for a canned one.

mod jokeapi;

pub use jokeapi::{JokeApiClient, JokeError};

use async_trait::async_trait;

/// Something that can produce one joke as plain text.
#[async_trait]
pub trait JokeSource: Send + Sync {
    async fn fetch(&self) -> Result<String, JokeError>;
}
