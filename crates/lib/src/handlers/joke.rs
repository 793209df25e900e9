//! `joke` tag: relay one joke from the configured joke source.

use crate::handlers::HandlerContext;
use crate::webhook::{Parameters, WebhookRequest, WebhookResponse};

/// Fetch a joke; on upstream failure (or an empty body) reply with the configured fallback.
pub async fn joke(ctx: &HandlerContext, _request: &WebhookRequest) -> WebhookResponse {
    let text = match ctx.jokes.fetch().await {
        Ok(body) if !body.trim().is_empty() => body,
        Ok(_) => {
            log::warn!("joke: upstream returned an empty body, using fallback");
            ctx.joke_fallback.clone()
        }
        Err(e) => {
            log::warn!("joke: {}, using fallback", e);
            ctx.joke_fallback.clone()
        }
    };
    WebhookResponse::text(text, Parameters::new())
}
