//! Tag dispatch: decode → pick handler by `fulfillmentInfo.tag` → encode.

use crate::error::WebhookError;
use crate::handlers::{self, HandlerContext};
use crate::webhook::protocol::{WebhookRequest, WebhookResponse};
use std::fmt;
use std::str::FromStr;

/// Recognized fulfillment tags (wire names are case-sensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    GenerateAccountNumber,
    ValidateAccountNumber,
    Greeting,
    Joke,
}

impl Tag {
    pub const ALL: [Tag; 4] = [
        Tag::GenerateAccountNumber,
        Tag::ValidateAccountNumber,
        Tag::Greeting,
        Tag::Joke,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::GenerateAccountNumber => "generateAccountNumber",
            Tag::ValidateAccountNumber => "validateAccountNumber",
            Tag::Greeting => "greeting",
            Tag::Joke => "joke",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = WebhookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| WebhookError::UnknownTag(s.to_string()))
    }
}

/// Run the handler for the request's tag. Unknown tags fail with `WebhookError::UnknownTag`.
pub async fn dispatch(
    ctx: &HandlerContext,
    request: &WebhookRequest,
) -> Result<WebhookResponse, WebhookError> {
    let tag: Tag = request.tag().parse()?;
    log::info!("webhook: dispatching tag {}", tag);
    let response = match tag {
        Tag::GenerateAccountNumber => handlers::generate_account_number(ctx, request),
        Tag::ValidateAccountNumber => handlers::validate_account_number(request),
        Tag::Greeting => handlers::greeting(ctx, request),
        Tag::Joke => handlers::joke(ctx, request).await,
    };
    Ok(response)
}

/// Handle one raw webhook body end to end, returning the encoded response.
pub async fn handle_body(ctx: &HandlerContext, body: &[u8]) -> Result<Vec<u8>, WebhookError> {
    let request = WebhookRequest::decode(body)?;
    log::debug!("request: {:?}", request);
    let response = dispatch(ctx, &request).await?;
    log::debug!("response: {:?}", response);
    response.encode()
}
