//! Webhook: HTTP endpoint for conversational-agent fulfillment calls.
//!
//! One POST route. The body is a fulfillment request envelope; the tag selects a
//! handler and its response envelope is returned as JSON.

mod dispatch;
mod protocol;
mod server;

pub use dispatch::{dispatch, handle_body, Tag};
pub use protocol::{
    FulfillmentInfo, FulfillmentResponse, Parameters, ResponseMessage, SessionInfo, Text,
    WebhookRequest, WebhookResponse,
};
pub use server::{router, run_server, serve, WebhookState};
