//! `greeting` tag: time-of-day salutation plus a canned follow-up.

use crate::handlers::HandlerContext;
use crate::webhook::{Parameters, WebhookRequest, WebhookResponse};

const FOLLOW_UPS: [&str; 4] = [
    "How are you doing?",
    "How can I help you? ",
    "What can I do for you today?",
    "How can I assist? ",
];

/// Follow-ups the picker draws from; the fourth phrase is never chosen.
const REACHABLE_FOLLOW_UPS: usize = 3;

/// Session parameter carrying the hour the greeting was computed for.
pub const HOURS_PARAM: &str = "hours";

/// Salutation for an hour of day: 0..=12 morning, 13..=20 afternoon, later night.
pub fn salutation(hour: u32) -> &'static str {
    let mut s = "Good Morning";
    if hour > 12 {
        s = "Good Afternoon";
    }
    if hour > 20 {
        s = "Good Night";
    }
    s
}

pub fn greeting(ctx: &HandlerContext, _request: &WebhookRequest) -> WebhookResponse {
    let hour = ctx.clock.hour();
    let follow_up = FOLLOW_UPS[ctx.pick(REACHABLE_FOLLOW_UPS)];
    let text = format!("{}! {}", salutation(hour), follow_up);
    let mut params = Parameters::new();
    params.insert(HOURS_PARAM.to_string(), hour.to_string());
    WebhookResponse::text(text, params)
}
