//! Account-number tags: `generateAccountNumber` and `validateAccountNumber`.

use crate::handlers::HandlerContext;
use crate::webhook::{Parameters, WebhookRequest, WebhookResponse};

/// Known account numbers, canonical decimal form.
pub const ACCOUNT_REGISTRY: [u32; 10] = [1923, 333, 1812, 9678, 1732, 1624, 126, 1659, 8464, 9810];

/// Registry prefix `generateAccountNumber` draws from; the final entry is never issued.
pub const ISSUABLE_ACCOUNTS: usize = ACCOUNT_REGISTRY.len() - 1;

/// Session parameter carrying an account number (read by validate, written by generate).
pub const ACCOUNT_NUMBER_PARAM: &str = "account-number";

/// Session parameter carrying the validation result ("true" / "false").
pub const VALID_ACCOUNT_NUMBER_PARAM: &str = "valid-account-number";

/// True when `candidate` is exactly the decimal rendering of a registry entry.
pub fn is_registered(candidate: &str) -> bool {
    ACCOUNT_REGISTRY.iter().any(|id| id.to_string() == candidate)
}

/// `generateAccountNumber`: issue a random registry entry as `account-number`.
pub fn generate_account_number(ctx: &HandlerContext, _request: &WebhookRequest) -> WebhookResponse {
    let account = ACCOUNT_REGISTRY[ctx.pick(ISSUABLE_ACCOUNTS)];
    let mut params = Parameters::new();
    params.insert(ACCOUNT_NUMBER_PARAM.to_string(), account.to_string());
    WebhookResponse::parameters_only(params)
}

/// `validateAccountNumber`: report whether the session's `account-number` is registered.
pub fn validate_account_number(request: &WebhookRequest) -> WebhookResponse {
    let valid = request
        .parameter(ACCOUNT_NUMBER_PARAM)
        .map(is_registered)
        .unwrap_or(false);
    let mut params = Parameters::new();
    params.insert(VALID_ACCOUNT_NUMBER_PARAM.to_string(), valid.to_string());
    WebhookResponse::parameters_only(params)
}
