//! Webhook envelope types (fulfillment request in, fulfillment response out).
//!
//! Only the members the handlers use are modeled; anything else in the
//! platform's envelope is ignored on decode.

use crate::error::WebhookError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Session parameters (name → value). Both directions carry string values only.
pub type Parameters = BTreeMap<String, String>;

/// Wire request: `{ "fulfillmentInfo": { "tag" }, "sessionInfo": { "session", "parameters" } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub fulfillment_info: FulfillmentInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub session_info: SessionInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tag: String,
}

/// Session id and parameters; shared by request and response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Full session resource name. Omitted from responses when empty.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub session: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: Parameters,
}

/// Explicit `null` decodes like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl WebhookRequest {
    pub fn new(tag: impl Into<String>, session: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            fulfillment_info: FulfillmentInfo { tag: tag.into() },
            session_info: SessionInfo {
                session: session.into(),
                parameters,
            },
        }
    }

    /// Decode a raw request body.
    pub fn decode(body: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(body).map_err(WebhookError::Decode)
    }

    pub fn tag(&self) -> &str {
        &self.fulfillment_info.tag
    }

    pub fn session_id(&self) -> &str {
        &self.session_info.session
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.session_info.parameters.get(name).map(String::as_str)
    }
}

/// Wire response: `{ "fulfillmentResponse": { "messages": [{ "text": { "text": [..] } }] }, "sessionInfo": { "parameters" } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    #[serde(default)]
    pub fulfillment_response: FulfillmentResponse,
    #[serde(default)]
    pub session_info: SessionInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentResponse {
    #[serde(default)]
    pub messages: Vec<ResponseMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub text: Text,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    #[serde(default)]
    pub text: Vec<String>,
}

impl WebhookResponse {
    /// Response with no messages, only updated session parameters.
    pub fn parameters_only(parameters: Parameters) -> Self {
        Self {
            fulfillment_response: FulfillmentResponse::default(),
            session_info: SessionInfo {
                session: String::new(),
                parameters,
            },
        }
    }

    /// Response with a single text message and the given session parameters.
    pub fn text(text: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            fulfillment_response: FulfillmentResponse {
                messages: vec![ResponseMessage {
                    text: Text {
                        text: vec![text.into()],
                    },
                }],
            },
            session_info: SessionInfo {
                session: String::new(),
                parameters,
            },
        }
    }

    /// Flattened message texts, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.fulfillment_response
            .messages
            .iter()
            .flat_map(|m| m.text.text.iter().map(String::as_str))
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.session_info.parameters.get(name).map(String::as_str)
    }

    pub fn encode(&self) -> Result<Vec<u8>, WebhookError> {
        serde_json::to_vec(self).map_err(WebhookError::Encode)
    }

    pub fn decode(body: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(body).map_err(WebhookError::Decode)
    }
}
