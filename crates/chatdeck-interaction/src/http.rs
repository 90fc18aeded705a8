//! Response handling shared by the HTTP gateways.

use chatdeck_core::ChatError;
use reqwest::StatusCode;
use serde::Deserialize;

/// Error envelopes seen from hosted functions and Google APIs:
/// `{ "error": "text" }` or `{ "error": { "message": ..., "status": ... } }`.
#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Text(String),
    Detailed {
        message: Option<String>,
        status: Option<String>,
    },
}

/// Turns a non-success response into an opaque gateway failure, keeping the
/// service's own message when it sent one.
pub(crate) fn map_http_error(service: &str, status: StatusCode, body: String) -> ChatError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| match wrapper.error {
            ErrorBody::Text(text) => text,
            ErrorBody::Detailed { message, status } => {
                let status_text = status.unwrap_or_default();
                let msg = message.unwrap_or_else(|| body.clone());
                if status_text.is_empty() {
                    msg
                } else {
                    format!("{status_text}: {msg}")
                }
            }
        })
        .unwrap_or_else(|_| body.clone());

    let message = if message.trim().is_empty() {
        status.canonical_reason().unwrap_or("empty error body").to_string()
    } else {
        message
    };

    ChatError::gateway(format!("{service} returned {}: {message}", status.as_u16()))
}

pub(crate) fn map_transport_error(service: &str, err: reqwest::Error) -> ChatError {
    ChatError::gateway(format!("{service} request failed: {err}"))
}
