//! FunctionGateway - calls a hosted chat function over HTTP.
//!
//! The function receives `{ "message": "..." }` and answers
//! `{ "response": "..." }`. Anything else is a gateway failure.

use async_trait::async_trait;
use chatdeck_core::error::{ChatError, Result};
use chatdeck_core::gateway::CompletionGateway;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::http::{map_http_error, map_transport_error};

const SERVICE_NAME: &str = "Chat function";

/// Gateway implementation that posts each user turn to a hosted function.
#[derive(Clone)]
pub struct FunctionGateway {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl FunctionGateway {
    /// Creates a gateway for the given function URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: None,
        }
    }

    /// Sends `key` as both a bearer token and an `apikey` header, which is
    /// what hosted function platforms expect from anonymous clients.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

#[async_trait]
impl CompletionGateway for FunctionGateway {
    async fn complete(&self, message: &str) -> Result<String> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&FunctionRequest { message });

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key).header("apikey", key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| map_transport_error(SERVICE_NAME, err))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(SERVICE_NAME, status, body_text));
        }

        let body = response
            .text()
            .await
            .map_err(|err| map_transport_error(SERVICE_NAME, err))?;

        extract_response(&body)
    }
}

#[derive(Serialize)]
struct FunctionRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct FunctionResponse {
    response: Option<String>,
}

fn extract_response(body: &str) -> Result<String> {
    let parsed: FunctionResponse = serde_json::from_str(body).map_err(|err| {
        ChatError::gateway(format!("Failed to parse {SERVICE_NAME} response: {err}"))
    })?;

    parsed
        .response
        .ok_or_else(|| ChatError::gateway(format!("{SERVICE_NAME} returned no `response` field")))
}
