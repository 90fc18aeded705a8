//! GeminiGateway - Direct REST API implementation for Gemini.
//!
//! Sends each user turn as a single-content `generateContent` request.

use async_trait::async_trait;
use chatdeck_core::error::{ChatError, Result};
use chatdeck_core::gateway::CompletionGateway;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::http::{map_http_error, map_transport_error};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const SERVICE_NAME: &str = "Gemini API";

/// Gateway implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiGateway {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGateway {
    /// Creates a new gateway with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Points the gateway at a different API root (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_request(&self, message: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: message.to_string(),
                }],
            }],
        }
    }
}

#[async_trait]
impl CompletionGateway for GeminiGateway {
    async fn complete(&self, message: &str) -> Result<String> {
        if message.trim().is_empty() {
            return Err(ChatError::gateway("Gemini payload must include text"));
        }

        let url = format!(
            "{}/{model}:generateContent",
            self.base_url,
            model = self.model
        );

        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&self.build_request(message))
            .send()
            .await
            .map_err(|err| map_transport_error(SERVICE_NAME, err))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(SERVICE_NAME, status, body_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            ChatError::gateway(format!("Failed to parse Gemini response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| {
            ChatError::gateway("Gemini API returned no text in the response candidates")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let gateway = GeminiGateway::new("key", DEFAULT_GEMINI_MODEL);
        let body = serde_json::to_value(gateway.build_request("hello")).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body.as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_extract_first_candidate_text() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"first"}]}},{"content":{"parts":[{"text":"second"}]}}]}"#,
        )
        .unwrap();

        assert_eq!(extract_text_response(response).unwrap(), "first");
    }

    #[test]
    fn test_extract_skips_non_text_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"inlineData":{}},{"text":"answer"}]}}]}"#,
        )
        .unwrap();

        assert_eq!(extract_text_response(response).unwrap(), "answer");
    }

    #[test]
    fn test_extract_no_candidates() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(matches!(
            extract_text_response(response),
            Err(ChatError::Gateway(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_message_rejected_locally() {
        let gateway = GeminiGateway::new("key", DEFAULT_GEMINI_MODEL);
        assert!(gateway.complete("   ").await.is_err());
    }
}
