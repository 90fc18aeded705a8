//! Completion gateway implementations.

pub mod function_gateway;
pub mod gemini_gateway;
mod http;

use std::sync::Arc;

use chatdeck_core::config::{GatewayConfig, GatewayProvider};
use chatdeck_core::error::{ChatError, Result};
use chatdeck_core::gateway::CompletionGateway;

pub use function_gateway::FunctionGateway;
pub use gemini_gateway::{DEFAULT_GEMINI_MODEL, GeminiGateway};

/// Builds the gateway selected by `config`.
///
/// # Errors
///
/// Returns [`ChatError::Config`] when the selected provider is missing the
/// endpoint or API key it needs.
pub fn build_gateway(config: &GatewayConfig) -> Result<Arc<dyn CompletionGateway>> {
    match config.provider {
        GatewayProvider::Function => {
            let endpoint = config.endpoint.as_deref().ok_or_else(|| {
                ChatError::config("gateway.endpoint is required for the function provider")
            })?;
            let mut gateway = FunctionGateway::new(endpoint);
            if let Some(key) = &config.api_key {
                gateway = gateway.with_api_key(key.clone());
            }
            tracing::info!("Using chat function gateway at {}", endpoint);
            Ok(Arc::new(gateway))
        }
        GatewayProvider::Gemini => {
            let api_key = config.api_key.as_deref().ok_or_else(|| {
                ChatError::config("gateway.api_key is required for the gemini provider")
            })?;
            let model = config.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL);
            let mut gateway = GeminiGateway::new(api_key, model);
            if let Some(endpoint) = &config.endpoint {
                gateway = gateway.with_base_url(endpoint.clone());
            }
            tracing::info!("Using Gemini gateway with model {}", model);
            Ok(Arc::new(gateway))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_provider_requires_endpoint() {
        let config = GatewayConfig::default();
        assert!(matches!(build_gateway(&config), Err(ChatError::Config(_))));
    }

    #[test]
    fn test_function_provider_builds() {
        let config = GatewayConfig {
            endpoint: Some("https://example.test/chat".to_string()),
            ..GatewayConfig::default()
        };
        assert!(build_gateway(&config).is_ok());
    }

    #[test]
    fn test_gemini_provider_requires_key() {
        let config = GatewayConfig {
            provider: GatewayProvider::Gemini,
            ..GatewayConfig::default()
        };
        assert!(matches!(build_gateway(&config), Err(ChatError::Config(_))));
    }

    #[test]
    fn test_gemini_provider_builds() {
        let config = GatewayConfig {
            provider: GatewayProvider::Gemini,
            api_key: Some("key".to_string()),
            ..GatewayConfig::default()
        };
        assert!(build_gateway(&config).is_ok());
    }
}
