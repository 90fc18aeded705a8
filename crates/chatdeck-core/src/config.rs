use serde::{Deserialize, Serialize};

/// Default request timeout for the completion gateway, in seconds.
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 60;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Which remote service answers user turns.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GatewayProvider {
    /// A hosted function taking `{ "message" }` and returning `{ "response" }`.
    #[default]
    Function,
    /// The Gemini `generateContent` REST API, called directly.
    Gemini,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    #[serde(default)]
    pub provider: GatewayProvider,
    /// URL the `{ "message": ... }` request is POSTed to.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Sent as a bearer token and `apikey` header when present.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model name for the Gemini provider.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            provider: GatewayProvider::Function,
            endpoint: None,
            api_key: None,
            model: None,
            timeout_secs: DEFAULT_GATEWAY_TIMEOUT_SECS,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_GATEWAY_TIMEOUT_SECS
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageConfig {
    /// Overrides the platform default history file location.
    #[serde(default)]
    pub history_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.gateway.timeout_secs, DEFAULT_GATEWAY_TIMEOUT_SECS);
    }

    #[test]
    fn test_partial_gateway_section() {
        let config: AppConfig = toml::from_str(
            r#"
            [gateway]
            endpoint = "https://example.test/functions/v1/chat"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.gateway.endpoint.as_deref(),
            Some("https://example.test/functions/v1/chat")
        );
        assert_eq!(config.gateway.timeout_secs, DEFAULT_GATEWAY_TIMEOUT_SECS);
        assert_eq!(config.gateway.provider, GatewayProvider::Function);
        assert!(config.storage.history_file.is_none());
    }

    #[test]
    fn test_gemini_provider() {
        let config: AppConfig = toml::from_str(
            r#"
            [gateway]
            provider = "gemini"
            api_key = "key"
            model = "gemini-2.5-pro"
            "#,
        )
        .unwrap();

        assert_eq!(config.gateway.provider, GatewayProvider::Gemini);
        assert_eq!(config.gateway.model.as_deref(), Some("gemini-2.5-pro"));
    }
}
