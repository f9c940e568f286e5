//! Provider selection: one strategy, chosen once at startup.

use crate::direct::DirectBindingClient;
use crate::gateway::OpenAICompatClient;
use crate::traits::CompletionClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which upstream serves completions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Local model-inference binding
    DirectBinding {
        binding_url: Option<String>,
        model: String,
    },
    /// OpenAI-compatible HTTP gateway
    OpenAICompat {
        gateway_url: Option<String>,
        api_token: Option<String>,
        model: String,
    },
}

pub struct ClientFactory;

impl ClientFactory {
    /// Build the completion client for a provider configuration.
    ///
    /// Missing gateway credentials are not an error here: the client raises
    /// a configuration fault on first use instead.
    pub fn create(config: ProviderConfig) -> Arc<dyn CompletionClient> {
        match config {
            ProviderConfig::DirectBinding { binding_url, model } => {
                Arc::new(DirectBindingClient::new(binding_url, model))
            }
            ProviderConfig::OpenAICompat {
                gateway_url,
                api_token,
                model,
            } => Arc::new(OpenAICompatClient::new(gateway_url, api_token, model)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_config_roundtrips_through_serde() {
        let config = ProviderConfig::DirectBinding {
            binding_url: Some("http://127.0.0.1:8080/run".to_string()),
            model: "@cf/meta/llama-3.1-8b-instruct".to_string(),
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"strategy\":\"direct_binding\""));

        let back: ProviderConfig = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, ProviderConfig::DirectBinding { .. }));
    }

    #[test]
    fn factory_builds_both_strategies() {
        let _direct = ClientFactory::create(ProviderConfig::DirectBinding {
            binding_url: None,
            model: "m".to_string(),
        });
        let _compat = ClientFactory::create(ProviderConfig::OpenAICompat {
            gateway_url: Some("https://gateway.example".to_string()),
            api_token: Some("token".to_string()),
            model: "m".to_string(),
        });
    }
}
