use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub quota: QuotaConfig,
    #[serde(default)]
    pub gate: GateConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,

    // Secret (from ENV only); required only in gateway mode
    #[serde(default)]
    pub gateway_api_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Route completions through the OpenAI-compatible gateway instead of
    /// the direct binding
    #[serde(default)]
    pub use_openai_compat: bool,
    #[serde(default)]
    pub gateway_url: Option<String>,
    #[serde(default)]
    pub binding_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuotaConfig {
    #[serde(default = "default_daily_cap")]
    pub daily_cap: u64,
    /// UTC offset used for the day key, e.g. "UTC" or "+01:00". The reset
    /// time shown to clients stays 00:00 UTC regardless.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GateConfig {
    /// Disable the off-topic gate entirely
    #[serde(default)]
    pub allow_offtopic: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated origin allow-list
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

fn default_max_tokens() -> u32 {
    300
}

fn default_daily_cap() -> u64 {
    1000
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables: HLRGW_ prefix, `__` separates section from
    ///    key (HLRGW_SERVER__PORT -> server.port)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Self::env_source());

        let config = builder.build()?;
        let mut cfg: Config = config.try_deserialize()?;

        // Secret from ENV (not in TOML); absence surfaces per-request when
        // gateway mode is actually selected
        if let Ok(token) = std::env::var("GATEWAY_API_TOKEN") {
            cfg.gateway_api_token = token;
        }

        Ok(cfg)
    }

    fn env_source() -> Environment {
        Environment::with_prefix("HLRGW")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));
        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_structure() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 8787

            [llm]
            model = "@cf/meta/llama-3.1-8b-instruct"
            max_tokens = 300
            use_openai_compat = false

            [quota]
            daily_cap = 1000
            timezone = "UTC"

            [gate]
            allow_offtopic = false

            [cors]
            allowed_origins = "https://docs.example.com,https://www.example.com"

            [logging]
            level = "info"
            format = "pretty"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.quota.daily_cap, 1000);
        assert!(!config.llm.use_openai_compat);
    }

    #[test]
    fn defaults_cover_optional_fields() {
        let toml = r#"
            [server]
            host = "0.0.0.0"
            port = 8787

            [llm]
            model = "test-model"

            [quota]

            [cors]
            allowed_origins = "https://docs.example.com"

            [logging]
            level = "info"
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.llm.max_tokens, 300);
        assert_eq!(config.quota.daily_cap, 1000);
        assert_eq!(config.quota.timezone, "UTC");
        assert!(!config.gate.allow_offtopic);
        assert!(config.gateway_api_token.is_empty());
    }

    #[test]
    fn env_overrides_reach_nested_sections() {
        let base = r#"
            [server]
            host = "0.0.0.0"
            port = 8787

            [llm]
            model = "test-model"

            [quota]

            [cors]
            allowed_origins = "https://docs.example.com"

            [logging]
            level = "info"
            format = "json"
        "#;

        std::env::set_var("HLRGW_SERVER__PORT", "9999");
        std::env::set_var("HLRGW_QUOTA__DAILY_CAP", "50");

        let config: Config = ConfigLoader::builder()
            .add_source(config::File::from_str(base, config::FileFormat::Toml))
            .add_source(Config::env_source())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        std::env::remove_var("HLRGW_SERVER__PORT");
        std::env::remove_var("HLRGW_QUOTA__DAILY_CAP");

        assert_eq!(config.server.port, 9999);
        assert_eq!(config.quota.daily_cap, 50);
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
