use secrecy::SecretString;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub gateway_base_url: String,
    pub gateway_api_key: SecretString,
    pub gateway_model: String,
    pub gateway_timeout_secs: u64,
    pub archive_url: Option<String>,
    pub web_server_host: String,
    pub web_server_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            gateway_base_url: env::var("GATEWAY_BASE_URL")
                .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string()),
            gateway_api_key: SecretString::from(
                env::var("GATEWAY_API_KEY").unwrap_or_else(|_| "gateway_api_key".to_string()),
            ),
            gateway_model: env::var("GATEWAY_MODEL")
                .unwrap_or_else(|_| "openai/gpt-4o-mini".to_string()),
            gateway_timeout_secs: env::var("GATEWAY_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(120),
            archive_url: env::var("ARCHIVE_URL").ok().filter(|u| !u.is_empty()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
        }
    }

    /// Validate that production-critical configuration is set
    /// Panics if required secrets are using default values
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        let api_key = self.gateway_api_key.expose_secret();

        if api_key == "gateway_api_key" || api_key.is_empty() {
            panic!(
                "FATAL: GATEWAY_API_KEY is using default value! Set GATEWAY_API_KEY environment variable."
            );
        }

        if self.gateway_base_url.is_empty() {
            panic!("FATAL: GATEWAY_BASE_URL must not be empty.");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            gateway_base_url: "http://localhost:9999/v1".to_string(),
            gateway_api_key: SecretString::from("test_api_key".to_string()),
            gateway_model: "test-model".to_string(),
            gateway_timeout_secs: 5,
            archive_url: None,
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_with_defaults() {
        let config = Config::from_env();

        // Should use env vars if set, or fall back to defaults
        assert!(!config.gateway_base_url.is_empty());
        assert!(!config.gateway_model.is_empty());
        assert!(config.gateway_timeout_secs > 0);
    }

    #[test]
    fn test_test_config() {
        let config = Config::test_config();

        assert_eq!(config.gateway_base_url, "http://localhost:9999/v1");
        assert_eq!(config.gateway_model, "test-model");
        assert!(config.archive_url.is_none());
    }
}
