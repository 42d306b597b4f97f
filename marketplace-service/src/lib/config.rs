use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub images: ImageStoreConfig,
    pub notifier: NotifierConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Symmetric token-signing secret. Must be explicitly configured;
    /// startup fails on an empty value. An ephemeral fallback would
    /// invalidate every issued token on restart and differ per instance.
    pub token_secret: String,

    #[serde(default = "default_token_expiry_minutes")]
    pub token_expiry_minutes: i64,
}

fn default_token_expiry_minutes() -> i64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImageStoreConfig {
    pub upload_url: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotifierConfig {
    pub openai_api_key: String,
    pub resend_api_key: String,
    pub sender: String,
    pub recipient: String,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, AUTH__TOKEN_SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.token_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "auth.token_secret must be set; refusing to start with an empty \
                 signing secret"
                    .to_string(),
            ));
        }

        if self.auth.token_expiry_minutes < 1 {
            return Err(ConfigError::Message(
                "auth.token_expiry_minutes must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            database: DatabaseConfig {
                url: "postgresql://localhost/marketplace".to_string(),
            },
            server: ServerConfig { http_port: 8000 },
            auth: AuthConfig {
                token_secret: "a_signing_secret_of_reasonable_length".to_string(),
                token_expiry_minutes: 30,
            },
            images: ImageStoreConfig {
                upload_url: "https://images.example.com/upload".to_string(),
                api_key: "image-key".to_string(),
            },
            notifier: NotifierConfig {
                openai_api_key: "sk-test".to_string(),
                resend_api_key: "re-test".to_string(),
                sender: "Marketplace <onboarding@resend.dev>".to_string(),
                recipient: "sales@example.com".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_empty_token_secret_is_rejected() {
        let mut config = valid_config();
        config.auth.token_secret = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_expiry_is_rejected() {
        let mut config = valid_config();
        config.auth.token_expiry_minutes = 0;
        assert!(config.validate().is_err());
    }
}
