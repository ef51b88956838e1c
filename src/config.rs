use std::env;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://questions.db";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub provider: ProviderConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Missing or
    /// unparseable values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let timeout_ms = lookup("PROVIDER_TIMEOUT_MS")
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        let provider = ProviderConfig {
            api_key: lookup("OPENAI_API_KEY").unwrap_or_default(),
            api_base: lookup("OPENAI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout_ms,
        };

        Self {
            port,
            database_url,
            provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]);

        assert_eq!(
            config,
            AppConfig {
                port: DEFAULT_PORT,
                database_url: DEFAULT_DATABASE_URL.to_string(),
                provider: ProviderConfig {
                    api_key: String::new(),
                    api_base: DEFAULT_API_BASE.to_string(),
                    model: DEFAULT_MODEL.to_string(),
                    timeout_ms: DEFAULT_TIMEOUT_MS,
                },
            }
        );
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            ("PORT", "8081"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_API_BASE", "http://127.0.0.1:9999/v1/"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("PROVIDER_TIMEOUT_MS", "1500"),
        ]);

        assert_eq!(config.port, 8081);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.provider.api_key, "sk-test");
        assert_eq!(config.provider.api_base, "http://127.0.0.1:9999/v1");
        assert_eq!(config.provider.model, "gpt-4o-mini");
        assert_eq!(config.provider.timeout_ms, 1500);
    }

    #[test]
    fn unparseable_numbers_fall_back() {
        let config = config_from(&[("PORT", "not-a-port"), ("PROVIDER_TIMEOUT_MS", "-3")]);

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.provider.timeout_ms, DEFAULT_TIMEOUT_MS);
    }
}
