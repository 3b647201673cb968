use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "clinic-scribe";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "medgemma";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_RETRY_UNIT_SECS: u64 = 10;

/// Front-end dev servers allowed by default.
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
];

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,clinic_scribe_lib=debug,tower_http=info"
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} must be set when using the {1} provider")]
    Missing(&'static str, &'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Ollama,
    Gemini,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Ollama => "ollama",
            LlmProvider::Gemini => "gemini",
        }
    }
}

/// Connection settings for the single LLM client shared by the process.
#[derive(Clone)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

// API keys never reach the logs.
impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub llm: LlmSettings,
    /// Unit of the linear backoff applied to quota failures.
    pub retry_unit: Duration,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    /// Read configuration from the process environment, loading `.env`
    /// first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = get("CLINIC_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            key: "CLINIC_BIND_ADDR",
            value: bind_raw.clone(),
            reason: e.to_string(),
        })?;

        let provider = match get("CLINIC_LLM_PROVIDER").as_deref() {
            None | Some("ollama") => LlmProvider::Ollama,
            Some("gemini") => LlmProvider::Gemini,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "CLINIC_LLM_PROVIDER",
                    value: other.to_string(),
                    reason: "expected \"ollama\" or \"gemini\"".into(),
                })
            }
        };

        let timeout_secs = parse_secs(&get, "CLINIC_LLM_TIMEOUT_SECS", DEFAULT_LLM_TIMEOUT_SECS)?;
        let retry_unit_secs = parse_secs(&get, "CLINIC_RETRY_UNIT_SECS", DEFAULT_RETRY_UNIT_SECS)?;

        let llm = match provider {
            LlmProvider::Ollama => LlmSettings {
                provider,
                base_url: get("OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
                model: get("CLINIC_LLM_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
                api_key: None,
                timeout: Duration::from_secs(timeout_secs),
            },
            LlmProvider::Gemini => LlmSettings {
                provider,
                base_url: DEFAULT_GEMINI_URL.to_string(),
                model: get("CLINIC_LLM_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                api_key: Some(
                    get("GOOGLE_API_KEY").ok_or(ConfigError::Missing("GOOGLE_API_KEY", "gemini"))?,
                ),
                timeout: Duration::from_secs(timeout_secs),
            },
        };

        let cors_origins = match get("CLINIC_CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            bind_addr,
            llm,
            retry_unit: Duration::from_secs(retry_unit_secs),
            cors_origins,
        })
    }
}

fn parse_secs<G>(get: &G, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_empty() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.llm.provider, LlmProvider::Ollama);
        assert_eq!(config.llm.base_url, DEFAULT_OLLAMA_URL);
        assert_eq!(config.llm.model, DEFAULT_OLLAMA_MODEL);
        assert_eq!(config.llm.timeout, Duration::from_secs(120));
        assert_eq!(config.retry_unit, Duration::from_secs(10));
        assert_eq!(config.cors_origins.len(), DEFAULT_CORS_ORIGINS.len());
    }

    #[test]
    fn gemini_requires_api_key() {
        let err = AppConfig::from_lookup(lookup(&[("CLINIC_LLM_PROVIDER", "gemini")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("GOOGLE_API_KEY", "gemini"));
    }

    #[test]
    fn gemini_with_key_and_model_override() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CLINIC_LLM_PROVIDER", "gemini"),
            ("GOOGLE_API_KEY", "secret-key"),
            ("CLINIC_LLM_MODEL", "gemini-1.5-pro"),
        ]))
        .unwrap();
        assert_eq!(config.llm.provider, LlmProvider::Gemini);
        assert_eq!(config.llm.model, "gemini-1.5-pro");
        assert_eq!(config.llm.api_key.as_deref(), Some("secret-key"));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CLINIC_LLM_PROVIDER", "gemini"),
            ("GOOGLE_API_KEY", "secret-key"),
        ]))
        .unwrap();
        let debug = format!("{:?}", config.llm);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn unknown_provider_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("CLINIC_LLM_PROVIDER", "openai")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "CLINIC_LLM_PROVIDER", .. }));
    }

    #[test]
    fn provider_names_parse_back() {
        for provider in [LlmProvider::Ollama, LlmProvider::Gemini] {
            let config = AppConfig::from_lookup(lookup(&[
                ("CLINIC_LLM_PROVIDER", provider.as_str()),
                ("GOOGLE_API_KEY", "k"),
            ]))
            .unwrap();
            assert_eq!(config.llm.provider, provider);
        }
    }

    #[test]
    fn invalid_numbers_and_addresses_rejected() {
        assert!(AppConfig::from_lookup(lookup(&[("CLINIC_LLM_TIMEOUT_SECS", "soon")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("CLINIC_BIND_ADDR", "localhost")])).is_err());
    }

    #[test]
    fn cors_origins_split_and_trimmed() {
        let config = AppConfig::from_lookup(lookup(&[(
            "CLINIC_CORS_ORIGINS",
            " https://clinic.example , ,http://localhost:8080",
        )]))
        .unwrap();
        assert_eq!(
            config.cors_origins,
            vec!["https://clinic.example".to_string(), "http://localhost:8080".to_string()]
        );
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = AppConfig::from_lookup(lookup(&[("OLLAMA_URL", "  ")])).unwrap();
        assert_eq!(config.llm.base_url, DEFAULT_OLLAMA_URL);
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.3.0");
    }
}
