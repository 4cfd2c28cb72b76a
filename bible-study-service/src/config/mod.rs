use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

/// Default scripture API (free, no key required).
const DEFAULT_SCRIPTURE_API_BASE_URL: &str = "https://bible-api.com";

/// Upper bound on a single scripture lookup.
const DEFAULT_SCRIPTURE_TIMEOUT_SECS: u64 = 10;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-mini";

/// Upper bound on a single completion call, including reading the body.
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct StudyConfig {
    pub common: core_config::Config,
    pub scripture: ScriptureApiConfig,
    pub openai: OpenAiConfig,
    pub generation: GenerationConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone)]
pub struct ScriptureApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// When false the mock text provider is used instead.
    pub enabled: bool,
    pub api_key: Secret<String>,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// OTLP collector; span export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl ScriptureApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl StudyConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let openai_enabled = env::var("OPENAI_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);
        let api_key = if openai_enabled {
            get_env("OPENAI_API_KEY", None, is_prod)?
        } else {
            String::new()
        };

        Ok(StudyConfig {
            common: common_config,
            scripture: ScriptureApiConfig {
                base_url: get_env(
                    "SCRIPTURE_API_BASE_URL",
                    Some(DEFAULT_SCRIPTURE_API_BASE_URL),
                    is_prod,
                )?,
                timeout_secs: get_env(
                    "SCRIPTURE_API_TIMEOUT_SECS",
                    Some(&DEFAULT_SCRIPTURE_TIMEOUT_SECS.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_SCRIPTURE_TIMEOUT_SECS),
            },
            openai: OpenAiConfig {
                enabled: openai_enabled,
                api_key: Secret::new(api_key),
                base_url: get_env("OPENAI_BASE_URL", Some(DEFAULT_OPENAI_BASE_URL), is_prod)?,
                model: get_env("OPENAI_MODEL", Some(DEFAULT_OPENAI_MODEL), is_prod)?,
            },
            generation: GenerationConfig {
                timeout_secs: get_env(
                    "GENERATION_TIMEOUT_SECS",
                    Some(&DEFAULT_GENERATION_TIMEOUT_SECS.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_GENERATION_TIMEOUT_SECS),
            },
            observability: ObservabilityConfig {
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
