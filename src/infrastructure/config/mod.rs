use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{LLMConfig, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use crate::domain::prompt::PromptLanguage;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const CONFIG_FILE: &str = "lacak.toml";
pub const ENV_PREFIX: &str = "LACAK_";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Process-wide settings, read once at startup.
#[derive(Serialize, Deserialize, Clone)]
pub struct Settings {
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub request_timeout_secs: Option<u64>,
    pub prompt_language: PromptLanguage,
    pub http_host: String,
    pub http_port: u16,
    pub cache_max_entries: usize,
    pub cache_ttl_secs: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            max_output_tokens: None,
            temperature: None,
            request_timeout_secs: None,
            prompt_language: PromptLanguage::default(),
            http_host: "127.0.0.1".to_string(),
            http_port: 3001,
            cache_max_entries: 256,
            cache_ttl_secs: 3600,
            log_filter: "info".to_string(),
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_model", &self.gemini_model)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("prompt_language", &self.prompt_language)
            .field("http_host", &self.http_host)
            .field("http_port", &self.http_port)
            .field("cache_max_entries", &self.cache_max_entries)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("log_filter", &self.log_filter)
            .finish()
    }
}

impl Settings {
    /// Loads `.env`, then layers defaults, `lacak.toml`, `LACAK_*` and `GEMINI_API_KEY`.
    pub fn load() -> Result<Self> {
        // A missing .env file is normal outside development.
        let _ = dotenvy::dotenv();
        Self::from_figment(Self::figment())
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Env::raw().only(&[API_KEY_ENV]))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let settings: Settings = figment
            .extract()
            .map_err(|e| AppError::Configuration(format!("Invalid settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.gemini_model.trim().is_empty() {
            return Err(AppError::Configuration(
                "gemini_model must not be empty".to_string(),
            ));
        }
        if !self.gemini_base_url.starts_with("http://") && !self.gemini_base_url.starts_with("https://") {
            return Err(AppError::Configuration(format!(
                "gemini_base_url must be an http(s) URL, got {}",
                self.gemini_base_url
            )));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(AppError::Configuration(
                "request_timeout_secs must be greater than zero when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn has_credential(&self) -> bool {
        self.gemini_api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn llm_config(&self) -> LLMConfig {
        LLMConfig {
            base_url: self.gemini_base_url.clone(),
            model: self.gemini_model.clone(),
            api_key: self.gemini_api_key.clone(),
            max_tokens: self.max_output_tokens,
            temperature: self.temperature,
        }
    }
}
