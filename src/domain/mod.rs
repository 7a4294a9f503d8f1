pub mod activity;
pub mod error;
pub mod fingerprint;
pub mod llm_config;
pub mod prompt;
