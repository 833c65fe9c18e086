//! LLM integration.
//!
//! The service talks to an OpenAI-compatible chat completions API. Callers
//! depend on the `LlmProvider` trait so tests can swap in a stub.

pub mod openai;
pub mod provider;

pub use openai::OpenAiProvider;
pub use provider::*;

use std::sync::Arc;

use crate::config::ServiceConfig;

/// Model used when `OPENAI_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gpt-4";

/// API root used when `OPENAI_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: secrecy::SecretString,
    pub model: String,
    pub base_url: String,
}

impl LlmConfig {
    /// Extract the LLM settings, or `None` when no API key is configured.
    pub fn from_service(config: &ServiceConfig) -> Option<Self> {
        config.llm_api_key.clone().map(|api_key| Self {
            api_key,
            model: config.llm_model.clone(),
            base_url: config.llm_base_url.clone(),
        })
    }
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Arc<dyn LlmProvider> {
    tracing::info!("Using OpenAI-compatible API (model: {})", config.model);
    Arc::new(OpenAiProvider::new(
        config.api_key.clone(),
        config.model.clone(),
        &config.base_url,
    ))
}
