//! Config schema: the chat model configuration, per-provider access settings,
//! and the application-wide config root that also owns the model catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use banter_providers::{
    ClientRuntime, DEFAULT_OPENAI_MODEL, ModelDescriptor, ServiceProvider, default_catalog,
};

/// Default prompt template applied to user input before sending.
pub const DEFAULT_INPUT_TEMPLATE: &str = "{{input}}";

/// The user's selected chat model plus tuning knobs. The compression slot
/// (used for history summarization) selects its model and provider
/// independently of the main slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelConfig {
    pub model: String,
    pub provider_name: ServiceProvider,
    pub compress_model: String,
    pub compress_provider_name: ServiceProvider,

    pub temperature: f32,
    // The tuning fields below keep their wire-format snake_case names.
    #[serde(rename = "top_p")]
    pub top_p: f32,
    #[serde(rename = "max_tokens")]
    pub max_tokens: u32,
    #[serde(rename = "presence_penalty")]
    pub presence_penalty: f32,
    #[serde(rename = "frequency_penalty")]
    pub frequency_penalty: f32,

    pub history_message_count: u32,
    pub compress_message_length_threshold: u32,
    pub send_memory: bool,
    pub enable_inject_system_prompts: bool,
    pub template: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_OPENAI_MODEL.to_string(),
            provider_name: ServiceProvider::OpenAI,
            compress_model: String::new(),
            compress_provider_name: ServiceProvider::OpenAI,
            temperature: 0.5,
            top_p: 1.0,
            max_tokens: 4000,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
            history_message_count: 4,
            compress_message_length_threshold: 1000,
            send_memory: true,
            enable_inject_system_prompts: true,
            template: DEFAULT_INPUT_TEMPLATE.to_string(),
        }
    }
}

/// Per-provider access settings: stored base-URL overrides and how the client
/// is running (which picks the default base URL when no override is stored).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessConfig {
    pub client_runtime: ClientRuntime,
    /// Keyed by provider display name, e.g. `"OpenAI"`.
    pub base_urls: BTreeMap<String, String>,
}

impl AccessConfig {
    /// Stored base URL for `provider`, empty when none is configured.
    #[must_use]
    pub fn base_url(&self, provider: ServiceProvider) -> &str {
        self.base_urls
            .get(provider.as_str())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Store (or clear, when empty) the base-URL override for `provider`.
    pub fn set_base_url(&mut self, provider: ServiceProvider, url: impl Into<String>) {
        let url = url.into();
        if url.is_empty() {
            self.base_urls.remove(provider.as_str());
        } else {
            self.base_urls.insert(provider.as_str().to_string(), url);
        }
    }
}

/// Application-wide configuration root. Owns the model catalog shared across
/// all consumers; group mutations of the catalog go through
/// [`crate::ConfigStore::replace_provider_models`] only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub model_config: ModelConfig,
    pub models: Vec<ModelDescriptor>,
    pub access: AccessConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_config: ModelConfig::default(),
            models: default_catalog().entries().to_vec(),
            access: AccessConfig::default(),
        }
    }
}
