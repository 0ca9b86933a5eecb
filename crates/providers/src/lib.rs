//! Upstream model providers: the closed provider set, model descriptors, the
//! shared model catalog, and model-list discovery over HTTP.

pub mod catalog;
pub mod discovery;
pub mod endpoint;

use serde::{Deserialize, Serialize};

pub use {
    catalog::{ModelCatalog, default_catalog},
    discovery::{DiscoveryError, FETCHED_SORT_BASE, fetch_model_ids, normalize_models},
    endpoint::{
        ClientRuntime, OPENAI_PROXY_PATH, UnsupportedProvider, resolve_list_models_endpoint,
    },
};

/// Fallback model forced onto the main slot when the catalog has no available
/// OpenAI entry at all.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// An upstream model vendor. Closed set: adding a provider means adding a
/// variant and its [`ProviderProfile`], so capability lookups stay exhaustive
/// instead of falling through a string match at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ServiceProvider {
    OpenAI,
    Azure,
    Google,
    Anthropic,
    Baidu,
    ByteDance,
    Alibaba,
    Moonshot,
    Iflytek,
    DeepSeek,
    XAI,
    ChatGLM,
    SiliconFlow,
}

/// Static capability record for a provider: wire identity, public base URL,
/// and the relative model-list path when the provider exposes one.
#[derive(Debug, Clone, Copy)]
pub struct ProviderProfile {
    pub id: &'static str,
    pub provider_type: &'static str,
    pub sorted: i32,
    pub base_url: &'static str,
    /// Relative path of the list-models endpoint. `None` means the provider
    /// has no supported way to enumerate models.
    pub list_models_path: Option<&'static str>,
}

impl ServiceProvider {
    pub const ALL: [Self; 13] = [
        Self::OpenAI,
        Self::Azure,
        Self::Google,
        Self::Anthropic,
        Self::Baidu,
        Self::ByteDance,
        Self::Alibaba,
        Self::Moonshot,
        Self::Iflytek,
        Self::DeepSeek,
        Self::XAI,
        Self::ChatGLM,
        Self::SiliconFlow,
    ];

    #[must_use]
    pub const fn profile(self) -> ProviderProfile {
        match self {
            Self::OpenAI => ProviderProfile {
                id: "openai",
                provider_type: "openai",
                sorted: 1,
                base_url: "https://api.openai.com",
                list_models_path: Some("v1/models"),
            },
            Self::Azure => ProviderProfile {
                id: "azure",
                provider_type: "azure",
                sorted: 2,
                base_url: "https://{resource-url}/openai",
                list_models_path: None,
            },
            Self::Google => ProviderProfile {
                id: "google",
                provider_type: "google",
                sorted: 3,
                base_url: "https://generativelanguage.googleapis.com",
                list_models_path: None,
            },
            Self::Anthropic => ProviderProfile {
                id: "anthropic",
                provider_type: "anthropic",
                sorted: 4,
                base_url: "https://api.anthropic.com",
                list_models_path: None,
            },
            Self::Baidu => ProviderProfile {
                id: "baidu",
                provider_type: "baidu",
                sorted: 5,
                base_url: "https://aip.baidubce.com",
                list_models_path: None,
            },
            Self::ByteDance => ProviderProfile {
                id: "bytedance",
                provider_type: "bytedance",
                sorted: 6,
                base_url: "https://ark.cn-beijing.volces.com",
                list_models_path: None,
            },
            Self::Alibaba => ProviderProfile {
                id: "alibaba",
                provider_type: "alibaba",
                sorted: 7,
                base_url: "https://dashscope.aliyuncs.com",
                list_models_path: None,
            },
            Self::Moonshot => ProviderProfile {
                id: "moonshot",
                provider_type: "moonshot",
                sorted: 8,
                base_url: "https://api.moonshot.cn",
                list_models_path: None,
            },
            Self::Iflytek => ProviderProfile {
                id: "iflytek",
                provider_type: "iflytek",
                sorted: 9,
                base_url: "https://spark-api-open.xf-yun.com",
                list_models_path: None,
            },
            Self::DeepSeek => ProviderProfile {
                id: "deepseek",
                provider_type: "deepseek",
                sorted: 10,
                base_url: "https://api.deepseek.com",
                list_models_path: None,
            },
            Self::XAI => ProviderProfile {
                id: "xai",
                provider_type: "xai",
                sorted: 11,
                base_url: "https://api.x.ai",
                list_models_path: None,
            },
            Self::ChatGLM => ProviderProfile {
                id: "chatglm",
                provider_type: "chatglm",
                sorted: 12,
                base_url: "https://open.bigmodel.cn",
                list_models_path: None,
            },
            Self::SiliconFlow => ProviderProfile {
                id: "siliconflow",
                provider_type: "custom",
                sorted: 13,
                base_url: "https://api.siliconflow.cn",
                list_models_path: Some("v1/models"),
            },
        }
    }

    /// Whether the provider exposes a model-list endpoint at all.
    #[must_use]
    pub const fn supports_list_models(self) -> bool {
        self.profile().list_models_path.is_some()
    }

    /// The fixed [`ProviderInfo`] stamped onto every descriptor of this provider.
    #[must_use]
    pub fn info(self) -> ProviderInfo {
        let profile = self.profile();
        ProviderInfo {
            id: profile.id.to_string(),
            provider_name: self,
            provider_type: profile.provider_type.to_string(),
            sorted: profile.sorted,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Azure => "Azure",
            Self::Google => "Google",
            Self::Anthropic => "Anthropic",
            Self::Baidu => "Baidu",
            Self::ByteDance => "ByteDance",
            Self::Alibaba => "Alibaba",
            Self::Moonshot => "Moonshot",
            Self::Iflytek => "Iflytek",
            Self::DeepSeek => "DeepSeek",
            Self::XAI => "XAI",
            Self::ChatGLM => "ChatGLM",
            Self::SiliconFlow => "SiliconFlow",
        }
    }
}

impl std::fmt::Display for ServiceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ServiceProvider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}

/// Returned when parsing a provider name that is not in the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider: {0}")]
pub struct UnknownProvider(pub String);

/// Provider identity attached to each model descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: String,
    pub provider_name: ServiceProvider,
    pub provider_type: String,
    pub sorted: i32,
}

/// A single (model, provider) pair with availability and display metadata.
///
/// Immutable once constructed; uniquely identified by
/// `(name, provider.provider_name)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    pub name: String,
    pub display_name: String,
    pub available: bool,
    pub sorted: i32,
    pub provider: ProviderInfo,
}

impl ModelDescriptor {
    pub fn new(name: impl Into<String>, provider: ServiceProvider, sorted: i32) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            available: true,
            sorted,
            provider: provider.info(),
        }
    }

    /// Catalog identity of this descriptor.
    #[must_use]
    pub fn identity(&self) -> (&str, ServiceProvider) {
        (&self.name, self.provider.provider_name)
    }
}

/// Split a combined picker value of the form `model@Provider` on its last `@`
/// (model names may themselves contain `@`). The provider part is `None` when
/// missing or not in the closed set.
#[must_use]
pub fn parse_model_selector(value: &str) -> (String, Option<ServiceProvider>) {
    match value.rsplit_once('@') {
        Some((model, provider)) => (model.to_string(), provider.parse().ok()),
        None => (value.to_string(), None),
    }
}
