//! The shared model catalog: every descriptor known to the application across
//! all providers, plus the single legal group mutation (replace one provider's
//! entries wholesale).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{ModelDescriptor, ServiceProvider};

/// Ordered collection of model descriptors across all providers.
///
/// Mutation surface is deliberately narrow: the only way to change a
/// provider's entries as a group is [`ModelCatalog::merged_with`], which
/// replaces them wholesale. That keeps `(name, provider)` pairs unique by
/// construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelCatalog {
    entries: Vec<ModelDescriptor>,
}

impl ModelCatalog {
    #[must_use]
    pub fn new(entries: Vec<ModelDescriptor>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[ModelDescriptor] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Available descriptors for one provider, in catalog order.
    pub fn available_for(
        &self,
        provider: ServiceProvider,
    ) -> impl Iterator<Item = &ModelDescriptor> {
        self.entries
            .iter()
            .filter(move |m| m.available && m.provider.provider_name == provider)
    }

    /// First available descriptor for the provider, if any.
    #[must_use]
    pub fn first_available_for(&self, provider: ServiceProvider) -> Option<&ModelDescriptor> {
        self.available_for(provider).next()
    }

    /// Whether `name` is an available model of `provider`.
    #[must_use]
    pub fn contains_available(&self, provider: ServiceProvider, name: &str) -> bool {
        self.available_for(provider).any(|m| m.name == name)
    }

    /// Descriptors to offer in a model picker for `provider`. Falls back to
    /// every available descriptor when the provider has none, so the picker is
    /// never empty just because one provider's list is.
    #[must_use]
    pub fn selectable_for(&self, provider: ServiceProvider) -> Vec<&ModelDescriptor> {
        let scoped: Vec<&ModelDescriptor> = self.available_for(provider).collect();
        if !scoped.is_empty() {
            return scoped;
        }
        self.entries.iter().filter(|m| m.available).collect()
    }

    /// Replace every entry of `provider` with `fetched`, leaving all other
    /// providers untouched and appending the new entries at the end in fetch
    /// order. Each fetched entry is forced available. Fetched entries that
    /// repeat an identity keep only their first occurrence, since providers
    /// may list the same id twice.
    #[must_use]
    pub fn merged_with(&self, provider: ServiceProvider, fetched: Vec<ModelDescriptor>) -> Self {
        let mut entries: Vec<ModelDescriptor> = self
            .entries
            .iter()
            .filter(|m| m.provider.provider_name != provider)
            .cloned()
            .collect();
        let mut seen = HashSet::new();
        entries.extend(fetched.into_iter().filter_map(|mut m| {
            if !seen.insert((m.name.clone(), m.provider.provider_name)) {
                return None;
            }
            m.available = true;
            Some(m)
        }));
        Self { entries }
    }
}

impl From<Vec<ModelDescriptor>> for ModelCatalog {
    fn from(entries: Vec<ModelDescriptor>) -> Self {
        Self::new(entries)
    }
}

/// Statically seeded catalog used before any provider has been refreshed.
#[must_use]
pub fn default_catalog() -> ModelCatalog {
    let openai = ["gpt-4o", "gpt-4o-mini", "gpt-4-turbo", "gpt-3.5-turbo"];
    let siliconflow = [
        "deepseek-ai/DeepSeek-V3",
        "deepseek-ai/DeepSeek-R1",
        "Qwen/Qwen2.5-72B-Instruct",
    ];

    let mut entries = Vec::new();
    for (index, name) in openai.into_iter().enumerate() {
        entries.push(ModelDescriptor::new(
            name,
            ServiceProvider::OpenAI,
            100 + index as i32,
        ));
    }
    for (index, name) in siliconflow.into_iter().enumerate() {
        entries.push(ModelDescriptor::new(
            name,
            ServiceProvider::SiliconFlow,
            100 + index as i32,
        ));
    }
    ModelCatalog::new(entries)
}
