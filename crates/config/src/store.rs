//! Shared config store.
//!
//! All consumers read immutable snapshots; all writers go through
//! [`ConfigStore::update`], which applies a mutator atomically under the write
//! lock and bumps a revision counter so consumers can notice changes. There
//! are no ambient globals: clones of the store share the same state.

use std::sync::{
    Arc, RwLock,
    atomic::{AtomicU64, Ordering},
};

use tracing::debug;

use banter_providers::{ModelCatalog, ModelDescriptor, ServiceProvider};

use crate::{
    schema::{AppConfig, ModelConfig},
    validate::normalize_model_config,
};

#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    config: RwLock<AppConfig>,
    revision: AtomicU64,
}

impl ConfigStore {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config: RwLock::new(config),
                revision: AtomicU64::new(0),
            }),
        }
    }

    /// Immutable snapshot of the whole config, taken at call time.
    #[must_use]
    pub fn snapshot(&self) -> AppConfig {
        self.read().clone()
    }

    /// Snapshot of the shared model catalog.
    #[must_use]
    pub fn catalog(&self) -> ModelCatalog {
        ModelCatalog::new(self.read().models.clone())
    }

    /// Monotonic change counter, bumped on every successful mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::SeqCst)
    }

    /// Apply `mutator` to the config atomically.
    pub fn update(&self, mutator: impl FnOnce(&mut AppConfig)) {
        {
            let mut config = self.write();
            mutator(&mut config);
        }
        self.inner.revision.fetch_add(1, Ordering::SeqCst);
    }

    /// Apply `mutator` to the model config, then pull tuning fields back into
    /// range.
    pub fn update_model_config(&self, mutator: impl FnOnce(&mut ModelConfig)) {
        self.update(|config| {
            mutator(&mut config.model_config);
            normalize_model_config(&mut config.model_config);
        });
    }

    /// The only legal group mutation of the catalog: replace every descriptor
    /// of `provider` with `fetched`, leaving other providers untouched.
    pub fn replace_provider_models(
        &self,
        provider: ServiceProvider,
        fetched: Vec<ModelDescriptor>,
    ) {
        let count = fetched.len();
        self.update(|config| {
            let merged = ModelCatalog::new(std::mem::take(&mut config.models))
                .merged_with(provider, fetched);
            config.models = merged.entries().to_vec();
        });
        debug!(provider = %provider, count, "replaced provider model list");
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, AppConfig> {
        self.inner.config.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, AppConfig> {
        self.inner.config.write().unwrap_or_else(|e| e.into_inner())
    }
}
