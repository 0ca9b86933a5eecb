//! Config reconciliation: repair the selected model (and compression model)
//! whenever it stops referring to an existing, available catalog entry.
//!
//! Reconciliation is planned as pure data first, then applied through the
//! store's single mutator entry point, so the repair itself is atomic and the
//! pass is idempotent.

use tracing::{debug, info, warn};

use {
    banter_config::{ConfigStore, ModelConfig},
    banter_providers::{DEFAULT_OPENAI_MODEL, ModelCatalog, ServiceProvider},
};

/// What reconciliation decided for one config slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    /// The selected model is an available entry of the selected provider.
    Consistent,
    /// Snap to the provider's first available model.
    Repaired { to: String },
    /// Provider is OpenAI but has no available models; force the fixed
    /// default identifier.
    Fallback,
    /// No available model for a non-fallback slot. The dangling reference is
    /// kept: there is no safe default to substitute.
    Gap,
}

/// Planned repairs for both slots. Apply with [`ReconcilePlan::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub main: SlotOutcome,
    pub compress: SlotOutcome,
}

impl ReconcilePlan {
    /// True when applying the plan would not mutate the config.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        fn inert(outcome: &SlotOutcome) -> bool {
            matches!(outcome, SlotOutcome::Consistent | SlotOutcome::Gap)
        }
        inert(&self.main) && inert(&self.compress)
    }

    /// Write the planned repairs into `config`.
    pub fn apply(&self, config: &mut ModelConfig) {
        match &self.main {
            SlotOutcome::Repaired { to } => config.model = to.clone(),
            SlotOutcome::Fallback => config.model = DEFAULT_OPENAI_MODEL.to_string(),
            SlotOutcome::Consistent | SlotOutcome::Gap => {},
        }
        match &self.compress {
            SlotOutcome::Repaired { to } => config.compress_model = to.clone(),
            // The compression slot has no fallback step.
            SlotOutcome::Fallback | SlotOutcome::Consistent | SlotOutcome::Gap => {},
        }
    }
}

/// Decide what each slot needs, without touching anything.
#[must_use]
pub fn plan(config: &ModelConfig, catalog: &ModelCatalog) -> ReconcilePlan {
    ReconcilePlan {
        main: plan_slot(&config.model, config.provider_name, catalog, true),
        compress: plan_slot(
            &config.compress_model,
            config.compress_provider_name,
            catalog,
            false,
        ),
    }
}

fn plan_slot(
    model: &str,
    provider: ServiceProvider,
    catalog: &ModelCatalog,
    fallback_to_default: bool,
) -> SlotOutcome {
    if catalog.contains_available(provider, model) {
        return SlotOutcome::Consistent;
    }
    if let Some(first) = catalog.first_available_for(provider) {
        return SlotOutcome::Repaired {
            to: first.name.clone(),
        };
    }
    if fallback_to_default && provider == ServiceProvider::OpenAI {
        if model == DEFAULT_OPENAI_MODEL {
            return SlotOutcome::Consistent;
        }
        return SlotOutcome::Fallback;
    }
    SlotOutcome::Gap
}

/// Run one reconciliation pass against the store: snapshot, plan, apply.
///
/// Repairs are diagnostics, not user-facing errors; a gap is logged and the
/// config is deliberately left pointing at the missing model.
pub fn reconcile(store: &ConfigStore) -> ReconcilePlan {
    let snapshot = store.snapshot();
    let catalog = ModelCatalog::new(snapshot.models);
    let plan = plan(&snapshot.model_config, &catalog);

    log_outcome("model", &snapshot.model_config.model, &plan.main);
    log_outcome(
        "compress_model",
        &snapshot.model_config.compress_model,
        &plan.compress,
    );

    if !plan.is_noop() {
        let applied = plan.clone();
        store.update(|config| applied.apply(&mut config.model_config));
    }
    plan
}

fn log_outcome(slot: &'static str, current: &str, outcome: &SlotOutcome) {
    match outcome {
        SlotOutcome::Consistent => debug!(slot, model = current, "model selection consistent"),
        SlotOutcome::Repaired { to } => {
            info!(slot, from = current, to = %to, "repaired model selection");
        },
        SlotOutcome::Fallback => {
            info!(
                slot,
                from = current,
                to = DEFAULT_OPENAI_MODEL,
                "no available model, forcing default"
            );
        },
        SlotOutcome::Gap => {
            warn!(
                slot,
                model = current,
                "no available model for selected provider, leaving selection as-is"
            );
        },
    }
}

// ── Selection helpers ───────────────────────────────────────────────────────

/// Switch the main slot to `provider`, snapping the model to the provider's
/// first available entry when it has one.
pub fn select_provider(config: &mut ModelConfig, catalog: &ModelCatalog, provider: ServiceProvider) {
    config.provider_name = provider;
    if let Some(first) = catalog.first_available_for(provider) {
        config.model = first.name.clone();
    }
}

/// Switch the compression slot to `provider`, snapping its model likewise.
pub fn select_compress_provider(
    config: &mut ModelConfig,
    catalog: &ModelCatalog,
    provider: ServiceProvider,
) {
    config.compress_provider_name = provider;
    if let Some(first) = catalog.first_available_for(provider) {
        config.compress_model = first.name.clone();
    }
}
