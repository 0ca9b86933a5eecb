//! The model-list refresh workflow: fetch → confirm → merge.
//!
//! Modeled as an explicit state machine rather than a callback chain, so
//! cancellation and concurrent triggers are structural: the state cell doubles
//! as the single-flight guard, and an RAII hold releases it on every exit
//! path, including failures.

use std::sync::{Arc, Mutex, MutexGuard};

use {
    async_trait::async_trait,
    reqwest::header::HeaderMap,
    tracing::{debug, info, warn},
};

use {
    banter_config::ConfigStore,
    banter_providers::{
        ServiceProvider, fetch_model_ids, normalize_models, resolve_list_models_endpoint,
    },
};

use crate::{error::RefreshError, reconcile::reconcile};

/// Workflow phase. `Idle` is the only state from which a trigger is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Fetching,
    Confirming,
    Applying,
}

/// How a single `trigger` call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The catalog was updated with this many descriptors.
    Applied { count: usize },
    /// The user dismissed the confirmation; nothing was mutated.
    Cancelled,
    /// The run never reached the catalog (guard held, unsupported provider,
    /// transport failure, or an empty model list).
    Rejected(RefreshError),
}

/// Presentation collaborator. `confirm` is a single-shot modal resolving to
/// exactly one answer; anything but an explicit accept counts as dismissal.
#[async_trait]
pub trait RefreshUi: Send + Sync {
    async fn notify(&self, message: &str);
    async fn confirm(&self, title: &str, body: &str) -> bool;
}

/// Supplies authentication headers for the model-list request. Header
/// construction is opaque to the workflow.
pub trait AuthHeaders: Send + Sync {
    fn headers(&self, provider: ServiceProvider) -> HeaderMap;
}

pub struct RefreshWorkflow {
    store: ConfigStore,
    http: reqwest::Client,
    auth: Arc<dyn AuthHeaders>,
    ui: Arc<dyn RefreshUi>,
    state: Mutex<RefreshState>,
}

impl RefreshWorkflow {
    #[must_use]
    pub fn new(store: ConfigStore, auth: Arc<dyn AuthHeaders>, ui: Arc<dyn RefreshUi>) -> Self {
        Self {
            store,
            http: reqwest::Client::new(),
            auth,
            ui,
            state: Mutex::new(RefreshState::Idle),
        }
    }

    #[must_use]
    pub fn with_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Current workflow phase.
    #[must_use]
    pub fn state(&self) -> RefreshState {
        *lock(&self.state)
    }

    /// Run one refresh for `provider`.
    ///
    /// Rejects immediately when the provider has no list-models path or when a
    /// refresh is already in flight; otherwise fetches, asks the user to
    /// confirm, merges the result into the catalog, and re-reconciles the
    /// config. Every failure is reported through the UI and recovered locally.
    pub async fn trigger(&self, provider: ServiceProvider) -> RefreshOutcome {
        if !provider.supports_list_models() {
            return self.reject(RefreshError::UnsupportedProvider(provider)).await;
        }

        let Some(flight) = Flight::acquire(&self.state) else {
            return self.reject(RefreshError::ConcurrentRefresh).await;
        };

        let snapshot = self.store.snapshot();
        let endpoint = match resolve_list_models_endpoint(
            provider,
            snapshot.access.base_url(provider),
            snapshot.access.client_runtime,
        ) {
            Ok(endpoint) => endpoint,
            Err(err) => return self.reject(err.into()).await,
        };

        let headers = self.auth.headers(provider);
        let ids = match fetch_model_ids(&self.http, &endpoint, headers).await {
            Ok(ids) => ids,
            Err(err) => {
                warn!(provider = %provider, error = %err, "model list fetch failed");
                return self.reject(err.into()).await;
            },
        };

        let fetched = normalize_models(provider, &ids);
        if fetched.is_empty() {
            return self.reject(RefreshError::EmptyResult).await;
        }

        flight.advance(RefreshState::Confirming);
        let count = fetched.len();
        let accepted = self
            .ui
            .confirm(
                "Refresh model list",
                &format!("Fetched {count} models. Replace the current {provider} model list?"),
            )
            .await;
        if !accepted {
            debug!(provider = %provider, "model list refresh cancelled");
            return RefreshOutcome::Cancelled;
        }

        flight.advance(RefreshState::Applying);
        self.store.replace_provider_models(provider, fetched);
        // Entries the merge removed may have been selected; repair now.
        reconcile(&self.store);

        info!(provider = %provider, count, "model list refreshed");
        self.ui
            .notify(&format!("Updated {provider} model list ({count} models)"))
            .await;
        RefreshOutcome::Applied { count }
    }

    async fn reject(&self, err: RefreshError) -> RefreshOutcome {
        self.ui.notify(&err.to_string()).await;
        RefreshOutcome::Rejected(err)
    }
}

/// RAII hold on the single-flight guard. Dropping it returns the workflow to
/// `Idle` on every exit path, so a failed or cancelled run can never block the
/// next trigger.
struct Flight<'a> {
    state: &'a Mutex<RefreshState>,
}

impl<'a> Flight<'a> {
    fn acquire(state: &'a Mutex<RefreshState>) -> Option<Self> {
        let mut guard = lock(state);
        if *guard != RefreshState::Idle {
            return None;
        }
        *guard = RefreshState::Fetching;
        Some(Self { state })
    }

    fn advance(&self, next: RefreshState) {
        *lock(self.state) = next;
    }
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        *lock(self.state) = RefreshState::Idle;
    }
}

fn lock(state: &Mutex<RefreshState>) -> MutexGuard<'_, RefreshState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use std::{
        sync::Mutex as StdMutex,
        time::Duration,
    };

    use {
        banter_config::{AppConfig, ConfigStore},
        banter_providers::ModelDescriptor,
    };

    use super::*;

    struct NoAuth;

    impl AuthHeaders for NoAuth {
        fn headers(&self, _provider: ServiceProvider) -> HeaderMap {
            HeaderMap::new()
        }
    }

    struct BearerAuth(&'static str);

    impl AuthHeaders for BearerAuth {
        fn headers(&self, _provider: ServiceProvider) -> HeaderMap {
            let mut headers = HeaderMap::new();
            if let Ok(value) = format!("Bearer {}", self.0).parse() {
                headers.insert(reqwest::header::AUTHORIZATION, value);
            }
            headers
        }
    }

    /// Test double for the modal/toast collaborators: records notices and
    /// answers `confirm` from a script, optionally parking on a gate first.
    struct ScriptedUi {
        accept: bool,
        gate: Option<Arc<tokio::sync::Notify>>,
        notices: StdMutex<Vec<String>>,
    }

    impl ScriptedUi {
        fn accepting() -> Self {
            Self {
                accept: true,
                gate: None,
                notices: StdMutex::new(Vec::new()),
            }
        }

        fn declining() -> Self {
            Self {
                accept: false,
                ..Self::accepting()
            }
        }

        fn gated(gate: Arc<tokio::sync::Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::accepting()
            }
        }

        fn notices(&self) -> Vec<String> {
            self.notices.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }
    }

    #[async_trait]
    impl RefreshUi for ScriptedUi {
        async fn notify(&self, message: &str) {
            self.notices
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(message.to_string());
        }

        async fn confirm(&self, _title: &str, _body: &str) -> bool {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.accept
        }
    }

    fn store_pointing_at(server: &mockito::ServerGuard) -> ConfigStore {
        let mut config = AppConfig::default();
        config.model_config.model = "stale-model".into();
        config.access.set_base_url(ServiceProvider::OpenAI, server.url());
        ConfigStore::new(config)
    }

    fn workflow(store: &ConfigStore, ui: Arc<ScriptedUi>) -> RefreshWorkflow {
        RefreshWorkflow::new(store.clone(), Arc::new(NoAuth), ui)
    }

    #[tokio::test]
    async fn applied_refresh_replaces_provider_entries_and_reconciles() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/models")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":[{"id":"gpt-4o"},{"id":"gpt-4o-mini"}]}"#)
            .create_async()
            .await;

        let store = store_pointing_at(&server);
        let ui = Arc::new(ScriptedUi::accepting());
        let workflow = workflow(&store, ui.clone());

        let outcome = workflow.trigger(ServiceProvider::OpenAI).await;
        assert_eq!(outcome, RefreshOutcome::Applied { count: 2 });
        mock.assert_async().await;

        let catalog = store.catalog();
        let openai: Vec<String> = catalog
            .available_for(ServiceProvider::OpenAI)
            .map(|m| m.name.clone())
            .collect();
        assert_eq!(openai, vec!["gpt-4o", "gpt-4o-mini"]);

        // Previous selection was not in the fetched set: reconciled to the
        // first fetched model.
        assert_eq!(store.snapshot().model_config.model, "gpt-4o");
        assert_eq!(workflow.state(), RefreshState::Idle);
        assert!(ui.notices().iter().any(|n| n.contains("2 models")));
    }

    #[tokio::test]
    async fn cancelled_confirmation_mutates_nothing() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/models")
            .with_status(200)
            .with_body(r#"{"data":[{"id":"gpt-4o"}]}"#)
            .create_async()
            .await;

        let store = store_pointing_at(&server);
        let before = store.snapshot();
        let workflow = workflow(&store, Arc::new(ScriptedUi::declining()));

        let outcome = workflow.trigger(ServiceProvider::OpenAI).await;
        assert_eq!(outcome, RefreshOutcome::Cancelled);
        assert_eq!(store.snapshot(), before);
        assert_eq!(workflow.state(), RefreshState::Idle);
    }

    #[tokio::test]
    async fn transport_failure_is_reported_and_releases_guard() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/models")
            .with_status(502)
            .create_async()
            .await;

        let store = store_pointing_at(&server);
        let ui = Arc::new(ScriptedUi::accepting());
        let workflow = workflow(&store, ui.clone());

        let outcome = workflow.trigger(ServiceProvider::OpenAI).await;
        assert!(matches!(
            outcome,
            RefreshOutcome::Rejected(RefreshError::Transport(_))
        ));
        assert_eq!(workflow.state(), RefreshState::Idle);
        assert_eq!(ui.notices().len(), 1);

        // Guard released: the next trigger gets past the single-flight check.
        let second = workflow.trigger(ServiceProvider::OpenAI).await;
        assert!(!matches!(
            second,
            RefreshOutcome::Rejected(RefreshError::ConcurrentRefresh)
        ));
    }

    #[tokio::test]
    async fn empty_model_list_is_a_distinct_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/models")
            .with_status(200)
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;

        let store = store_pointing_at(&server);
        let before = store.snapshot();
        let ui = Arc::new(ScriptedUi::accepting());
        let workflow = workflow(&store, ui.clone());

        let outcome = workflow.trigger(ServiceProvider::OpenAI).await;
        assert_eq!(outcome, RefreshOutcome::Rejected(RefreshError::EmptyResult));
        assert_eq!(store.snapshot(), before);
        assert_eq!(
            ui.notices(),
            vec![RefreshError::EmptyResult.to_string()]
        );
    }

    #[tokio::test]
    async fn unsupported_provider_is_rejected_before_any_request() {
        let store = ConfigStore::default();
        let ui = Arc::new(ScriptedUi::accepting());
        let workflow = workflow(&store, ui.clone());

        let outcome = workflow.trigger(ServiceProvider::Anthropic).await;
        assert_eq!(
            outcome,
            RefreshOutcome::Rejected(RefreshError::UnsupportedProvider(
                ServiceProvider::Anthropic
            ))
        );
        assert_eq!(workflow.state(), RefreshState::Idle);
        assert_eq!(ui.notices().len(), 1);
    }

    #[tokio::test]
    async fn second_trigger_while_confirming_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/models")
            .with_status(200)
            .with_body(r#"{"data":[{"id":"gpt-4o"}]}"#)
            .expect_at_most(2)
            .create_async()
            .await;

        let store = store_pointing_at(&server);
        let gate = Arc::new(tokio::sync::Notify::new());
        let ui = Arc::new(ScriptedUi::gated(gate.clone()));
        let workflow = Arc::new(workflow(&store, ui.clone()));

        let first = {
            let workflow = workflow.clone();
            tokio::spawn(async move { workflow.trigger(ServiceProvider::OpenAI).await })
        };

        // Wait until the first run parks in the confirmation step.
        for _ in 0..100 {
            if workflow.state() == RefreshState::Confirming {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(workflow.state(), RefreshState::Confirming);

        let catalog_before = store.catalog();
        let second = workflow.trigger(ServiceProvider::OpenAI).await;
        assert_eq!(
            second,
            RefreshOutcome::Rejected(RefreshError::ConcurrentRefresh)
        );
        assert_eq!(store.catalog(), catalog_before);
        // Guard still held by the first run.
        assert_eq!(workflow.state(), RefreshState::Confirming);

        gate.notify_one();
        let outcome = first.await.unwrap_or(RefreshOutcome::Cancelled);
        assert_eq!(outcome, RefreshOutcome::Applied { count: 1 });
        assert_eq!(workflow.state(), RefreshState::Idle);
    }

    #[tokio::test]
    async fn auth_headers_are_forwarded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/models")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(r#"{"data":[{"id":"gpt-4o"}]}"#)
            .create_async()
            .await;

        let store = store_pointing_at(&server);
        let workflow = RefreshWorkflow::new(
            store.clone(),
            Arc::new(BearerAuth("test-key")),
            Arc::new(ScriptedUi::accepting()),
        );

        let outcome = workflow.trigger(ServiceProvider::OpenAI).await;
        assert_eq!(outcome, RefreshOutcome::Applied { count: 1 });
        mock.assert_async().await;
    }
}
