use banter_providers::{DiscoveryError, ServiceProvider, UnsupportedProvider};

/// Everything that can stop a refresh run. All variants are recovered
/// locally: the workflow surfaces one notice and returns to idle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshError {
    #[error("{0} does not support model list refresh")]
    UnsupportedProvider(ServiceProvider),

    #[error("a model list refresh is already in progress")]
    ConcurrentRefresh,

    #[error("model list request failed: {0}")]
    Transport(String),

    #[error("provider returned no models")]
    EmptyResult,
}

impl From<UnsupportedProvider> for RefreshError {
    fn from(err: UnsupportedProvider) -> Self {
        Self::UnsupportedProvider(err.0)
    }
}

impl From<DiscoveryError> for RefreshError {
    fn from(err: DiscoveryError) -> Self {
        Self::Transport(err.to_string())
    }
}
