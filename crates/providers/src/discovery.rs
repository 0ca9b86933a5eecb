//! Fetching a provider's model list and normalizing it into descriptors.

use {
    reqwest::header::HeaderMap,
    serde::Deserialize,
    tracing::{debug, warn},
};

use crate::{ModelDescriptor, ServiceProvider};

/// Sort offset applied to fetched descriptors so they land after statically
/// seeded entries, in response order.
pub const FETCHED_SORT_BASE: i32 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("model list endpoint returned HTTP {status}")]
    Status { status: reqwest::StatusCode },
}

/// Expected success body: `{ "data": [ { "id": "..." }, ... ] }`. Any other
/// shape is a failure.
#[derive(Debug, Deserialize)]
struct ModelListPayload {
    data: Vec<ModelListEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelListEntry {
    id: String,
}

/// Issue one authenticated GET against the resolved endpoint and return the
/// model identifiers in response order. Blank identifiers are dropped; order
/// is otherwise preserved exactly as the provider returned it.
pub async fn fetch_model_ids(
    client: &reqwest::Client,
    endpoint: &str,
    headers: HeaderMap,
) -> Result<Vec<String>, DiscoveryError> {
    debug!(endpoint, "fetching provider model list");
    let response = client.get(endpoint).headers(headers).send().await?;

    let status = response.status();
    if !status.is_success() {
        warn!(endpoint, %status, "model list request failed");
        return Err(DiscoveryError::Status { status });
    }

    let payload: ModelListPayload = response.json().await?;
    let ids: Vec<String> = payload
        .data
        .into_iter()
        .map(|entry| entry.id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();
    debug!(endpoint, count = ids.len(), "fetched provider model list");
    Ok(ids)
}

/// Turn fetched identifiers into descriptors for `provider`: the id doubles as
/// display name, everything is available, and `sorted` follows response order
/// offset by [`FETCHED_SORT_BASE`].
#[must_use]
pub fn normalize_models(provider: ServiceProvider, ids: &[String]) -> Vec<ModelDescriptor> {
    ids.iter()
        .enumerate()
        .map(|(index, id)| {
            ModelDescriptor::new(id.as_str(), provider, FETCHED_SORT_BASE + index as i32)
        })
        .collect()
}
