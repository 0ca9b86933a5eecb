//! Resolution of a provider's list-models endpoint from its stored base URL.

use crate::ServiceProvider;

/// Proxy path used in place of a real base URL when the client runs hosted
/// behind the application's own API routes.
pub const OPENAI_PROXY_PATH: &str = "/api/openai";

/// How the client is running, which decides the default base URL when none is
/// stored: hosted clients go through the application proxy, the packaged app
/// talks to the provider directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientRuntime {
    #[default]
    Hosted,
    App,
}

/// The provider has no registered list-models path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0} does not support model list refresh")]
pub struct UnsupportedProvider(pub ServiceProvider);

/// Build the fully-qualified list-models endpoint for `provider`.
///
/// Normalization, in order: empty stored URL falls back to the runtime default,
/// exactly one trailing `/` is stripped, a missing scheme gets `https://`
/// (unless the base is the proxy path), then the relative path is appended.
/// Idempotent: feeding a resolved endpoint back in returns it unchanged, so
/// retries can re-resolve safely.
pub fn resolve_list_models_endpoint(
    provider: ServiceProvider,
    stored_base_url: &str,
    runtime: ClientRuntime,
) -> Result<String, UnsupportedProvider> {
    let profile = provider.profile();
    let Some(path) = profile.list_models_path else {
        return Err(UnsupportedProvider(provider));
    };

    let mut base = if stored_base_url.is_empty() {
        match runtime {
            ClientRuntime::App => profile.base_url,
            ClientRuntime::Hosted => OPENAI_PROXY_PATH,
        }
        .to_string()
    } else {
        stored_base_url.to_string()
    };

    if base.ends_with('/') {
        base.truncate(base.len() - 1);
    }

    if !base.starts_with("http") && !base.starts_with(OPENAI_PROXY_PATH) {
        base = format!("https://{base}");
    }

    // Already resolved, e.g. a retry feeding the previous result back in.
    if base.ends_with(&format!("/{path}")) {
        return Ok(base);
    }

    Ok(format!("{base}/{path}"))
}
