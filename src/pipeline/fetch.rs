//! Asset fetching: download one image or PDF referenced by a note.
//!
//! References come in two shapes: absolute URLs (`http://…`, `https://…`)
//! and base-relative paths (`/files/…`) served by the notes backend. Relative
//! references are resolved by plain concatenation with the configured base
//! URL, with no URL normalisation, so `base_url` must not end in `/`.
//!
//! Failures are terminal for the asset: there are no retries here. Whether a
//! failure is fatal for the whole request is decided one level up, in
//! [`crate::pipeline::evidence`].

use crate::config::ServiceConfig;
use crate::error::NoteError;
use std::time::Duration;
use tracing::debug;

/// Resolve a caller-supplied reference against `base_url`.
///
/// A leading `/` means "relative to the notes backend"; anything else is
/// used unmodified.
pub fn resolve_reference(reference: &str, base_url: &str) -> String {
    if reference.starts_with('/') {
        format!("{base_url}{reference}")
    } else {
        reference.to_string()
    }
}

/// Downloads note assets over HTTP.
///
/// Holds a single `reqwest::Client` so connections are pooled across
/// requests. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AssetFetcher {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: Option<u64>,
}

impl AssetFetcher {
    /// Build a fetcher from the service configuration.
    pub fn new(config: &ServiceConfig) -> Result<Self, NoteError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.download_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| NoteError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            timeout_secs: config.download_timeout_secs,
        })
    }

    /// Fetch the raw bytes behind `reference`.
    pub async fn fetch(&self, reference: &str) -> Result<Vec<u8>, NoteError> {
        let url = resolve_reference(reference, &self.base_url);
        debug!("Downloading asset: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            match self.timeout_secs {
                Some(secs) if e.is_timeout() => NoteError::DownloadTimeout {
                    url: url.clone(),
                    secs,
                },
                _ => NoteError::DownloadFailed {
                    url: url.clone(),
                    reason: e.to_string(),
                },
            }
        })?;

        if !response.status().is_success() {
            return Err(NoteError::DownloadFailed {
                url,
                reason: format!("HTTP {}", response.status()),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| NoteError::DownloadFailed {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
