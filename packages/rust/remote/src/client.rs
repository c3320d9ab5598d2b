//! Authenticated HTTP client for the platform API.
//!
//! Every call carries the bearer token, the subscription-key header, and the
//! `v` API-version query parameter. Batch operations dispatch calls with a
//! fixed in-flight cap and wait for every call before returning.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use url::Url;

use kbsync_shared::{KbSyncError, RecordKind, RemoteConfig, Result};

use crate::filter::SubjectFilter;

/// User-Agent string for platform requests.
const USER_AGENT: &str = concat!("kbsync/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Identifier the platform assigned to a created record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RemoteId(pub String);

impl std::fmt::Display for RemoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A record as returned by the list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteSummary {
    pub id: String,
    pub name: String,
}

/// A record waiting to be created, with the name used in logs and reports.
#[derive(Debug, Clone)]
pub struct RemoteItem {
    pub name: String,
    pub payload: serde_json::Value,
}

impl RemoteItem {
    /// Serialize `payload` into a pending item.
    pub fn new(name: impl Into<String>, payload: &impl Serialize) -> Result<Self> {
        let payload =
            serde_json::to_value(payload).map_err(|e| KbSyncError::Serialize(e.to_string()))?;
        Ok(Self {
            name: name.into(),
            payload,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    id: RemoteId,
}

/// Outcome of one batch of per-item calls.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub kind: RecordKind,
    /// Number of calls issued.
    pub attempted: usize,
    pub succeeded: usize,
    /// Item name and error message for each failed call.
    pub failed: Vec<(String, String)>,
}

impl SyncReport {
    fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            attempted: 0,
            succeeded: 0,
            failed: Vec::new(),
        }
    }

    fn record<T>(&mut self, name: String, result: Result<T>, action: &str) {
        self.attempted += 1;
        match result {
            Ok(_) => self.succeeded += 1,
            Err(e) => {
                warn!(kind = %self.kind, name = %name, error = %e, "failed to {action} record");
                self.failed.push((name, e.to_string()));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// RemoteClient
// ---------------------------------------------------------------------------

/// Client bound to one remote environment.
pub struct RemoteClient {
    config: RemoteConfig,
    client: Client,
}

impl RemoteClient {
    /// Build a client with auth headers and the configured timeout.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let headers = default_headers(&config)?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| KbSyncError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// The environment this client talks to.
    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Create one record; returns the id assigned by the platform.
    pub async fn create(&self, kind: RecordKind, payload: &impl Serialize) -> Result<RemoteId> {
        let url = self.endpoint(kind, None)?;
        let response = self.send(self.client.post(url).json(payload)).await?;

        let body: CreateResponse = response
            .json()
            .await
            .map_err(|e| KbSyncError::remote(None, format!("unreadable create response: {e}")))?;

        debug!(%kind, id = %body.id, "created record");
        Ok(body.id)
    }

    /// List every record of `kind`.
    pub async fn list(&self, kind: RecordKind) -> Result<Vec<RemoteSummary>> {
        let url = self.endpoint(kind, None)?;
        let response = self.send(self.client.get(url)).await?;

        response
            .json()
            .await
            .map_err(|e| KbSyncError::remote(None, format!("unreadable {kind} listing: {e}")))
    }

    /// Delete one record by id.
    pub async fn delete(&self, kind: RecordKind, id: &str) -> Result<()> {
        let url = self.endpoint(kind, Some(id))?;
        self.send(self.client.delete(url)).await?;
        debug!(%kind, id, "deleted record");
        Ok(())
    }

    /// Delete every record of `kind` selected by `filter`.
    ///
    /// A failed listing is returned as a fatal [`KbSyncError::Listing`];
    /// individual delete failures are logged and collected in the report.
    #[instrument(skip_all, fields(kind = %kind, filter = %filter))]
    pub async fn delete_all(&self, kind: RecordKind, filter: &SubjectFilter) -> Result<SyncReport> {
        let existing = self
            .list(kind)
            .await
            .map_err(|e| KbSyncError::listing(kind, e))?;
        let targets: Vec<RemoteSummary> = existing
            .into_iter()
            .filter(|r| filter.matches(kind, &r.name))
            .collect();

        info!(count = targets.len(), "deleting remote records");

        let deletions = targets.into_iter().map(|r| async move {
            let result = self.delete(kind, &r.id).await;
            (r.name, result)
        });
        let results: Vec<(String, Result<()>)> = stream::iter(deletions)
            .buffer_unordered(self.config.concurrency)
            .collect()
            .await;

        let mut report = SyncReport::new(kind);
        for (name, result) in results {
            report.record(name, result, "delete");
        }

        info!(
            succeeded = report.succeeded,
            failed = report.failed.len(),
            "deletion finished"
        );
        Ok(report)
    }

    /// Create every item, at most `concurrency` calls in flight.
    ///
    /// Failures are logged and collected; the batch always runs to completion.
    #[instrument(skip_all, fields(kind = %kind, items = items.len()))]
    pub async fn create_all(&self, kind: RecordKind, items: Vec<RemoteItem>) -> SyncReport {
        info!(concurrency = self.config.concurrency, "creating remote records");

        let creations = items.into_iter().map(|item| async move {
            let result = self.create(kind, &item.payload).await;
            (item.name, result)
        });
        let results: Vec<(String, Result<RemoteId>)> = stream::iter(creations)
            .buffer_unordered(self.config.concurrency)
            .collect()
            .await;

        let mut report = SyncReport::new(kind);
        for (name, result) in results {
            report.record(name, result, "create");
        }

        info!(
            succeeded = report.succeeded,
            failed = report.failed.len(),
            "creation finished"
        );
        report
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// `{base}/{kind}` or `{base}/{kind}/{id}`.
    fn endpoint(&self, kind: RecordKind, id: Option<&str>) -> Result<Url> {
        let mut url = self.config.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                KbSyncError::config(format!(
                    "base_url '{}' cannot carry a path",
                    self.config.base_url
                ))
            })?;
            segments.pop_if_empty().push(kind.as_str());
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Attach the version parameter, send, and map failures to remote errors.
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = request
            .query(&[("v", self.config.api_version.as_str())])
            .send()
            .await
            .map_err(|e| KbSyncError::remote(None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(KbSyncError::remote(Some(status.as_u16()), body));
        }

        Ok(response)
    }
}

fn default_headers(config: &RemoteConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
        .map_err(|_| KbSyncError::config("bearer token contains invalid header characters"))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    if !config.subscription_key.is_empty() {
        let name = HeaderName::from_bytes(config.subscription_key_header.as_bytes()).map_err(|_| {
            KbSyncError::config(format!(
                "invalid subscription key header name '{}'",
                config.subscription_key_header
            ))
        })?;
        let mut value = HeaderValue::from_str(&config.subscription_key)
            .map_err(|_| {
                KbSyncError::config("subscription key contains invalid header characters")
            })?;
        value.set_sensitive(true);
        headers.insert(name, value);
    }

    Ok(headers)
}
