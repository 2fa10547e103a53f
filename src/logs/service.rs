//! # Fetch Service
//!
//! The asynchronous fetch collaborator. [`LogService`] is the boundary
//! the dispatch loop sees: one call, one `Vec<LogRecord>` or one error.
//! [`CloudLogService`] implements it against a Cloud Logging style
//! `entries:list` endpoint with the single re-auth-and-retry contract:
//! a 401/403 triggers exactly one `Authenticator::refresh` and one
//! retry before the failure is surfaced.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

use super::auth::{AuthError, Authenticator};
use super::record::{self, LogRecord, RawEntry};
use super::{FetchFilter, LevelFilter};

/// Errors surfaced to the dispatch loop. All of them end up in the
/// status line; none of them crash the UI.
#[derive(Debug)]
pub enum FetchError {
    Auth(AuthError),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The API returned a non-success response after the retry budget.
    Api { status: u16, message: String },
    /// The response body was not the expected entries payload.
    Parse(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Auth(e) => write!(f, "auth error: {e}"),
            FetchError::Network(msg) => write!(f, "network error: {msg}"),
            FetchError::Api { status, message } => {
                write!(f, "log API error (HTTP {status}): {message}")
            }
            FetchError::Parse(msg) => write!(f, "response parse error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<AuthError> for FetchError {
    fn from(e: AuthError) -> Self {
        FetchError::Auth(e)
    }
}

#[async_trait]
pub trait LogService: Send + Sync {
    /// Fetches the latest log entries matching `filter`, newest first.
    async fn fetch_latest(&self, filter: &FetchFilter) -> Result<Vec<LogRecord>, FetchError>;
}

// ============================================================================
// Cloud Logging implementation
// ============================================================================

#[derive(Debug, Deserialize)]
struct EntriesResponse {
    #[serde(default)]
    entries: Vec<RawEntry>,
}

pub struct CloudLogService {
    http: reqwest::Client,
    base_url: String,
    project: String,
    auth: Arc<dyn Authenticator>,
}

impl CloudLogService {
    pub fn new(project: String, base_url: String, auth: Arc<dyn Authenticator>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            project,
            auth,
        }
    }

    fn entries_url(&self) -> String {
        format!(
            "{}/projects/{}/entries:list",
            self.base_url.trim_end_matches('/'),
            self.project
        )
    }

    async fn request_once(&self, filter: &FetchFilter) -> Result<reqwest::Response, FetchError> {
        let token = self.auth.token().await?;
        let body = serde_json::json!({
            "orderBy": "metadata.timestamp desc",
            "pageSize": filter.page_size,
            "filter": build_filter(filter, Utc::now()),
        });
        self.http
            .post(self.entries_url())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))
    }
}

/// Builds the provider filter expression. `now` caps the window so
/// pagination stays stable while the operator browses.
fn build_filter(filter: &FetchFilter, now: DateTime<Utc>) -> String {
    let mut clauses = vec![
        "metadata.serviceName=\"appengine.googleapis.com\"".to_string(),
        "log=\"appengine.googleapis.com/request_log\"".to_string(),
    ];
    if let LevelFilter::AtLeast(severity) = filter.min_level {
        clauses.push(format!("metadata.severity>={}", severity.label()));
    }
    if let Some(resource) = &filter.resource {
        clauses.push(format!("protoPayload.resource:{resource}"));
    }
    clauses.push(format!(
        "metadata.timestamp<=\"{}\"",
        now.format("%Y-%m-%dT%H:%M:%S%.3fZ")
    ));
    clauses.join(" ")
}

#[async_trait]
impl LogService for CloudLogService {
    async fn fetch_latest(&self, filter: &FetchFilter) -> Result<Vec<LogRecord>, FetchError> {
        let mut response = self.request_once(filter).await?;

        // Expired credentials: refresh and retry exactly once.
        if matches!(response.status().as_u16(), 401 | 403) {
            info!(
                "Fetch rejected with HTTP {}, re-authenticating",
                response.status()
            );
            self.auth.refresh().await?;
            response = self.request_once(filter).await?;
        }

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: EntriesResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        let total = payload.entries.len();
        let records: Vec<LogRecord> = payload
            .entries
            .into_iter()
            .filter_map(|raw| {
                let record = record::normalize(raw);
                if record.is_none() {
                    warn!("Skipping log entry with no metadata");
                }
                record
            })
            .collect();
        debug!("Fetched {} entries, normalized {}", total, records.len());
        Ok(records)
    }
}
