//! # Log Records
//!
//! The normalized log shape consumed by the core and the renderer.
//! Raw provider entries (Cloud Logging `entries:list` payloads) are
//! deserialized into `RawEntry` and flattened into [`LogRecord`] here;
//! nothing downstream of this module ever sees provider JSON.
//!
//! Records are immutable once produced: the core reorders and replaces
//! the containing `Vec`, never the records themselves.

use chrono::{DateTime, Local, Utc};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Request/line severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSeverityError(pub String);

impl fmt::Display for ParseSeverityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown severity: {}", self.0)
    }
}

impl std::error::Error for ParseSeverityError {}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    /// Case-insensitive. `DEFAULT` (the provider's name for unleveled
    /// entries) parses as `Debug`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" | "DEFAULT" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "WARNING" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "CRITICAL" => Ok(Severity::Critical),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

/// One application log line attached to a request entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub severity: Severity,
    pub timestamp: Option<DateTime<Local>>,
    pub message: String,
}

/// A normalized request-log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub severity: Severity,
    /// Local-time-normalized request timestamp, if the entry carried one.
    pub timestamp: Option<DateTime<Local>>,
    pub module: String,
    pub version: String,
    pub resource: String,
    pub method: String,
    /// HTTP status as text (`"---"` when absent) so the renderer can
    /// column-align it without re-deriving.
    pub status: String,
    /// Application log lines, ordered by line timestamp.
    pub lines: Vec<LogLine>,
}

// ============================================================================
// Raw provider payload (entries:list response shape)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawEntry {
    #[serde(default)]
    pub metadata: Option<RawMetadata>,
    #[serde(default, rename = "httpRequest")]
    pub http_request: Option<RawHttpRequest>,
    #[serde(default, rename = "protoPayload")]
    pub proto_payload: Option<RawPayload>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawMetadata {
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawHttpRequest {
    #[serde(default)]
    pub status: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawPayload {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default, rename = "moduleId")]
    pub module_id: Option<String>,
    #[serde(default, rename = "versionId")]
    pub version_id: Option<String>,
    #[serde(default)]
    pub line: Option<Vec<RawLine>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawLine {
    #[serde(default, rename = "logMessage")]
    pub log_message: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

// ============================================================================
// Normalization
// ============================================================================

/// Parse a provider RFC 3339 UTC timestamp into local time.
fn normalize_timestamp(raw: Option<&str>) -> Option<DateTime<Local>> {
    raw?.parse::<DateTime<Utc>>()
        .ok()
        .map(|ts| ts.with_timezone(&Local))
}

/// Flatten a raw entry into a [`LogRecord`].
///
/// Returns `None` only when the entry carries no metadata at all —
/// callers skip such entries rather than failing the whole fetch.
pub(crate) fn normalize(raw: RawEntry) -> Option<LogRecord> {
    let metadata = raw.metadata?;
    let severity = metadata
        .severity
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or(Severity::Debug);
    let timestamp = normalize_timestamp(metadata.timestamp.as_deref());

    let status = raw
        .http_request
        .and_then(|r| r.status)
        .map(|s| s.to_string())
        .unwrap_or_else(|| "---".to_string());

    let payload = raw.proto_payload.unwrap_or_default();
    let mut lines: Vec<LogLine> = payload
        .line
        .unwrap_or_default()
        .into_iter()
        .map(|line| LogLine {
            severity: line
                .severity
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Severity::Debug),
            timestamp: normalize_timestamp(line.time.as_deref()),
            message: line.log_message.unwrap_or_default(),
        })
        .collect();
    lines.sort_by_key(|line| line.timestamp);

    Some(LogRecord {
        severity,
        timestamp,
        module: payload.module_id.unwrap_or_default(),
        version: payload.version_id.unwrap_or_default(),
        resource: payload.resource.unwrap_or_default(),
        method: payload.method.unwrap_or_default(),
        status,
        lines,
    })
}
