//! # Log Source
//!
//! Everything about getting logs *into* the dashboard: the normalized
//! record shape, the fetch service boundary, and authentication.
//! The core never talks to the network; it holds a [`FetchFilter`] and
//! the dispatch loop hands that filter to a [`LogService`] when a
//! re-fetch effect fires.

pub mod auth;
pub mod record;
pub mod service;

pub use record::{LogLine, LogRecord, Severity};
pub use service::{CloudLogService, FetchError, LogService};

use std::fmt;
use std::str::FromStr;

/// Minimum-severity filter applied at fetch time. `All` means no
/// severity clause is sent to the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LevelFilter {
    #[default]
    All,
    AtLeast(Severity),
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelFilter::All => f.write_str("ALL"),
            LevelFilter::AtLeast(sev) => f.write_str(sev.label()),
        }
    }
}

impl FromStr for LevelFilter {
    type Err = record::ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("ALL") {
            return Ok(LevelFilter::All);
        }
        s.parse::<Severity>().map(LevelFilter::AtLeast)
    }
}

/// Filter options consumed by the fetch collaborator. Held in core state
/// (the `logServiceConfig` of the store) but only interpreted here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFilter {
    pub min_level: LevelFilter,
    /// Substring match on the request resource path.
    pub resource: Option<String>,
    pub page_size: u32,
}

impl Default for FetchFilter {
    fn default() -> Self {
        Self {
            min_level: LevelFilter::All,
            resource: None,
            page_size: 100,
        }
    }
}
