//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;
use chrono::{Local, TimeZone};

use crate::logs::{FetchError, FetchFilter, LogLine, LogRecord, LogService, Severity};

/// A deterministic record; `index` varies the fields so lists are
/// distinguishable in assertions.
pub fn sample_record(index: usize) -> LogRecord {
    let severities = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];
    LogRecord {
        severity: severities[index % severities.len()],
        timestamp: Local.with_ymd_and_hms(2016, 3, 1, 12, 0, index as u32 % 60).single(),
        module: "frontend".to_string(),
        version: format!("2016030{}", index % 10),
        resource: format!("/api/widgets/{index}"),
        method: "GET".to_string(),
        status: "200".to_string(),
        lines: Vec::new(),
    }
}

pub fn sample_records(n: usize) -> Vec<LogRecord> {
    (0..n).map(sample_record).collect()
}

/// A record whose body has `n` numbered message lines, for elision tests.
pub fn record_with_lines(n: usize) -> LogRecord {
    let mut record = sample_record(0);
    record.lines = (0..n)
        .map(|i| LogLine {
            severity: Severity::Info,
            timestamp: Local.with_ymd_and_hms(2016, 3, 1, 12, 0, i as u32 % 60).single(),
            message: format!("line {i}"),
        })
        .collect();
    record
}

/// A log service that always returns the same records.
pub struct StaticLogService {
    pub records: Vec<LogRecord>,
}

#[async_trait]
impl LogService for StaticLogService {
    async fn fetch_latest(&self, _filter: &FetchFilter) -> Result<Vec<LogRecord>, FetchError> {
        Ok(self.records.clone())
    }
}

/// A log service that always fails.
pub struct FailingLogService;

#[async_trait]
impl LogService for FailingLogService {
    async fn fetch_latest(&self, _filter: &FetchFilter) -> Result<Vec<LogRecord>, FetchError> {
        Err(FetchError::Network("connection refused".to_string()))
    }
}
