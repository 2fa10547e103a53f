//! # Authentication
//!
//! Bearer tokens come from the local gcloud credentials store; when the
//! provider rejects a token (401/403) the service asks the authenticator
//! to refresh, which shells out to `gcloud auth login`.
//!
//! The [`Authenticator`] trait exists so the fetch service can be tested
//! against a mock server without touching the filesystem or spawning
//! subprocesses.

use async_trait::async_trait;
use log::{info, warn};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

#[derive(Debug)]
pub enum AuthError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// No credential entry matched the configured account.
    MissingCredentials(String),
    /// The re-login subprocess failed or exited non-zero.
    Refresh(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Io(e) => write!(f, "credentials I/O error: {e}"),
            AuthError::Parse(e) => write!(f, "credentials parse error: {e}"),
            AuthError::MissingCredentials(account) => {
                write!(f, "no credentials found for {account}")
            }
            AuthError::Refresh(msg) => write!(f, "re-authentication failed: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns a bearer token for the log API.
    async fn token(&self) -> Result<String, AuthError>;

    /// Re-acquires credentials after an authorization failure.
    async fn refresh(&self) -> Result<(), AuthError>;
}

// ============================================================================
// gcloud credentials file
// ============================================================================

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    data: Vec<CredentialEntry>,
}

#[derive(Debug, Deserialize)]
struct CredentialEntry {
    key: CredentialKey,
    credential: CredentialToken,
}

#[derive(Debug, Deserialize)]
struct CredentialKey {
    #[serde(default)]
    account: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CredentialToken {
    #[serde(default)]
    access_token: Option<String>,
}

/// Reads access tokens from `~/.config/gcloud/credentials` and refreshes
/// them by running `gcloud auth login`.
pub struct GcloudAuthenticator {
    account: Option<String>,
    credentials_path: PathBuf,
}

impl GcloudAuthenticator {
    pub fn new(account: Option<String>) -> Self {
        let credentials_path = dirs::home_dir()
            .unwrap_or_default()
            .join(".config")
            .join("gcloud")
            .join("credentials");
        Self {
            account,
            credentials_path,
        }
    }

    fn account_label(&self) -> &str {
        self.account.as_deref().unwrap_or("<any account>")
    }
}

#[async_trait]
impl Authenticator for GcloudAuthenticator {
    async fn token(&self) -> Result<String, AuthError> {
        let contents = tokio::fs::read_to_string(&self.credentials_path)
            .await
            .map_err(AuthError::Io)?;
        let credentials: CredentialsFile =
            serde_json::from_str(&contents).map_err(AuthError::Parse)?;

        // Without a configured account, the first usable entry wins.
        credentials
            .data
            .into_iter()
            .find(|entry| match (&self.account, &entry.key.account) {
                (Some(wanted), Some(found)) => wanted == found,
                (Some(_), None) => false,
                (None, _) => true,
            })
            .and_then(|entry| entry.credential.access_token)
            .ok_or_else(|| AuthError::MissingCredentials(self.account_label().to_string()))
    }

    async fn refresh(&self) -> Result<(), AuthError> {
        info!("Re-authenticating via gcloud auth login ({})", self.account_label());
        let mut command = Command::new("gcloud");
        command.arg("auth").arg("login");
        if let Some(account) = &self.account {
            command.arg(account);
        }
        // gcloud writes progress to the terminal we own; discard it.
        let status = command
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| AuthError::Refresh(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            warn!("gcloud auth login exited with {status}");
            Err(AuthError::Refresh(format!("gcloud exited with {status}")))
        }
    }
}
