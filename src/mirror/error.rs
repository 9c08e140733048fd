//! Error types for export and import workflows.

use thiserror::Error;

use crate::client::ClientError;
use crate::credentials::CredentialError;
use crate::store::StoreError;

/// Errors raised while mirroring jobs, plugins, or credentials.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum MirrorError {
    /// Raised when a server call fails.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// Raised when the local mirror cannot be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Raised when credentials cannot be encoded or scripts rendered.
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// One item that could not be imported.
#[derive(Debug, Eq, PartialEq)]
pub struct ImportFailure {
    /// Job name or plugin manifest entry.
    pub name: String,
    /// Cause of the failure.
    pub error: MirrorError,
}

/// Result of a fail-soft import run.
#[derive(Debug, Default, Eq, PartialEq)]
pub struct ImportSummary {
    /// Items imported successfully, in processing order.
    pub imported: Vec<String>,
    /// Items that failed, in processing order.
    pub failed: Vec<ImportFailure>,
}

impl ImportSummary {
    /// Returns `true` when no item failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of items attempted.
    #[must_use]
    pub const fn attempted(&self) -> usize {
        self.imported.len() + self.failed.len()
    }
}
