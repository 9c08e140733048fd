//! Folder credentials: extraction from folder XML, the JSON exchange format,
//! and the Groovy scripts that decrypt or apply them on the server.
//!
//! Ciphertext is never decrypted locally. Values travel between the folder
//! XML and JSON untouched; only the rendered scripts, running inside Jenkins,
//! can reveal them.

mod templates;
mod xml;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub use templates::{ScriptTemplate, apply_script, decrypt_script};
pub use xml::extract_credentials;

/// Errors raised while encoding credentials or rendering scripts.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum CredentialError {
    /// Raised when the JSON exchange document cannot be read or written.
    #[error("invalid credentials JSON: {message}")]
    Json {
        /// Parser message.
        message: String,
    },
    /// Raised when a script template lacks one of its placeholders.
    #[error("script template {template} has no {placeholder} placeholder")]
    Template {
        /// Template name.
        template: String,
        /// Placeholder that was expected.
        placeholder: String,
    },
    /// Raised when credentials are applied without a target folder.
    #[error("a target folder is required to apply credentials")]
    MissingFolder,
}

/// Username and password credential as stored in a folder.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct UsernamePassword {
    /// Credential identifier.
    #[serde(default)]
    pub id: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Account name.
    #[serde(default)]
    pub username: String,
    /// Password, ciphertext unless decrypted by the server.
    #[serde(default)]
    pub password: String,
}

/// Secret file credential as stored in a folder.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretFile {
    /// Credential identifier.
    #[serde(default)]
    pub id: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Name of the file presented to builds.
    #[serde(default)]
    pub file_name: String,
    /// File content, ciphertext unless decrypted by the server.
    #[serde(default)]
    pub secret_bytes: String,
    /// Base64 form of the decrypted content, filled in by the decrypt script
    /// and consumed by the apply script.
    #[serde(default)]
    pub encoded_secret_bytes: String,
}

/// Credentials of one folder, split by kind.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Credentials {
    /// Username and password credentials in document order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub userpass: Vec<UsernamePassword>,
    /// Secret file credentials in document order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub secretfile: Vec<SecretFile>,
}

impl Credentials {
    /// Returns `true` when neither collection has entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.userpass.is_empty() && self.secretfile.is_empty()
    }

    /// Reads the `{userpass, secretfile}` exchange document.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Json`] when `input` is not a valid
    /// document.
    pub fn from_json(input: &str) -> Result<Self, CredentialError> {
        serde_json::from_str(input).map_err(json_error)
    }

    /// Writes the compact exchange document.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Json`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, CredentialError> {
        serde_json::to_string(self).map_err(json_error)
    }

    /// Writes the exchange document with indentation.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Json`] if serialisation fails.
    pub fn to_json_pretty(&self) -> Result<String, CredentialError> {
        serde_json::to_string_pretty(self).map_err(json_error)
    }
}

fn json_error(err: serde_json::Error) -> CredentialError {
    CredentialError::Json {
        message: err.to_string(),
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
