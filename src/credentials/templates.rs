//! Groovy script templates executed through the script console.
//!
//! Every substituted value is base64 encoded before it is placed into the
//! script, so payloads can never break out of the single-quoted literal that
//! holds the placeholder.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::{CredentialError, Credentials};

const CREDENTIALS_PLACEHOLDER: &str = "{{CREDENTIALS}}";
const FOLDER_PLACEHOLDER: &str = "{{FOLDER}}";

/// A Groovy script with named placeholders.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScriptTemplate {
    name: &'static str,
    source: &'static str,
}

impl ScriptTemplate {
    /// Script that decrypts every credential value in its payload and prints
    /// the resulting exchange document.
    pub const DECRYPT: Self = Self {
        name: "decrypt",
        source: include_str!("scripts/decrypt.groovy"),
    };

    /// Script that creates or updates credentials on a folder.
    pub const APPLY: Self = Self {
        name: "apply",
        source: include_str!("scripts/apply.groovy"),
    };

    /// Template name used in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Replaces each `(placeholder, value)` pair with the base64 encoding of
    /// `value`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Template`] when a placeholder does not
    /// occur in the template.
    pub fn render(&self, substitutions: &[(&str, &str)]) -> Result<String, CredentialError> {
        let mut script = self.source.to_owned();
        for (placeholder, value) in substitutions {
            if !script.contains(placeholder) {
                return Err(CredentialError::Template {
                    template: self.name.to_owned(),
                    placeholder: (*placeholder).to_owned(),
                });
            }
            script = script.replacen(placeholder, &STANDARD.encode(value), 1);
        }
        Ok(script)
    }
}

/// Renders the script that decrypts `credentials` on the server.
///
/// # Errors
///
/// Returns [`CredentialError`] if the payload cannot be serialised or the
/// template is malformed.
pub fn decrypt_script(credentials: &Credentials) -> Result<String, CredentialError> {
    let payload = credentials.to_json()?;
    ScriptTemplate::DECRYPT.render(&[(CREDENTIALS_PLACEHOLDER, payload.as_str())])
}

/// Renders the script that stores `credentials` on `folder`.
///
/// Leading and trailing slashes are removed from the folder path, which is
/// then looked up by its full name on the server.
///
/// # Errors
///
/// Returns [`CredentialError::MissingFolder`] when `folder` is empty, or
/// another [`CredentialError`] if rendering fails.
pub fn apply_script(credentials: &Credentials, folder: &str) -> Result<String, CredentialError> {
    let folder_name = folder.trim_matches('/');
    if folder_name.is_empty() {
        return Err(CredentialError::MissingFolder);
    }
    let payload = credentials.to_json()?;
    ScriptTemplate::APPLY.render(&[
        (FOLDER_PLACEHOLDER, folder_name),
        (CREDENTIALS_PLACEHOLDER, payload.as_str()),
    ])
}
