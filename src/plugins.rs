//! Installed plugins and the `name@version` manifest format.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// One installed plugin as reported by `pluginManager/api/json`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Plugin {
    /// Short plugin identifier used for installation.
    #[serde(rename = "shortName", default)]
    pub name: String,
    /// Human readable plugin title.
    #[serde(rename = "longName", default)]
    pub description: String,
    /// Installed version.
    #[serde(default)]
    pub version: String,
}

impl Plugin {
    /// Creates a plugin record.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            version: version.into(),
        }
    }

    /// Renders the manifest line `name@version`.
    #[must_use]
    pub fn manifest_entry(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PluginListing {
    #[serde(default)]
    pub(crate) plugins: Vec<Plugin>,
}

/// Renders a manifest with one `name@version` line per plugin.
#[must_use]
pub fn render_manifest(plugins: &[Plugin]) -> String {
    plugins.iter().fold(String::new(), |mut manifest, plugin| {
        manifest.push_str(&plugin.manifest_entry());
        manifest.push('\n');
        manifest
    })
}

/// Returns the non-blank, trimmed lines of a manifest.
#[must_use]
pub fn parse_manifest(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Builds the XML document asking Jenkins to install `entry`.
#[must_use]
pub fn install_request_body(entry: &str) -> String {
    format!(
        "<jenkins><install plugin=\"{}\" /></jenkins>",
        quick_xml::escape::escape(entry)
    )
}

/// Formats plugins as an aligned `Name | Version | Description` table.
#[must_use]
pub fn render_table(plugins: &[Plugin]) -> String {
    const HEADERS: [&str; 3] = ["NAME", "VERSION", "DESCRIPTION"];
    let [name_header, version_header, description_header] = HEADERS;

    let name_width = plugins
        .iter()
        .map(|plugin| plugin.name.chars().count())
        .chain(std::iter::once(name_header.len()))
        .max()
        .unwrap_or_default();
    let version_width = plugins
        .iter()
        .map(|plugin| plugin.version.chars().count())
        .chain(std::iter::once(version_header.len()))
        .max()
        .unwrap_or_default();

    let mut table = String::new();
    writeln!(
        table,
        "{name_header:<name_width$}  {version_header:<version_width$}  {description_header}"
    )
    .ok();
    for plugin in plugins {
        writeln!(
            table,
            "{:<name_width$}  {:<version_width$}  {}",
            plugin.name, plugin.version, plugin.description
        )
        .ok();
    }
    table
}
