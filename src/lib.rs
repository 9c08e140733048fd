//! Core library for the Butler Jenkins mirroring tool.
//!
//! The crate exports jobs, plugins, and folder credentials from a Jenkins
//! server to local files and imports them into another server. A
//! [`JenkinsClient`] performs the HTTP calls, a [`LocalStore`] holds the
//! on-disk mirror, and the [`MirrorOrchestrator`] sequences the two.

pub mod client;
pub mod config;
pub mod credentials;
pub mod jobs;
pub mod logging;
pub mod mirror;
pub mod plugins;
pub mod store;
pub mod test_support;
pub mod url;

pub use client::{
    BasicAuth, ClientError, Crumb, HttpRequest, HttpResponse, JenkinsClient, ReqwestTransport,
    Transport, TransportError,
};
pub use config::{ButlerConfig, ConfigError, ConfigOverrides, Connection};
pub use credentials::{CredentialError, Credentials, SecretFile, UsernamePassword};
pub use jobs::{Job, JobList};
pub use logging::LogConfig;
pub use mirror::{ImportFailure, ImportSummary, ListedJob, MirrorError, MirrorOrchestrator};
pub use plugins::Plugin;
pub use store::{LocalStore, StoreError};
pub use url::{ensure_protocol, folder_path_from_url, folder_url};
