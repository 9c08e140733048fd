//! Export and import of jobs, plugins, and folder credentials.
//!
//! The orchestrator moves data between a [`JenkinsClient`] and a
//! [`LocalStore`]. Work is strictly sequential in listing order.
//!
//! Failure policy per operation:
//! - job export stops at the first failing job;
//! - job and plugin import attempt every item and report failures in an
//!   [`ImportSummary`];
//! - credential operations are a single round trip and fail as a whole.

mod error;

use tracing::{info, warn};

use crate::client::{JenkinsClient, Transport};
use crate::credentials::{Credentials, apply_script, decrypt_script, extract_credentials};
use crate::jobs::{Job, JobList};
use crate::plugins::{Plugin, parse_manifest, render_manifest};
use crate::store::LocalStore;
use crate::url::folder_path_from_url;

pub use error::{ImportFailure, ImportSummary, MirrorError};

/// A job together with the logical path of the folder that holds it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListedJob {
    /// Folder path such as `teamA/service1`; empty for the root.
    pub folder: String,
    /// The listed item.
    pub job: Job,
}

impl ListedJob {
    /// Full logical path of the item, such as `teamA/service1/build`.
    #[must_use]
    pub fn path(&self) -> String {
        if self.folder.is_empty() {
            self.job.name.clone()
        } else {
            format!("{}/{}", self.folder, self.job.name)
        }
    }
}

/// Coordinates server calls and local persistence for one invocation.
#[derive(Debug)]
pub struct MirrorOrchestrator<T: Transport> {
    client: JenkinsClient<T>,
    store: LocalStore,
}

impl<T: Transport> MirrorOrchestrator<T> {
    /// Creates an orchestrator over `client` and `store`.
    #[must_use]
    pub const fn new(client: JenkinsClient<T>, store: LocalStore) -> Self {
        Self { client, store }
    }

    /// Server client in use.
    #[must_use]
    pub const fn client(&self) -> &JenkinsClient<T> {
        &self.client
    }

    /// Local store in use.
    #[must_use]
    pub const fn store(&self) -> &LocalStore {
        &self.store
    }

    /// Writes the definition of every item in `folder` to the store.
    ///
    /// Folders are exported like any other item unless `skip_folders` is
    /// set. Returns the exported names in listing order.
    ///
    /// # Errors
    ///
    /// Stops at the first listing, fetch, or write failure and returns it.
    pub async fn export_jobs(
        &self,
        folder: &str,
        skip_folders: bool,
    ) -> Result<Vec<String>, MirrorError> {
        let jobs = self.listing(folder, skip_folders).await?;
        let mut exported = Vec::with_capacity(jobs.len());
        for job in &jobs {
            info!(job = %job.name, "exporting job");
            let config = self.client.fetch_config(&job.url).await?;
            let path = self.store.write_job_config(&job.name, &config)?;
            if job.is_folder() {
                info!(job = %job.name, "job is a folder");
            }
            info!(job = %job.name, %path, "job exported");
            exported.push(job.name.clone());
        }
        Ok(exported)
    }

    /// Creates every stored job inside `folder` on the server.
    ///
    /// Each job directory is attempted in name order. A job that cannot be
    /// read or created is recorded as a failure and the run continues.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Store`] when the jobs directory itself cannot
    /// be listed.
    pub async fn import_jobs(&self, folder: &str) -> Result<ImportSummary, MirrorError> {
        let mut summary = ImportSummary::default();
        for name in self.store.job_names()? {
            info!(job = %name, "importing job");
            match self.import_job(folder, &name).await {
                Ok(()) => summary.imported.push(name),
                Err(error) => {
                    warn!(job = %name, %error, "job import failed");
                    summary.failed.push(ImportFailure { name, error });
                }
            }
        }
        Ok(summary)
    }

    async fn import_job(&self, folder: &str, name: &str) -> Result<(), MirrorError> {
        let config = self.store.read_job_config(name)?;
        self.client.create_item(folder, name, config).await?;
        Ok(())
    }

    /// Lists the items in `folder`, labelled with their folder path.
    ///
    /// With `recursive`, the items of every folder reachable from `folder`
    /// follow, one folder at a time in depth-first order. Each folder is
    /// fetched once.
    ///
    /// # Errors
    ///
    /// Returns the first listing failure.
    pub async fn list_jobs(
        &self,
        folder: &str,
        recursive: bool,
        skip_folders: bool,
    ) -> Result<Vec<ListedJob>, MirrorError> {
        let top = self.client.list_folder(folder).await?;
        let mut listed = label(folder.trim_matches('/'), &top, skip_folders);
        if recursive {
            for (subfolder, children) in self.client.walk_folders(&top).await? {
                listed.extend(label(
                    &folder_path_from_url(&subfolder.url),
                    &children,
                    skip_folders,
                ));
            }
        }
        Ok(listed)
    }

    async fn listing(&self, folder: &str, skip_folders: bool) -> Result<JobList, MirrorError> {
        let jobs = self.client.list_folder(folder).await?;
        Ok(if skip_folders {
            jobs.without_folders()
        } else {
            jobs
        })
    }

    /// Writes the installed plugins to the manifest and returns them.
    ///
    /// # Errors
    ///
    /// Returns client errors from the plugin listing or store errors from
    /// writing the manifest.
    pub async fn export_plugins(&self) -> Result<Vec<Plugin>, MirrorError> {
        let plugins = self.client.list_plugins().await?;
        self.store.write_plugins_manifest(&render_manifest(&plugins))?;
        info!(
            count = plugins.len(),
            path = %self.store.plugins_file(),
            "plugin manifest written"
        );
        Ok(plugins)
    }

    /// Requests installation of every manifest entry.
    ///
    /// Blank lines are skipped. An entry the server rejects is recorded as a
    /// failure and the run continues.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Store`] when the manifest cannot be read.
    pub async fn import_plugins(&self) -> Result<ImportSummary, MirrorError> {
        let manifest = self.store.read_plugins_manifest()?;
        let mut summary = ImportSummary::default();
        for entry in parse_manifest(&manifest) {
            info!(plugin = %entry, "installing plugin");
            match self.client.install_plugin(&entry).await {
                Ok(()) => summary.imported.push(entry),
                Err(err) => {
                    warn!(plugin = %entry, error = %err, "plugin installation failed");
                    summary.failed.push(ImportFailure {
                        name: entry,
                        error: err.into(),
                    });
                }
            }
        }
        Ok(summary)
    }

    /// Reads the credentials of `folder` and has the server decrypt them.
    ///
    /// # Errors
    ///
    /// Returns client errors from fetching the folder or running the script,
    /// or [`MirrorError::Credential`] when the script output is not a
    /// credentials document.
    pub async fn decrypt_credentials(&self, folder: &str) -> Result<Credentials, MirrorError> {
        let folder_xml = self.client.fetch_folder_config(folder).await?;
        let credentials = extract_credentials(&folder_xml);
        info!(
            folder,
            userpass = credentials.userpass.len(),
            secretfile = credentials.secretfile.len(),
            "decrypting folder credentials"
        );
        let script = decrypt_script(&credentials)?;
        let output = self.client.execute_script(&script).await?;
        Ok(Credentials::from_json(output.trim())?)
    }

    /// Creates or updates `credentials` on `folder` and returns the script
    /// output.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Credential`] when `folder` is empty, or client
    /// errors from running the script.
    pub async fn apply_credentials(
        &self,
        folder: &str,
        credentials: &Credentials,
    ) -> Result<String, MirrorError> {
        let script = apply_script(credentials, folder)?;
        info!(
            folder,
            userpass = credentials.userpass.len(),
            secretfile = credentials.secretfile.len(),
            "applying folder credentials"
        );
        Ok(self.client.execute_script(&script).await?)
    }
}

fn label(folder: &str, jobs: &JobList, skip_folders: bool) -> Vec<ListedJob> {
    jobs.iter()
        .filter(|job| !(skip_folders && job.is_folder()))
        .map(|job| ListedJob {
            folder: folder.to_owned(),
            job: job.clone(),
        })
        .collect()
}
