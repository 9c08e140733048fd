//! Shared fixtures for folder discovery scenarios.

use butler::test_support::{FOLDER_CLASS, ScriptedTransport, WORKFLOW_CLASS, job_listing_xml};
use butler::{BasicAuth, ClientError, JenkinsClient};
use rstest::fixture;

pub const SERVER: &str = "https://jenkins.example.com";

#[derive(Clone, Debug)]
pub enum DiscoveryOutcome {
    Found(Vec<String>),
    Failed(ClientError),
}

#[derive(Clone, Debug)]
pub struct DiscoveryContext {
    pub transport: ScriptedTransport,
    pub outcome: Option<DiscoveryOutcome>,
}

impl DiscoveryContext {
    pub fn client(&self) -> JenkinsClient<ScriptedTransport> {
        JenkinsClient::new(
            self.transport.clone(),
            SERVER,
            Some(BasicAuth::new("admin", "token")),
        )
    }

    /// Queues a listing of `folders` below the item at `parent_path`.
    pub fn push_folders(&self, parent_path: &str, folders: &[&str]) {
        let urls: Vec<String> = folders
            .iter()
            .map(|name| item_url(&format!("{parent_path}/job/{name}")))
            .collect();
        let entries: Vec<(&str, &str, &str)> = folders
            .iter()
            .zip(&urls)
            .map(|(name, url)| (FOLDER_CLASS, *name, url.as_str()))
            .collect();
        self.transport.push_ok(job_listing_xml(&entries));
    }

    /// Queues a listing holding a single pipeline job.
    pub fn push_job(&self, parent_path: &str, name: &str) {
        let url = item_url(&format!("{parent_path}/job/{name}"));
        self.transport
            .push_ok(job_listing_xml(&[(WORKFLOW_CLASS, name, url.as_str())]));
    }
}

pub fn item_url(path: &str) -> String {
    format!("{SERVER}{path}/")
}

pub fn split_names(names: &str) -> Vec<&str> {
    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

#[fixture]
pub fn discovery_context() -> DiscoveryContext {
    DiscoveryContext {
        transport: ScriptedTransport::new(),
        outcome: None,
    }
}
