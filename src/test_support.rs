//! Test support utilities shared across unit and integration tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt::Write as _;
use std::rc::Rc;

use quick_xml::escape::escape;

use crate::client::{HttpRequest, HttpResponse, Transport, TransportError, TransportFuture};

/// Item class reported for plain folders.
pub const FOLDER_CLASS: &str = "com.cloudbees.hudson.plugins.folder.Folder";

/// Item class reported for pipeline jobs.
pub const WORKFLOW_CLASS: &str = "org.jenkinsci.plugins.workflow.job.WorkflowJob";

/// Crumb header name returned by [`ScriptedTransport::push_crumb`].
pub const CRUMB_HEADER: &str = "Jenkins-Crumb";

/// Crumb value returned by [`ScriptedTransport::push_crumb`].
pub const CRUMB_VALUE: &str = "0123456789abcdef";

/// Folder definition holding one username/password credential with id
/// `test` and one secret file credential with id `kubeconfig`.
pub const FOLDER_CONFIG_XML: &str = r#"<?xml version='1.1' encoding='UTF-8'?>
<com.cloudbees.hudson.plugins.folder.Folder plugin="cloudbees-folder@6.858.v898218f3609d">
  <actions/>
  <description>Team folder</description>
  <properties>
    <com.cloudbees.hudson.plugins.folder.properties.FolderCredentialsProvider_-FolderCredentialsProperty>
      <domainCredentialsMap class="hudson.util.CopyOnWriteMap$Hash">
        <entry>
          <com.cloudbees.plugins.credentials.domains.Domain plugin="credentials@1311.vcf0a_900b_37c2">
            <specifications/>
          </com.cloudbees.plugins.credentials.domains.Domain>
          <java.util.concurrent.CopyOnWriteArrayList>
            <com.cloudbees.plugins.credentials.impl.UsernamePasswordCredentialsImpl plugin="credentials@1311.vcf0a_900b_37c2">
              <scope>GLOBAL</scope>
              <id>test</id>
              <description>deploy account</description>
              <username>deployer</username>
              <password>{AQAAABAAAAAQ1UuHpGOfPVd1ENbwMDUyG0ybrSGDsKhtsNGhvXB3uDg=}</password>
              <usernameSecret>false</usernameSecret>
            </com.cloudbees.plugins.credentials.impl.UsernamePasswordCredentialsImpl>
            <org.jenkinsci.plugins.plaincredentials.impl.FileCredentialsImpl plugin="plain-credentials@143.v1b_df8b_d3b_e48">
              <scope>GLOBAL</scope>
              <id>kubeconfig</id>
              <description>cluster access</description>
              <fileName>config.yaml</fileName>
              <secretBytes>{8tBZL7kDFQ2Yd1Hh6z2vL5lMuVqC0JmY4Q==}</secretBytes>
            </org.jenkinsci.plugins.plaincredentials.impl.FileCredentialsImpl>
          </java.util.concurrent.CopyOnWriteArrayList>
        </entry>
      </domainCredentialsMap>
    </com.cloudbees.hudson.plugins.folder.properties.FolderCredentialsProvider_-FolderCredentialsProperty>
  </properties>
  <folderViews class="com.cloudbees.hudson.plugins.folder.views.DefaultFolderViewHolder">
    <views>
      <hudson.model.AllView>
        <owner class="com.cloudbees.hudson.plugins.folder.Folder" reference="../../../.."/>
        <name>All</name>
        <filterExecutors>false</filterExecutors>
        <filterQueue>false</filterQueue>
      </hudson.model.AllView>
    </views>
  </folderViews>
</com.cloudbees.hudson.plugins.folder.Folder>
"#;

#[derive(Clone, Debug)]
enum Scripted {
    Response(HttpResponse),
    Failure(TransportError),
}

/// Scripted transport that returns pre-seeded responses in FIFO order and
/// records every request it receives.
#[derive(Clone, Debug, Default)]
pub struct ScriptedTransport {
    responses: Rc<RefCell<VecDeque<Scripted>>>,
    requests: Rc<RefCell<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    /// Creates a transport with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all requests recorded so far.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    /// Returns the URLs of all requests recorded so far.
    #[must_use]
    pub fn urls(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }

    /// Number of queued responses not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.responses.borrow().len()
    }

    /// Queues a response with the given status and body.
    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        self.responses
            .borrow_mut()
            .push_back(Scripted::Response(HttpResponse::new(status, body)));
    }

    /// Queues a `200` response.
    pub fn push_ok(&self, body: impl Into<String>) {
        self.push_response(200, body);
    }

    /// Queues an empty response with the given status.
    pub fn push_status(&self, status: u16) {
        self.push_response(status, "");
    }

    /// Queues a crumb issuer response.
    pub fn push_crumb(&self) {
        self.push_ok(format!("{CRUMB_HEADER}:{CRUMB_VALUE}"));
    }

    /// Queues a `404` from the crumb issuer, as sent when CSRF protection is
    /// disabled.
    pub fn push_no_crumb(&self) {
        self.push_status(404);
    }

    /// Queues a connection failure.
    pub fn push_error(&self, message: impl Into<String>) {
        self.responses
            .borrow_mut()
            .push_back(Scripted::Failure(TransportError::new(message)));
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
        self.requests.borrow_mut().push(request);
        let queued = self.responses.borrow_mut().pop_front();
        let next = match queued {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Failure(error)) => Err(error),
            None => Err(TransportError::new("no scripted response available")),
        };
        Box::pin(async move { next })
    }
}

/// Renders an `api/xml` listing with one `job` element per
/// `(class, name, url)` triple.
#[must_use]
pub fn job_listing_xml(jobs: &[(&str, &str, &str)]) -> String {
    let mut body = String::from("<hudson _class=\"hudson.model.Hudson\">");
    for (class, name, url) in jobs {
        write!(
            body,
            "<job _class=\"{}\"><name>{}</name><url>{}</url></job>",
            escape(*class),
            escape(*name),
            escape(*url)
        )
        .ok();
    }
    body.push_str("</hudson>");
    body
}

/// Renders a minimal pipeline job definition carrying `description`.
#[must_use]
pub fn job_config_xml(description: &str) -> String {
    format!(
        "<?xml version='1.1' encoding='UTF-8'?>\n<flow-definition plugin=\"workflow-job\"><description>{}</description><keepDependencies>false</keepDependencies></flow-definition>\n",
        escape(description)
    )
}
