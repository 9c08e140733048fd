//! Jenkins HTTP client for item listings, configuration documents, plugins,
//! and remote script execution.
//!
//! Every call is a single blocking round trip from the caller's point of
//! view: requests are issued one at a time and there is no retry. The client
//! is generic over [`Transport`] so tests can replay recorded responses.

mod error;
mod script;
mod transport;

use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use crate::jobs::{Job, JobList};
use crate::plugins::{Plugin, PluginListing, install_request_body};
use crate::url::folder_url;

pub use error::ClientError;
pub use script::Crumb;
pub use transport::{
    BasicAuth, HttpRequest, HttpResponse, Method, ReqwestTransport, RequestBody, Transport,
    TransportError, TransportFuture, XML_CONTENT_TYPE,
};

/// Future returned by recursive client operations.
pub type ClientFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ClientError>> + 'a>>;

const HTTP_OK: u16 = 200;
const HTTP_UNAUTHORIZED: u16 = 401;
const HTTP_NOT_FOUND: u16 = 404;

/// Client bound to one Jenkins server and one set of credentials.
#[derive(Clone, Debug)]
pub struct JenkinsClient<T: Transport> {
    transport: T,
    server: String,
    auth: Option<BasicAuth>,
}

impl JenkinsClient<ReqwestTransport> {
    /// Convenience constructor wired to the real HTTP transport.
    #[must_use]
    pub fn with_reqwest(server: impl Into<String>, auth: Option<BasicAuth>) -> Self {
        Self::new(ReqwestTransport::new(), server, auth)
    }
}

impl<T: Transport> JenkinsClient<T> {
    /// Creates a client for `server`.
    ///
    /// Trailing slashes are removed from the server URL. Basic
    /// authentication is attached to every request when `auth` is set.
    #[must_use]
    pub fn new(transport: T, server: impl Into<String>, auth: Option<BasicAuth>) -> Self {
        Self {
            transport,
            server: server.into().trim_end_matches('/').to_owned(),
            auth,
        }
    }

    /// Base URL of the server.
    #[must_use]
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// URL of `folder` on this server; the empty folder is the root.
    #[must_use]
    pub fn folder_url(&self, folder: &str) -> String {
        folder_url(&self.server, folder)
    }

    async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, ClientError> {
        request.auth.clone_from(&self.auth);
        let url = request.url.clone();
        debug!(method = ?request.method, %url, "sending request");
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|err| ClientError::Transport {
                url: url.clone(),
                message: err.message,
            })?;
        debug!(status = response.status, %url, "received response");
        Ok(response)
    }

    /// Lists the items directly inside the item at `url`.
    ///
    /// A `401` is reported as [`ClientError::Unauthorized`]. Any other status
    /// is accepted and an undecodable or empty body yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] or [`ClientError::Transport`].
    pub async fn list_jobs(&self, url: &str) -> Result<JobList, ClientError> {
        let listing_url = format!("{}/api/xml", url.trim_end_matches('/'));
        let response = self.send(HttpRequest::get(listing_url.as_str())).await?;
        reject_unauthorized(&listing_url, &response)?;
        Ok(JobList::from_xml(&response.body))
    }

    /// Lists the items inside the folder at logical path `folder`.
    ///
    /// # Errors
    ///
    /// See [`JenkinsClient::list_jobs`].
    pub async fn list_folder(&self, folder: &str) -> Result<JobList, ClientError> {
        self.list_jobs(&self.folder_url(folder)).await
    }

    /// Collects every folder reachable from `jobs`, depth first.
    ///
    /// Each folder in `jobs` is followed by the folders found beneath it
    /// before the next sibling is visited. Non-folder items are never
    /// returned.
    ///
    /// # Errors
    ///
    /// The first listing error aborts the whole walk and is returned; no
    /// partial result accompanies it.
    pub fn subfolders_recursively<'a>(&'a self, jobs: &'a JobList) -> ClientFuture<'a, JobList> {
        Box::pin(async move {
            let walked = self.walk_folders(jobs).await?;
            Ok(walked.into_iter().map(|(folder, _)| folder).collect())
        })
    }

    /// Lists every folder reachable from `jobs`, depth first, paired with
    /// the items fetched from it.
    ///
    /// Each folder is requested exactly once.
    ///
    /// # Errors
    ///
    /// See [`JenkinsClient::subfolders_recursively`].
    pub fn walk_folders<'a>(
        &'a self,
        jobs: &'a JobList,
    ) -> ClientFuture<'a, Vec<(Job, JobList)>> {
        Box::pin(async move {
            let mut found = Vec::new();
            self.collect_subfolders(jobs, &mut found).await?;
            Ok(found)
        })
    }

    fn collect_subfolders<'a>(
        &'a self,
        jobs: &'a JobList,
        found: &'a mut Vec<(Job, JobList)>,
    ) -> ClientFuture<'a, ()> {
        Box::pin(async move {
            for folder in jobs.iter().filter(|job| job.is_folder()) {
                let children = self.list_jobs(&folder.url).await?;
                found.push((folder.clone(), children.clone()));
                self.collect_subfolders(&children, found).await?;
            }
            Ok(())
        })
    }

    /// Fetches the raw `config.xml` of the item at `item_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] for `401`,
    /// [`ClientError::UnexpectedStatus`] for any other non-`200` status, or
    /// [`ClientError::Transport`].
    pub async fn fetch_config(&self, item_url: &str) -> Result<String, ClientError> {
        let url = format!("{}/config.xml", item_url.trim_end_matches('/'));
        let response = self.send(HttpRequest::get(url.as_str())).await?;
        require_ok("fetch configuration", &url, &response)?;
        Ok(response.body)
    }

    /// Fetches the raw `config.xml` of the folder at logical path `folder`.
    ///
    /// # Errors
    ///
    /// See [`JenkinsClient::fetch_config`].
    pub async fn fetch_folder_config(&self, folder: &str) -> Result<String, ClientError> {
        self.fetch_config(&self.folder_url(folder)).await
    }

    /// Creates item `name` inside `folder` from a configuration document.
    ///
    /// The name is percent-encoded into the `createItem` query string. A
    /// crumb is requested first; when crumb issuance is disabled the request
    /// is sent without one.
    ///
    /// # Errors
    ///
    /// Returns any crumb error other than `404`, [`ClientError::Unauthorized`]
    /// for `401`, or [`ClientError::UnexpectedStatus`] for non-`200`
    /// responses (typically because the item already exists or uses a
    /// plugin missing on the server).
    pub async fn create_item(
        &self,
        folder: &str,
        name: &str,
        config_xml: String,
    ) -> Result<(), ClientError> {
        let url = format!(
            "{}/createItem?name={}",
            self.folder_url(folder),
            urlencoding::encode(name)
        );
        let request = self
            .with_crumb(HttpRequest::post(url.as_str()))
            .await?
            .body(RequestBody::Xml(config_xml));
        let response = self.send(request).await?;
        require_ok("create item", &url, &response)
    }

    /// Lists installed plugins.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] for `401`,
    /// [`ClientError::UnexpectedStatus`] for other non-`200` statuses, or
    /// [`ClientError::Decode`] when the JSON body cannot be read.
    pub async fn list_plugins(&self) -> Result<Vec<Plugin>, ClientError> {
        let url = format!("{}/pluginManager/api/json?depth=1", self.server);
        let response = self.send(HttpRequest::get(url.as_str())).await?;
        require_ok("list plugins", &url, &response)?;
        let listing: PluginListing =
            serde_json::from_str(&response.body).map_err(|err| ClientError::Decode {
                url: url.clone(),
                message: err.to_string(),
            })?;
        Ok(listing.plugins)
    }

    /// Asks the server to install the plugin described by a manifest entry
    /// such as `git@5.2.1`.
    ///
    /// # Errors
    ///
    /// Returns crumb errors other than `404`, [`ClientError::Unauthorized`]
    /// for `401`, or [`ClientError::UnexpectedStatus`] for non-`200`
    /// responses.
    pub async fn install_plugin(&self, entry: &str) -> Result<(), ClientError> {
        let url = format!("{}/pluginManager/installNecessaryPlugins", self.server);
        let request = self
            .with_crumb(HttpRequest::post(url.as_str()))
            .await?
            .body(RequestBody::Xml(install_request_body(entry)));
        let response = self.send(request).await?;
        require_ok("install plugin", &url, &response)
    }
}

fn reject_unauthorized(url: &str, response: &HttpResponse) -> Result<(), ClientError> {
    if response.status == HTTP_UNAUTHORIZED {
        return Err(ClientError::Unauthorized {
            url: url.to_owned(),
        });
    }
    Ok(())
}

fn require_ok(action: &str, url: &str, response: &HttpResponse) -> Result<(), ClientError> {
    reject_unauthorized(url, response)?;
    if response.status != HTTP_OK {
        return Err(ClientError::UnexpectedStatus {
            action: action.to_owned(),
            url: url.to_owned(),
            status: response.status,
        });
    }
    Ok(())
}
