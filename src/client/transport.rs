//! HTTP transport abstraction used by the Jenkins client.
//!
//! The client only speaks in terms of [`HttpRequest`] and [`HttpResponse`] so
//! tests can replay canned server responses without a network. Every response
//! body is read to completion before it is handed back, which releases the
//! underlying connection on every path.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

/// Content type sent with XML request bodies.
pub const XML_CONTENT_TYPE: &str = "text/xml";

/// HTTP verbs used against Jenkins.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

/// Username and password for HTTP Basic authentication.
#[derive(Clone, Eq, PartialEq)]
pub struct BasicAuth {
    /// Account name.
    pub username: String,
    /// Password or API token.
    pub password: String,
}

impl BasicAuth {
    /// Creates credentials from a username and password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Payload attached to a request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RequestBody {
    /// Raw XML document sent as `text/xml`.
    Xml(String),
    /// URL-encoded form fields.
    Form(Vec<(String, String)>),
}

/// A single request to the Jenkins server.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HttpRequest {
    /// Verb to use.
    pub method: Method,
    /// Absolute request URL.
    pub url: String,
    /// Extra headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// Basic authentication, when configured.
    pub auth: Option<BasicAuth>,
    /// Optional payload.
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            auth: None,
            body: None,
        }
    }

    /// Starts a `GET` request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Starts a `POST` request.
    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attaches a body.
    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the first header value matching `name`, ignoring ASCII case.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and fully drained body of a response.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HttpResponse {
    /// Numeric HTTP status.
    pub status: u16,
    /// Response body decoded as text.
    pub body: String,
}

impl HttpResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Raised when a request never produced an HTTP response.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{message}")]
pub struct TransportError {
    /// Description of the connection or protocol failure.
    pub message: String,
}

impl TransportError {
    /// Creates a transport error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Future returned by [`Transport::send`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a>>;

/// Sends requests and returns their complete responses.
pub trait Transport {
    /// Performs `request` and waits for the whole response body.
    fn send(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// Production transport backed by `reqwest`.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default `reqwest` client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing `reqwest` client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
        Box::pin(async move {
            let method = match request.method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
            };
            let mut builder = self.client.request(method, request.url.as_str());
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(auth) = &request.auth {
                builder = builder.basic_auth(&auth.username, Some(&auth.password));
            }
            builder = match request.body {
                Some(RequestBody::Xml(document)) => builder
                    .header(CONTENT_TYPE, XML_CONTENT_TYPE)
                    .body(document),
                Some(RequestBody::Form(fields)) => builder.form(&fields),
                None => builder,
            };

            let response = builder
                .send()
                .await
                .map_err(|err| TransportError::new(err.to_string()))?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|err| TransportError::new(err.to_string()))?;
            Ok(HttpResponse { status, body })
        })
    }
}
