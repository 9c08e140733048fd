//! CSRF crumbs and Groovy script execution.

use tracing::warn;

use super::{
    ClientError, HTTP_NOT_FOUND, HttpRequest, HttpResponse, JenkinsClient, RequestBody,
    Transport, reject_unauthorized, require_ok,
};

/// Anti-CSRF token that must accompany mutating requests.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Crumb {
    /// Header name, usually `Jenkins-Crumb`.
    pub header_name: String,
    /// Header value.
    pub header_value: String,
}

impl Crumb {
    /// Parses the `name:value` body returned by the crumb issuer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] when the body has no colon or an empty
    /// header name.
    pub fn parse(url: &str, body: &str) -> Result<Self, ClientError> {
        let decode_error = || ClientError::Decode {
            url: url.to_owned(),
            message: format!("expected `name:value` crumb, got {body:?}"),
        };
        let (name, value) = body.trim().split_once(':').ok_or_else(decode_error)?;
        if name.is_empty() {
            return Err(decode_error());
        }
        Ok(Self {
            header_name: name.to_owned(),
            header_value: value.to_owned(),
        })
    }
}

impl<T: Transport> JenkinsClient<T> {
    /// Requests a crumb from the server's crumb issuer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when crumb issuance is disabled,
    /// [`ClientError::Unauthorized`] for `401`,
    /// [`ClientError::UnexpectedStatus`] for any other non-`200` status, or
    /// [`ClientError::Decode`] when the body is not `name:value`.
    pub async fn fetch_crumb(&self) -> Result<Crumb, ClientError> {
        let url = format!(
            "{}/crumbIssuer/api/xml?xpath={}",
            self.server,
            urlencoding::encode("concat(//crumbRequestField,\":\",//crumb)")
        );
        let response = self.send(HttpRequest::get(url.as_str())).await?;
        reject_not_found(&url, &response)?;
        require_ok("fetch crumb", &url, &response)?;
        Crumb::parse(&url, &response.body)
    }

    /// Adds the crumb header to `request`.
    ///
    /// When the server has no crumb issuer the request is returned unchanged.
    pub(crate) async fn with_crumb(&self, request: HttpRequest) -> Result<HttpRequest, ClientError> {
        match self.fetch_crumb().await {
            Ok(crumb) => Ok(request.header(crumb.header_name, crumb.header_value)),
            Err(ClientError::NotFound { url }) => {
                warn!(%url, "crumb issuer not found; sending request without a crumb");
                Ok(request)
            }
            Err(err) => Err(err),
        }
    }

    /// Runs a Groovy `script` through the script console and returns its
    /// printed output.
    ///
    /// # Errors
    ///
    /// Returns crumb errors other than `404`, [`ClientError::Unauthorized`]
    /// for `401`, or [`ClientError::UnexpectedStatus`] for other non-`200`
    /// statuses.
    pub async fn execute_script(&self, script: &str) -> Result<String, ClientError> {
        let url = format!("{}/scriptText", self.server);
        let request = self
            .with_crumb(HttpRequest::post(url.as_str()))
            .await?
            .body(RequestBody::Form(vec![(
                String::from("script"),
                script.to_owned(),
            )]));
        let response = self.send(request).await?;
        require_ok("execute script", &url, &response)?;
        Ok(response.body)
    }
}

fn reject_not_found(url: &str, response: &HttpResponse) -> Result<(), ClientError> {
    reject_unauthorized(url, response)?;
    if response.status == HTTP_NOT_FOUND {
        return Err(ClientError::NotFound {
            url: url.to_owned(),
        });
    }
    Ok(())
}
