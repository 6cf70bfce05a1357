//! The network seam.
//!
//! [`Transport`] is the only place a lookup touches the network. The client
//! builds an [`OutboundRequest`], hands it over, and gets the whole response
//! body back as text. Anything about sockets, TLS, pooling or timeouts lives
//! behind this trait.

use crate::{Error, OutboundRequest, Result};
use async_trait::async_trait;
use http::{HeaderMap, StatusCode};
use url::Url;

/// A response as delivered by a [`Transport`], body fully read.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Status reported by the service. Passed through, never interpreted.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// The complete response body.
    pub body: String,
}

impl RawResponse {
    /// A `200 OK` response with the given body and no headers.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// Executes an [`OutboundRequest`] and returns the full response body.
///
/// Implementations must report connection-level failures as
/// [`Error::Transport`] and must not retry on their own.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use geocodio::{OutboundRequest, RawResponse, Result, Transport};
///
/// struct Canned;
///
/// #[async_trait]
/// impl Transport for Canned {
///     async fn execute(&self, _request: &OutboundRequest) -> Result<RawResponse> {
///         Ok(RawResponse::ok(r#"{"results":[]}"#))
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &OutboundRequest) -> Result<RawResponse>;
}

/// Default [`Transport`] backed by `reqwest`.
///
/// Requests go to `https://{host}:{port}` as given by the request itself,
/// unless an endpoint override is set with [`ReqwestTransport::with_endpoint`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
    endpoint: Option<Url>,
}

impl ReqwestTransport {
    /// Creates a transport that talks HTTPS to the request's host and port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigurationError`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let http_client = reqwest::Client::builder().build().map_err(|e| {
            Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            http_client,
            endpoint: None,
        })
    }

    /// Sends every request to `endpoint` (scheme, host and port) instead of
    /// the host named in the request. Useful for local servers and proxies.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn with_endpoint(endpoint: impl AsRef<str>) -> Result<Self> {
        let endpoint = Url::parse(endpoint.as_ref())?;
        if endpoint.cannot_be_a_base() {
            return Err(Error::ConfigurationError(format!(
                "Endpoint '{}' cannot be used as a base URL",
                endpoint
            )));
        }

        Ok(Self {
            endpoint: Some(endpoint),
            ..Self::new()?
        })
    }

    /// Wraps an existing `reqwest::Client`, e.g. one with a proxy or timeout.
    pub fn from_client(http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            endpoint: None,
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &OutboundRequest) -> Result<RawResponse> {
        let url = match &self.endpoint {
            Some(endpoint) => request.url_on(endpoint),
            None => request.url()?,
        };

        let mut builder = self
            .http_client
            .request(request.method.clone(), url)
            .headers(request.headers.clone());

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
