//! Outbound request construction.
//!
//! Every lookup is turned into an [`OutboundRequest`] before anything touches
//! the network. The request is plain data, which keeps the wire format easy
//! to inspect and the [`Transport`](crate::Transport) free of lookup logic.

use crate::{lookup::BatchPayload, Config, LookupKind, Result};
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method};
use std::fmt;
use url::{form_urlencoded, Url};

/// Port every lookup is addressed to.
pub const DEFAULT_PORT: u16 = 443;

/// A fully-formed request, built per call and discarded after sending.
#[derive(Clone)]
pub struct OutboundRequest {
    /// `GET` for single lookups, `POST` for batches.
    pub method: Method,

    /// Service hostname, taken from the client configuration.
    pub host: String,

    /// Service port.
    pub port: u16,

    /// `/{api_version}/{endpoint}`.
    pub path: String,

    /// Query parameters in wire order.
    pub query_params: Vec<(String, String)>,

    /// Request headers. Empty for single lookups.
    pub headers: HeaderMap,

    /// JSON body for batches, `None` for single lookups.
    pub body: Option<String>,
}

/// What a lookup carries. The variant decides the verb, so a single value can
/// never be POSTed and a batch can never end up in the query string.
enum Payload<'a> {
    Single(&'a str),
    Batch(&'a BatchPayload),
}

impl OutboundRequest {
    /// Builds the GET request for one address or coordinate pair.
    pub(crate) fn single(config: &Config, kind: LookupKind, value: &str) -> Result<Self> {
        build(config, kind, Payload::Single(value))
    }

    /// Builds the POST request for a batch.
    pub(crate) fn batch(config: &Config, kind: LookupKind, payload: &BatchPayload) -> Result<Self> {
        build(config, kind, Payload::Batch(payload))
    }

    /// Returns the value of a query parameter, if present.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query_params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The HTTPS URL this request addresses, query string included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`](crate::Error::InvalidUrl) if the host is
    /// not a valid URL host.
    pub fn url(&self) -> Result<Url> {
        let base = Url::parse(&format!("https://{}:{}/", self.host, self.port))?;
        Ok(self.url_on(&base))
    }

    /// Places this request's path and query on top of `base`, keeping the
    /// scheme, host and port of `base`.
    pub fn url_on(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.set_path(&self.path);
        let query = self
            .query_params
            .iter()
            .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
            .collect::<Vec<_>>()
            .join("&");
        url.set_query(Some(&query));
        url
    }
}

/// Form-encodes a query component, spaces as `%20` rather than `+`.
///
/// The service decodes both forms the same way. A literal `+` is always
/// emitted as `%2B`, so every `+` left after form encoding is a space.
fn encode_component(component: &str) -> String {
    form_urlencoded::byte_serialize(component.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn build(config: &Config, kind: LookupKind, payload: Payload<'_>) -> Result<OutboundRequest> {
    let mut query_params = vec![
        ("api_key".to_string(), config.api_key().to_string()),
        ("fields".to_string(), config.fields().to_string()),
    ];
    let mut headers = HeaderMap::new();

    let (method, body) = match payload {
        Payload::Single(value) => {
            query_params.push(("q".to_string(), value.to_string()));
            (Method::GET, None)
        }
        Payload::Batch(batch) => {
            let body = batch.to_json()?;
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
            (Method::POST, Some(body))
        }
    };

    Ok(OutboundRequest {
        method,
        host: config.host().to_string(),
        port: DEFAULT_PORT,
        path: format!("/{}/{}", config.api_version(), kind.as_str()),
        query_params,
        headers,
        body,
    })
}

impl fmt::Debug for OutboundRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query: Vec<(&str, &str)> = self
            .query_params
            .iter()
            .map(|(k, v)| {
                if k == "api_key" {
                    (k.as_str(), "<redacted>")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();

        f.debug_struct("OutboundRequest")
            .field("method", &self.method)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("path", &self.path)
            .field("query_params", &query)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .finish()
    }
}
