//! Lookup dispatcher.
//!
//! The [`Client`] type is the main entry point for making lookups.
//! Use [`ClientBuilder`] to configure and create clients.

use crate::{
    config::Settings,
    lookup::{BatchPayload, LookupKind},
    transport::{RawResponse, ReqwestTransport, Transport},
    Config, Error, OutboundRequest, Response, Result,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// An async client for forward and reverse geocoding lookups.
///
/// The client is cheap to clone and safe to share across tasks; its
/// configuration is fixed once built. Every lookup issues exactly one request
/// and is never retried.
///
/// # Examples
///
/// ```no_run
/// use geocodio::{BatchPayload, Client, LookupKind};
///
/// # async fn example() -> Result<(), geocodio::Error> {
/// let client = Client::builder()
///     .api_key("YOUR_API_KEY")
///     .fields("timezone")
///     .build()?;
///
/// // Single lookup (GET)
/// let place = client
///     .lookup_single(LookupKind::Forward, "1600 Amphitheatre Parkway, Mountain View, CA 94043")
///     .await?;
/// println!("{}", place.data["results"][0]["location"]);
///
/// // Batch lookup (POST)
/// let batch = BatchPayload::labeled([
///     ("google", "37.422002,-122.084936"),
///     ("apple", "37.3312298,-122.011769"),
/// ]);
/// let places = client.lookup_batch(LookupKind::Reverse, batch).await?;
/// println!("{}", places.data);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: Config,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client over the default HTTPS transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self::with_transport(config, ReqwestTransport::new()?))
    }

    /// Creates a client that sends its requests through `transport`.
    pub fn with_transport(config: Config, transport: impl Transport + 'static) -> Self {
        Self::from_parts(config, Arc::new(transport))
    }

    fn from_parts(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(ClientInner { config, transport }),
        }
    }

    /// The configuration every lookup is built from.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Looks up a single address (forward) or `"lat,long"` pair (reverse)
    /// with a GET request.
    ///
    /// The value is sent as-is; malformed input is the service's to reject,
    /// and its rejection comes back as ordinary JSON in the response.
    ///
    /// # Errors
    ///
    /// * [`Error::Transport`] if the request could not be completed
    /// * [`Error::MalformedResponse`] if the body is not valid JSON
    pub async fn lookup_single(&self, kind: LookupKind, value: &str) -> Result<Response<Value>> {
        let request = OutboundRequest::single(&self.inner.config, kind, value)?;
        self.dispatch(kind, request, 1).await
    }

    /// Looks up a batch of inputs with a single POST request.
    ///
    /// A list comes back as per-item results in list order; a labeled batch
    /// comes back keyed by the same labels. The body is returned as parsed,
    /// without reordering.
    ///
    /// # Errors
    ///
    /// * [`Error::EmptyBatch`] if `payload` has no entries (nothing is sent)
    /// * [`Error::Transport`] if the request could not be completed
    /// * [`Error::MalformedResponse`] if the body is not valid JSON
    pub async fn lookup_batch(
        &self,
        kind: LookupKind,
        payload: impl Into<BatchPayload>,
    ) -> Result<Response<Value>> {
        let payload = payload.into();
        if payload.is_empty() {
            return Err(Error::EmptyBatch);
        }

        let request = OutboundRequest::batch(&self.inner.config, kind, &payload)?;
        self.dispatch(kind, request, payload.len()).await
    }

    /// Forward lookup of a single address.
    pub async fn geocode(&self, address: &str) -> Result<Response<Value>> {
        self.lookup_single(LookupKind::Forward, address).await
    }

    /// Reverse lookup of a single `"lat,long"` pair.
    pub async fn reverse(&self, lat_long: &str) -> Result<Response<Value>> {
        self.lookup_single(LookupKind::Reverse, lat_long).await
    }

    /// Forward lookup of a batch of addresses.
    pub async fn geocode_batch(&self, addresses: impl Into<BatchPayload>) -> Result<Response<Value>> {
        self.lookup_batch(LookupKind::Forward, addresses).await
    }

    /// Reverse lookup of a batch of `"lat,long"` pairs.
    pub async fn reverse_batch(&self, lat_longs: impl Into<BatchPayload>) -> Result<Response<Value>> {
        self.lookup_batch(LookupKind::Reverse, lat_longs).await
    }

    /// Sends one request and resolves its body. Exactly one transport call.
    async fn dispatch(
        &self,
        kind: LookupKind,
        request: OutboundRequest,
        batch_size: usize,
    ) -> Result<Response<Value>> {
        tracing::debug!(
            method = %request.method,
            host = %request.host,
            path = %request.path,
            kind = %kind,
            batch_size = batch_size,
            "Dispatching lookup"
        );

        let start_time = Instant::now();
        let raw = match self.inner.transport.execute(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    method = %request.method,
                    path = %request.path,
                    "Lookup failed"
                );
                return Err(e);
            }
        };

        parse_response(raw, start_time.elapsed())
    }
}

/// Parses the full body as JSON. The status code is passed through untouched.
fn parse_response(raw: RawResponse, latency: Duration) -> Result<Response<Value>> {
    let RawResponse {
        status,
        headers,
        body,
    } = raw;

    tracing::info!(
        status = status.as_u16(),
        latency_ms = latency.as_millis(),
        "Received lookup response"
    );

    if !status.is_success() {
        tracing::debug!(
            status = status.as_u16(),
            "Passing service-reported status through to the caller"
        );
    }

    match serde_json::from_str::<Value>(&body) {
        Ok(data) => Ok(Response::new(data, body, status, headers, latency)),
        Err(e) => {
            tracing::error!(
                error = %e,
                raw_response = %body,
                "Failed to parse lookup response"
            );

            Err(Error::MalformedResponse {
                raw_response: body,
                parse_error: e.to_string(),
            })
        }
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// Fields not set fall back to the defaults documented on
/// [`Config::from_settings`].
///
/// # Examples
///
/// ```no_run
/// use geocodio::ClientBuilder;
///
/// # fn example() -> Result<(), geocodio::Error> {
/// let client = ClientBuilder::new()
///     .api_key("YOUR_API_KEY")
///     .api_version("v1.7")
///     .fields("cd,stateleg")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    settings: Settings,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with nothing set.
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            transport: None,
        }
    }

    /// Sets the API key. Required.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.settings.api_key = Some(api_key.into());
        self
    }

    /// Overrides the service hostname.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.settings.host = Some(host.into());
        self
    }

    /// Overrides the versioned path segment.
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.settings.api_version = Some(api_version.into());
        self
    }

    /// Requests extra data fields, comma separated.
    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.settings.fields = Some(fields.into());
        self
    }

    /// Replaces every setting at once, e.g. with a record loaded from a file.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the transport requests are sent through.
    ///
    /// Defaults to [`ReqwestTransport::new`].
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigurationError`] if no API key was provided, or
    /// if the default transport cannot be built. The key is checked first.
    pub fn build(self) -> Result<Client> {
        let config = Config::from_settings(self.settings)?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };

        Ok(Client::from_parts(config, transport))
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use http::StatusCode;
    use std::sync::Mutex;

    /// Records every request and answers with a fixed outcome.
    struct RecordingTransport {
        requests: Arc<Mutex<Vec<OutboundRequest>>>,
        outcome: fn() -> Result<RawResponse>,
    }

    impl RecordingTransport {
        fn new(outcome: fn() -> Result<RawResponse>) -> (Self, Arc<Mutex<Vec<OutboundRequest>>>) {
            let requests = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    requests: requests.clone(),
                    outcome,
                },
                requests,
            )
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn execute(&self, request: &OutboundRequest) -> Result<RawResponse> {
            self.requests.lock().unwrap().push(request.clone());
            (self.outcome)()
        }
    }

    fn empty_results() -> Result<RawResponse> {
        Ok(RawResponse::ok(r#"{"results":[]}"#))
    }

    fn client_with(outcome: fn() -> Result<RawResponse>) -> (Client, Arc<Mutex<Vec<OutboundRequest>>>) {
        let (transport, requests) = RecordingTransport::new(outcome);
        let client = Client::builder()
            .api_key("KEY")
            .transport(transport)
            .build()
            .unwrap();
        (client, requests)
    }

    #[test]
    fn build_without_key_fails_before_transport_is_touched() {
        let (transport, requests) = RecordingTransport::new(empty_results);
        let result = Client::builder()
            .host("example.com")
            .api_version("v9")
            .fields("timezone")
            .transport(transport)
            .build();

        assert!(matches!(result, Err(Error::ConfigurationError(_))));
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn client_from_config_uses_given_transport() {
        let (transport, requests) = RecordingTransport::new(empty_results);
        let config = Config::new("KEY").unwrap();
        let client = Client::with_transport(config.clone(), transport);

        assert_eq!(client.config(), &config);
        client.geocode_batch(["A"]).await.unwrap();
        assert_eq!(requests.lock().unwrap().len(), 1);

        let client = Client::new(config.clone()).unwrap();
        assert_eq!(client.config(), &config);
    }

    #[tokio::test]
    async fn single_lookup_sends_one_get() {
        let (client, requests) = client_with(empty_results);

        let response = client
            .lookup_single(LookupKind::Forward, "1600 Amphitheatre Parkway, Mountain View, CA 94043")
            .await
            .unwrap();
        assert_eq!(response.data, serde_json::json!({ "results": [] }));

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, http::Method::GET);
        assert_eq!(requests[0].path, "/v1.3/geocode");
        assert!(requests[0].body.is_none());
    }

    #[tokio::test]
    async fn batch_lookup_sends_one_post() {
        let (client, requests) = client_with(empty_results);

        client.reverse_batch(vec!["1,2", "3,4"]).await.unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, http::Method::POST);
        assert_eq!(requests[0].path, "/v1.3/reverse");
        assert_eq!(requests[0].body.as_deref(), Some(r#"["1,2","3,4"]"#));
    }

    #[tokio::test]
    async fn empty_batch_is_rejected_without_sending() {
        let (client, requests) = client_with(empty_results);

        let result = client.geocode_batch(Vec::<String>::new()).await;
        assert!(matches!(result, Err(Error::EmptyBatch)));

        let result = client
            .geocode_batch(BatchPayload::labeled(Vec::<(String, String)>::new()))
            .await;
        assert!(matches!(result, Err(Error::EmptyBatch)));

        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_json_bodies_are_malformed_responses() {
        fn empty_body() -> Result<RawResponse> {
            Ok(RawResponse::ok(""))
        }
        fn truncated_body() -> Result<RawResponse> {
            Ok(RawResponse::ok(r#"{"results":[{"formatted_address":"1600 Amphi"#))
        }

        for outcome in [empty_body as fn() -> Result<RawResponse>, truncated_body] {
            let (client, _) = client_with(outcome);
            let expected_raw = outcome().unwrap().body;

            match client.geocode("anything").await {
                Err(Error::MalformedResponse {
                    raw_response,
                    parse_error,
                }) => {
                    assert_eq!(raw_response, expected_raw);
                    assert!(!parse_error.is_empty());
                }
                other => panic!("Expected MalformedResponse, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn transport_failure_is_not_retried() {
        fn refused() -> Result<RawResponse> {
            Err(Error::Transport(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))))
        }

        let (client, requests) = client_with(refused);
        let err = client.reverse("37.422002,-122.084936").await.unwrap_err();

        assert!(err.is_transport());
        let source = std::error::Error::source(&err).expect("cause is kept");
        assert_eq!(source.to_string(), "connection refused");
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn service_reported_errors_are_returned_as_data() {
        fn forbidden() -> Result<RawResponse> {
            Ok(RawResponse {
                status: StatusCode::FORBIDDEN,
                headers: http::HeaderMap::new(),
                body: r#"{"error":"Invalid API key"}"#.to_string(),
            })
        }

        let (client, requests) = client_with(forbidden);
        let response = client.geocode("anything").await.unwrap();

        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(response.data["error"], "Invalid API key");
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_lookups_share_one_config() {
        let (client, requests) = client_with(empty_results);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let client = client.clone();
                tokio::spawn(async move { client.geocode(&format!("{} Main St", i)).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 8);
        assert!(requests.iter().all(|r| r.query_param("api_key") == Some("KEY")));
    }
}
