//! Response wrapper that keeps the parsed body next to the raw one.
//!
//! The service reports its own failures (bad address, bad key, quota) as
//! ordinary JSON, so a [`Response`] is returned whenever the body parsed,
//! whatever the status code. Inspect [`Response::status`] or the body itself
//! to tell a result from a service-reported error.

use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// A lookup result.
///
/// # Examples
///
/// ```no_run
/// use geocodio::{Client, LookupKind};
///
/// # async fn example() -> Result<(), geocodio::Error> {
/// let client = Client::builder().api_key("YOUR_API_KEY").build()?;
///
/// let response = client
///     .lookup_single(LookupKind::Forward, "1600 Amphitheatre Parkway, Mountain View, CA 94043")
///     .await?;
///
/// if let Some(error) = response.data.get("error") {
///     eprintln!("Service rejected the lookup ({}): {}", response.status, error);
/// } else {
///     println!("Results: {}", response.data["results"]);
/// }
/// println!("Lookup took {:?}", response.latency);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The parsed response body.
    pub data: T,

    /// The raw response body as received.
    pub raw_body: String,

    /// The HTTP status code. Not interpreted by the client.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from dispatch until the body was fully received.
    pub latency: Duration,
}

impl<T> Response<T> {
    pub fn new(
        data: T,
        raw_body: String,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
    ) -> Self {
        Self {
            data,
            raw_body,
            status,
            headers,
            latency,
        }
    }

    /// Maps the response data to a different type, keeping the metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// # use geocodio::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     serde_json::json!({ "results": [1, 2] }),
    ///     r#"{"results":[1,2]}"#.to_string(),
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     Duration::from_millis(40),
    /// );
    ///
    /// let count = response.map(|v| v["results"].as_array().map_or(0, Vec::len));
    /// assert_eq!(count.data, 2);
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            raw_body: self.raw_body,
            status: self.status,
            headers: self.headers,
            latency: self.latency,
        }
    }

    /// Returns a header value by name, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

impl<T> AsRef<T> for Response<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let response = Response::new((), String::new(), StatusCode::OK, headers, Duration::ZERO);

        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn deref_reaches_the_data() {
        let response = Response::new(
            vec![1, 2, 3],
            "[1,2,3]".to_string(),
            StatusCode::OK,
            HeaderMap::new(),
            Duration::ZERO,
        );
        assert_eq!(response.len(), 3);
    }
}
