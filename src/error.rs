//! Error types for geocoding lookups.
//!
//! The taxonomy is intentionally small. A lookup either fails before it is
//! sent (configuration, payload encoding), while it is in flight (transport),
//! or after the body arrived but could not be parsed as JSON. Anything the
//! service reports inside a well-formed JSON body is *not* an error here; it
//! is handed back to the caller as ordinary data.

/// Boxed error type used to carry the underlying cause of a transport failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for geocoding lookups.
///
/// # Examples
///
/// ```no_run
/// use geocodio::{Client, Error, LookupKind};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder().api_key("YOUR_API_KEY").build()?;
///
/// match client.lookup_single(LookupKind::Forward, "1 Infinite Loop").await {
///     Ok(response) => println!("Result: {}", response.data),
///     Err(Error::MalformedResponse { raw_response, parse_error }) => {
///         eprintln!("Service sent something that is not JSON: {}", raw_response);
///         eprintln!("Parse error: {}", parse_error);
///     }
///     Err(Error::Transport(cause)) => eprintln!("Could not reach the service: {}", cause),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Invalid configuration was provided.
    ///
    /// Raised when the API key is missing or blank, or when the transport
    /// could not be set up. No request is ever sent in this case.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The underlying connection failed (DNS, TCP, TLS, premature close).
    ///
    /// The original cause is kept and available through
    /// [`std::error::Error::source`].
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// The response body arrived but is not valid JSON.
    ///
    /// # Fields
    ///
    /// * `raw_response` - The raw response body as received
    /// * `parse_error` - The error message from serde_json
    #[error("Malformed response: {parse_error}")]
    MalformedResponse {
        /// The raw response body that failed to parse
        raw_response: String,
        /// The serde_json error message
        parse_error: String,
    },

    /// Failed to encode a batch payload as JSON.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// A batch lookup was attempted with no entries.
    #[error("Batch lookup requires at least one entry")]
    EmptyBatch,

    /// A lookup kind name was not recognised.
    #[error("Unknown lookup kind '{0}'. Supported kinds: geocode, reverse.")]
    UnknownLookupKind(String),

    /// The configured host does not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// The request URL carries the API key in its query string, so it is
/// stripped before the error can reach a caller or a log line.
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(Box::new(err.without_url()))
    }
}

impl Error {
    /// Returns `true` if the request never completed at the transport level.
    ///
    /// # Examples
    ///
    /// ```
    /// use geocodio::Error;
    ///
    /// let err = Error::Transport("connection reset".into());
    /// assert!(err.is_transport());
    ///
    /// let err = Error::EmptyBatch;
    /// assert!(!err.is_transport());
    /// ```
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::MalformedResponse { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

/// A specialized `Result` type for geocoding lookups.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn transport_error_keeps_its_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = Error::Transport(Box::new(cause));

        let source = err.source().expect("transport errors carry a source");
        assert_eq!(source.to_string(), "refused");
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn raw_response_only_for_malformed_bodies() {
        let err = Error::MalformedResponse {
            raw_response: "<html>".to_string(),
            parse_error: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(err.raw_response(), Some("<html>"));
        assert!(!err.is_transport());

        let err = Error::ConfigurationError("API key is required".to_string());
        assert_eq!(err.raw_response(), None);
    }
}
