//! # geocodio - An async client for the geocod.io API
//!
//! Turns forward (address to coordinates) and reverse (coordinates to
//! address) lookups into HTTP calls, one value at a time or in batches, and
//! hands back the service's JSON as parsed data.
//!
//! ## Quick Start
//!
//! ```no_run
//! use geocodio::{BatchPayload, Client, LookupKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), geocodio::Error> {
//!     let client = Client::builder()
//!         .api_key(std::env::var("GEOCODIO_API_KEY").unwrap_or_default())
//!         .build()?;
//!
//!     // One address, sent as a GET
//!     let response = client
//!         .lookup_single(LookupKind::Forward, "1600 Amphitheatre Parkway, Mountain View, CA 94043")
//!         .await?;
//!     println!("Location: {}", response.data["results"][0]["location"]);
//!     println!("Lookup took {:?}", response.latency);
//!
//!     // Several coordinates, sent as one POST
//!     let response = client
//!         .lookup_batch(
//!             LookupKind::Reverse,
//!             vec!["37.422002,-122.084936", "52.303899,4.750026"],
//!         )
//!         .await?;
//!     println!("Batch: {}", response.data);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Single and batch lookups** - GET with the value in the query string, or POST with a JSON array or labeled object
//! - **Typed inputs** - A single value and a [`BatchPayload`] go through separate calls, so the verb always matches the payload
//! - **Immutable configuration** - Defaults for host, API version and fields merged once at build time
//! - **Pluggable transport** - The network sits behind the [`Transport`] trait; `reqwest` is the default
//! - **Automatic logging** - Structured logging with `tracing`, API key redacted
//!
//! ## Error Handling
//!
//! A lookup fails only when the request could not be completed or the body
//! is not JSON. Errors the service reports in JSON (invalid address, invalid
//! key, quota) are returned as ordinary data:
//!
//! ```no_run
//! use geocodio::{Client, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::builder().api_key("YOUR_API_KEY").build()?;
//! match client.geocode("not really an address").await {
//!     Ok(response) if response.data.get("error").is_some() => {
//!         eprintln!("Service said no ({}): {}", response.status, response.data["error"]);
//!     }
//!     Ok(response) => println!("Results: {}", response.data["results"]),
//!     Err(Error::MalformedResponse { raw_response, parse_error }) => {
//!         eprintln!("Not JSON ({}): {}", parse_error, raw_response);
//!     }
//!     Err(e) => eprintln!("Lookup failed: {}", e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! There are no retries, no rate limiting and no caching. Each call issues
//! exactly one request.

mod client;
pub mod config;
mod error;
mod lookup;
mod request;
mod response;
pub mod transport;

pub use client::{Client, ClientBuilder};
pub use config::{Config, Settings};
pub use error::{BoxError, Error, Result};
pub use lookup::{BatchPayload, LookupKind};
pub use request::OutboundRequest;
pub use response::Response;
pub use transport::{RawResponse, ReqwestTransport, Transport};
