//! Forward and reverse lookups, single and batched.
//!
//! This example shows how to:
//! - Build a client from an API key in the environment
//! - Look up one address or coordinate pair (GET)
//! - Look up a list or a labeled set of inputs in one call (POST)
//! - Tell service-reported errors apart from results
//!
//! Run with: `GEOCODIO_API_KEY=... cargo run --example lookups`

use geocodio::{BatchPayload, Client, Error, LookupKind, Response};
use serde_json::Value;

fn report(label: &str, response: &Response<Value>) {
    match response.data.get("error") {
        Some(error) => println!("{label}: service error ({}): {error}", response.status),
        None => println!(
            "{label}: {} bytes in {:?}",
            response.raw_body.len(),
            response.latency
        ),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("geocodio=debug,lookups=info")
        .init();

    let api_key = std::env::var("GEOCODIO_API_KEY").unwrap_or_default();
    let client = Client::builder().api_key(api_key).build()?;

    println!("=== Forward lookup ===");
    let response = client
        .lookup_single(
            LookupKind::Forward,
            "1600 Amphitheatre Parkway, Mountain View, CA 94043",
        )
        .await?;
    report("single address", &response);
    println!("Location: {}", response.data["results"][0]["location"]);
    println!();

    println!("=== Forward batch, list ===");
    let addresses = vec![
        "1600 Amphitheatre Parkway, Mountain View, CA 94043",
        "One Microsoft Way, Redmond, WA 98052",
        "One Apple Park Way, Cupertino, CA 95014",
    ];
    let response = client.lookup_batch(LookupKind::Forward, addresses).await?;
    report("address list", &response);
    println!();

    println!("=== Forward batch, labeled ===");
    let addresses = BatchPayload::labeled([
        ("ADDRESS_ID1", "1600 Amphitheatre Parkway, Mountain View, CA 94043"),
        ("ADDRESS_ID2", "One Microsoft Way, Redmond, WA 98052"),
        ("ADDRESS_ID3", "One Apple Park Way, Cupertino, CA 95014"),
    ]);
    let response = client.lookup_batch(LookupKind::Forward, addresses).await?;
    report("labeled addresses", &response);
    println!();

    println!("=== Reverse lookup ===");
    let response = client
        .lookup_single(LookupKind::Reverse, "37.422002,-122.084936")
        .await?;
    report("single lat/long", &response);
    println!();

    println!("=== Reverse batch ===");
    let lat_longs = vec![
        "37.422002,-122.084936",
        "52.303899,4.750026",
        "37.3312298,-122.011769",
    ];
    let response = client.lookup_batch(LookupKind::Reverse, lat_longs).await?;
    report("lat/long list", &response);

    Ok(())
}
