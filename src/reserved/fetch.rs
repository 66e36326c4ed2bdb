// src/reserved/fetch.rs
// =============================================================================
// Downloads the reserved-name list.
//
// The community-maintained list lives on raw.githubusercontent.com as a plain
// JSON array. Fetching it is optional: the CLI does it once at startup when
// asked to, otherwise the bundled copy is used.
//
// Rust concepts:
// - async functions: For network I/O
// - Result: For error handling, with the ? operator converting errors
// =============================================================================

use std::time::Duration;

use reqwest::Client;
use tracing::info;

use super::{ReservedError, ReservedNames};

/// Where the upstream list is published
pub const DEFAULT_RESERVED_URL: &str =
    "https://raw.githubusercontent.com/Mottie/github-reserved-names/master/reserved-names.json";

// Fetches and parses a reserved-name list
//
// Parameters:
//   url: address of a JSON array of strings
//
// Returns: the parsed list, or an error if the request fails, the server
// answers with a non-2xx status, or the body is not a JSON array of strings
pub async fn fetch_reserved_names(url: &str) -> Result<ReservedNames, ReservedError> {
    let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ReservedError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    let names = ReservedNames::from_json(&body)?;
    info!(url, count = names.len(), "fetched reserved names");
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_is_a_fetch_error() {
        // Port 9 on localhost: nothing listens there in a test environment
        let err = fetch_reserved_names("http://127.0.0.1:9/reserved-names.json")
            .await
            .unwrap_err();
        assert!(matches!(err, ReservedError::Fetch(_)));
    }

    #[test]
    fn test_default_url_points_at_json() {
        assert!(DEFAULT_RESERVED_URL.starts_with("https://raw.githubusercontent.com/"));
        assert!(DEFAULT_RESERVED_URL.ends_with(".json"));
    }
}
