//! HTTP retrieval of remote CSV sources.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use tracing::debug;

use crate::error::{IngestError, Result};

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Download `url` into memory, refusing bodies larger than `max_size`.
pub fn fetch_bytes(url: &str, max_size: u64) -> Result<Vec<u8>> {
    let request_error = |source| IngestError::Request {
        url: url.to_string(),
        source,
    };
    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(request_error)?;

    debug!(url, "fetching table");
    let response = client
        .get(url)
        .header(
            USER_AGENT,
            format!("tidy-observatory/{}", env!("CARGO_PKG_VERSION")),
        )
        .send()
        .map_err(request_error)?;

    if !response.status().is_success() {
        return Err(IngestError::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }
    if let Some(length) = response.content_length() {
        check_size(url, length, max_size)?;
    }

    let body = response.bytes().map_err(request_error)?;
    check_size(url, body.len() as u64, max_size)?;
    debug!(url, bytes = body.len(), "fetched table");
    Ok(body.to_vec())
}

fn check_size(url: &str, size: u64, max_size: u64) -> Result<()> {
    if size > max_size {
        return Err(IngestError::TooLarge {
            origin: url.to_string(),
            size,
            max_size,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_size() {
        assert!(check_size("https://example.org/a.csv", 10, 10).is_ok());
        let err = check_size("https://example.org/a.csv", 11, 10).unwrap_err();
        assert!(matches!(err, IngestError::TooLarge { size: 11, .. }));
    }

    #[test]
    fn test_connection_refused_is_request_error() {
        let err = fetch_bytes("http://127.0.0.1:9/pop.csv", 1024).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Request { ref url, .. } if url == "http://127.0.0.1:9/pop.csv"
        ));
    }
}
