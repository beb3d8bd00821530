//! HTTP client wrapper for the Congress API.

use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::config::API_KEY_HEADER;
use crate::error::{FetchError, Result};

/// User agent string identifying this harvester.
const USER_AGENT: &str = concat!("congress-harvester/", env!("CARGO_PKG_VERSION"));

/// Create a configured HTTP client.
///
/// Timeouts and connection handling are left at the client defaults.
pub fn create_client() -> Result<Client> {
    let client = Client::builder().user_agent(USER_AGENT).build()?;
    Ok(client)
}

/// Perform a single authenticated GET and return the body of a 200 response.
///
/// Any other status is reported as [`FetchError::Status`]. There is no retry.
pub fn get_bytes(
    client: &Client,
    url: &str,
    api_key: &str,
) -> std::result::Result<Vec<u8>, FetchError> {
    tracing::debug!(url, "GET");

    let response = client.get(url).header(API_KEY_HEADER, api_key).send()?;

    let status = response.status();
    if status != StatusCode::OK {
        tracing::debug!(url, status = %status, "Non-200 response");
        return Err(FetchError::Status {
            status: status.as_u16(),
        });
    }

    Ok(response.bytes()?.to_vec())
}
