//! Bill lookups against the Congress API.

use reqwest::blocking::Client;

use crate::config::bill_url;
use crate::error::FetchError;
use crate::http::get_bytes;
use crate::types::{ApiResponse, BillKey};

/// Fetch and decode the lookup response for one bill.
///
/// The API-level `status` field is not inspected here; a decoded
/// `{"status": "ERROR"}` body is still a successful fetch.
///
/// # Arguments
/// * `client` - HTTP client to use
/// * `base_url` - API base URL (e.g. `https://api.propublica.org/congress/v1`)
/// * `api_key` - Value for the `X-API-KEY` header
/// * `key` - Chamber, number and session of the bill
pub fn fetch_bill(
    client: &Client,
    base_url: &str,
    api_key: &str,
    key: &BillKey,
) -> Result<ApiResponse, FetchError> {
    let url = bill_url(base_url, key.session, key.chamber, key.number);
    let bytes = get_bytes(client, &url, api_key)?;
    decode_response(&bytes)
}

/// Decode a lookup response body.
pub fn decode_response(bytes: &[u8]) -> Result<ApiResponse, FetchError> {
    Ok(serde_json::from_slice(bytes)?)
}
