// Shared blocking HTTP plumbing for both clients.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;

use crate::error::LookupError;

pub(crate) const USER_AGENT: &str = concat!("fundcheck/", env!("CARGO_PKG_VERSION"));

/// Longest body excerpt carried in an error message.
const BODY_EXCERPT_CHARS: usize = 200;

pub(crate) fn build_client(timeout: Duration) -> Result<Client, LookupError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| LookupError::Network(format!("failed to build HTTP client: {}", e)))
}

/// Send a request and parse a 2xx body as JSON.
pub(crate) fn send_json(request: RequestBuilder) -> Result<Value, LookupError> {
    let response = request.send().map_err(classify)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(LookupError::Http(status.as_u16(), excerpt(&body)));
    }

    // Read as text first: some upstreams prefix JSON with a BOM
    let text = response.text().map_err(classify)?;
    let trimmed = text.trim_start_matches('\u{feff}');
    serde_json::from_str(trimmed)
        .map_err(|e| LookupError::Parse(format!("{} (body: {})", e, excerpt(trimmed))))
}

fn classify(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        LookupError::Timeout(err.to_string())
    } else {
        LookupError::Network(err.to_string())
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

/// Read an identifier that upstreams send either as a number or a string.
/// Empty strings count as absent.
pub(crate) fn json_scalar(value: &Value) -> Option<String> {
    value
        .as_i64()
        .map(|n| n.to_string())
        .or_else(|| value.as_u64().map(|n| n.to_string()))
        .or_else(|| value.as_str().map(String::from))
        .filter(|s| !s.is_empty())
}
