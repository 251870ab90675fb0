use std::fmt;

/// Error type for lookup calls.
///
/// Every variant is recoverable: reconciliation treats any of them as
/// "no result" for the row being processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Service location missing from configuration
    NotConfigured(String),
    /// Network/transport error
    Network(String),
    /// Request exceeded the configured timeout
    Timeout(String),
    /// HTTP error with status code and (truncated) body
    Http(u16, String),
    /// Response body was not the expected JSON
    Parse(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::NotConfigured(msg) => write!(f, "Not configured: {}", msg),
            LookupError::Network(msg) => write!(f, "Network error: {}", msg),
            LookupError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            LookupError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            LookupError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for LookupError {}
