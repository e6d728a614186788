//! Server URL validation utilities
//!
//! Synthesis servers are usually internal hosts, so private and loopback addresses are
//! accepted. Only the shape of the URL is checked:
//! - Scheme must be HTTP or HTTPS
//! - A host must be present
//! - No query string or fragment, since endpoint paths are appended to the base URL

use thiserror::Error;
use url::Url;

/// Errors that can occur during URL validation
#[derive(Debug, Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(#[from] url::ParseError),

    #[error("URL scheme must be HTTP or HTTPS, got: {0}")]
    UnsupportedScheme(String),

    #[error("URL must have a host")]
    MissingHost,

    #[error("Base URL must not carry a query or fragment")]
    UnexpectedSuffix,
}

/// Trim surrounding whitespace and every trailing `/`.
///
/// Endpoint paths such as `/tts` are appended directly to the result.
pub fn normalize_server_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Validates a synthesis server base URL
///
/// # Example
/// ```rust
/// use voice_relay::utils::validate_server_url;
///
/// assert!(validate_server_url("http://10.0.0.5:9880").is_ok());
/// assert!(validate_server_url("ftp://10.0.0.5").is_err());
/// ```
pub fn validate_server_url(url: &str) -> Result<(), UrlValidationError> {
    let parsed = Url::parse(url)?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::UnsupportedScheme(other.to_string())),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(UrlValidationError::UnexpectedSuffix);
    }

    Ok(())
}
