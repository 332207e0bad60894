//! Error types for the remote catalog client.

use thiserror::Error;

/// Errors that can occur while talking to the remote catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The service rejected the supplied credentials.
    ///
    /// Rejection is signaled in-band by the response body, not by an HTTP
    /// status code, so this never carries a status.
    #[error("authorization failed: the service rejected the credentials")]
    AuthorizationRejected,

    /// Network-level error (DNS resolution, connection refused, TLS, or a
    /// failure mid-stream while reading a download body).
    #[error("network error calling {url}: {source}")]
    Network {
        /// The endpoint URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout calling {url}")]
    Timeout {
        /// The endpoint URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} calling {url}")]
    HttpStatus {
        /// The endpoint URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body did not match the catalit protocol (malformed XML,
    /// missing attribute, non-UTF-8 payload).
    #[error("protocol error: {detail}")]
    Protocol {
        /// What was wrong with the response.
        detail: String,
    },
}

impl CatalogError {
    /// Creates a network error from a reqwest error, classifying timeouts.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a protocol error.
    pub fn protocol(detail: impl Into<String>) -> Self {
        Self::Protocol {
            detail: detail.into(),
        }
    }
}

// No `From<reqwest::Error>`: the variants need the endpoint URL for
// context, which the source error does not carry. Callers go through
// the helper constructors instead.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_rejected_display() {
        let msg = CatalogError::AuthorizationRejected.to_string();
        assert!(msg.contains("authorization failed"), "got: {msg}");
    }

    #[test]
    fn test_http_status_display() {
        let err = CatalogError::http_status("https://example.com/pages/catalit_browser/", 502);
        let msg = err.to_string();
        assert!(msg.contains("502"), "got: {msg}");
        assert!(msg.contains("catalit_browser"), "got: {msg}");
    }

    #[test]
    fn test_protocol_display() {
        let err = CatalogError::protocol("missing 'sid' attribute");
        assert!(err.to_string().contains("missing 'sid'"));
    }
}
