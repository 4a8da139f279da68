use thiserror::Error;

/// Top-level error type for the `wix-api` crate.
///
/// Splits failures into two families: the remote service answered with a
/// structured failure ([`Api`](Self::Api), [`Authentication`](Self::Authentication)),
/// or the call never produced a usable answer (transport, URL, decoding).
/// [`is_upstream`](Self::is_upstream) tells them apart.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Key or account id rejected by Wix (HTTP 401 / 403).
    #[error("Authentication failed (HTTP {status}): {message}")]
    Authentication { status: u16, message: String },

    /// Credential material cannot be encoded as an HTTP header.
    #[error("Invalid value for header {header}: {reason}")]
    InvalidHeader { header: String, reason: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The `reqwest::Client` could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Wix API ─────────────────────────────────────────────────────
    /// Non-2xx response from Wix, parsed from its error envelope when possible.
    #[error("Wix API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        /// `details.applicationError.code` from the envelope, if present.
        code: Option<String>,
        /// Raw response body, kept for diagnostics.
        body: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the remote API produced this error as a
    /// structured failure response.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Authentication { .. })
    }

    /// Returns `true` if the credentials were rejected.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Authentication { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Extract the Wix application error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_classification() {
        let api = Error::Api {
            status: 400,
            message: "bad filter".into(),
            code: Some("INVALID_FILTER".into()),
            body: None,
        };
        let auth = Error::Authentication {
            status: 401,
            message: "unauthorized".into(),
        };
        let decode = Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        };

        assert!(api.is_upstream());
        assert!(auth.is_upstream());
        assert!(!decode.is_upstream());

        assert!(auth.is_auth_failure());
        assert!(!api.is_auth_failure());

        assert_eq!(api.status(), Some(400));
        assert_eq!(auth.status(), Some(401));
        assert_eq!(decode.status(), None);
        assert_eq!(api.api_error_code(), Some("INVALID_FILTER"));
    }

    #[test]
    fn display_includes_status_and_message() {
        let err = Error::Api {
            status: 503,
            message: "Service Unavailable".into(),
            code: None,
            body: None,
        };
        assert_eq!(err.to_string(), "Wix API error (HTTP 503): Service Unavailable");
    }
}
