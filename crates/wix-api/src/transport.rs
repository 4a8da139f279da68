// Shared transport configuration and response decoding.
//
// `WixClient` and any generic request executor built on top of this crate
// go through the same client builder and the same error classification.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::Error;

const DEFAULT_USER_AGENT: &str = concat!("wix-sites/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
///
/// No timeout is applied unless one is configured explicitly; the
/// transport defaults govern otherwise.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl TransportConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build a plain `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        self.build_client_with_headers(HeaderMap::new())
    }

    /// Build a `reqwest::Client` with additional default headers.
    ///
    /// Used by [`WixClient`](crate::WixClient) to inject the credential headers.
    pub fn build_client_with_headers(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
            .default_headers(headers);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))
    }
}

// ── Response handling ────────────────────────────────────────────────

/// Error envelope returned by Wix REST endpoints.
#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<ErrorDetails>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDetails {
    #[serde(default)]
    application_error: Option<ApplicationError>,
}

#[derive(Deserialize)]
struct ApplicationError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Decode a successful JSON response, or classify a failed one.
pub async fn decode_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(parse_error(status, resp).await);
    }

    let body = resp.text().await?;
    debug!(status = status.as_u16(), bytes = body.len(), "response received");

    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

/// Turn a non-2xx response into an [`Error`].
///
/// 401 and 403 become [`Error::Authentication`]; everything else becomes
/// [`Error::Api`], with the message taken from the Wix envelope when the
/// body parses as one.
pub async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();
    let (message, code) = envelope_message(&raw).unwrap_or_else(|| {
        let fallback = if raw.is_empty() {
            status.to_string()
        } else {
            raw.clone()
        };
        (fallback, None)
    });

    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return Error::Authentication {
            status: status.as_u16(),
            message,
        };
    }

    Error::Api {
        status: status.as_u16(),
        message,
        code,
        body: (!raw.is_empty()).then_some(raw),
    }
}

fn envelope_message(raw: &str) -> Option<(String, Option<String>)> {
    let envelope: ErrorEnvelope = serde_json::from_str(raw).ok()?;
    let app = envelope.details.and_then(|d| d.application_error);
    let (code, description) = match app {
        Some(app) => (app.code, app.description),
        None => (None, None),
    };
    let message = envelope
        .message
        .filter(|m| !m.is_empty())
        .or(description)?;
    Some((message, code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_prefers_top_level_message() {
        let raw = r#"{"message":"Invalid filter","details":{"applicationError":{"code":"BAD_FILTER","description":"filter is malformed"}}}"#;
        let (message, code) = envelope_message(raw).expect("envelope parses");

        assert_eq!(message, "Invalid filter");
        assert_eq!(code.as_deref(), Some("BAD_FILTER"));
    }

    #[test]
    fn envelope_falls_back_to_description() {
        let raw = r#"{"message":"","details":{"applicationError":{"code":"X","description":"described"}}}"#;
        let (message, _) = envelope_message(raw).expect("envelope parses");

        assert_eq!(message, "described");
    }

    #[test]
    fn non_json_body_is_not_an_envelope() {
        assert!(envelope_message("Bad Gateway").is_none());
        assert!(envelope_message("{}").is_none());
    }

    #[test]
    fn default_config_has_no_timeout() {
        let config = TransportConfig::default();
        assert!(config.timeout.is_none());
        assert!(config.build_client().is_ok());

        let config = config.with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }
}
