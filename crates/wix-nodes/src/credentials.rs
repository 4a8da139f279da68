//! The `wixApi` credential type.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use wix_api::{Credentials, QuerySitesRequest, SITES_QUERY_URL};

use crate::description::{CredentialDescription, NodeProperty, PropertyType};
use crate::host::{HostError, HttpRequestOptions, HttpRequester};

/// Account-level Wix API key plus account id.
pub struct WixApiCredential;

impl WixApiCredential {
    pub const NAME: &'static str = "wixApi";

    pub fn description() -> CredentialDescription {
        CredentialDescription {
            name: Self::NAME.into(),
            display_name: "Wix API".into(),
            documentation_url: "https://dev.wix.com/docs/rest".into(),
            icon: "file:wix.svg".into(),
            properties: vec![
                NodeProperty::new("API Key", "apiKey", PropertyType::String, "")
                    .password()
                    .required()
                    .description("Wix account-level API key"),
                NodeProperty::new("Account ID", "accountId", PropertyType::String, "")
                    .required()
                    .description("ID of the Wix account the key belongs to"),
            ],
        }
    }

    /// Read credentials from the fields the host decrypted.
    ///
    /// Only presence is checked; values are opaque.
    pub fn from_resolved(data: &Map<String, Value>) -> Result<Credentials, HostError> {
        let field = |name: &str| {
            data.get(name)
                .and_then(Value::as_str)
                .map(str::to_owned)
                .ok_or_else(|| HostError::InvalidCredentialField { field: name.into() })
        };
        Ok(Credentials::new(field("apiKey")?, field("accountId")?))
    }

    /// The connectivity probe: a one-site query, whatever else is stored.
    pub fn test_request(credentials: &Credentials) -> HttpRequestOptions {
        sites_query_request(credentials, &QuerySitesRequest::probe())
    }

    /// Run the probe the way a host's generic credential tester does:
    /// any non-error response passes.
    pub async fn test<H: HttpRequester>(http: &H, credentials: &Credentials) -> CredentialTestResult {
        match http.http_request(Self::test_request(credentials)).await {
            Ok(_) => {
                debug!("wixApi credential test passed");
                CredentialTestResult::ok()
            }
            Err(err) => {
                warn!(error = %err, "wixApi credential test failed");
                CredentialTestResult::error(err.to_string())
            }
        }
    }
}

/// Authenticated `POST` to the site-list query endpoint.
pub(crate) fn sites_query_request(credentials: &Credentials, body: &QuerySitesRequest) -> HttpRequestOptions {
    HttpRequestOptions {
        method: Method::POST,
        url: SITES_QUERY_URL.to_owned(),
        headers: credentials
            .request_headers()
            .into_iter()
            .map(|(name, value)| (name.to_owned(), value))
            .collect(),
        body: Some(Value::from(body)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CredentialTestStatus {
    #[serde(rename = "OK")]
    Ok,
    Error,
}

/// Outcome reported back to the host's credential form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialTestResult {
    pub status: CredentialTestStatus,
    pub message: String,
}

impl CredentialTestResult {
    pub fn ok() -> Self {
        Self {
            status: CredentialTestStatus::Ok,
            message: "Connection successful!".into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: CredentialTestStatus::Error,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == CredentialTestStatus::Ok
    }
}
