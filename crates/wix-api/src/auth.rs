use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::Error;

/// Header carrying the Wix account id alongside the account-level key.
pub const ACCOUNT_ID_HEADER: &str = "wix-account-id";

/// Account-level credentials for the Wix REST API.
///
/// Both values are opaque to this crate: nothing is validated beyond
/// presence. The API key is kept in a [`SecretString`] so it never
/// shows up in `Debug` output or logs.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Account-level API key, sent verbatim as the `Authorization` header.
    pub api_key: SecretString,
    /// Account id, sent as the `wix-account-id` header.
    pub account_id: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            account_id: account_id.into(),
        }
    }

    /// The three headers every authenticated call carries, as plain strings.
    ///
    /// Exposes the API key. Callers that hand these to a generic HTTP
    /// layer are responsible for not logging them.
    pub fn request_headers(&self) -> Vec<(&'static str, String)> {
        vec![
            (AUTHORIZATION.as_str(), self.api_key.expose_secret().to_owned()),
            (ACCOUNT_ID_HEADER, self.account_id.clone()),
            (CONTENT_TYPE.as_str(), "application/json".to_owned()),
        ]
    }

    /// Build a `HeaderMap` for use as `reqwest` default headers.
    ///
    /// The `Authorization` value is marked sensitive.
    pub fn header_map(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        for (name, value) in self.request_headers() {
            let header_name = HeaderName::from_static(name);
            let mut header_value =
                HeaderValue::from_str(&value).map_err(|e| Error::InvalidHeader {
                    header: name.to_owned(),
                    reason: e.to_string(),
                })?;
            if header_name == AUTHORIZATION {
                header_value.set_sensitive(true);
            }
            headers.insert(header_name, header_value);
        }
        Ok(headers)
    }
}
