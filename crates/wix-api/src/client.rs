// Async HTTP client for the Wix Site List API.
//
// Base URL: https://www.wixapis.com/
// Auth: `Authorization: <account API key>` + `wix-account-id` headers

use std::collections::HashSet;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::transport::{TransportConfig, decode_response};
use crate::types::{QueryResponse, QuerySitesRequest, Site};
use crate::{API_BASE_URL, Credentials, Error, SITES_QUERY_PATH};

/// Async client for the Wix Site List API.
///
/// Credential headers are installed as client defaults, so every call made
/// through this client is authenticated for the same account.
#[derive(Debug, Clone)]
pub struct WixClient {
    http: reqwest::Client,
    base_url: Url,
}

impl WixClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client against the public Wix API host.
    pub fn new(credentials: &Credentials, transport: &TransportConfig) -> Result<Self, Error> {
        Self::with_base_url(API_BASE_URL, credentials, transport)
    }

    /// Build a client against an arbitrary origin (proxies, mock servers).
    pub fn with_base_url(
        base_url: &str,
        credentials: &Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client_with_headers(credentials.header_map()?)?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.base_url.join(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        decode_response(resp).await
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Run one site-list query.
    pub async fn query_sites(&self, request: &QuerySitesRequest) -> Result<QueryResponse<Site>, Error> {
        self.query_sites_as(request).await
    }

    /// Run one site-list query, decoding each site as `S`.
    ///
    /// Use `serde_json::Map<String, Value>` to keep sites exactly as Wix
    /// returned them.
    pub async fn query_sites_as<S: DeserializeOwned>(
        &self,
        request: &QuerySitesRequest,
    ) -> Result<QueryResponse<S>, Error> {
        self.post(SITES_QUERY_PATH, request).await
    }

    /// Probe the credentials with a single-site query.
    pub async fn test_credentials(&self) -> Result<(), Error> {
        let _: serde_json::Value = self.post(SITES_QUERY_PATH, &QuerySitesRequest::probe()).await?;
        Ok(())
    }

    /// Follow `metadata.cursors.next` until the API stops returning one.
    ///
    /// Stops early if the API hands back any cursor already followed.
    pub async fn query_all_sites(&self, request: QuerySitesRequest) -> Result<Vec<Site>, Error> {
        let mut all = Vec::new();
        let mut seen = HashSet::new();
        let mut request = request;
        if let Some(cursor) = request.cursor_paging.as_ref().and_then(|p| p.cursor.clone()) {
            seen.insert(cursor);
        }

        loop {
            let page = self.query_sites(&request).await?;
            let next = page.next_cursor().map(str::to_owned);
            all.extend(page.sites);

            match next {
                Some(cursor) if seen.insert(cursor.clone()) => {
                    debug!(fetched = all.len(), "following next cursor");
                    request = request.with_cursor(cursor);
                }
                Some(cursor) => {
                    debug!(%cursor, "cursor already followed, stopping");
                    break;
                }
                None => break,
            }
        }

        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = WixClient::from_reqwest("http://localhost:8080/proxy", reqwest::Client::new())
            .expect("valid url");
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/proxy/");

        let client =
            WixClient::from_reqwest("https://www.wixapis.com/", reqwest::Client::new()).expect("valid url");
        assert_eq!(
            client.base_url().join(SITES_QUERY_PATH).expect("joins").as_str(),
            crate::SITES_QUERY_URL
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = WixClient::from_reqwest("not a url", reqwest::Client::new());
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
