//! Contract between a node and the workflow host that runs it.
//!
//! The host owns parameter resolution, credential storage and the HTTP
//! helper. Nodes only see them through [`ExecuteContext`] and
//! [`HttpRequester`], so node logic runs the same against a real host,
//! a local runner, or an in-memory fake.

use std::fmt;
use std::future::Future;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use wix_api::TransportConfig;
use wix_api::transport::decode_response;

/// Message used when a failure carries no error value to describe it.
pub const UNKNOWN_ERROR: &str = "Unknown error";

// ── Node identity & items ────────────────────────────────────────────

/// Identity of a node instance inside a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
}

impl NodeRef {
    pub fn new(name: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_type: node_type.into(),
        }
    }
}

/// One item flowing along a node connection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionItem {
    pub json: Map<String, Value>,
}

/// Wrap each JSON object as one output item, preserving order.
pub fn return_json_array(objects: Vec<Map<String, Value>>) -> Vec<ExecutionItem> {
    objects.into_iter().map(|json| ExecutionItem { json }).collect()
}

// ── Outbound requests ────────────────────────────────────────────────

/// A fully-resolved outbound HTTP request, as handed to the host helper.
#[derive(Clone, PartialEq)]
pub struct HttpRequestOptions {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Serialized as the JSON request body when present.
    pub body: Option<Value>,
}

impl HttpRequestOptions {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for HttpRequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(key, value)| {
                if key.eq_ignore_ascii_case(AUTHORIZATION.as_str()) {
                    (key.as_str(), "[REDACTED]")
                } else {
                    (key.as_str(), value.as_str())
                }
            })
            .collect();

        f.debug_struct("HttpRequestOptions")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body", &self.body)
            .finish()
    }
}

// ── Errors ───────────────────────────────────────────────────────────

/// A failure reported by (or on behalf of) a remote API.
///
/// This is the only error kind a node raises to the host. `node` names the
/// node instance the error is attributed to; errors classified by the HTTP
/// layer carry `None` until the host attributes them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NodeApiError {
    pub message: String,
    pub http_code: Option<u16>,
    /// Application-level error code from the API, if any.
    pub code: Option<String>,
    /// Raw response body or other detail for the operator.
    pub description: Option<String>,
    pub node: Option<String>,
}

impl NodeApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            http_code: None,
            code: None,
            description: None,
            node: None,
        }
    }

    /// An error attributed to `node`.
    pub fn for_node(node: &NodeRef, message: impl Into<String>) -> Self {
        Self {
            node: Some(node.name.clone()),
            ..Self::new(message)
        }
    }

    pub fn with_http_code(mut self, http_code: u16) -> Self {
        self.http_code = Some(http_code);
        self
    }
}

/// Everything the HTTP helper (or any other host call) can fail with.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Already classified as an upstream-API failure.
    #[error(transparent)]
    UpstreamApi(NodeApiError),

    /// Any other error value: transport, decoding, host lookups.
    #[error("{0}")]
    Failure(Box<dyn std::error::Error + Send + Sync>),

    /// Something was raised that is not an error at all.
    #[error("non-error value raised: {0}")]
    Thrown(Value),
}

impl RequestError {
    pub fn failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Failure(Box::new(err))
    }

    /// Collapse into the error a node reports to the host.
    ///
    /// Upstream-API errors pass through untouched. Anything else becomes an
    /// upstream-API error attributed to `node`, keeping the original message
    /// or falling back to [`UNKNOWN_ERROR`].
    pub fn into_node_error(self, node: &NodeRef) -> NodeApiError {
        match self {
            Self::UpstreamApi(err) => err,
            Self::Failure(err) => NodeApiError::for_node(node, err.to_string()),
            Self::Thrown(_) => NodeApiError::for_node(node, UNKNOWN_ERROR),
        }
    }
}

impl From<wix_api::Error> for RequestError {
    fn from(err: wix_api::Error) -> Self {
        if !err.is_upstream() {
            return Self::failure(err);
        }
        let http_code = err.status();
        match err {
            wix_api::Error::Api {
                message, code, body, ..
            } => Self::UpstreamApi(NodeApiError {
                http_code,
                code,
                description: body,
                ..NodeApiError::new(message)
            }),
            wix_api::Error::Authentication { message, .. } => Self::UpstreamApi(NodeApiError {
                http_code,
                ..NodeApiError::new(message)
            }),
            other => Self::failure(other),
        }
    }
}

impl From<HostError> for RequestError {
    fn from(err: HostError) -> Self {
        Self::failure(err)
    }
}

/// Failures while reading host-resolved credentials or parameters.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Node does not have credentials of type '{0}'")]
    CredentialsNotFound(String),

    #[error("Credential field '{field}' is missing or not a string")]
    InvalidCredentialField { field: String },

    #[error("Parameter '{name}' must be {expected}, got {actual}")]
    InvalidParameter {
        name: String,
        expected: &'static str,
        actual: String,
    },
}

// ── Host collaborators ───────────────────────────────────────────────

/// The host's HTTP helper: send a request, hand back the parsed JSON body.
pub trait HttpRequester: Send + Sync {
    fn http_request(
        &self,
        options: HttpRequestOptions,
    ) -> impl Future<Output = Result<Value, RequestError>> + Send;
}

/// What a node can ask of the host while executing.
pub trait ExecuteContext: Send + Sync {
    type Http: HttpRequester;

    /// The node instance being executed.
    fn node(&self) -> &NodeRef;

    /// Decrypted credential fields of the given credential type.
    fn get_credentials(&self, credential_type: &str) -> Result<Map<String, Value>, HostError>;

    /// Resolved value of a node parameter for one input item, or `None`
    /// if the operator left it unset.
    fn get_node_parameter(&self, name: &str, item_index: usize) -> Option<Value>;

    fn helpers(&self) -> &Self::Http;
}

// ── reqwest-backed helper ────────────────────────────────────────────

/// [`HttpRequester`] on top of `reqwest`, using the `wix-api` transport
/// and error classification.
#[derive(Debug, Clone)]
pub struct ReqwestRequester {
    http: reqwest::Client,
}

impl ReqwestRequester {
    pub fn new(transport: &TransportConfig) -> Result<Self, wix_api::Error> {
        Ok(Self {
            http: transport.build_client()?,
        })
    }

    pub fn from_reqwest(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl HttpRequester for ReqwestRequester {
    async fn http_request(&self, options: HttpRequestOptions) -> Result<Value, RequestError> {
        debug!(method = %options.method, url = %options.url, "outbound request");

        let mut request = self.http.request(options.method, &options.url);
        for (name, value) in &options.headers {
            let invalid = |reason: String| wix_api::Error::InvalidHeader {
                header: name.clone(),
                reason,
            };
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
            let mut header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
            if header_name == AUTHORIZATION {
                header_value.set_sensitive(true);
            }
            request = request.header(header_name, header_value);
        }
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let resp = request.send().await.map_err(wix_api::Error::from)?;
        Ok(decode_response(resp).await?)
    }
}
