//! Wix plugins for workflow-automation hosts.
//!
//! - **[`WixApiCredential`]**: the `wixApi` credential type: an
//!   account-level API key plus account id, with a one-site connectivity
//!   probe.
//!
//! - **[`WixSites`]**: the `wixSites` node: builds a site-list query from
//!   filter / sort / limit / cursor parameters, issues it through the
//!   host's HTTP helper and emits each returned site as one item.
//!
//! - **Host contract** ([`host`]): [`ExecuteContext`] and [`HttpRequester`]
//!   stand in for the host runtime, so both plugins run against any host
//!   adapter. [`ReqwestRequester`] is the stock HTTP helper.
//!
//! - **Metadata** ([`description`]): serializable node and credential
//!   descriptions for host form rendering.

pub mod credentials;
pub mod description;
pub mod host;
pub mod sites;

// ── Primary re-exports ──────────────────────────────────────────────
pub use credentials::{CredentialTestResult, CredentialTestStatus, WixApiCredential};
pub use description::{CredentialDescription, NodeDescription, NodeProperty, PropertyType};
pub use host::{
    ExecuteContext, ExecutionItem, HostError, HttpRequestOptions, HttpRequester, NodeApiError,
    NodeRef, ReqwestRequester, RequestError, UNKNOWN_ERROR,
};
pub use sites::{QueryParameters, SortParameter, WixSites, build_query_body};
