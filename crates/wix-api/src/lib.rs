// wix-api: Async Rust client for the Wix Site List API

pub mod auth;
pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use auth::Credentials;
pub use client::WixClient;
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{CursorPaging, Cursors, QueryMetadata, QueryResponse, QuerySitesRequest, Site, SortOrder, Sorting};

/// Public Wix REST host. Every account-level endpoint hangs off this origin.
pub const API_BASE_URL: &str = "https://www.wixapis.com";

/// Path of the site-list query endpoint, relative to [`API_BASE_URL`].
pub const SITES_QUERY_PATH: &str = "site-list/v2/sites/query";

/// Absolute URL of the site-list query endpoint.
pub const SITES_QUERY_URL: &str = "https://www.wixapis.com/site-list/v2/sites/query";
