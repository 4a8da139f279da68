// A minimal host for running Wix nodes from plain Rust code.
//
// Credentials come from a config profile, parameters from an in-memory
// map, and HTTP goes through `ReqwestRequester`.

use secrecy::ExposeSecret;
use serde_json::{Map, Value};

use wix_api::Credentials;
use wix_nodes::{
    ExecuteContext, HostError, NodeRef, ReqwestRequester, WixApiCredential, WixSites,
};

use crate::{Config, ConfigError, resolve_credentials, transport_config};

/// In-process [`ExecuteContext`] backed by one set of Wix credentials.
///
/// Parameters are the same for every item index.
#[derive(Debug)]
pub struct LocalContext {
    node: NodeRef,
    credentials: Credentials,
    parameters: Map<String, Value>,
    http: ReqwestRequester,
}

impl LocalContext {
    pub fn new(node: NodeRef, credentials: Credentials, http: ReqwestRequester) -> Self {
        Self {
            node,
            credentials,
            parameters: Map::new(),
            http,
        }
    }

    /// Build a context for the `wixSites` node from a config profile.
    pub fn from_profile(config: &Config, profile_name: Option<&str>) -> Result<Self, ConfigError> {
        let (name, profile) = config.profile(profile_name)?;
        let credentials = resolve_credentials(profile, name)?;
        let http = ReqwestRequester::new(&transport_config(&config.defaults, profile))?;

        Ok(Self::new(
            NodeRef::new("Wix Sites", WixSites::NAME),
            credentials,
            http,
        ))
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    pub fn with_parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.parameters.extend(parameters);
        self
    }
}

impl ExecuteContext for LocalContext {
    type Http = ReqwestRequester;

    fn node(&self) -> &NodeRef {
        &self.node
    }

    fn get_credentials(&self, credential_type: &str) -> Result<Map<String, Value>, HostError> {
        if credential_type != WixApiCredential::NAME {
            return Err(HostError::CredentialsNotFound(credential_type.into()));
        }

        let mut fields = Map::new();
        fields.insert(
            "apiKey".into(),
            Value::String(self.credentials.api_key.expose_secret().to_owned()),
        );
        fields.insert(
            "accountId".into(),
            Value::String(self.credentials.account_id.clone()),
        );
        Ok(fields)
    }

    fn get_node_parameter(&self, name: &str, _item_index: usize) -> Option<Value> {
        self.parameters.get(name).cloned()
    }

    fn helpers(&self) -> &ReqwestRequester {
        &self.http
    }
}
