//! Configuration for running the Wix nodes outside a workflow host.
//!
//! TOML profiles, credential resolution (env + plaintext), and
//! translation to `wix_api` credentials and transport settings.
//! [`LocalContext`] turns a profile into an `ExecuteContext`.

pub mod local;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use wix_api::{Credentials, TransportConfig, WixClient};

pub use local::LocalContext;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' does not exist")]
    UnknownProfile { profile: String },

    #[error("no {field} configured for profile '{profile}'")]
    NoCredentials { profile: String, field: &'static str },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error(transparent)]
    Api(#[from] wix_api::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named explicitly.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named Wix account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Defaults {
    /// Request timeout in seconds. Unset means the transport default.
    pub timeout: Option<u64>,
}

/// Credentials and transport overrides for one Wix account.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Account-level API key (plaintext; prefer `api_key_env`).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    pub account_id: Option<String>,

    /// Environment variable name containing the account id.
    pub account_id_env: Option<String>,

    /// Override the API origin (proxies, mock servers).
    pub base_url: Option<String>,

    /// Override the request timeout, in seconds.
    pub timeout: Option<u64>,
}

impl Config {
    /// Look up a profile by name, falling back to `default_profile`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(key, profile)| (key.as_str(), profile))
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "wix-sites", "wix-sites").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("wix-sites");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path`, then overlay `WIX_`-prefixed environment
/// variables (`__` separates nesting levels, e.g.
/// `WIX_PROFILES__DEFAULT__ACCOUNT_ID`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("WIX_").split("__"));

    Ok(figment.extract()?)
}

// ── Credential resolution ───────────────────────────────────────────

/// Named env var first, then plaintext.
fn resolve_value(env_name: Option<&str>, plaintext: Option<&str>) -> Option<String> {
    env_name
        .and_then(|name| std::env::var(name).ok())
        .or_else(|| plaintext.map(str::to_owned))
        .filter(|value| !value.is_empty())
}

pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_value(profile.api_key_env.as_deref(), profile.api_key.as_deref())
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
            field: "api_key",
        })
}

pub fn resolve_account_id(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    resolve_value(profile.account_id_env.as_deref(), profile.account_id.as_deref()).ok_or_else(|| {
        ConfigError::NoCredentials {
            profile: profile_name.into(),
            field: "account_id",
        }
    })
}

pub fn resolve_credentials(profile: &Profile, profile_name: &str) -> Result<Credentials, ConfigError> {
    Ok(Credentials {
        api_key: resolve_api_key(profile, profile_name)?,
        account_id: resolve_account_id(profile, profile_name)?,
    })
}

// ── Translation ─────────────────────────────────────────────────────

/// Transport settings for a profile; the profile's timeout wins over the
/// global default.
pub fn transport_config(defaults: &Defaults, profile: &Profile) -> TransportConfig {
    TransportConfig {
        timeout: profile.timeout.or(defaults.timeout).map(Duration::from_secs),
        ..TransportConfig::default()
    }
}

/// Build a typed [`WixClient`] from a profile.
pub fn profile_to_client(config: &Config, profile_name: Option<&str>) -> Result<WixClient, ConfigError> {
    let (name, profile) = config.profile(profile_name)?;
    let credentials = resolve_credentials(profile, name)?;
    let transport = transport_config(&config.defaults, profile);
    let base_url = profile.base_url.as_deref().unwrap_or(wix_api::API_BASE_URL);

    WixClient::with_base_url(base_url, &credentials, &transport).map_err(|err| match err {
        wix_api::Error::InvalidUrl(e) => ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("{e}: {base_url}"),
        },
        other => ConfigError::Api(other),
    })
}
