//! Serde data structures for connection profile files.
//!
//! Contains [`Profile`] (the root) and [`AuthConfig`]. Both derive
//! `Deserialize` with `deny_unknown_fields` for strict parsing.

use serde::Deserialize;

use crate::connection::{Credentials, DEFAULT_MGMT_SERVER};

fn default_mgmt_server() -> String {
    DEFAULT_MGMT_SERVER.to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    #[serde(default = "default_mgmt_server")]
    pub mgmt_server: String,

    #[serde(default)]
    pub org: String,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub verbosity: u8,

    /// Per-request timeout in milliseconds.
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            mgmt_server: default_mgmt_server(),
            org: String::new(),
            auth: AuthConfig::default(),
            verbosity: 0,
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub token: Option<String>,
}

impl AuthConfig {
    /// Credentials for a validated profile. A token wins over a
    /// username/password pair.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        if let Some(token) = &self.token {
            return Credentials::Bearer(token.clone());
        }
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Credentials::Basic {
                username: username.clone(),
                password: password.clone(),
            },
            _ => Credentials::None,
        }
    }
}
