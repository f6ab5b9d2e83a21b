//! Target-server client.
//!
//! Target servers are environment-scoped host/port records. Enabling or
//! disabling one is a read-modify-write: the current record is fetched,
//! `isEnabled` is flipped, and the record is written back with `PUT`.

use http::{Method, StatusCode};
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use super::{require, Scope};
use crate::connection::Connection;
use crate::error::EdgeError;
use crate::transport::request::join_segments;

const COLLECTION: &str = "targetservers";

const fn default_true() -> bool {
    true
}

/// Accepts `true`, `"true"`, `false`, or `"false"`; the management API
/// is not consistent about which it sends.
fn flexible_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }
    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Text(s) => Ok(s.trim().eq_ignore_ascii_case("true")),
    }
}

fn flexible_opt_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    flexible_bool(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SslInfo {
    #[serde(default, deserialize_with = "flexible_bool")]
    pub enabled: bool,

    #[serde(
        default,
        deserialize_with = "flexible_opt_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub client_auth_enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_store: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_alias: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_store: Option<String>,

    #[serde(
        default,
        deserialize_with = "flexible_opt_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub ignore_validation_errors: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetServer {
    pub name: String,

    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub port: u16,

    #[serde(default = "default_true", deserialize_with = "flexible_bool")]
    pub is_enabled: bool,

    #[serde(rename = "sSLInfo", default, skip_serializing_if = "Option::is_none")]
    pub ssl_info: Option<SslInfo>,
}

impl TargetServer {
    #[must_use]
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            is_enabled: true,
            ssl_info: None,
        }
    }

    #[must_use]
    pub fn with_ssl(mut self, ssl_info: SslInfo) -> Self {
        self.ssl_info = Some(ssl_info);
        self
    }

    fn validate(&self) -> Result<(), EdgeError> {
        require("create", "target server name", &self.name)?;
        require("create", "target server host", &self.host)?;
        if self.port == 0 {
            return Err(EdgeError::validation("create", "missing target server port"));
        }
        Ok(())
    }
}

pub struct TargetServers<'a> {
    conn: &'a Connection,
}

impl<'a> TargetServers<'a> {
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn collection(&self, operation: &'static str, env: &str) -> Result<Url, EdgeError> {
        require(operation, "environment", env)?;
        Scope::environment(env).collection_url(operation, self.conn.url_base(), COLLECTION)
    }

    fn item(&self, operation: &'static str, env: &str, name: &str) -> Result<Url, EdgeError> {
        let collection = self.collection(operation, env)?;
        require(operation, "target server name", name)?;
        join_segments(&collection, &[name])
    }

    /// Names of the target servers in `env`.
    pub async fn list(&self, env: &str) -> Result<Vec<String>, EdgeError> {
        let url = self.collection("list", env)?;
        let options = self.conn.request_options(Method::GET, url);
        self.conn.execute_as(options, &[StatusCode::OK]).await
    }

    pub async fn get(&self, env: &str, name: &str) -> Result<TargetServer, EdgeError> {
        let url = self.item("get", env, name)?;
        let options = self.conn.request_options(Method::GET, url);
        self.conn.execute_as(options, &[StatusCode::OK]).await
    }

    pub async fn create(&self, env: &str, target: &TargetServer) -> Result<TargetServer, EdgeError> {
        let url = self.collection("create", env)?;
        target.validate()?;
        tracing::debug!(env = %env, target = %target.name, "create target server");
        let options = self.conn.request_options(Method::POST, url).json(target)?;
        self.conn.execute_as(options, &[StatusCode::CREATED]).await
    }

    pub async fn enable(&self, env: &str, name: &str) -> Result<TargetServer, EdgeError> {
        self.set_enabled("enable", env, name, true).await
    }

    pub async fn disable(&self, env: &str, name: &str) -> Result<TargetServer, EdgeError> {
        self.set_enabled("disable", env, name, false).await
    }

    async fn set_enabled(
        &self,
        operation: &'static str,
        env: &str,
        name: &str,
        enabled: bool,
    ) -> Result<TargetServer, EdgeError> {
        let url = self.item(operation, env, name)?;
        let current: TargetServer = self
            .conn
            .execute_as(
                self.conn.request_options(Method::GET, url.clone()),
                &[StatusCode::OK],
            )
            .await?;

        let updated = TargetServer {
            is_enabled: enabled,
            ..current
        };
        tracing::debug!(env = %env, target = %name, enabled, "{operation} target server");
        let options = self.conn.request_options(Method::PUT, url).json(&updated)?;
        self.conn.execute_as(options, &[StatusCode::OK]).await
    }

    pub async fn delete(&self, env: &str, name: &str) -> Result<TargetServer, EdgeError> {
        let url = self.item("delete", env, name)?;
        let options = self.conn.request_options(Method::DELETE, url);
        self.conn.execute_as(options, &[StatusCode::OK]).await
    }
}
