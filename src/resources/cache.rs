//! Cache client.
//!
//! Caches are environment-scoped. Creation passes the cache name as a
//! query parameter and the settings in the body.

use http::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::{require, Scope};
use crate::connection::Connection;
use crate::error::EdgeError;
use crate::transport::request::join_segments;

const COLLECTION: &str = "caches";

pub const DEFAULT_TIMEOUT_SECS: u64 = 86_400;

#[derive(Debug, Clone)]
pub struct CreateCache {
    pub name: String,
    pub description: Option<String>,
    pub timeout_secs: u64,
}

impl CreateCache {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CacheBody<'a> {
    description: &'a str,
    expiry_settings: ExpirySettings,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExpirySettings {
    timeout_in_sec: TimeoutValue,
    values_null: bool,
}

#[derive(Serialize)]
struct TimeoutValue {
    value: u64,
}

pub struct Caches<'a> {
    conn: &'a Connection,
}

impl<'a> Caches<'a> {
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn collection(&self, operation: &'static str, env: &str) -> Result<Url, EdgeError> {
        require(operation, "environment", env)?;
        Scope::environment(env).collection_url(operation, self.conn.url_base(), COLLECTION)
    }

    pub async fn list(&self, env: &str) -> Result<Vec<String>, EdgeError> {
        let url = self.collection("list", env)?;
        let options = self.conn.request_options(Method::GET, url);
        self.conn.execute_as(options, &[StatusCode::OK]).await
    }

    pub async fn get(&self, env: &str, name: &str) -> Result<Value, EdgeError> {
        let collection = self.collection("get", env)?;
        require("get", "cache name", name)?;
        let url = join_segments(&collection, &[name])?;
        let options = self.conn.request_options(Method::GET, url);
        self.conn.execute(options, &[StatusCode::OK]).await
    }

    pub async fn create(&self, env: &str, cache: &CreateCache) -> Result<Value, EdgeError> {
        let mut url = self.collection("create", env)?;
        require("create", "cache name", &cache.name)?;
        url.query_pairs_mut().append_pair("name", &cache.name);

        let body = CacheBody {
            description: cache.description.as_deref().unwrap_or(""),
            expiry_settings: ExpirySettings {
                timeout_in_sec: TimeoutValue {
                    value: cache.timeout_secs,
                },
                values_null: false,
            },
        };
        let options = self.conn.request_options(Method::POST, url).json(&body)?;
        self.conn.execute(options, &[StatusCode::CREATED]).await
    }

    pub async fn delete(&self, env: &str, name: &str) -> Result<Value, EdgeError> {
        let collection = self.collection("delete", env)?;
        require("delete", "cache name", name)?;
        let url = join_segments(&collection, &[name])?;
        let options = self.conn.request_options(Method::DELETE, url);
        self.conn.execute(options, &[StatusCode::OK]).await
    }
}
