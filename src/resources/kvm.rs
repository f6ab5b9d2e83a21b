//! Key-value-map client.
//!
//! KVMs live at organization, environment, or proxy scope (see
//! [`Scope`]). Writing entries into an existing map takes one of two
//! request shapes depending on the organization's CPS flag:
//!
//! - CPS: probe `GET {map}/entries/{key}`, then `POST {map}/entries/{key}`
//!   on 200 (update) or `POST {map}/entries` on 404 (create). Any other
//!   probe status ends the operation without a write.
//! - legacy: `POST {map}` with the whole entry list.

use std::collections::BTreeMap;

use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::{require, Scope};
use crate::connection::Connection;
use crate::error::{EdgeError, RemoteError};
use crate::transport::request::join_segments;
use crate::transport::response::parse_body;

const COLLECTION: &str = "keyvaluemaps";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueMap {
    pub name: String,
    #[serde(default)]
    pub encrypted: bool,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateKvm {
    pub name: String,
    pub encrypted: bool,
    pub entries: BTreeMap<String, String>,
}

/// What to write into an existing map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvmWrite {
    Entry { key: String, value: String },
    Entries(BTreeMap<String, String>),
}

impl KvmWrite {
    #[must_use]
    pub fn entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Entry {
            key: key.into(),
            value: value.into(),
        }
    }

    fn validate(&self) -> Result<(), EdgeError> {
        match self {
            Self::Entry { key, value } => {
                if key.is_empty() || value.is_empty() {
                    return Err(EdgeError::validation("put", "missing key or value"));
                }
            }
            Self::Entries(entries) => {
                if entries.is_empty() {
                    return Err(EdgeError::validation("put", "missing entries or key/value"));
                }
                if entries.iter().any(|(k, v)| k.is_empty() || v.is_empty()) {
                    return Err(EdgeError::validation("put", "missing key or value"));
                }
            }
        }
        Ok(())
    }

    /// The single entry this write carries, if it carries exactly one.
    fn single(&self) -> Option<(&str, &str)> {
        match self {
            Self::Entry { key, value } => Some((key.as_str(), value.as_str())),
            Self::Entries(entries) if entries.len() == 1 => entries
                .iter()
                .next()
                .map(|(k, v)| (k.as_str(), v.as_str())),
            Self::Entries(_) => None,
        }
    }

    fn to_entries(&self) -> Vec<Entry> {
        match self {
            Self::Entry { key, value } => vec![Entry {
                name: key.clone(),
                value: value.clone(),
            }],
            Self::Entries(entries) => to_entry_list(entries),
        }
    }
}

/// `{"k": "v", ...}` as `[{"name": "k", "value": "v"}, ...]`, in key order.
#[must_use]
pub fn to_entry_list(entries: &BTreeMap<String, String>) -> Vec<Entry> {
    entries
        .iter()
        .map(|(name, value)| Entry {
            name: name.clone(),
            value: value.clone(),
        })
        .collect()
}

#[derive(Serialize)]
struct CreateBody<'a> {
    encrypted: &'static str,
    name: &'a str,
    entry: Vec<Entry>,
}

#[derive(Serialize)]
struct EntryBody<'a> {
    name: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct MapUpdateBody<'a> {
    name: &'a str,
    entry: Vec<Entry>,
}

pub struct Kvms<'a> {
    conn: &'a Connection,
}

impl<'a> Kvms<'a> {
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn collection(&self, operation: &'static str, scope: &Scope) -> Result<Url, EdgeError> {
        scope.collection_url(operation, self.conn.url_base(), COLLECTION)
    }

    /// Names of the maps in `scope`.
    pub async fn list(&self, scope: &Scope) -> Result<Vec<String>, EdgeError> {
        let url = self.collection("list", scope)?;
        let options = self.conn.request_options(Method::GET, url);
        self.conn.execute_as(options, &[StatusCode::OK]).await
    }

    pub async fn get(&self, scope: &Scope, name: &str) -> Result<KeyValueMap, EdgeError> {
        require("get", "KVM name", name)?;
        let url = join_segments(&self.collection("get", scope)?, &[name])?;
        let options = self.conn.request_options(Method::GET, url);
        self.conn.execute_as(options, &[StatusCode::OK]).await
    }

    pub async fn create(&self, scope: &Scope, kvm: &CreateKvm) -> Result<Value, EdgeError> {
        require("create", "KVM name", &kvm.name)?;
        let url = self.collection("create", scope)?;
        tracing::debug!(kvm = %kvm.name, scope = %scope, "create KVM");

        let body = CreateBody {
            encrypted: if kvm.encrypted { "true" } else { "false" },
            name: &kvm.name,
            entry: to_entry_list(&kvm.entries),
        };
        let options = self.conn.request_options(Method::POST, url).json(&body)?;
        self.conn.execute(options, &[StatusCode::CREATED]).await
    }

    /// Add or update entries in the map `map`.
    ///
    /// Loads the organization properties first when they are not cached;
    /// the CPS flag picks the request shape.
    pub async fn put(&self, scope: &Scope, map: &str, write: &KvmWrite) -> Result<Value, EdgeError> {
        require("put", "KVM name", map)?;
        write.validate()?;
        let collection = self.collection("put", scope)?;

        let cps = self.conn.org_properties().await?.is_cps_enabled();
        if cps {
            let Some((key, value)) = write.single() else {
                return Err(EdgeError::validation(
                    "put",
                    "this organization stores KVM entries individually; write one key/value at a time",
                ));
            };
            self.put_entry(&collection, map, key, value).await
        } else {
            let body = MapUpdateBody {
                name: map,
                entry: write.to_entries(),
            };
            let url = join_segments(&collection, &[map])?;
            let options = self.conn.request_options(Method::POST, url).json(&body)?;
            self.conn
                .execute(options, &[StatusCode::OK, StatusCode::CREATED])
                .await
        }
    }

    async fn put_entry(
        &self,
        collection: &Url,
        map: &str,
        key: &str,
        value: &str,
    ) -> Result<Value, EdgeError> {
        let entry_url = join_segments(collection, &[map, "entries", key])?;
        let probe = self
            .conn
            .send(self.conn.request_options(Method::GET, entry_url.clone()))
            .await?;

        let url = match probe.status {
            StatusCode::OK => {
                tracing::debug!(kvm = %map, key = %key, "KVM entry update");
                entry_url
            }
            StatusCode::NOT_FOUND => {
                tracing::debug!(kvm = %map, key = %key, "KVM entry create");
                join_segments(collection, &[map, "entries"])?
            }
            status => {
                return Err(RemoteError {
                    status,
                    result: parse_body(&probe.body),
                }
                .into());
            }
        };

        let options = self
            .conn
            .request_options(Method::POST, url)
            .json(&EntryBody { name: key, value })?;
        self.conn
            .execute(options, &[StatusCode::OK, StatusCode::CREATED])
            .await
    }

    pub async fn delete(&self, scope: &Scope, name: &str) -> Result<Value, EdgeError> {
        require("delete", "KVM name", name)?;
        let url = join_segments(&self.collection("delete", scope)?, &[name])?;
        let options = self.conn.request_options(Method::DELETE, url);
        self.conn.execute(options, &[StatusCode::OK]).await
    }
}
