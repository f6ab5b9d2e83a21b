//! Resource clients for the management API.
//!
//! Each submodule wraps one REST resource type. Clients borrow a
//! [`Connection`] and are handed out by the [`Org`] facade, which owns the
//! connection behind an `Arc` so it can be cloned into concurrent tasks.
//! [`Scope`] decides where a resource collection lives.

pub mod cache;
pub mod environment;
pub mod kvm;
pub mod organization;
pub mod targetserver;

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::connection::Connection;
use crate::error::EdgeError;
use crate::transport::request::join_segments;

pub use cache::{Caches, CreateCache};
pub use environment::Environments;
pub use kvm::{CreateKvm, Entry, KeyValueMap, Kvms, KvmWrite};
pub use organization::Organization;
pub use targetserver::{SslInfo, TargetServer, TargetServers};

/// Where a resource collection is rooted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    Organization,
    Environment(String),
    Proxy(String),
}

impl Scope {
    #[must_use]
    pub fn environment(env: impl Into<String>) -> Self {
        Self::Environment(env.into())
    }

    #[must_use]
    pub fn proxy(name: impl Into<String>) -> Self {
        Self::Proxy(name.into())
    }

    /// `{base}/e/{env}/{collection}`, `{base}/apis/{proxy}/{collection}`,
    /// or `{base}/{collection}`.
    pub fn collection_url(
        &self,
        operation: &'static str,
        base: &Url,
        collection: &str,
    ) -> Result<Url, EdgeError> {
        match self {
            Self::Organization => join_segments(base, &[collection]),
            Self::Environment(env) => {
                require(operation, "environment", env)?;
                join_segments(base, &["e", env.as_str(), collection])
            }
            Self::Proxy(name) => {
                require(operation, "proxy name", name)?;
                join_segments(base, &["apis", name.as_str(), collection])
            }
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Organization => f.write_str("organization"),
            Self::Environment(env) => write!(f, "environment {env}"),
            Self::Proxy(name) => write!(f, "proxy {name}"),
        }
    }
}

/// Fail with a local validation error when `value` is blank.
pub(crate) fn require(operation: &'static str, what: &str, value: &str) -> Result<(), EdgeError> {
    if value.trim().is_empty() {
        Err(EdgeError::validation(operation, format!("missing {what}")))
    } else {
        Ok(())
    }
}

/// Cheap-to-clone handle on one organization.
#[derive(Debug, Clone)]
pub struct Org {
    conn: Arc<Connection>,
}

impl Org {
    #[must_use]
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(conn),
        }
    }

    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    #[must_use]
    pub fn kvms(&self) -> Kvms<'_> {
        Kvms::new(&self.conn)
    }

    #[must_use]
    pub fn targetservers(&self) -> TargetServers<'_> {
        TargetServers::new(&self.conn)
    }

    #[must_use]
    pub fn environments(&self) -> Environments<'_> {
        Environments::new(&self.conn)
    }

    #[must_use]
    pub fn caches(&self) -> Caches<'_> {
        Caches::new(&self.conn)
    }

    #[must_use]
    pub fn organization(&self) -> Organization<'_> {
        Organization::new(&self.conn)
    }
}
