//! Organization client: the organization record and its feature properties.

use http::{Method, StatusCode};
use serde_json::Value;

use crate::connection::{Connection, OrgProperties};
use crate::error::EdgeError;

pub struct Organization<'a> {
    conn: &'a Connection,
}

impl<'a> Organization<'a> {
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub async fn get(&self) -> Result<Value, EdgeError> {
        let options = self
            .conn
            .request_options(Method::GET, self.conn.url_base().clone());
        self.conn.execute(options, &[StatusCode::OK]).await
    }

    /// Cached on the connection after the first call.
    pub async fn properties(&self) -> Result<&'a OrgProperties, EdgeError> {
        self.conn.org_properties().await
    }
}
