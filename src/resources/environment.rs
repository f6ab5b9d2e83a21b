//! Environment client.

use http::{Method, StatusCode};
use serde_json::Value;

use super::require;
use crate::connection::Connection;
use crate::error::EdgeError;
use crate::transport::request::join_segments;

const COLLECTION: &str = "environments";

pub struct Environments<'a> {
    conn: &'a Connection,
}

impl<'a> Environments<'a> {
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Names of the organization's environments.
    pub async fn list(&self) -> Result<Vec<String>, EdgeError> {
        let url = join_segments(self.conn.url_base(), &[COLLECTION])?;
        let options = self.conn.request_options(Method::GET, url);
        self.conn.execute_as(options, &[StatusCode::OK]).await
    }

    pub async fn get(&self, name: &str) -> Result<Value, EdgeError> {
        require("get", "environment name", name)?;
        let url = join_segments(self.conn.url_base(), &[COLLECTION, name])?;
        let options = self.conn.request_options(Method::GET, url);
        self.conn.execute(options, &[StatusCode::OK]).await
    }
}
