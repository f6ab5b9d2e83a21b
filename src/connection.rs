//! Connection context shared by every resource client.
//!
//! A [`Connection`] holds the organization base URL
//! (`{mgmt_server}/v1/o/{org}`), the headers derived from its
//! [`Credentials`], the verbosity level, the [`Transport`] used to reach
//! the management API, and the organization's feature properties.
//!
//! The properties are fetched at most once per connection. Concurrent
//! first callers of [`Connection::org_properties`] wait on the same
//! fetch; a failed fetch leaves the cache empty so the next caller
//! tries again.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose;
use base64::Engine as _;
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::OnceCell;
use url::Url;

use crate::config::model::Profile;
use crate::error::EdgeError;
use crate::transport::request::{base_headers, join_segments, RequestOptions};
use crate::transport::response::normalize;
use crate::transport::{HyperTransport, RawResponse, Transport};

pub const DEFAULT_MGMT_SERVER: &str = "https://api.enterprise.apigee.com";

const CPS_PROPERTY: &str = "features.isCpsEnabled";

#[derive(Clone, Default)]
pub enum Credentials {
    #[default]
    None,
    Basic {
        username: String,
        password: String,
    },
    Bearer(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Self::Bearer(_) => f.write_str("Bearer(***)"),
        }
    }
}

impl Credentials {
    /// The `Authorization` header value, if any.
    pub fn header_value(&self) -> Result<Option<HeaderValue>, EdgeError> {
        let raw = match self {
            Self::None => return Ok(None),
            Self::Basic { username, password } => {
                let encoded = general_purpose::STANDARD.encode(format!("{username}:{password}"));
                format!("Basic {encoded}")
            }
            Self::Bearer(token) => format!("Bearer {token}"),
        };
        Ok(Some(HeaderValue::from_str(&raw)?))
    }
}

/// Feature properties of an organization, keyed by property name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrgProperties(HashMap<String, String>);

#[derive(Deserialize)]
struct OrgRecord {
    #[serde(default)]
    properties: PropertyList,
}

#[derive(Default, Deserialize)]
struct PropertyList {
    #[serde(default)]
    property: Vec<Property>,
}

#[derive(Deserialize)]
struct Property {
    name: String,
    #[serde(default)]
    value: String,
}

impl OrgProperties {
    /// Extract `properties.property[]` from an organization record.
    pub fn from_org_record(record: &Value) -> Result<Self, EdgeError> {
        let record = OrgRecord::deserialize(record)?;
        Ok(record
            .properties
            .property
            .into_iter()
            .map(|p| (p.name, p.value))
            .collect())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Whether the organization expects per-entry KVM writes.
    #[must_use]
    pub fn is_cps_enabled(&self) -> bool {
        self.get(CPS_PROPERTY)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for OrgProperties {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub struct ConnectionBuilder {
    mgmt_server: String,
    org: String,
    credentials: Credentials,
    verbosity: u8,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
    org_properties: Option<OrgProperties>,
}

impl ConnectionBuilder {
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    #[must_use]
    pub const fn verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Per-request timeout for the default transport.
    #[must_use]
    pub const fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Seed the property cache so no fetch happens.
    #[must_use]
    pub fn org_properties(mut self, properties: OrgProperties) -> Self {
        self.org_properties = Some(properties);
        self
    }

    pub fn build(self) -> Result<Connection, EdgeError> {
        if self.org.trim().is_empty() {
            return Err(EdgeError::validation(
                "connect",
                "organization name is required",
            ));
        }

        let server = Url::parse(&self.mgmt_server)?;
        if server.scheme() != "http" && server.scheme() != "https" {
            return Err(EdgeError::validation(
                "connect",
                format!(
                    "unsupported scheme '{}' in management server URL (expected http or https)",
                    server.scheme()
                ),
            ));
        }
        let url_base = join_segments(&server, &["v1", "o", self.org.as_str()])?;
        let headers = base_headers(&self.credentials)?;
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(HyperTransport::new(self.timeout)) as Arc<dyn Transport>);

        Ok(Connection {
            url_base,
            org: self.org,
            verbosity: self.verbosity,
            headers,
            transport,
            org_properties: OnceCell::new_with(self.org_properties),
        })
    }
}

pub struct Connection {
    url_base: Url,
    org: String,
    verbosity: u8,
    headers: HeaderMap,
    transport: Arc<dyn Transport>,
    org_properties: OnceCell<OrgProperties>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("url_base", &self.url_base.as_str())
            .field("org", &self.org)
            .field("verbosity", &self.verbosity)
            .field("org_properties", &self.org_properties.get())
            .finish_non_exhaustive()
    }
}

impl Connection {
    #[must_use]
    pub fn builder(mgmt_server: impl Into<String>, org: impl Into<String>) -> ConnectionBuilder {
        ConnectionBuilder {
            mgmt_server: mgmt_server.into(),
            org: org.into(),
            credentials: Credentials::None,
            verbosity: 0,
            timeout: None,
            transport: None,
            org_properties: None,
        }
    }

    pub fn from_profile(profile: &Profile) -> Result<Self, EdgeError> {
        Self::builder(&profile.mgmt_server, &profile.org)
            .credentials(profile.auth.credentials())
            .verbosity(profile.verbosity)
            .timeout(profile.timeout.map(Duration::from_millis))
            .build()
    }

    /// `{mgmt_server}/v1/o/{org}`
    #[must_use]
    pub const fn url_base(&self) -> &Url {
        &self.url_base
    }

    #[must_use]
    pub fn org(&self) -> &str {
        &self.org
    }

    #[must_use]
    pub const fn verbosity(&self) -> u8 {
        self.verbosity
    }

    /// Base request descriptor carrying this connection's headers.
    #[must_use]
    pub fn request_options(&self, method: Method, url: Url) -> RequestOptions {
        RequestOptions::new(method, url, self.headers.clone())
    }

    /// Issue one request and return the raw response, whatever its status.
    pub async fn send(&self, options: RequestOptions) -> Result<RawResponse, EdgeError> {
        let method = options.method.clone();
        let url = options.url.to_string();
        if self.verbosity > 0 {
            tracing::info!(org = %self.org, "{method} {url}");
        } else {
            tracing::debug!(org = %self.org, method = %method, url = %url, "management request");
        }

        let response = self.transport.send(options.into_request()?).await?;

        if self.verbosity > 0 {
            tracing::info!(status = response.status.as_u16(), "{method} {url} completed");
        } else {
            tracing::debug!(status = response.status.as_u16(), url = %url, "management response");
        }
        if self.verbosity > 1 && !response.status.is_success() {
            tracing::info!(
                status = response.status.as_u16(),
                body = %String::from_utf8_lossy(&response.body),
                "error body"
            );
        }
        Ok(response)
    }

    /// Issue one request and normalize the response against `accepted`.
    pub async fn execute(
        &self,
        options: RequestOptions,
        accepted: &[StatusCode],
    ) -> Result<Value, EdgeError> {
        let response = self.send(options).await?;
        normalize(&response, accepted)
    }

    /// Like [`execute`](Self::execute), deserializing the body into `T`.
    pub async fn execute_as<T: DeserializeOwned>(
        &self,
        options: RequestOptions,
        accepted: &[StatusCode],
    ) -> Result<T, EdgeError> {
        let value = self.execute(options, accepted).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// The organization's feature properties, fetched on first use.
    pub async fn org_properties(&self) -> Result<&OrgProperties, EdgeError> {
        self.org_properties
            .get_or_try_init(|| async {
                let options = self.request_options(Method::GET, self.url_base.clone());
                let record = self.execute(options, &[StatusCode::OK]).await?;
                let properties = OrgProperties::from_org_record(&record)?;
                tracing::debug!(
                    org = %self.org,
                    count = properties.len(),
                    cps = properties.is_cps_enabled(),
                    "loaded organization properties"
                );
                Ok::<_, EdgeError>(properties)
            })
            .await
    }

    /// Properties already in the cache, without fetching.
    #[must_use]
    pub fn cached_org_properties(&self) -> Option<&OrgProperties> {
        self.org_properties.get()
    }
}
