//! HTTP plumbing shared by every resource module.
//!
//! The [`Transport`] trait is the seam between resource clients and the
//! network: it sends one fully-built request and returns the status,
//! headers, and collected body. [`HyperTransport`] is the default
//! implementation over a connection-pooled hyper client with rustls.
//! Submodules build requests ([`request`]) and map responses to results
//! ([`response`]).

pub mod request;
pub mod response;

#[cfg(test)]
pub(crate) mod testing;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Request, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::error::EdgeError;

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient = Client<HttpsConnector, Full<Bytes>>;

/// A management API response with its body fully collected.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

// async_trait is required here because Transport is used as Arc<dyn Transport>
// and native async fn in traits does not support dyn dispatch.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request<Full<Bytes>>) -> Result<RawResponse, EdgeError>;
}

#[must_use]
pub fn build_http_client() -> HttpClient {
    // rustls cannot pick a crypto provider on its own when several are
    // compiled in. Explicitly install `ring` as the default provider.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(https)
}

/// Default [`Transport`] backed by hyper.
///
/// Without a timeout, requests run for as long as the underlying client
/// allows.
#[derive(Clone)]
pub struct HyperTransport {
    client: HttpClient,
    timeout: Option<Duration>,
}

impl HyperTransport {
    #[must_use]
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            client: build_http_client(),
            timeout,
        }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn send(&self, request: Request<Full<Bytes>>) -> Result<RawResponse, EdgeError> {
        let url = request.uri().to_string();
        let exchange = exchange(&self.client, request);

        match self.timeout {
            // Covers the headers and the full body.
            Some(timeout) => tokio::time::timeout(timeout, exchange)
                .await
                .map_err(|_| EdgeError::Timeout {
                    url,
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                })?,
            None => exchange.await,
        }
    }
}

async fn exchange(
    client: &HttpClient,
    request: Request<Full<Bytes>>,
) -> Result<RawResponse, EdgeError> {
    let response = client
        .request(request)
        .await
        .map_err(|e| EdgeError::HttpRequest {
            source: Box::new(e),
        })?;

    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| EdgeError::HttpRequest {
            source: Box::new(e),
        })?
        .to_bytes();

    Ok(RawResponse {
        status,
        headers,
        body,
    })
}
