//! Request-options builder and path joining.
//!
//! [`base_headers`] turns connection credentials into the header set every
//! management call carries. [`RequestOptions`] is the per-call descriptor a
//! resource module starts from and augments with a URL and JSON body before
//! converting it into a hyper request.

use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderValue, Method, Request};
use http_body_util::Full;
use serde::Serialize;
use url::Url;

use crate::connection::Credentials;
use crate::error::EdgeError;

pub const USER_AGENT_VALUE: &str = concat!("edgemgmt/", env!("CARGO_PKG_VERSION"));

const APPLICATION_JSON: &str = "application/json";

/// Append path segments to `base`, percent-encoding each one.
///
/// A trailing slash on `base` does not produce an empty segment, so
/// `https://host/v1/o/org/` and `https://host/v1/o/org` join identically.
pub fn join_segments<S: AsRef<str>>(base: &Url, segments: &[S]) -> Result<Url, EdgeError> {
    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| EdgeError::UrlParse(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
        path.pop_if_empty();
        for segment in segments {
            path.push(segment.as_ref());
        }
    }
    Ok(url)
}

/// Headers sent on every request made through a connection.
pub fn base_headers(credentials: &Credentials) -> Result<HeaderMap, EdgeError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    if let Some(mut value) = credentials.header_value()? {
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl RequestOptions {
    #[must_use]
    pub const fn new(method: Method, url: Url, headers: HeaderMap) -> Self {
        Self {
            method,
            url,
            headers,
            body: None,
        }
    }

    /// Serialize `body` as the JSON payload and set `content-type`.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, EdgeError> {
        let payload = serde_json::to_vec(body)?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        self.body = Some(Bytes::from(payload));
        Ok(self)
    }

    pub fn into_request(self) -> Result<Request<Full<Bytes>>, EdgeError> {
        let mut builder = Request::builder()
            .method(self.method)
            .uri(self.url.as_str());
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }
        builder
            .body(Full::new(self.body.unwrap_or_default()))
            .map_err(|e| EdgeError::HttpRequest {
                source: Box::new(e),
            })
    }
}
