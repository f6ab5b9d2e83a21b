//! Scripted in-memory [`Transport`] for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::{BodyExt, Full};
use serde_json::Value;

use super::{RawResponse, Transport};
use crate::error::EdgeError;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

/// Replies with queued responses in order and records every request.
#[derive(Default)]
pub struct RecordingTransport {
    replies: Mutex<VecDeque<(StatusCode, Value)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: StatusCode, body: Value) -> Self {
        self.replies.lock().unwrap().push_back((status, body));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: Request<Full<Bytes>>) -> Result<RawResponse, EdgeError> {
        let (parts, body) = request.into_parts();
        let bytes = body.collect().await.map(|c| c.to_bytes()).unwrap_or_default();
        let body = if bytes.is_empty() {
            None
        } else {
            Some(serde_json::from_slice(&bytes)?)
        };
        self.requests.lock().unwrap().push(RecordedRequest {
            method: parts.method,
            url: parts.uri.to_string(),
            headers: parts.headers,
            body,
        });

        let (status, value) = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, Value::Null));
        let body = if value.is_null() {
            Bytes::new()
        } else {
            Bytes::from(serde_json::to_vec(&value)?)
        };
        Ok(RawResponse {
            status,
            headers: HeaderMap::new(),
            body,
        })
    }
}
