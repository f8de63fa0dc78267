//! The wire seam. [`HttpTransport`] talks HTTP via reqwest; tests plug in their own [`Transport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::Endpoint;
use crate::error::ApiError;
use crate::models::UploadFile;

/// Fixed per-call timeout; expiry surfaces as a no-response error.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(30_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    /// Pre-serialized JSON.
    Json(Vec<u8>),
    Multipart { file: UploadFile, fields: Vec<(String, String)> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub method: Method,
    pub url: String,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn get(endpoint: Endpoint, url: impl Into<String>) -> Self {
        Self { endpoint, method: Method::Get, url: url.into(), body: RequestBody::Empty }
    }

    /// Serialization failure is a request-construction error.
    pub fn post_json<B: Serialize + ?Sized>(endpoint: Endpoint, url: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        let bytes = serde_json::to_vec(body).map_err(|e| ApiError::request(format!("could not serialize request body: {e}")))?;
        Ok(Self { endpoint, method: Method::Post, url: url.into(), body: RequestBody::Json(bytes) })
    }

    pub fn post_multipart(endpoint: Endpoint, url: impl Into<String>, file: UploadFile, fields: Vec<(String, String)>) -> Self {
        Self { endpoint, method: Method::Post, url: url.into(), body: RequestBody::Multipart { file, fields } }
    }

    /// The JSON body as a value, if this request carries one.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        match &self.body {
            RequestBody::Json(bytes) => serde_json::from_slice(bytes).ok(),
            _ => None,
        }
    }
}

/// Whatever came back, success status or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self { Self { status, body: body.into() } }

    pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request never left: bad URL, unbuildable body.
    #[error("{0}")]
    Unsent(String),
    /// Sent, but nothing (complete) came back: timeout, DNS, refused, reset.
    #[error("{0}")]
    NoResponse(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ApiError> { Self::with_timeout(REQUEST_TIMEOUT) }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::request(format!("http client init failed: {e}")))?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration { self.timeout }
}

fn from_reqwest(e: reqwest::Error) -> TransportError {
    if e.is_builder() { TransportError::Unsent(e.to_string()) } else { TransportError::NoResponse(e.to_string()) }
}

fn multipart_form(file: UploadFile, fields: Vec<(String, String)>) -> Result<reqwest::multipart::Form, TransportError> {
    let part = reqwest::multipart::Part::bytes(file.bytes)
        .file_name(file.file_name)
        .mime_str("application/octet-stream")
        .map_err(|e| TransportError::Unsent(e.to_string()))?;
    let mut form = reqwest::multipart::Form::new().part("file", part);
    for (name, value) in fields {
        form = form.text(name, value);
    }
    Ok(form)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        // default Content-Type covers JSON; multipart replaces it with its own boundary header
        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) => builder.body(bytes),
            RequestBody::Multipart { file, fields } => builder.multipart(multipart_form(file, fields)?),
        };
        let response = builder.send().await.map_err(from_reqwest)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| TransportError::NoResponse(e.to_string()))?;
        debug!(target: "secai::transport", endpoint = request.endpoint.name(), status, bytes = body.len(), "response received");
        Ok(RawResponse { status, body: body.to_vec() })
    }
}
