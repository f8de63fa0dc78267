//! Request/response interception around a [`Transport`].
//!
//! Every call runs build -> send -> classify -> decode inside [`Intercepted::call`], and any
//! failure is logged there once with its kind before being handed back unchanged.
//! No retries: one attempt per call.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::config::Endpoint;
use crate::error::{extract_detail, ApiError};
use crate::transport::{ApiRequest, RawResponse, Transport, TransportError};

/// Map a raw transport outcome onto the error taxonomy. Pure; no I/O, no logging.
pub fn classify(outcome: Result<RawResponse, TransportError>) -> Result<RawResponse, ApiError> {
    match outcome {
        Ok(raw) if raw.is_success() => Ok(raw),
        Ok(raw) => Err(ApiError::Server { status: raw.status, detail: extract_detail(&raw.body) }),
        Err(TransportError::NoResponse(message)) => Err(ApiError::NoResponse { message }),
        Err(TransportError::Unsent(message)) => Err(ApiError::Request { message }),
    }
}

fn decode<R: DeserializeOwned>(raw: &RawResponse) -> Result<R, ApiError> {
    serde_json::from_slice(&raw.body).map_err(|e| ApiError::request(format!("unexpected response body: {e}")))
}

fn log_failure(endpoint: Endpoint, err: &ApiError) {
    let endpoint = endpoint.name();
    match err {
        ApiError::Server { status, detail } => {
            error!(target: "secai::api", endpoint, status, detail = detail.as_deref().unwrap_or("-"), "api error")
        }
        ApiError::NoResponse { message } => error!(target: "secai::api", endpoint, %message, "network error"),
        ApiError::Request { message } => error!(target: "secai::api", endpoint, %message, "request error"),
        // rejected before reaching the interceptor; kept for exhaustiveness
        ApiError::Validation(v) => warn!(target: "secai::api", endpoint, error = %v, "validation error"),
    }
}

#[derive(Clone)]
pub struct Intercepted {
    inner: Arc<dyn Transport>,
}

impl Intercepted {
    pub fn new(inner: Arc<dyn Transport>) -> Self { Self { inner } }

    /// `build` is the request stage: an `Err` from it is logged like any other failure.
    pub async fn call<R, F>(&self, endpoint: Endpoint, build: F) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        F: FnOnce() -> Result<ApiRequest, ApiError> + Send,
    {
        let result = self.exchange(endpoint, build).await;
        if let Err(err) = &result {
            log_failure(endpoint, err);
        }
        result
    }

    async fn exchange<R, F>(&self, endpoint: Endpoint, build: F) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        F: FnOnce() -> Result<ApiRequest, ApiError> + Send,
    {
        let request = build()?;
        debug!(target: "secai::api", endpoint = endpoint.name(), url = %request.url, method = ?request.method, "sending request");
        let raw = classify(self.inner.execute(request).await)?;
        decode(&raw)
    }
}
