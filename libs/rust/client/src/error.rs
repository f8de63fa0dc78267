use serde_json::Value;
use thiserror::Error;

use crate::validation::ValidationError;

/// Every failure a caller can see. Transport failures land in exactly one of
/// `Server`, `NoResponse` or `Request`; `Validation` never reaches the wire.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{}", server_message(.status, .detail))]
    Server { status: u16, detail: Option<String> },
    #[error("no response from server: {message}")]
    NoResponse { message: String },
    #[error("request failed before a response: {message}")]
    Request { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Server,
    NoResponse,
    Request,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::Server { .. } => ErrorKind::Server,
            ApiError::NoResponse { .. } => ErrorKind::NoResponse,
            ApiError::Request { .. } => ErrorKind::Request,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-provided detail text, when the backend sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Server { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn request(message: impl Into<String>) -> Self { ApiError::Request { message: message.into() } }
}

fn server_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(d) => d.clone(),
        None => format!("request failed with status code {status}"),
    }
}

/// Pull `detail` out of an error body. FastAPI sends either a string or, for
/// request validation failures, a list of `{loc, msg, type}` objects.
pub(crate) fn extract_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|i| i.get("msg").and_then(Value::as_str))
                .filter(|m| !m.trim().is_empty())
                .collect();
            if msgs.is_empty() { Some(Value::Array(items.clone()).to_string()) } else { Some(msgs.join("; ")) }
        }
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_displays_detail_verbatim() {
        let err = ApiError::Server { status: 500, detail: Some("model unavailable".into()) };
        assert_eq!(err.to_string(), "model unavailable");
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn server_error_without_detail_uses_status() {
        let err = ApiError::Server { status: 502, detail: None };
        assert_eq!(err.to_string(), "request failed with status code 502");
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn validation_is_transparent() {
        let err: ApiError = ValidationError::Empty.into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "at least one feature is required");
    }

    #[test]
    fn detail_string() {
        assert_eq!(extract_detail(br#"{"detail":"Model not loaded. Please check server logs."}"#).as_deref(), Some("Model not loaded. Please check server logs."));
    }

    #[test]
    fn detail_validation_list() {
        let body = br#"{"detail":[{"loc":["body","features",0],"msg":"value is not a valid float","type":"type_error.float"},{"loc":["body"],"msg":"field required","type":"value_error.missing"}]}"#;
        assert_eq!(extract_detail(body).as_deref(), Some("value is not a valid float; field required"));
    }

    #[test]
    fn detail_missing_or_not_json() {
        assert_eq!(extract_detail(br#"{"error":"x"}"#), None);
        assert_eq!(extract_detail(b"<html>Bad Gateway</html>"), None);
        assert_eq!(extract_detail(br#"{"detail":null}"#), None);
        assert_eq!(extract_detail(br#"{"detail":{"code":7}}"#).as_deref(), Some(r#"{"code":7}"#));
    }

    #[test]
    fn blank_detail_falls_back_to_status() {
        let err = ApiError::Server { status: 500, detail: extract_detail(br#"{"detail":""}"#) };
        assert_eq!(err.to_string(), "request failed with status code 500");
        assert_eq!(extract_detail(br#"{"detail":"   "}"#), None);
        assert_eq!(extract_detail(br#"{"detail":[]}"#), None);
    }
}
