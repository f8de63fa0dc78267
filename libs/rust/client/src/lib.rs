//! Typed async client for the Cloud Security AI backend.
//!
//! Layers, outermost first:
//! - [`ApiClient`]: one method per backend operation, local validation of feature vectors
//! - [`Intercepted`]: builds, sends, classifies, decodes and logs every call in one place
//! - [`Transport`]: the wire; [`HttpTransport`] in production, fakes in tests

pub mod client;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod models;
pub mod transport;
pub mod validation;

pub use client::ApiClient;
pub use config::{ApiConfig, Endpoint, Endpoints};
pub use error::{ApiError, ErrorKind};
pub use interceptor::{classify, Intercepted};
pub use models::{
    DatasetSummary, DetailedHealth, DiskStats, HealthStatus, IngestResponse, IngestStats, MemoryStats, ModelInfo,
    PredictionRequest, PredictionResponse, Record, SystemMetrics, UploadFile, DEFAULT_FILE_DATASET,
    DEFAULT_INGEST_DATASET, DEFAULT_MODEL_VERSION,
};
pub use transport::{ApiRequest, HttpTransport, Method, RawResponse, RequestBody, Transport, TransportError, REQUEST_TIMEOUT};
pub use validation::{check_features, parse_features, ValidationError};
