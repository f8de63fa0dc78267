//! Wire types for the backend's JSON bodies.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{check_features, ValidationError};

pub const DEFAULT_MODEL_VERSION: &str = "latest";
pub const DEFAULT_INGEST_DATASET: &str = "default";
pub const DEFAULT_FILE_DATASET: &str = "uploaded";

/// One arbitrary ingest record.
pub type Record = serde_json::Map<String, Value>;

/// Validated on construction and on deserialization: non-empty, all finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PredictionRequestWire")]
pub struct PredictionRequest {
    features: Vec<f64>,
    model_version: String,
}

#[derive(Deserialize)]
struct PredictionRequestWire {
    features: Vec<f64>,
    #[serde(default)]
    model_version: Option<String>,
}

impl TryFrom<PredictionRequestWire> for PredictionRequest {
    type Error = ValidationError;

    fn try_from(w: PredictionRequestWire) -> Result<Self, Self::Error> {
        PredictionRequest::new(w.features, w.model_version.as_deref())
    }
}

impl PredictionRequest {
    pub fn new(features: Vec<f64>, model_version: Option<&str>) -> Result<Self, ValidationError> {
        check_features(&features)?;
        Ok(Self { features, model_version: model_version.unwrap_or(DEFAULT_MODEL_VERSION).to_string() })
    }

    pub fn features(&self) -> &[f64] { &self.features }

    pub fn model_version(&self) -> &str { &self.model_version }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Label or numeric class, whatever the model emits.
    pub prediction: Value,
    #[serde(default)]
    pub confidence: Option<f64>,
    pub model_version: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub timestamp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedHealth {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    pub uptime_seconds: f64,
    pub model_status: String,
    pub system: SystemMetrics,
    #[serde(default)]
    pub timestamp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    pub cpu_percent: f64,
    pub memory: MemoryStats,
    pub disk: DiskStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_gb: f64,
    pub available_gb: f64,
    pub percent_used: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskStats {
    pub total_gb: f64,
    pub free_gb: f64,
    pub percent_used: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_version: String,
    pub model_type: String,
    #[serde(default)]
    pub features_count: Option<u64>,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct IngestRequest<'a> {
    pub data: &'a [Record],
    pub dataset_name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub status: String,
    pub records_ingested: u64,
    pub dataset_name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestStats {
    pub total_datasets: u64,
    #[serde(default)]
    pub datasets: Vec<DatasetSummary>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub name: String,
    pub records: u64,
    pub features: u64,
}

/// File contents passed through to the upload endpoint untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self { file_name: file_name.into(), bytes: bytes.into() }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "upload".to_string());
        Ok(Self { file_name, bytes })
    }
}
