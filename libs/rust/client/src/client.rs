use std::sync::Arc;

use tracing::info;

use crate::config::{ApiConfig, Endpoint};
use crate::error::ApiError;
use crate::interceptor::Intercepted;
use crate::models::{
    DetailedHealth, HealthStatus, IngestRequest, IngestResponse, IngestStats, ModelInfo, PredictionRequest,
    PredictionResponse, Record, UploadFile, DEFAULT_FILE_DATASET, DEFAULT_INGEST_DATASET,
};
use crate::transport::{ApiRequest, HttpTransport, Transport};

/// Cloud Security AI backend client. Cheap to clone; calls share no mutable state
/// and may be issued concurrently.
#[derive(Clone)]
pub struct ApiClient {
    config: Arc<ApiConfig>,
    layer: Intercepted,
}

impl ApiClient {
    /// HTTP transport with the fixed 30s timeout and JSON default content type.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let transport = HttpTransport::new()?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ApiConfig, transport: Arc<dyn Transport>) -> Self {
        info!(target: "secai::api", base_url = config.base_url(), "api client ready");
        Self { config: Arc::new(config), layer: Intercepted::new(transport) }
    }

    pub fn config(&self) -> &ApiConfig { &self.config }

    async fn get<R: serde::de::DeserializeOwned>(&self, endpoint: Endpoint) -> Result<R, ApiError> {
        let url = self.config.url(endpoint);
        self.layer.call(endpoint, || Ok(ApiRequest::get(endpoint, url))).await
    }

    async fn post_json<B, R>(&self, endpoint: Endpoint, body: &B) -> Result<R, ApiError>
    where
        B: serde::Serialize + Sync + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let url = self.config.url(endpoint);
        self.layer.call(endpoint, || ApiRequest::post_json(endpoint, url, body)).await
    }

    pub async fn health_check(&self) -> Result<HealthStatus, ApiError> { self.get(Endpoint::Health).await }

    pub async fn detailed_health_check(&self) -> Result<DetailedHealth, ApiError> {
        self.get(Endpoint::HealthDetailed).await
    }

    /// Rejects empty or non-finite vectors locally; nothing is sent in that case.
    pub async fn predict(&self, features: Vec<f64>, model_version: Option<&str>) -> Result<PredictionResponse, ApiError> {
        let request = PredictionRequest::new(features, model_version)?;
        self.post_json(Endpoint::Predict, &request).await
    }

    /// Requests go out as a bare JSON array.
    pub async fn predict_batch(&self, requests: &[PredictionRequest]) -> Result<Vec<PredictionResponse>, ApiError> {
        self.post_json(Endpoint::PredictBatch, requests).await
    }

    pub async fn get_model_info(&self) -> Result<ModelInfo, ApiError> { self.get(Endpoint::ModelInfo).await }

    pub async fn ingest_data(&self, data: &[Record], dataset_name: Option<&str>) -> Result<IngestResponse, ApiError> {
        let body = IngestRequest { data, dataset_name: dataset_name.unwrap_or(DEFAULT_INGEST_DATASET) };
        self.post_json(Endpoint::Ingest, &body).await
    }

    /// Multipart upload with fields `file` and `dataset_name`.
    pub async fn ingest_file(&self, file: UploadFile, dataset_name: Option<&str>) -> Result<IngestResponse, ApiError> {
        let endpoint = Endpoint::IngestFile;
        let url = self.config.url(endpoint);
        let dataset = dataset_name.unwrap_or(DEFAULT_FILE_DATASET).to_string();
        self.layer
            .call(endpoint, move || {
                Ok(ApiRequest::post_multipart(endpoint, url, file, vec![("dataset_name".to_string(), dataset)]))
            })
            .await
    }

    pub async fn get_ingest_stats(&self) -> Result<IngestStats, ApiError> { self.get(Endpoint::IngestStats).await }
}
