use std::path::Path;

use anyhow::{Context, Result};
use secai_client::{parse_features, ApiClient, PredictionRequest, Record, UploadFile};
use tracing::info;

use crate::cli::{Command, USAGE};
use crate::view;

/// Rendered output plus whether the command counts as a success for the exit code.
#[derive(Debug)]
pub struct Report {
    pub text: String,
    pub ok: bool,
}

impl Report {
    fn ok(text: String) -> Self { Self { text, ok: true } }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = tokio::fs::read_to_string(path).await.with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

pub async fn execute(client: &ApiClient, command: Command) -> Result<Report> {
    match command {
        Command::Help => Ok(Report::ok(USAGE.to_string())),
        Command::Status => {
            // independent calls; either may finish first
            let (health, info) = tokio::join!(client.health_check(), client.get_model_info());
            let ok = health.is_ok();
            Ok(Report { text: view::status(&health, &info), ok })
        }
        Command::Health { detailed: false } => Ok(Report::ok(view::health(&client.health_check().await?))),
        Command::Health { detailed: true } => Ok(Report::ok(view::detailed_health(&client.detailed_health_check().await?))),
        Command::Info => Ok(Report::ok(view::model_info(&client.get_model_info().await?))),
        Command::Predict { inputs, model_version } => {
            let features = parse_features(&inputs)?;
            info!(target: "secai-dashboard", count = features.len(), "submitting prediction");
            let res = client.predict(features, model_version.as_deref()).await?;
            Ok(Report::ok(view::prediction(&res)))
        }
        Command::PredictBatch { path } => {
            let requests: Vec<PredictionRequest> = read_json(&path).await?;
            let res = client.predict_batch(&requests).await?;
            Ok(Report::ok(view::predictions(&res)))
        }
        Command::Ingest { path, dataset } => {
            let records: Vec<Record> = read_json(&path).await?;
            let res = client.ingest_data(&records, dataset.as_deref()).await?;
            Ok(Report::ok(view::ingest(&res)))
        }
        Command::IngestFile { path, dataset } => {
            let file = UploadFile::from_path(&path).await.with_context(|| format!("reading {}", path.display()))?;
            let res = client.ingest_file(file, dataset.as_deref()).await?;
            Ok(Report::ok(view::ingest(&res)))
        }
        Command::Stats => Ok(Report::ok(view::stats(&client.get_ingest_stats().await?))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use secai_client::{ApiConfig, ApiError, ApiRequest, ErrorKind, RawResponse, Transport, TransportError};
    use serde_json::json;
    use std::sync::Arc;

    struct Canned {
        calls: Mutex<Vec<ApiRequest>>,
        offline: bool,
    }

    #[async_trait]
    impl Transport for Canned {
        async fn execute(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
            let path = request.url.trim_start_matches("http://localhost:8000").to_string();
            self.calls.lock().push(request);
            if self.offline {
                return Err(TransportError::NoResponse("connection refused".into()));
            }
            let body = match path.as_str() {
                "/health" => json!({"status": "healthy", "service": "Cloud Security AI API"}),
                "/health/detailed" => json!({
                    "status": "healthy", "uptime_seconds": 3600.0, "model_status": "loaded",
                    "system": {"cpu_percent": 7.5,
                        "memory": {"total_gb": 16.0, "available_gb": 9.5, "percent_used": 40.6},
                        "disk": {"total_gb": 250.0, "free_gb": 120.25, "percent_used": 51.9}}
                }),
                "/api/model/info" => json!({"model_version": "1.0.0", "model_type": "RandomForestClassifier", "features_count": 4, "status": "loaded"}),
                "/api/predict" => json!({"prediction": "benign", "confidence": 0.81, "model_version": "1.0.0", "message": "Prediction successful"}),
                "/api/predict/batch" => json!([{"prediction": 0, "confidence": 0.6, "model_version": "1.0.0", "message": "Prediction successful"}]),
                "/api/ingest" => json!({"status": "success", "records_ingested": 1, "dataset_name": "default", "message": "Successfully ingested 1 records"}),
                _ => return Ok(RawResponse::new(404, r#"{"detail":"Not Found"}"#)),
            };
            Ok(RawResponse::new(200, body.to_string()))
        }
    }

    fn setup(offline: bool) -> (Arc<Canned>, ApiClient) {
        let t = Arc::new(Canned { calls: Mutex::new(vec![]), offline });
        let c = ApiClient::with_transport(ApiConfig::default(), t.clone());
        (t, c)
    }

    #[tokio::test]
    async fn status_online() {
        let (t, c) = setup(false);
        let r = execute(&c, Command::Status).await.unwrap();
        assert!(r.ok);
        assert!(r.text.starts_with("API Connected"));
        assert_eq!(t.calls.lock().len(), 2);
    }

    #[tokio::test]
    async fn status_offline_is_not_ok() {
        let (_, c) = setup(true);
        let r = execute(&c, Command::Status).await.unwrap();
        assert!(!r.ok);
        assert!(r.text.contains(view::OFFLINE_MESSAGE));
    }

    #[tokio::test]
    async fn detailed_health_renders_metrics() {
        let (t, c) = setup(false);
        let r = execute(&c, Command::Health { detailed: true }).await.unwrap();
        assert!(r.text.starts_with("Status: healthy\nUptime: 3600s\nModel: loaded\nCPU: 7.5%"));
        assert!(r.text.contains("Disk: 120.25/250.00 GB free"));
        assert_eq!(t.calls.lock()[0].url, "http://localhost:8000/health/detailed");
    }

    #[tokio::test]
    async fn predict_bad_text_never_calls_backend() {
        let (t, c) = setup(false);
        let err = execute(&c, Command::Predict { inputs: vec!["1.5".into(), "x".into()], model_version: None }).await.unwrap_err();
        assert!(err.to_string().starts_with("all features must be valid numbers"));
        assert!(t.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn predict_renders_result() {
        let (t, c) = setup(false);
        let r = execute(&c, Command::Predict { inputs: vec!["1.5".into(), " 2.3".into()], model_version: Some("v1".into()) }).await.unwrap();
        assert!(r.text.starts_with("Prediction: benign\nConfidence: 81.00%"));
        assert_eq!(t.calls.lock()[0].json_body().unwrap(), json!({"features": [1.5, 2.3], "model_version": "v1"}));
    }

    #[tokio::test]
    async fn server_error_keeps_kind_through_anyhow() {
        let (_, c) = setup(false);
        let err = execute(&c, Command::Stats).await.unwrap_err();
        let api = err.downcast_ref::<ApiError>().unwrap();
        assert_eq!(api.kind(), ErrorKind::Server);
        assert_eq!(err.to_string(), "Not Found");
    }

    #[tokio::test]
    async fn batch_and_ingest_from_files() {
        let (t, c) = setup(false);
        let dir = tempfile::tempdir().unwrap();
        let batch = dir.path().join("batch.json");
        std::fs::write(&batch, r#"[{"features": [1, 2, 3]}]"#).unwrap();
        let r = execute(&c, Command::PredictBatch { path: batch }).await.unwrap();
        assert_eq!(r.text, "#1 0 (60.00%, model 1.0.0)");

        let records = dir.path().join("records.json");
        std::fs::write(&records, r#"[{"feature1": 1.5, "label": 0}]"#).unwrap();
        let r = execute(&c, Command::Ingest { path: records, dataset: None }).await.unwrap();
        assert!(r.text.starts_with("success: 1 records into 'default'"));
        assert_eq!(t.calls.lock()[1].json_body().unwrap()["dataset_name"], json!("default"));
    }

    #[tokio::test]
    async fn invalid_batch_file_is_rejected_locally() {
        let (t, c) = setup(false);
        let dir = tempfile::tempdir().unwrap();
        let batch = dir.path().join("batch.json");
        std::fs::write(&batch, r#"[{"features": []}]"#).unwrap();
        assert!(execute(&c, Command::PredictBatch { path: batch }).await.is_err());
        assert!(t.calls.lock().is_empty());
    }
}
