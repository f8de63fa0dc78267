//! Plain-text rendering of backend payloads.

use secai_client::{
    ApiError, DetailedHealth, HealthStatus, IngestResponse, IngestStats, ModelInfo, PredictionResponse,
};
use serde_json::Value;

pub const OFFLINE_MESSAGE: &str = "Unable to connect to backend API. Make sure the server is running.";

fn label(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn percent(confidence: Option<f64>) -> String {
    confidence.map(|c| format!("{:.2}%", c * 100.0)).unwrap_or_else(|| "n/a".into())
}

/// Header line plus model card. Health failure means offline regardless of model info.
pub fn status(health: &Result<HealthStatus, ApiError>, info: &Result<ModelInfo, ApiError>) -> String {
    let mut lines = match health {
        Ok(h) => vec![format!("API Connected ({}, status: {})", h.service.as_deref().unwrap_or("backend"), h.status)],
        Err(_) => vec!["API Offline".to_string(), format!("Error: {OFFLINE_MESSAGE}")],
    };
    lines.push(match info {
        Ok(m) => model_info(m),
        Err(e) => format!("Model: unavailable ({e})"),
    });
    lines.join("\n")
}

pub fn health(h: &HealthStatus) -> String {
    match &h.service {
        Some(s) => format!("Status: {}\nService: {s}", h.status),
        None => format!("Status: {}", h.status),
    }
}

pub fn detailed_health(h: &DetailedHealth) -> String {
    let m = &h.system.memory;
    let d = &h.system.disk;
    format!(
        "Status: {}\nUptime: {:.0}s\nModel: {}\nCPU: {:.1}%\nMemory: {:.2}/{:.2} GB available ({:.1}% used)\nDisk: {:.2}/{:.2} GB free ({:.1}% used)",
        h.status, h.uptime_seconds, h.model_status, h.system.cpu_percent,
        m.available_gb, m.total_gb, m.percent_used, d.free_gb, d.total_gb, d.percent_used,
    )
}

pub fn model_info(m: &ModelInfo) -> String {
    let count = m.features_count.map(|c| c.to_string()).unwrap_or_else(|| "unknown".into());
    format!("Model Version: {}\nModel Type: {}\nFeatures: {}\nStatus: {}", m.model_version, m.model_type, count, m.status)
}

pub fn prediction(p: &PredictionResponse) -> String {
    format!(
        "Prediction: {}\nConfidence: {}\nModel Version: {}\n{}",
        label(&p.prediction), percent(p.confidence), p.model_version, p.message
    )
}

pub fn predictions(ps: &[PredictionResponse]) -> String {
    ps.iter()
        .enumerate()
        .map(|(i, p)| format!("#{} {} ({}, model {})", i + 1, label(&p.prediction), percent(p.confidence), p.model_version))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn ingest(r: &IngestResponse) -> String {
    format!("{}: {} records into '{}'\n{}", r.status, r.records_ingested, r.dataset_name, r.message)
}

pub fn stats(s: &IngestStats) -> String {
    let mut out = format!("{} ({} datasets)", s.message, s.total_datasets);
    for d in &s.datasets {
        out.push_str(&format!("\n  {:<24} {:>8} records {:>4} features", d.name, d.records, d.features));
    }
    out
}
