//! Base URL resolution and the fixed endpoint table.

use secai_core::{load_settings, Settings, DEFAULT_API_URL};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Health,
    HealthDetailed,
    Predict,
    PredictBatch,
    ModelInfo,
    Ingest,
    IngestFile,
    IngestStats,
}

impl Endpoint {
    pub const ALL: [Endpoint; 8] = [
        Endpoint::Health,
        Endpoint::HealthDetailed,
        Endpoint::Predict,
        Endpoint::PredictBatch,
        Endpoint::ModelInfo,
        Endpoint::Ingest,
        Endpoint::IngestFile,
        Endpoint::IngestStats,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Health => "/health",
            Endpoint::HealthDetailed => "/health/detailed",
            Endpoint::Predict => "/api/predict",
            Endpoint::PredictBatch => "/api/predict/batch",
            Endpoint::ModelInfo => "/api/model/info",
            Endpoint::Ingest => "/api/ingest",
            Endpoint::IngestFile => "/api/ingest/file",
            Endpoint::IngestStats => "/api/ingest/stats",
        }
    }

    /// Logical name, used as a log field.
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Health => "health",
            Endpoint::HealthDetailed => "healthDetailed",
            Endpoint::Predict => "predict",
            Endpoint::PredictBatch => "predictBatch",
            Endpoint::ModelInfo => "modelInfo",
            Endpoint::Ingest => "ingest",
            Endpoint::IngestFile => "ingestFile",
            Endpoint::IngestStats => "ingestStats",
        }
    }
}

/// Full URLs, all sharing one base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub health: String,
    pub health_detailed: String,
    pub predict: String,
    pub predict_batch: String,
    pub model_info: String,
    pub ingest: String,
    pub ingest_file: String,
    pub ingest_stats: String,
}

impl Endpoints {
    fn for_base(base: &str) -> Self {
        let url = |e: Endpoint| format!("{base}{}", e.path());
        Self {
            health: url(Endpoint::Health),
            health_detailed: url(Endpoint::HealthDetailed),
            predict: url(Endpoint::Predict),
            predict_batch: url(Endpoint::PredictBatch),
            model_info: url(Endpoint::ModelInfo),
            ingest: url(Endpoint::Ingest),
            ingest_file: url(Endpoint::IngestFile),
            ingest_stats: url(Endpoint::IngestStats),
        }
    }

    pub fn url(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Health => &self.health,
            Endpoint::HealthDetailed => &self.health_detailed,
            Endpoint::Predict => &self.predict,
            Endpoint::PredictBatch => &self.predict_batch,
            Endpoint::ModelInfo => &self.model_info,
            Endpoint::Ingest => &self.ingest,
            Endpoint::IngestFile => &self.ingest_file,
            Endpoint::IngestStats => &self.ingest_stats,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Endpoint, &str)> + '_ {
        Endpoint::ALL.into_iter().map(move |e| (e, self.url(e)))
    }
}

/// Immutable client configuration, built once at startup and handed to [`crate::ApiClient::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    endpoints: Endpoints,
}

impl ApiConfig {
    /// Never fails: an empty base falls back to the default, a malformed one is kept and only logged.
    pub fn new(base_url: impl Into<String>) -> Self {
        let raw = base_url.into();
        let trimmed = raw.trim().trim_end_matches('/');
        let base = if trimmed.is_empty() { DEFAULT_API_URL.to_string() } else { trimmed.to_string() };
        if let Err(e) = reqwest::Url::parse(&base) {
            warn!(target: "secai::config", base_url = %base, error = %e, "api base url does not parse; requests will fail");
        }
        let endpoints = Endpoints::for_base(&base);
        Self { base_url: base, endpoints }
    }

    pub fn from_settings(settings: &Settings) -> Self { Self::new(settings.api_url.clone()) }

    /// Resolve from `SECAI_API_URL` / the settings file, defaulting silently on any problem.
    pub fn resolve(service: &str) -> Self {
        match load_settings(service) {
            Ok(s) => Self::from_settings(&s),
            Err(e) => {
                warn!(target: "secai::config", error = %e, "settings unavailable, using default api url");
                Self::default()
            }
        }
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    pub fn endpoints(&self) -> &Endpoints { &self.endpoints }

    pub fn url(&self, endpoint: Endpoint) -> &str { self.endpoints.url(endpoint) }
}

impl Default for ApiConfig {
    fn default() -> Self { Self::new(DEFAULT_API_URL) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_prefixes_every_endpoint() {
        let cfg = ApiConfig::default();
        assert_eq!(cfg.base_url(), "http://localhost:8000");
        for (_, url) in cfg.endpoints().iter() {
            assert!(url.starts_with("http://localhost:8000/"), "{url}");
        }
        assert_eq!(cfg.endpoints().predict, "http://localhost:8000/api/predict");
        assert_eq!(cfg.url(Endpoint::HealthDetailed), "http://localhost:8000/health/detailed");
    }

    #[test]
    fn override_reflected_in_all_endpoints() {
        let cfg = ApiConfig::new("https://api.example.com");
        assert_eq!(cfg.endpoints().iter().count(), 8);
        assert!(cfg.endpoints().iter().all(|(_, u)| u.starts_with("https://api.example.com/")));
        assert_eq!(cfg.endpoints().ingest_stats, "https://api.example.com/api/ingest/stats");
    }

    #[test]
    fn trailing_slash_and_blank_base() {
        assert_eq!(ApiConfig::new("http://10.0.0.5:8080//").url(Endpoint::Health), "http://10.0.0.5:8080/health");
        assert_eq!(ApiConfig::new("   ").base_url(), DEFAULT_API_URL);
    }

    #[test]
    fn malformed_base_is_kept() {
        let cfg = ApiConfig::new("not a url");
        assert_eq!(cfg.url(Endpoint::ModelInfo), "not a url/api/model/info");
    }

    #[test]
    fn from_settings_uses_api_url() {
        let mut s = Settings::defaults("test");
        s.api_url = "http://backend:9000/".into();
        assert_eq!(ApiConfig::from_settings(&s).base_url(), "http://backend:9000");
    }
}
