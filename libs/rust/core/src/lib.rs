//! Core shared utilities for Cloud Security AI clients: tracing setup and layered settings.

use anyhow::Result;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

/// Base URL used when no override is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Quiet by default; command output shares the terminal with logs.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Env var naming an optional settings file (yaml/toml/json).
pub const CONFIG_FILE_ENV: &str = "SECAI_CONFIG_FILE";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub service_name: String,
    pub api_url: String,
    pub log_level: String,
    #[serde(default)]
    pub json_log: bool,
}

impl Settings {
    pub fn defaults(service: &str) -> Self {
        Self { service_name: service.to_string(), api_url: DEFAULT_API_URL.into(), log_level: DEFAULT_LOG_LEVEL.into(), json_log: false }
    }
}

/// Install the global subscriber once. `RUST_LOG` wins over `settings.log_level`.
/// Output goes to stderr so command output on stdout stays machine-readable.
pub fn init_tracing(settings: &Settings) -> Result<()> {
    TRACING_INIT.get_or_try_init(|| {
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .or_else(|_| tracing_subscriber::EnvFilter::try_new(&settings.log_level))?;
        let fmt_layer = if settings.json_log {
            tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(std::io::stderr)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(true)
                .with_writer(std::io::stderr)
                .boxed()
        };
        tracing_subscriber::registry().with(env_filter).with(fmt_layer).try_init()?;
        Ok::<(), anyhow::Error>(())
    })?;
    info!(target: "secai", service = %settings.service_name, "tracing initialized");
    Ok(())
}

/// Layered settings: defaults, then the file named by `SECAI_CONFIG_FILE`, then `SECAI_*` env vars.
/// Empty env values count as unset.
pub fn load_settings(service: &str) -> Result<Settings> {
    let mut builder = config::Config::builder()
        .set_default("service_name", service)?
        .set_default("api_url", DEFAULT_API_URL)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("json_log", false)?;

    if let Ok(file) = std::env::var(CONFIG_FILE_ENV) {
        if !file.trim().is_empty() {
            builder = builder.add_source(config::File::with_name(&file).required(false));
        }
    }
    builder = builder.add_source(
        config::Environment::with_prefix("SECAI")
            .prefix_separator("_")
            .separator("__")
            .ignore_empty(true)
            .try_parsing(true),
    );
    let cfg = builder.build()?;
    let mut settings: Settings = cfg.try_deserialize()?;
    if settings.api_url.trim().is_empty() {
        settings.api_url = DEFAULT_API_URL.into();
    }
    Ok(settings)
}
