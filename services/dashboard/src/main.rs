use anyhow::Result;
use tracing::{info, warn};

use secai_client::{ApiClient, ApiConfig};
use secai_core::{init_tracing, load_settings, Settings};

mod cli;
mod commands;
mod view;

const SERVICE: &str = "secai-dashboard";

#[tokio::main]
async fn main() -> Result<()> {
    let (settings, settings_err) = match load_settings(SERVICE) {
        Ok(s) => (s, None),
        Err(e) => (Settings::defaults(SERVICE), Some(e)),
    };
    init_tracing(&settings)?;
    if let Some(e) = settings_err {
        warn!(target: "secai-dashboard", error = %e, "settings unavailable, using defaults");
    }

    let command = cli::parse_args(std::env::args().skip(1))?;
    let client = ApiClient::new(ApiConfig::from_settings(&settings))?;
    info!(target: "secai-dashboard", ?command, base_url = client.config().base_url(), "running command");

    let report = commands::execute(&client, command).await?;
    println!("{}", report.text);
    if !report.ok {
        std::process::exit(1);
    }
    Ok(())
}
