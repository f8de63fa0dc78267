use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};

/// Values the prediction form starts with.
pub const DEFAULT_FEATURES: [&str; 4] = ["1.5", "2.3", "4.1", "0.8"];

pub const USAGE: &str = "\
usage: secai-dashboard [command] [options]

commands:
  status                                   backend reachability and model summary (default)
  health [--detailed]                      health payload, optionally with system metrics
  info                                     model metadata
  predict [--model-version V] [values...]  predict on a feature vector (default 1.5 2.3 4.1 0.8)
  predict-batch <file.json>                predict on an array of {features, model_version}
  ingest <file.json> [--dataset NAME]      ingest an array of JSON records
  ingest-file <path> [--dataset NAME]      upload a CSV file for ingestion
  stats                                    ingested dataset statistics

environment:
  SECAI_API_URL      backend base url (default http://localhost:8000)
  SECAI_CONFIG_FILE  optional settings file
  SECAI_LOG_LEVEL    log filter when RUST_LOG is unset
  SECAI_JSON_LOG     1/true for JSON logs on stderr";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Status,
    Health { detailed: bool },
    Info,
    Predict { inputs: Vec<String>, model_version: Option<String> },
    PredictBatch { path: PathBuf },
    Ingest { path: PathBuf, dataset: Option<String> },
    IngestFile { path: PathBuf, dataset: Option<String> },
    Stats,
    Help,
}

#[derive(Default)]
struct Flags {
    positional: Vec<String>,
    model_version: Option<String>,
    dataset: Option<String>,
    detailed: bool,
}

// Only exact `--flag` spellings are options, so negative numbers stay positional.
fn split_flags(args: &[String]) -> Result<Flags> {
    let mut flags = Flags::default();
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--model-version" => {
                flags.model_version = Some(it.next().ok_or_else(|| anyhow!("--model-version needs a value"))?.clone())
            }
            "--dataset" => flags.dataset = Some(it.next().ok_or_else(|| anyhow!("--dataset needs a value"))?.clone()),
            "--detailed" => flags.detailed = true,
            s if s.starts_with("--") => bail!("unknown option {s}\n\n{USAGE}"),
            _ => flags.positional.push(arg.clone()),
        }
    }
    Ok(flags)
}

fn single_path(cmd: &str, positional: Vec<String>) -> Result<PathBuf> {
    match <[String; 1]>::try_from(positional) {
        Ok([p]) => Ok(PathBuf::from(p)),
        Err(_) => bail!("{cmd} takes exactly one path\n\n{USAGE}"),
    }
}

/// Parse arguments after the program name.
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command> {
    let mut args: Vec<String> = args.into_iter().collect();
    if args.is_empty() {
        return Ok(Command::Status);
    }
    let cmd = args.remove(0);
    if matches!(cmd.as_str(), "-h" | "--help" | "help") {
        return Ok(Command::Help);
    }
    let flags = split_flags(&args)?;
    let no_positional = |c: Command| {
        if flags.positional.is_empty() { Ok(c) } else { Err(anyhow!("{cmd} takes no arguments\n\n{USAGE}")) }
    };
    match cmd.as_str() {
        "status" => no_positional(Command::Status),
        "health" => no_positional(Command::Health { detailed: flags.detailed }),
        "info" => no_positional(Command::Info),
        "stats" => no_positional(Command::Stats),
        "predict" => {
            let inputs = if flags.positional.is_empty() {
                DEFAULT_FEATURES.iter().map(|s| s.to_string()).collect()
            } else {
                flags.positional
            };
            Ok(Command::Predict { inputs, model_version: flags.model_version })
        }
        "predict-batch" => Ok(Command::PredictBatch { path: single_path(&cmd, flags.positional)? }),
        "ingest" => Ok(Command::Ingest { dataset: flags.dataset, path: single_path(&cmd, flags.positional)? }),
        "ingest-file" => Ok(Command::IngestFile { dataset: flags.dataset, path: single_path(&cmd, flags.positional)? }),
        other => bail!("unknown command {other}\n\n{USAGE}"),
    }
}
