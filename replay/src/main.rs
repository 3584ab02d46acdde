//! Dandelion replay: runs a voting scenario against an in-memory deployment.

use anyhow::Context;
use clap::Parser;
use dandelion_replay::{Replay, ReplayConfig, Scenario};
use dandelion_utils::{init_logging, LogFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dandelion-replay",
    about = "Replay Dandelion Voting scenarios block by block"
)]
struct Cli {
    /// Path to a TOML deployment file. Defaults are used when omitted.
    #[arg(long, env = "DANDELION_CONFIG")]
    config: Option<PathBuf>,

    /// Log level filter, overriding the file's `log_level`.
    #[arg(long, env = "DANDELION_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output: "human" or "json".
    #[arg(long, env = "DANDELION_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// JSON scenario file.
    #[arg(long, env = "DANDELION_SCENARIO")]
    scenario: PathBuf,

    /// Write the JSON report here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ReplayConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ReplayConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    init_logging(config.log_format, &config.log_level).context("initializing logging")?;

    let scenario = Scenario::from_json_file(&cli.scenario)
        .with_context(|| format!("loading scenario {}", cli.scenario.display()))?;
    tracing::info!(
        scenario = %cli.scenario.display(),
        steps = scenario.steps.len(),
        "replaying scenario"
    );

    let mut replay = Replay::from_config(&config).context("deploying apps")?;
    let report = replay.run(&scenario);
    let failed = report.steps.iter().filter(|s| !s.ok).count();
    tracing::info!(
        final_block = report.final_block,
        votes = report.votes.len(),
        failed,
        "replay finished"
    );

    let json = serde_json::to_string_pretty(&report)?;
    match cli.output {
        Some(path) => std::fs::write(&path, json)
            .with_context(|| format!("writing report {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
