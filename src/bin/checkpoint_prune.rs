use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use magkit::logging::{self, LogLevel};
use magkit::prune::{Prompter, RunOutcome, Session, Stride};
use magkit::MagkitConfig;

#[derive(Parser, Debug)]
#[command(
    name = "checkpoint-prune",
    version,
    about = "Thin out OOMMF magnetisation checkpoints in drive-* directories"
)]
struct Cli {
    #[arg(long, help = "Target directory (a drive-* directory or its parent)")]
    target: Option<PathBuf>,
    #[arg(long, help = "Keep sequence 0 and every snapshot whose successor is a multiple of this")]
    stride: Option<Stride>,
    #[arg(long, help = "Checkpoint file name prefix")]
    prefix: Option<String>,
    #[arg(long, help = "JSON configuration file")]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = false, help = "Do not write a log file")]
    no_log: bool,
    #[arg(long, help = "Directory for the log file")]
    log_dir: Option<PathBuf>,
    #[arg(long, value_parser = parse_level, help = "Log level (error, warn, info, debug, trace)")]
    log_level: Option<LogLevel>,
}

fn parse_level(s: &str) -> Result<LogLevel, String> {
    serde_json::from_value(serde_json::Value::String(s.to_ascii_lowercase()))
        .map_err(|_| format!("unknown log level: {s}"))
}

fn load_config(cli: &Cli) -> anyhow::Result<MagkitConfig> {
    let mut config = match &cli.config {
        Some(path) => MagkitConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => MagkitConfig::default(),
    };

    if let Some(target) = &cli.target {
        config.prune.target = Some(target.clone());
    }
    if let Some(stride) = cli.stride {
        config.prune.stride = Some(stride);
    }
    if let Some(prefix) = &cli.prefix {
        config.prune.prefix.clone_from(prefix);
    }
    if cli.no_log {
        config.logging.enabled = false;
    }
    if let Some(dir) = &cli.log_dir {
        config.logging.directory.clone_from(dir);
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if let Some(path) = logging::init(&config.logging)? {
        println!("Logging to {}", path.display());
    }

    let pattern = config.prune.pattern()?;
    let stdin = io::stdin();
    let prompter = Prompter::new(stdin.lock(), io::stdout());
    let mut session = Session::new(prompter, pattern).with_stride(config.prune.stride);

    let summary = session.run(config.prune.target.as_deref())?;
    tracing::info!(
        outcome = ?summary.outcome,
        directories = summary.directories.len(),
        deleted = summary.deleted(),
        "pruning run finished"
    );

    if summary.outcome == RunOutcome::Completed {
        println!(
            "Processed {} director{}, deleted {} file(s).",
            summary.directories.len(),
            if summary.directories.len() == 1 { "y" } else { "ies" },
            summary.deleted()
        );
    }
    io::stdout().flush()?;
    Ok(())
}
