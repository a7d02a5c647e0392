// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_ENV: &str = "CINEMANAGER_LOG";

/// Where log lines go. The TUI owns the terminal, so interactive sessions
/// log to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

pub fn parse_level(raw: &str) -> Result<LevelFilter> {
    let normalized = raw.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" | "off" => normalized
            .parse::<LevelFilter>()
            .with_context(|| format!("parse log level {raw:?}")),
        _ => Err(anyhow!(
            "unknown log level {raw:?}; use trace, debug, info, warn, error, or off"
        )),
    }
}

pub fn init(target: &LogTarget, default_level: LevelFilter) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    match target {
        LogTarget::File(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| {
                    format!(
                        "open log file {} -- set [log].file to a writable path",
                        path.display()
                    )
                })?;
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(filter)
                .try_init()
                .context("install log subscriber")?;
        }
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .try_init()
                .context("install log subscriber")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_level;
    use anyhow::Result;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn parse_level_accepts_known_levels_case_insensitively() -> Result<()> {
        assert_eq!(parse_level("info")?, LevelFilter::INFO);
        assert_eq!(parse_level("DEBUG")?, LevelFilter::DEBUG);
        assert_eq!(parse_level(" warn ")?, LevelFilter::WARN);
        assert_eq!(parse_level("off")?, LevelFilter::OFF);
        Ok(())
    }

    #[test]
    fn parse_level_rejects_unknown_and_numeric_levels() {
        for raw in ["loud", "3", ""] {
            let error = parse_level(raw).expect_err("level should be rejected");
            assert!(error.to_string().contains("unknown log level"));
        }
    }
}
