// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

const LOG_FILE_PREFIX: &str = "wealthdesk.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("prepare log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid log filter {directive:?}: {source}")]
    Filter {
        directive: String,
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

pub fn init(log_dir: &Path, level: &str) -> Result<(), LoggingError> {
    if LOG_GUARD.get().is_some() {
        return Ok(());
    }

    fs::create_dir_all(log_dir).map_err(|source| LoggingError::CreateDir {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let env_filter = build_env_filter(level)?;
    let file_appender = rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer);

    let subscriber = Registry::default().with(env_filter).with(file_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = LOG_GUARD.set(guard);

    tracing::info!(dir = %log_dir.display(), "logging initialized");
    Ok(())
}

fn build_env_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => level_filter(level),
    }
}

pub fn level_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directive).map_err(|source| LoggingError::Filter {
        directive: directive.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::{LoggingError, level_filter};

    #[test]
    fn level_filter_accepts_levels_and_target_directives() {
        assert!(level_filter("info").is_ok());
        assert!(level_filter("wealthdesk_store=debug,warn").is_ok());
    }

    #[test]
    fn level_filter_rejects_unknown_levels() {
        let error = level_filter("wealthdesk=loud").expect_err("unknown level should fail");
        assert!(matches!(error, LoggingError::Filter { .. }));
        assert!(error.to_string().contains("wealthdesk=loud"));
    }
}
