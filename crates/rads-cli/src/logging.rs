// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Tracing subscriber setup.
//!
//! Filter priority, highest first: `RADS_LOG`, `RUST_LOG`, then the
//! `--verbose`/`--quiet` flags, then `warn`. Headless runs log to stderr;
//! the terminal UI owns the screen, so interactive runs log to a file.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    /// Verbose wins when both flags are given.
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    const fn directives(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => {
                "warn,rads=debug,rads_app=debug,rads_menus=debug,rads_store=debug,rads_tui=debug"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Log file used by interactive sessions: beside the database, or in the
/// temp dir for in-memory sessions.
pub fn log_file_for(db_path: &Path) -> PathBuf {
    if db_path == Path::new(":memory:") {
        return std::env::temp_dir().join("rads.log");
    }
    db_path.with_file_name("rads.log")
}

pub fn init(verbosity: Verbosity, target: &LogTarget) -> Result<()> {
    let filter = build_env_filter(
        std::env::var("RADS_LOG").ok(),
        std::env::var("RUST_LOG").ok(),
        verbosity,
    );

    match target {
        LogTarget::Stderr => {
            let use_ansi = std::io::IsTerminal::is_terminal(&std::io::stderr());
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(use_ansi)
                        .without_time()
                        .compact(),
                )
                .try_init()
                .context("install stderr log subscriber")
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                .try_init()
                .context("install file log subscriber")
        }
    }
}

/// Unparseable env directives fall through to the next source.
fn build_env_filter(
    rads_log: Option<String>,
    rust_log: Option<String>,
    verbosity: Verbosity,
) -> EnvFilter {
    [rads_log, rust_log]
        .into_iter()
        .flatten()
        .filter(|directives| !directives.trim().is_empty())
        .find_map(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(verbosity.directives()))
}

#[cfg(test)]
mod tests {
    use super::{Verbosity, build_env_filter, log_file_for};
    use std::path::{Path, PathBuf};

    #[test]
    fn verbose_wins_over_quiet() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn rads_log_beats_rust_log_and_flags() {
        let filter = build_env_filter(
            Some("rads_store=trace".to_owned()),
            Some("info".to_owned()),
            Verbosity::Quiet,
        );
        assert_eq!(filter.to_string(), "rads_store=trace");
    }

    #[test]
    fn bad_directives_fall_through() {
        let filter = build_env_filter(
            Some("rads_store=loud".to_owned()),
            Some("info".to_owned()),
            Verbosity::Quiet,
        );
        assert_eq!(filter.to_string(), "info");

        let filter = build_env_filter(Some(" ".to_owned()), None, Verbosity::Quiet);
        assert_eq!(filter.to_string(), "error");
    }

    #[test]
    fn log_file_sits_beside_the_database() {
        assert_eq!(
            log_file_for(Path::new("/data/rads/rads.db")),
            PathBuf::from("/data/rads/rads.log")
        );
        assert!(log_file_for(Path::new(":memory:")).ends_with("rads.log"));
    }
}
