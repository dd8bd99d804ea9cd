//! Start-up configuration.
//!
//! Resolution chain: CLI flag > environment variable > default.

use std::path::PathBuf;

use clap::Parser;

use crate::db::DEFAULT_BUSY_TIMEOUT_MS;

pub const WORKSPACE_ENV: &str = "TIMETABLED_WORKSPACE";
pub const BUSY_TIMEOUT_ENV: &str = "TIMETABLED_BUSY_TIMEOUT_MS";

#[derive(Debug, Parser)]
#[command(
    name = "timetabled",
    version,
    about = "School timetable sidecar speaking line-delimited JSON on stdin/stdout"
)]
pub struct Cli {
    /// Workspace directory to open at start-up (overrides TIMETABLED_WORKSPACE)
    #[arg(long)]
    pub workspace: Option<PathBuf>,

    /// SQLite busy timeout in milliseconds (overrides TIMETABLED_BUSY_TIMEOUT_MS)
    #[arg(long)]
    pub busy_timeout_ms: Option<u64>,

    /// Log filter, e.g. `debug` or `timetabled=trace` (overrides RUST_LOG)
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    pub workspace: Option<PathBuf>,
    pub busy_timeout_ms: u64,
    pub log_level: Option<String>,
}

impl DaemonConfig {
    pub fn resolve(cli: Cli) -> anyhow::Result<Self> {
        Self::resolve_with(cli, |key| std::env::var(key).ok())
    }

    /// `env` is injected so resolution can be tested without touching the
    /// process environment.
    pub fn resolve_with(cli: Cli, env: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let workspace = cli.workspace.or_else(|| {
            env(WORKSPACE_ENV)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        });

        let busy_timeout_ms = match cli.busy_timeout_ms {
            Some(v) => v,
            None => match env(BUSY_TIMEOUT_ENV) {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    anyhow::anyhow!(
                        "{BUSY_TIMEOUT_ENV} must be a whole number of milliseconds, got {raw:?}"
                    )
                })?,
                None => DEFAULT_BUSY_TIMEOUT_MS,
            },
        };

        Ok(Self {
            workspace,
            busy_timeout_ms,
            log_level: cli.log_level,
        })
    }
}
