mod config;
mod conflict;
mod db;
mod entries;
mod error;
mod ipc;
mod logging;
mod model;
mod seed;
mod store;
mod timetable;

use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use config::{Cli, DaemonConfig};

fn main() -> anyhow::Result<()> {
    let config = DaemonConfig::resolve(Cli::parse())?;
    logging::init(config.log_level.as_deref());

    let mut state = ipc::AppState::new(config.busy_timeout_ms);
    if let Some(path) = &config.workspace {
        let conn = db::open_db(path, config.busy_timeout_ms)
            .with_context(|| format!("cannot open workspace {}", path.display()))?;
        state.workspace = Some(path.clone());
        state.db = Some(conn);
    }
    info!(
        version = env!("CARGO_PKG_VERSION"),
        workspace = ?state.workspace,
        busy_timeout_ms = config.busy_timeout_ms,
        "timetabled ready"
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                error!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let resp = match serde_json::from_str::<ipc::Request>(&line) {
            Ok(req) => ipc::handle_request(&mut state, req),
            Err(e) => ipc::bad_json(&line, e.to_string()),
        };
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }

    info!("stdin closed, shutting down");
    Ok(())
}
