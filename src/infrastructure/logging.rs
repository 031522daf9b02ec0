use std::io::{self, IsTerminal};

use anyhow::Result;
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, fmt::time::ChronoLocal, prelude::*, EnvFilter};

use crate::{config::env::LoggingConfig, infrastructure::directories::ResolvedPaths};

static INIT: OnceCell<()> = OnceCell::new();
static GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

const LOG_FILE: &str = "checker.log";

fn timer() -> ChronoLocal {
    ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string())
}

/// Console output goes to stdout; a daily rolling file is added when a logs
/// directory is configured.
pub fn init_tracing(config: &LoggingConfig, paths: &ResolvedPaths) -> Result<()> {
    INIT.get_or_try_init::<_, anyhow::Error>(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let file_layer = paths.logs_dir.as_ref().map(|dir| {
            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE);
            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
            let _ = GUARD.set(guard);
            fmt::layer()
                .with_writer(file_writer)
                .with_timer(timer())
                .with_target(true)
                .with_ansi(false)
        });

        let console_layer = fmt::layer()
            .with_writer(io::stdout)
            .with_timer(timer())
            .with_target(true)
            .with_ansi(io::stdout().is_terminal());

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .init();

        match &paths.logs_dir {
            Some(dir) => tracing::debug!(logs = %dir.display(), "tracing initialized"),
            None => tracing::debug!("tracing initialized without a log file"),
        }
        Ok(())
    })?;
    Ok(())
}
