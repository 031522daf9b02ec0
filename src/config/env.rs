use std::{path::PathBuf, time::Duration};

use thiserror::Error;
use url::Url;

use crate::tasks::delay::DelayWindow;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub run: RunConfig,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
    pub search: SearchConfig,
    pub classifier: ClassifierConfig,
    pub checkpoint: CheckpointConfig,
}

/// Per-run surface supplied on the command line.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub delay: DelayWindow,
    pub debug: bool,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// `None` disables the log file.
    pub logs_dir: Option<String>,
    pub debug_dir: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub endpoint: Url,
    pub referer: String,
    pub user_agent: String,
    pub accept_language: String,
    pub fetch_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub no_result_phrases: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CheckpointConfig {
    pub path: PathBuf,
    pub every: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
