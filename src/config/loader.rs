use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use url::Url;

use super::env::{
    AppConfig, CheckpointConfig, ClassifierConfig, ConfigError, DirectoryConfig, LoggingConfig,
    RunConfig, SearchConfig,
};
use crate::{cli::Args, storage};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const DEFAULT_NO_RESULT_PHRASES: &str = "没有与此相关的结果;There are no results for";

pub fn load_config(args: Args) -> Result<AppConfig, ConfigError> {
    AppConfig::from_env(args)
}

impl AppConfig {
    fn from_env(args: Args) -> Result<Self, ConfigError> {
        let run = RunConfig {
            input_path: args.input,
            output_path: args.output,
            delay: args.delay,
            debug: args.debug,
        };

        let directories = DirectoryConfig {
            logs_dir: match env::var("LOGS_DIR") {
                Ok(value) if value.trim().is_empty() => None,
                Ok(value) => Some(value),
                Err(_) => Some("logs".to_string()),
            },
            debug_dir: env::var("DEBUG_DIR").unwrap_or_else(|_| "debug".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        let endpoint_raw = env::var("SEARCH_ENDPOINT")
            .unwrap_or_else(|_| "https://www.bing.com/search".to_string());
        let endpoint = Url::parse(&endpoint_raw).map_err(|err| ConfigError::Invalid {
            key: "SEARCH_ENDPOINT",
            reason: err.to_string(),
        })?;

        let search = SearchConfig {
            endpoint,
            referer: env::var("SEARCH_REFERER")
                .unwrap_or_else(|_| "https://www.bing.com/".to_string()),
            user_agent: env::var("SEARCH_USER_AGENT")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            accept_language: env::var("ACCEPT_LANGUAGE")
                .unwrap_or_else(|_| "zh-CN,zh;q=0.9,en;q=0.8".to_string()),
            fetch_timeout: Duration::from_millis(parse_or("FETCH_TIMEOUT", 15_000u64)?),
        };

        let classifier = ClassifierConfig {
            no_result_phrases: split_list(
                &env::var("NO_RESULT_PHRASES")
                    .unwrap_or_else(|_| DEFAULT_NO_RESULT_PHRASES.to_string()),
            ),
        };
        if classifier.no_result_phrases.is_empty() {
            return Err(ConfigError::Missing("NO_RESULT_PHRASES"));
        }

        let checkpoint = CheckpointConfig {
            path: PathBuf::from(
                env::var("CHECKPOINT_FILE")
                    .unwrap_or_else(|_| "bing_autosave_temp.csv".to_string()),
            ),
            every: parse_or("CHECKPOINT_EVERY", 10usize)?,
        };
        if checkpoint.every == 0 {
            return Err(ConfigError::Invalid {
                key: "CHECKPOINT_EVERY",
                reason: "must be greater than 0".to_string(),
            });
        }
        ensure_distinct_checkpoint(&checkpoint.path, &run.output_path)?;

        Ok(Self {
            run,
            directories,
            logging,
            search,
            classifier,
            checkpoint,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => {
            value
                .trim()
                .parse::<T>()
                .map_err(|err| ConfigError::Invalid {
                    key,
                    reason: format!("{value:?}: {err}"),
                })
        }
        _ => Ok(default),
    }
}

fn ensure_distinct_checkpoint(checkpoint: &Path, output: &Path) -> Result<(), ConfigError> {
    if storage::same_location(checkpoint, output) {
        return Err(ConfigError::Invalid {
            key: "CHECKPOINT_FILE",
            reason: format!(
                "{} is also the output file; checkpoints would overwrite the final results",
                checkpoint.display()
            ),
        });
    }
    Ok(())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_drops_blank_entries() {
        assert_eq!(
            split_list(" 没有与此相关的结果 ;; There are no results for ;"),
            vec![
                "没有与此相关的结果".to_string(),
                "There are no results for".to_string()
            ]
        );
    }

    #[test]
    fn checkpoint_spelled_differently_from_output_is_rejected() {
        let err = ensure_distinct_checkpoint(
            Path::new("./results/../results.csv"),
            Path::new("results.csv"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "CHECKPOINT_FILE",
                ..
            }
        ));
    }

    #[test]
    fn separate_checkpoint_is_accepted() {
        assert!(ensure_distinct_checkpoint(
            Path::new("bing_autosave_temp.csv"),
            Path::new("./results.csv")
        )
        .is_ok());
    }
}
