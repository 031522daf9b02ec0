use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use chrono::Local;
use tokio::time::sleep;

use crate::{
    classifier::PageClassifier,
    domain::{sort_by_indexed_pages, DomainCheckResult},
    infrastructure::shutdown::ShutdownListener,
    search::{query, SearchBackend},
    storage,
    tasks::delay::DelayWindow,
};

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub delay: DelayWindow,
    /// Raw result pages are written here when set.
    pub debug_dir: Option<PathBuf>,
    pub checkpoint_path: PathBuf,
    pub checkpoint_every: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { saved_to: Option<PathBuf> },
    Interrupted { saved_to: Option<PathBuf> },
}

#[derive(Debug)]
pub struct RunReport {
    /// Positive results, sorted by indexed pages descending.
    pub results: Vec<DomainCheckResult>,
    pub outcome: RunOutcome,
    pub checked: usize,
    pub failed_fetches: usize,
}

/// State of one batch, owned by the runner for the duration of `run`.
struct RunContext {
    results: Vec<DomainCheckResult>,
    output_path: PathBuf,
    checked: usize,
    failed_fetches: usize,
}

impl RunContext {
    fn new(output_path: &Path) -> Self {
        Self {
            results: Vec::new(),
            output_path: output_path.to_path_buf(),
            checked: 0,
            failed_fetches: 0,
        }
    }

    fn into_report(mut self, outcome: RunOutcome) -> RunReport {
        sort_by_indexed_pages(&mut self.results);
        RunReport {
            results: self.results,
            outcome,
            checked: self.checked,
            failed_fetches: self.failed_fetches,
        }
    }
}

enum LoopExit {
    Completed,
    Interrupted,
}

enum CheckOutcome {
    Indexed(DomainCheckResult),
    NotIndexed,
    FetchFailed,
}

pub struct BatchRunner<B, C> {
    backend: B,
    classifier: C,
    settings: RunSettings,
    shutdown: ShutdownListener,
}

impl<B, C> BatchRunner<B, C>
where
    B: SearchBackend,
    C: PageClassifier,
{
    pub fn new(backend: B, classifier: C, settings: RunSettings, shutdown: ShutdownListener) -> Self {
        Self {
            backend,
            classifier,
            settings,
            shutdown,
        }
    }

    /// Checks `domains` in order and persists the positive results.
    ///
    /// Every exit path saves what was accumulated: the final output on
    /// completion, an auto-save on interruption, an error file before a fault
    /// is returned.
    pub async fn run(&mut self, domains: &[String], output_path: &Path) -> Result<RunReport> {
        let mut ctx = RunContext::new(output_path);

        if domains.is_empty() {
            tracing::info!(target: "runner", "no domains to check");
            return Ok(ctx.into_report(RunOutcome::Completed { saved_to: None }));
        }

        tracing::info!(
            target: "runner",
            total = domains.len(),
            delay = %self.settings.delay,
            "starting batch"
        );

        let finished = match self.run_loop(domains, &mut ctx).await {
            Ok(LoopExit::Completed) => save_final(&mut ctx)
                .map(|saved_to| RunOutcome::Completed { saved_to }),
            Ok(LoopExit::Interrupted) => {
                save_autosave(&ctx).map(|saved_to| RunOutcome::Interrupted { saved_to })
            }
            Err(err) => Err(err),
        };

        match finished {
            Ok(outcome) => Ok(ctx.into_report(outcome)),
            Err(err) => {
                save_after_error(&ctx);
                Err(err)
            }
        }
    }

    async fn run_loop(&mut self, domains: &[String], ctx: &mut RunContext) -> Result<LoopExit> {
        let total = domains.len();

        for (idx, domain) in domains.iter().enumerate() {
            let position = idx + 1;
            if self.shutdown.is_triggered() {
                return Ok(LoopExit::Interrupted);
            }

            tracing::info!(
                target: "runner",
                "[{position}/{total}] ({:.1}%) checking {domain}",
                position as f64 / total as f64 * 100.0
            );

            let appended = match self.check_domain(domain).await {
                CheckOutcome::Indexed(result) => {
                    tracing::info!(
                        target: "runner",
                        domain = %domain,
                        status = %result.status(),
                        pages = result.indexed_pages(),
                        "indexed"
                    );
                    ctx.results.push(result);
                    true
                }
                CheckOutcome::NotIndexed => {
                    tracing::info!(target: "runner", domain = %domain, "not indexed, skipped");
                    false
                }
                CheckOutcome::FetchFailed => {
                    ctx.failed_fetches += 1;
                    false
                }
            };
            ctx.checked += 1;

            let count = ctx.results.len();
            if appended && count % self.settings.checkpoint_every == 0 {
                storage::write_results(&self.settings.checkpoint_path, &ctx.results)
                    .context("failed to write checkpoint")?;
                tracing::info!(
                    target: "storage",
                    count,
                    path = %self.settings.checkpoint_path.display(),
                    "checkpoint saved"
                );
            }

            if position < total && !self.pause().await {
                return Ok(LoopExit::Interrupted);
            }
        }

        Ok(LoopExit::Completed)
    }

    /// Sleeps for a sampled delay. Returns `false` if shutdown cut the pause short.
    async fn pause(&mut self) -> bool {
        let delay = self.settings.delay.sample();
        if delay == Duration::ZERO {
            return true;
        }
        tracing::info!(target: "runner", "waiting {:.2}s", delay.as_secs_f64());
        tokio::select! {
            _ = sleep(delay) => true,
            _ = self.shutdown.notified() => false,
        }
    }

    async fn check_domain(&self, domain: &str) -> CheckOutcome {
        let target = query::query_target(domain);

        let html = match self.backend.fetch_results(&target).await {
            Ok(html) => html,
            Err(err) => {
                tracing::warn!(
                    target: "search",
                    domain = %domain,
                    error = %err,
                    "fetch failed, treating as not indexed"
                );
                return CheckOutcome::FetchFailed;
            }
        };

        if let Some(dir) = &self.settings.debug_dir {
            let path = dir.join(query::debug_file_name(&target));
            match tokio::fs::write(&path, html.as_bytes()).await {
                Ok(()) => tracing::debug!(target: "search", path = %path.display(), "page saved"),
                Err(err) => tracing::warn!(
                    target: "search",
                    error = %err,
                    path = %path.display(),
                    "failed to save page"
                ),
            }
        }

        match self.classifier.classify(&html, domain) {
            Some(result) => CheckOutcome::Indexed(result),
            None => CheckOutcome::NotIndexed,
        }
    }
}

fn save_final(ctx: &mut RunContext) -> Result<Option<PathBuf>> {
    if ctx.results.is_empty() {
        tracing::warn!(target: "runner", "batch finished, no indexed domains found");
        return Ok(None);
    }
    sort_by_indexed_pages(&mut ctx.results);
    storage::write_results(&ctx.output_path, &ctx.results)?;
    tracing::info!(
        target: "storage",
        count = ctx.results.len(),
        path = %ctx.output_path.display(),
        "batch finished, results saved"
    );
    Ok(Some(ctx.output_path.clone()))
}

fn save_autosave(ctx: &RunContext) -> Result<Option<PathBuf>> {
    if ctx.results.is_empty() {
        tracing::warn!(target: "runner", "interrupted before any indexed domain was found");
        return Ok(None);
    }
    let path = storage::autosave_path(&ctx.output_path, Local::now());
    storage::write_results(&path, &ctx.results)?;
    tracing::warn!(
        target: "storage",
        count = ctx.results.len(),
        path = %path.display(),
        "interrupted, partial results saved"
    );
    Ok(Some(path))
}

/// Best effort: the caller still returns the original error.
fn save_after_error(ctx: &RunContext) {
    if ctx.results.is_empty() {
        return;
    }
    let path = storage::error_path(&ctx.output_path);
    match storage::write_results(&path, &ctx.results) {
        Ok(()) => tracing::warn!(
            target: "storage",
            count = ctx.results.len(),
            path = %path.display(),
            "batch failed, partial results saved"
        ),
        Err(save_err) => tracing::error!(
            target: "storage",
            error = %save_err,
            path = %path.display(),
            "batch failed and partial results could not be saved"
        ),
    }
}
