use anyhow::Result;

use crate::{
    classifier::MarkupClassifier,
    config::AppConfig,
    infrastructure::{directories::ResolvedPaths, shutdown::Shutdown},
    input,
    search::SearchClient,
    tasks::runner::{BatchRunner, RunOutcome, RunSettings},
};

pub struct CheckerApp {
    config: AppConfig,
    runner: BatchRunner<SearchClient, MarkupClassifier>,
}

impl CheckerApp {
    pub fn initialize(config: AppConfig, paths: ResolvedPaths, shutdown: Shutdown) -> Result<Self> {
        let search = SearchClient::new(&config.search)?;
        let classifier = MarkupClassifier::new(config.classifier.no_result_phrases.clone());
        let settings = RunSettings {
            delay: config.run.delay,
            debug_dir: paths.debug_dir,
            checkpoint_path: config.checkpoint.path.clone(),
            checkpoint_every: config.checkpoint.every,
        };
        let runner = BatchRunner::new(search, classifier, settings, shutdown.subscribe());

        Ok(Self { config, runner })
    }

    pub async fn run(self) -> Result<()> {
        let CheckerApp { config, mut runner } = self;

        let domains = input::read_domains(&config.run.input_path).await?;
        if domains.is_empty() {
            tracing::warn!(
                input = %config.run.input_path.display(),
                "domain list is empty"
            );
        } else {
            tracing::info!(
                count = domains.len(),
                output = %config.run.output_path.display(),
                checkpoint = %config.checkpoint.path.display(),
                debug = config.run.debug,
                "domains loaded"
            );
        }

        let report = runner.run(&domains, &config.run.output_path).await?;

        match &report.outcome {
            RunOutcome::Completed { saved_to } => tracing::info!(
                checked = report.checked,
                indexed = report.results.len(),
                failed_fetches = report.failed_fetches,
                saved_to = ?saved_to,
                "run complete"
            ),
            RunOutcome::Interrupted { saved_to } => tracing::warn!(
                checked = report.checked,
                total = domains.len(),
                indexed = report.results.len(),
                failed_fetches = report.failed_fetches,
                saved_to = ?saved_to,
                "run interrupted"
            ),
        }
        if report.failed_fetches > 0 {
            tracing::warn!(
                failed_fetches = report.failed_fetches,
                "some domains could not be checked and are missing from the results"
            );
        }
        Ok(())
    }
}
