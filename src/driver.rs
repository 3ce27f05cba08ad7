//! Build driver: hands configurations to the bundler and supervises them
//!
//! Every build is started without waiting for the others and all of them run
//! to completion. Failures are collected and surfaced together once the
//! whole set has settled, so one broken package never hides the outcome of
//! its siblings.

use crate::bundler::{BundleReport, Bundler};
use crate::error::{BuildFailure, BundlerError, PipelineError};
use crate::progress::{LoggingHandler, ProgressEvent, ProgressHandler};
use crate::service::BuildConfiguration;
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Instant;

/// Result of a settled set of builds
#[derive(Debug, Default)]
pub struct BuildOutcome {
    pub succeeded: Vec<String>,
    pub failures: Vec<BuildFailure>,
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Aggregates every failure into one error
    pub fn into_result(self) -> Result<Vec<String>, PipelineError> {
        if self.failures.is_empty() {
            Ok(self.succeeded)
        } else {
            Err(PipelineError::BuildsFailed {
                failures: self.failures,
            })
        }
    }
}

pub struct BuildDriver {
    bundler: Arc<dyn Bundler>,
    progress: Arc<dyn ProgressHandler>,
}

impl BuildDriver {
    pub fn new(bundler: Arc<dyn Bundler>) -> Self {
        Self {
            bundler,
            progress: Arc::new(LoggingHandler),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub fn bundler_name(&self) -> &str {
        self.bundler.name()
    }

    pub fn plan_ready(&self, eligible: usize, skipped: usize) {
        self.progress
            .on_progress(&ProgressEvent::PlanReady { eligible, skipped });
    }

    /// Runs one bundler invocation and renders its report either way
    pub async fn run_build(
        &self,
        config: BuildConfiguration,
    ) -> Result<BundleReport, BuildFailure> {
        let package = config.package.clone();
        let start = Instant::now();
        self.progress.on_progress(&ProgressEvent::BuildStarted {
            package: package.clone(),
        });

        let result = self.bundler.invoke(&config).await;

        let report = match &result {
            Ok(report) => Some(report),
            Err(BundlerError::Compile { report }) => Some(report),
            Err(BundlerError::Invocation(_)) => None,
        };
        if let Some(report) = report {
            self.progress.on_progress(&ProgressEvent::Report {
                package: package.clone(),
                rendered: report.render(&package, &config.report),
            });
        }

        match result {
            Ok(report) => {
                self.progress.on_progress(&ProgressEvent::BuildSucceeded {
                    package,
                    duration: start.elapsed(),
                });
                Ok(report)
            }
            Err(source) => {
                let failure = BuildFailure { package, source };
                self.progress.on_progress(&ProgressEvent::BuildFailed {
                    package: failure.package.clone(),
                    error: failure.source.to_string(),
                    duration: start.elapsed(),
                });
                Err(failure)
            }
        }
    }

    /// Starts every build at once and waits for all of them to settle
    pub async fn run_all(&self, configs: Vec<BuildConfiguration>) -> BuildOutcome {
        let start = Instant::now();
        let builds = configs.into_iter().map(|config| async move {
            let package = config.package.clone();
            (package, self.run_build(config).await)
        });

        let mut outcome = BuildOutcome::default();
        for (package, result) in join_all(builds).await {
            match result {
                Ok(_) => outcome.succeeded.push(package),
                Err(failure) => outcome.failures.push(failure),
            }
        }

        self.progress.on_progress(&ProgressEvent::Completed {
            succeeded: outcome.succeeded.len(),
            failed: outcome.failures.len(),
            total_time: start.elapsed(),
        });
        outcome
    }
}
