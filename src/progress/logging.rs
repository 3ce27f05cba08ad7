//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, error, info, warn};

/// Handler that logs events with tracing and prints bundler reports to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::PlanReady { eligible, skipped } => {
                info!(eligible, skipped, "Service build plan ready");
            }
            ProgressEvent::BuildStarted { package } => {
                debug!(package = %package, "Starting service build");
            }
            ProgressEvent::Report { rendered, .. } => {
                eprintln!("{}", rendered);
            }
            ProgressEvent::BuildSucceeded { package, duration } => {
                info!(
                    package = %package,
                    duration_ms = duration.as_millis(),
                    "Service build complete"
                );
            }
            ProgressEvent::BuildFailed {
                package,
                error,
                duration,
            } => {
                error!(
                    package = %package,
                    error = %error,
                    duration_ms = duration.as_millis(),
                    "Service build failed"
                );
            }
            ProgressEvent::Completed {
                succeeded,
                failed,
                total_time,
            } => {
                if *failed > 0 {
                    warn!(
                        succeeded,
                        failed,
                        total_time_ms = total_time.as_millis(),
                        "Service builds finished with failures"
                    );
                } else {
                    info!(
                        succeeded,
                        total_time_ms = total_time.as_millis(),
                        "Service builds finished"
                    );
                }
            }
        }
    }
}
