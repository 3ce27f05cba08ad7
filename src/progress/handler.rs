//! Progress handler trait and events

use std::time::Duration;

/// Events emitted while planning and building service bundles
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Scanning and filtering finished
    PlanReady { eligible: usize, skipped: usize },

    /// A package's bundler invocation started
    BuildStarted { package: String },

    /// The bundler's report, already rendered for the operator
    Report { package: String, rendered: String },

    BuildSucceeded { package: String, duration: Duration },

    BuildFailed {
        package: String,
        error: String,
        duration: Duration,
    },

    /// Every scheduled build settled
    Completed {
        succeeded: usize,
        failed: usize,
        total_time: Duration,
    },
}

/// Trait for handling progress events during a run
pub trait ProgressHandler: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
