//! Error taxonomy for scanning, configuration and bundling

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to describe a single package directory
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Manifest not found: {}", path.display())]
    ManifestNotFound { path: PathBuf },

    #[error("Failed to parse manifest {}: {message}", path.display())]
    ManifestParse { path: PathBuf, message: String },

    #[error("Failed to list package root {}: {message}", path.display())]
    RootUnreadable { path: PathBuf, message: String },
}

/// Failure reported by the external bundler capability
#[derive(Debug, Clone, Error)]
pub enum BundlerError {
    /// The bundler ran and reported compile errors
    #[error("compilation failed with {} error(s)", report.errors.len())]
    Compile { report: crate::bundler::BundleReport },

    /// The bundler could not be started or crashed before producing a report
    #[error("bundler invocation failed: {0}")]
    Invocation(String),
}

/// One package's failed build
#[derive(Debug, Clone, Error)]
#[error("build of {package} failed: {source}")]
pub struct BuildFailure {
    pub package: String,
    #[source]
    pub source: BundlerError,
}

/// Errors surfaced by a full generator run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("service identity {identity} derived by both {first} and {second}")]
    ServiceNameCollision {
        identity: String,
        first: String,
        second: String,
    },

    #[error("{} service build(s) failed: {}", failures.len(), FailedPackages(failures))]
    BuildsFailed { failures: Vec<BuildFailure> },
}

struct FailedPackages<'a>(&'a [BuildFailure]);

impl fmt::Display for FailedPackages<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|b| b.package.as_str()).collect();
        write!(f, "{}", names.join(", "))
    }
}
