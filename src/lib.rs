//! servicegen - service bundle generator for package monorepos
//!
//! Scans the component and package roots of a monorepo, decides which
//! packages ship as standalone services, derives the builtin module registry
//! shared by every build and hands one completed bundler configuration per
//! package to an external bundler. Each configuration carries a source
//! wrapper that turns the bundler's output into a service-registration shim.
//!
//! # Example Usage
//!
//! ```no_run
//! use servicegen::{BuildDriver, MockBundler, RealFileSystem, ServicePipeline};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), servicegen::PipelineError> {
//! let pipeline = ServicePipeline::new(
//!     Arc::new(RealFileSystem::new()),
//!     "/path/to/monorepo",
//!     serde_json::json!({}),
//! );
//! let driver = BuildDriver::new(Arc::new(MockBundler::new()));
//! let summary = pipeline.run(&driver).await?;
//! println!("built {} services", summary.built.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`scanner`]: package discovery and manifests
//! - [`registry`]: builtin module registry tiers
//! - [`eligibility`]: which packages are built as services
//! - [`service`]: identity, wrapper text and bundler configuration
//! - [`driver`]: concurrent bundler invocations
//! - [`pipeline`]: the whole run

pub mod bundler;
pub mod cli;
pub mod config;
pub mod driver;
pub mod eligibility;
pub mod error;
pub mod fs;
pub mod pipeline;
pub mod progress;
pub mod registry;
pub mod scanner;
pub mod service;
pub mod util;

pub use bundler::{BundleReport, Bundler, CommandBundler, MockBundler, ReportOptions};
pub use config::{ConfigError, ServicegenConfig};
pub use driver::{BuildDriver, BuildOutcome};
pub use eligibility::{Eligibility, EligibilityFilter, SkipReason};
pub use error::{BuildFailure, BundlerError, PipelineError, ScanError};
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use pipeline::{BuildPlan, RunSummary, ServicePipeline};
pub use registry::{BuiltinRegistry, ModuleExports, RegistryTiers};
pub use scanner::{PackageDescriptor, PackageManifest, PackageRoot, PackageScanner, RootKind};
pub use service::{BuildConfiguration, ConfigFactory, ServiceIdentity, ServiceWrapper};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_servicegen() {
        assert_eq!(NAME, "servicegen");
    }
}
