//! The external bundler capability
//!
//! The generator never compiles anything itself. A [`Bundler`] receives a
//! finished [`BuildConfiguration`](crate::service::BuildConfiguration) and
//! reports back; compile errors come back as [`BundlerError::Compile`]
//! carrying the bundler's report.

mod command;
mod mock;
mod report;

pub use command::CommandBundler;
pub use mock::MockBundler;
pub use report::{BundleReport, ReportOptions};

use crate::error::BundlerError;
use crate::service::BuildConfiguration;
use async_trait::async_trait;

#[async_trait]
pub trait Bundler: Send + Sync {
    async fn invoke(&self, config: &BuildConfiguration) -> Result<BundleReport, BundlerError>;

    fn name(&self) -> &str;
}
