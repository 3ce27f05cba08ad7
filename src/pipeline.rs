//! End-to-end service generation for one monorepo
//!
//! Planning (scan, registry, eligibility, configuration) is synchronous and
//! never fails past a single package: anything wrong with a package turns
//! into a logged skip. Only the bundler invocations run concurrently.

use crate::bundler::ReportOptions;
use crate::driver::BuildDriver;
use crate::eligibility::{log_skip, Eligibility, EligibilityFilter, SkipReason};
use crate::error::PipelineError;
use crate::fs::FileSystem;
use crate::registry::RegistryTiers;
use crate::scanner::{PackageRoot, PackageScanner, RootKind};
use crate::service::{BuildConfiguration, ConfigFactory, ServiceIdentity};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

pub const DEFAULT_COMPONENTS_DIR: &str = "components";
pub const DEFAULT_PACKAGES_DIR: &str = "packages";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPackage {
    pub package: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Configurations ready to build plus every package left out
#[derive(Debug, Serialize)]
pub struct BuildPlan {
    pub configs: Vec<BuildConfiguration>,
    pub skipped: Vec<SkippedPackage>,
}

impl BuildPlan {
    pub fn packages(&self) -> Vec<&str> {
        self.configs.iter().map(|c| c.package.as_str()).collect()
    }

    pub fn collisions(&self) -> impl Iterator<Item = &SkippedPackage> {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::Collision { .. }))
    }
}

#[derive(Debug)]
pub struct RunSummary {
    pub built: Vec<String>,
    pub skipped: Vec<SkippedPackage>,
}

pub struct ServicePipeline {
    scanner: PackageScanner,
    filter: EligibilityFilter,
    factory: ConfigFactory,
    roots: Vec<PackageRoot>,
}

impl ServicePipeline {
    /// Pipeline over `<project_root>/components` and `<project_root>/packages`
    pub fn new(fs: Arc<dyn FileSystem>, project_root: impl Into<PathBuf>, transpiler_options: Value) -> Self {
        let project_root = project_root.into();
        Self {
            scanner: PackageScanner::new(Arc::clone(&fs), project_root.clone()),
            filter: EligibilityFilter::new(fs),
            factory: ConfigFactory::new(project_root, transpiler_options),
            roots: vec![
                PackageRoot::new(DEFAULT_COMPONENTS_DIR, RootKind::Component),
                PackageRoot::new(DEFAULT_PACKAGES_DIR, RootKind::Package),
            ],
        }
    }

    pub fn with_roots(mut self, roots: Vec<PackageRoot>) -> Self {
        self.roots = roots;
        self
    }

    pub fn with_report_options(mut self, report: ReportOptions) -> Self {
        self.factory = self.factory.with_report_options(report);
        self
    }

    pub fn project_root(&self) -> &Path {
        self.factory.project_root()
    }

    pub fn plan(&self) -> BuildPlan {
        let start = Instant::now();
        let descriptors = self.scanner.scan_all(&self.roots);
        let tiers = RegistryTiers::from_descriptors(&descriptors);

        let mut claims: HashMap<ServiceIdentity, String> = HashMap::new();
        let mut plan = BuildPlan {
            configs: Vec::new(),
            skipped: Vec::new(),
        };

        for descriptor in &descriptors {
            if let Eligibility::Ineligible(reason) = self.filter.check(descriptor) {
                plan.skipped.push(SkippedPackage {
                    package: descriptor.name.clone(),
                    reason,
                });
                continue;
            }

            let config = match self.factory.make_service_config(descriptor, &tiers) {
                Ok(config) => config,
                Err(reason) => {
                    log_skip(&descriptor.name, &reason);
                    plan.skipped.push(SkippedPackage {
                        package: descriptor.name.clone(),
                        reason,
                    });
                    continue;
                }
            };

            if let Some(owner) = claims.get(&config.identity) {
                let reason = SkipReason::Collision {
                    identity: config.identity.to_string(),
                    owner: owner.clone(),
                };
                warn!(
                    package = %descriptor.name,
                    identity = %config.identity,
                    owner = %owner,
                    "Service identity collision"
                );
                log_skip(&descriptor.name, &reason);
                plan.skipped.push(SkippedPackage {
                    package: descriptor.name.clone(),
                    reason,
                });
                continue;
            }

            claims.insert(config.identity.clone(), descriptor.name.clone());
            plan.configs.push(config);
        }

        info!(
            scanned = descriptors.len(),
            eligible = plan.configs.len(),
            skipped = plan.skipped.len(),
            registry_size = tiers.base().len(),
            plan_time_ms = start.elapsed().as_millis(),
            "Planned service builds"
        );
        plan
    }

    /// Plans, then builds every eligible package concurrently
    ///
    /// Fails when any build failed (all failures aggregated) or, failing
    /// that, when a package was dropped for a service identity collision.
    pub async fn run(&self, driver: &BuildDriver) -> Result<RunSummary, PipelineError> {
        let BuildPlan { configs, skipped } = self.plan();

        driver.plan_ready(configs.len(), skipped.len());
        info!(
            builds = configs.len(),
            bundler = %driver.bundler_name(),
            "Starting service builds"
        );
        let outcome = driver.run_all(configs).await;
        let built = outcome.into_result()?;

        if let Some(collision) = skipped
            .iter()
            .find(|s| matches!(s.reason, SkipReason::Collision { .. }))
        {
            if let SkipReason::Collision { identity, owner } = &collision.reason {
                return Err(PipelineError::ServiceNameCollision {
                    identity: identity.clone(),
                    first: owner.clone(),
                    second: collision.package.clone(),
                });
            }
        }

        Ok(RunSummary { built, skipped })
    }
}
