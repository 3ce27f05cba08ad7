use super::{BundleReport, Bundler};
use crate::error::BundlerError;
use crate::service::BuildConfiguration;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Bundler double with canned results per package
///
/// Packages without a canned result succeed with a report listing the
/// configuration's expected outputs. Each invocation sleeps for `delay`, so
/// tests can observe how many builds were in flight at once.
pub struct MockBundler {
    results: Mutex<HashMap<String, Result<BundleReport, BundlerError>>>,
    invocations: Mutex<Vec<BuildConfiguration>>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockBundler {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(HashMap::new()),
            invocations: Mutex::new(Vec::new()),
            delay: Duration::from_millis(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fail(&self, package: impl Into<String>, errors: Vec<String>) {
        self.set_result(
            package,
            Err(BundlerError::Compile {
                report: BundleReport {
                    errors,
                    ..Default::default()
                },
            }),
        );
    }

    pub fn set_result(
        &self,
        package: impl Into<String>,
        result: Result<BundleReport, BundlerError>,
    ) {
        self.results
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(package.into(), result);
    }

    pub fn invocations(&self) -> Vec<BuildConfiguration> {
        self.invocations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn invoked_packages(&self) -> Vec<String> {
        let mut names: Vec<String> = self.invocations().into_iter().map(|c| c.package).collect();
        names.sort();
        names
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for MockBundler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bundler for MockBundler {
    async fn invoke(&self, config: &BuildConfiguration) -> Result<BundleReport, BundlerError> {
        self.invocations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(config.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let canned = self
            .results
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&config.package)
            .cloned();

        canned.unwrap_or_else(|| {
            Ok(BundleReport {
                assets: config.expected_outputs(),
                ..Default::default()
            })
        })
    }

    fn name(&self) -> &str {
        "MockBundler"
    }
}
