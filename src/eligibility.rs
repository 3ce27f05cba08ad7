//! Decides which scanned packages are built as service bundles

use crate::fs::FileSystem;
use crate::scanner::PackageDescriptor;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Namespace tags a service package name must start with (followed by `-`)
pub const NAMESPACE_TAGS: &[&str] = &["mobx", "rax", "universal"];

/// Name fragments that mark tooling packages which are never built as services
pub const EXCLUDED_KEYWORDS: &[&str] = &[
    "webpack",
    "cli",
    "loader",
    "rax-test-renderer",
    "rax-scripts",
];

/// Conventional entry file, relative to the package root
pub const ENTRY_FILE: &str = "src/index.js";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum SkipReason {
    /// Name lacks every namespace tag
    Namespace,
    /// Name contains an excluded keyword
    Excluded { keyword: String },
    /// No entry file at `src/index.js`
    MissingEntry,
    /// Manifest absent or unparsable
    Manifest,
    /// Service identity already claimed by another package
    Collision { identity: String, owner: String },
}

impl SkipReason {
    /// Short category used in the operator log line
    pub fn category(&self) -> &'static str {
        match self {
            SkipReason::Namespace => "namespace",
            SkipReason::Excluded { .. } => "excluded",
            SkipReason::MissingEntry => "missing-entry",
            SkipReason::Manifest => "manifest",
            SkipReason::Collision { .. } => "collision",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Namespace => write!(
                f,
                "name does not start with one of {}",
                NAMESPACE_TAGS
                    .iter()
                    .map(|t| format!("{}-", t))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            SkipReason::Excluded { keyword } => write!(f, "name matches excluded keyword '{}'", keyword),
            SkipReason::MissingEntry => write!(f, "no {} entry file", ENTRY_FILE),
            SkipReason::Manifest => write!(f, "manifest missing or unreadable"),
            SkipReason::Collision { identity, owner } => {
                write!(f, "service identity {} already used by {}", identity, owner)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    Eligible { entry_file: PathBuf },
    Ineligible(SkipReason),
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible { .. })
    }
}

/// Logs the operator-visible skip line for a package
pub fn log_skip(package: &str, reason: &SkipReason) {
    info!(
        package = %package,
        reason = reason.category(),
        detail = %reason,
        "Ignore service dist"
    );
}

pub struct EligibilityFilter {
    fs: Arc<dyn FileSystem>,
    namespace: Regex,
}

impl EligibilityFilter {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        let pattern = format!("^({})-", NAMESPACE_TAGS.join("|"));
        Self {
            fs,
            namespace: Regex::new(&pattern).expect("namespace tags form a valid pattern"),
        }
    }

    /// Applies the naming and entry-file predicates to a package directory
    ///
    /// `package_path` is the package's own directory.
    pub fn evaluate(&self, package_name: &str, package_path: &Path) -> Eligibility {
        if !self.namespace.is_match(package_name) {
            return Eligibility::Ineligible(SkipReason::Namespace);
        }

        if let Some(keyword) = EXCLUDED_KEYWORDS
            .iter()
            .find(|keyword| package_name.contains(*keyword))
        {
            return Eligibility::Ineligible(SkipReason::Excluded {
                keyword: keyword.to_string(),
            });
        }

        let entry_file = package_path.join(ENTRY_FILE);
        if !self.fs.is_file(&entry_file) {
            return Eligibility::Ineligible(SkipReason::MissingEntry);
        }

        Eligibility::Eligible { entry_file }
    }

    pub fn is_eligible(&self, package_name: &str, package_path: &Path) -> bool {
        self.evaluate(package_name, package_path).is_eligible()
    }

    /// Full check for a scanned package, including its manifest
    ///
    /// Ineligible packages are logged and otherwise ignored.
    pub fn check(&self, descriptor: &PackageDescriptor) -> Eligibility {
        let mut eligibility = self.evaluate(&descriptor.name, &descriptor.absolute_path);
        if eligibility.is_eligible() && descriptor.manifest_version.is_none() {
            eligibility = Eligibility::Ineligible(SkipReason::Manifest);
        }

        if let Eligibility::Ineligible(reason) = &eligibility {
            log_skip(&descriptor.name, reason);
        }
        eligibility
    }
}
