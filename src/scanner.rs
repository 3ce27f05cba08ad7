//! Package scanning: one level of package directories under each root

use crate::error::ScanError;
use crate::fs::FileSystem;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const MANIFEST_FILE: &str = "package.json";

/// Which of the two monorepo roots a package was found under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootKind {
    Component,
    Package,
}

impl fmt::Display for RootKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootKind::Component => write!(f, "component"),
            RootKind::Package => write!(f, "package"),
        }
    }
}

/// A package root to scan: the directory name relative to the project root
/// plus the kind of packages it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRoot {
    pub dir_name: String,
    pub kind: RootKind,
}

impl PackageRoot {
    pub fn new(dir_name: impl Into<String>, kind: RootKind) -> Self {
        Self {
            dir_name: dir_name.into(),
            kind,
        }
    }
}

/// The fields of `package.json` the generator cares about
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
}

/// A scanned package directory
///
/// `manifest_version` is `None` when the directory has no readable manifest;
/// such packages still contribute their directory name to the builtin registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub name: String,
    pub absolute_path: PathBuf,
    /// Path relative to the project root, e.g. `packages/rax-view`
    pub relative_path: PathBuf,
    pub root_kind: RootKind,
    pub manifest_version: Option<String>,
}

pub struct PackageScanner {
    fs: Arc<dyn FileSystem>,
    project_root: PathBuf,
}

impl PackageScanner {
    pub fn new(fs: Arc<dyn FileSystem>, project_root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            project_root: project_root.into(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Lists every directory directly under `root`
    ///
    /// Missing or malformed manifests do not fail the scan; the descriptor is
    /// kept with no version and the eligibility filter rejects it later.
    pub fn scan(&self, root: &PackageRoot) -> Result<Vec<PackageDescriptor>, ScanError> {
        let root_path = self.project_root.join(&root.dir_name);
        let entries = self
            .fs
            .read_dir(&root_path)
            .map_err(|e| ScanError::RootUnreadable {
                path: root_path.clone(),
                message: format!("{:#}", e),
            })?;

        let mut descriptors = Vec::new();
        for entry in entries.into_iter().filter(|e| e.is_dir()) {
            let manifest_version = match self.read_manifest(entry.path()) {
                Ok(manifest) => Some(manifest.version),
                Err(err) => {
                    debug!(package = %entry.file_name(), error = %err, "Package has no usable manifest");
                    None
                }
            };

            descriptors.push(PackageDescriptor {
                name: entry.file_name().to_string(),
                relative_path: Path::new(&root.dir_name).join(entry.file_name()),
                absolute_path: entry.path().to_path_buf(),
                root_kind: root.kind,
                manifest_version,
            });
        }

        info!(
            root = %root_path.display(),
            kind = %root.kind,
            packages = descriptors.len(),
            "Scanned package root"
        );

        Ok(descriptors)
    }

    /// Scans every root in order, skipping roots that cannot be listed
    pub fn scan_all(&self, roots: &[PackageRoot]) -> Vec<PackageDescriptor> {
        let mut all = Vec::new();
        for root in roots {
            match self.scan(root) {
                Ok(descriptors) => all.extend(descriptors),
                Err(err) => warn!(error = %err, "Skipping package root"),
            }
        }
        all
    }

    pub fn read_manifest(&self, package_path: &Path) -> Result<PackageManifest, ScanError> {
        let path = package_path.join(MANIFEST_FILE);
        if !self.fs.is_file(&path) {
            return Err(ScanError::ManifestNotFound { path });
        }

        let content = self
            .fs
            .read_to_string(&path)
            .map_err(|_| ScanError::ManifestNotFound { path: path.clone() })?;

        serde_json::from_str(&content).map_err(|e| ScanError::ManifestParse {
            path,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    fn scanner_with(fs: MockFileSystem) -> PackageScanner {
        let root = fs.root().to_path_buf();
        PackageScanner::new(Arc::new(fs), root)
    }

    #[test]
    fn test_scan_lists_directories_only() {
        let fs = MockFileSystem::with_root(PathBuf::from("/repo"));
        fs.add_package("packages/rax-view", "rax-view", "1.0.3", true);
        fs.add_package("packages/universal-env", "universal-env", "0.6.0", true);
        fs.add_file("packages/README.md", "not a package");
        let scanner = scanner_with(fs);

        let descriptors = scanner
            .scan(&PackageRoot::new("packages", RootKind::Package))
            .unwrap();

        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].name, "rax-view");
        assert_eq!(
            descriptors[0].absolute_path,
            PathBuf::from("/repo/packages/rax-view")
        );
        assert_eq!(
            descriptors[0].relative_path,
            PathBuf::from("packages/rax-view")
        );
        assert_eq!(descriptors[0].manifest_version.as_deref(), Some("1.0.3"));
        assert_eq!(descriptors[1].root_kind, RootKind::Package);
    }

    #[test]
    fn test_scan_keeps_packages_without_manifest() {
        let fs = MockFileSystem::with_root(PathBuf::from("/repo"));
        fs.add_dir("components/rax-picture");
        fs.add_file("components/rax-broken/package.json", "{ not json");
        let scanner = scanner_with(fs);

        let descriptors = scanner
            .scan(&PackageRoot::new("components", RootKind::Component))
            .unwrap();

        assert_eq!(descriptors.len(), 2);
        assert!(descriptors.iter().all(|d| d.manifest_version.is_none()));
        assert!(descriptors
            .iter()
            .all(|d| d.root_kind == RootKind::Component));
    }

    #[test]
    fn test_scan_missing_root() {
        let scanner = scanner_with(MockFileSystem::with_root(PathBuf::from("/repo")));
        let result = scanner.scan(&PackageRoot::new("packages", RootKind::Package));
        assert!(matches!(result, Err(ScanError::RootUnreadable { .. })));
    }

    #[test]
    fn test_scan_all_skips_unreadable_roots() {
        let fs = MockFileSystem::with_root(PathBuf::from("/repo"));
        fs.add_package("packages/rax-view", "rax-view", "1.0.0", true);
        let scanner = scanner_with(fs);

        let descriptors = scanner.scan_all(&[
            PackageRoot::new("components", RootKind::Component),
            PackageRoot::new("packages", RootKind::Package),
        ]);
        assert_eq!(descriptors.len(), 1);
    }

    #[test]
    fn test_read_manifest_errors() {
        let fs = MockFileSystem::with_root(PathBuf::from("/repo"));
        fs.add_dir("packages/empty");
        fs.add_file("packages/bad/package.json", r#"{"name": "bad"}"#);
        let scanner = scanner_with(fs);

        let missing = scanner.read_manifest(Path::new("/repo/packages/empty"));
        assert!(matches!(missing, Err(ScanError::ManifestNotFound { .. })));

        let no_version = scanner.read_manifest(Path::new("/repo/packages/bad"));
        assert!(matches!(no_version, Err(ScanError::ManifestParse { .. })));
    }

    #[test]
    fn test_root_kind_display() {
        assert_eq!(RootKind::Component.to_string(), "component");
        assert_eq!(RootKind::Package.to_string(), "package");
    }
}
