//! Operator configuration for a generator run
//!
//! Values come from the command line first, then `SERVICEGEN_*` environment
//! variables, then defaults. Only the CLI layer reads the environment; the
//! library types receive explicit values.
//!
//! # Environment Variables
//!
//! - `SERVICEGEN_BUNDLER`: bundler program - default: "webpack-service-bundler"
//! - `SERVICEGEN_TRANSPILER_CONFIG`: JSON file merged into the script rule
//! - `SERVICEGEN_LOG_LEVEL`: logging level - default: "info"

use crate::pipeline::{DEFAULT_COMPONENTS_DIR, DEFAULT_PACKAGES_DIR};
use crate::scanner::{PackageRoot, RootKind};
use serde_json::Value;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_BUNDLER: &str = "webpack-service-bundler";
const DEFAULT_LOG_LEVEL: &str = "info";
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Project root does not exist: {}", .0.display())]
    ProjectRootNotFound(PathBuf),

    #[error("No package roots found under {}: expected {components}/ or {packages}/", root.display())]
    NoPackageRoots {
        root: PathBuf,
        components: String,
        packages: String,
    },

    #[error("Invalid log level: {0}. Valid options: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Bundler program must not be empty")]
    EmptyBundler,

    #[error("Failed to read transpiler config {}: {message}", path.display())]
    TranspilerConfig { path: PathBuf, message: String },
}

#[derive(Debug, Clone)]
pub struct ServicegenConfig {
    pub project_root: PathBuf,
    pub components_dir: String,
    pub packages_dir: String,
    pub bundler_program: String,
    pub bundler_args: Vec<String>,
    pub transpiler_config: Option<PathBuf>,
    pub log_level: String,
}

impl Default for ServicegenConfig {
    fn default() -> Self {
        Self {
            project_root: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            components_dir: DEFAULT_COMPONENTS_DIR.to_string(),
            packages_dir: DEFAULT_PACKAGES_DIR.to_string(),
            bundler_program: env::var("SERVICEGEN_BUNDLER")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BUNDLER.to_string()),
            bundler_args: Vec::new(),
            transpiler_config: env::var("SERVICEGEN_TRANSPILER_CONFIG")
                .ok()
                .map(PathBuf::from),
            log_level: env::var("SERVICEGEN_LOG_LEVEL")
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
                .to_lowercase(),
        }
    }
}

impl ServicegenConfig {
    /// Checks that:
    /// - the project root exists and holds at least one package root
    /// - the bundler program is set
    /// - the log level is valid
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.project_root.is_dir() {
            return Err(ConfigError::ProjectRootNotFound(self.project_root.clone()));
        }

        if self
            .package_roots()
            .iter()
            .all(|root| !self.project_root.join(&root.dir_name).is_dir())
        {
            return Err(ConfigError::NoPackageRoots {
                root: self.project_root.clone(),
                components: self.components_dir.clone(),
                packages: self.packages_dir.clone(),
            });
        }

        if self.bundler_program.trim().is_empty() {
            return Err(ConfigError::EmptyBundler);
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }

        Ok(())
    }

    pub fn package_roots(&self) -> Vec<PackageRoot> {
        vec![
            PackageRoot::new(&self.components_dir, RootKind::Component),
            PackageRoot::new(&self.packages_dir, RootKind::Package),
        ]
    }

    /// Absolute project root, resolved against the current directory
    pub fn absolute_project_root(&self) -> PathBuf {
        if self.project_root.is_absolute() {
            self.project_root.clone()
        } else {
            self.project_root
                .canonicalize()
                .unwrap_or_else(|_| self.project_root.clone())
        }
    }

    /// The transpiler options, or an empty object when none are configured
    pub fn load_transpiler_options(&self) -> Result<Value, ConfigError> {
        match &self.transpiler_config {
            Some(path) => read_json(&self.resolve(path)),
            None => Ok(Value::Object(Default::default())),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}

fn read_json(path: &Path) -> Result<Value, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::TranspilerConfig {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| ConfigError::TranspilerConfig {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
