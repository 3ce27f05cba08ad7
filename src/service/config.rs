//! Declarative bundler configuration for one service package

use super::identity::ServiceIdentity;
use super::naming::{entry_name, upper_camel_case};
use super::wrapper::ServiceWrapper;
use crate::bundler::ReportOptions;
use crate::eligibility::{SkipReason, ENTRY_FILE};
use crate::registry::{BuiltinRegistry, RegistryTiers};
use crate::scanner::PackageDescriptor;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

pub const DIST_DIR: &str = "dist";
pub const OUTPUT_FILENAME: &str = "[name].js";
pub const SERVICE_SUFFIX: &str = ".service";
pub const MINIFIED_SUFFIX: &str = ".min";
pub const MINIFY_INCLUDE: &str = r"\.min\.js$";
pub const TARGET: &str = "node";
pub const MODE: &str = "production";

const SCRIPT_RULE_TEST: &str = r"\.jsx?$";
const SCRIPT_RULE_EXCLUDE: &str = "(node_modules|bower_components)";
const SCRIPT_LOADER: &str = "babel-loader";
const STYLE_RULE_TEST: &str = r"\.css$";
const STYLE_LOADER: &str = "stylesheet-loader";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    /// Always absolute; the bundler rejects relative output paths
    pub path: PathBuf,
    pub filename: String,
    pub pathinfo: bool,
}

/// Options handed to the host-runtime module plugin
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleOptions {
    pub builtin_modules: Arc<BuiltinRegistry>,
    pub external_builtin_modules: bool,
    pub module_name: String,
    pub global_name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRule {
    pub test: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
    pub loader: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "plugin", rename_all = "kebab-case")]
pub enum PluginSpec {
    Define {
        definitions: BTreeMap<String, String>,
    },
    NoEmitOnErrors,
    /// Host-runtime plugin; reads `moduleOptions`
    HostRuntime,
    ModuleConcatenation,
    #[serde(rename_all = "camelCase")]
    Minify { include: String, source_map: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Optimization {
    pub minimize: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOptions {
    pub optimization_bailout: bool,
}

/// Everything the bundler needs to emit one package's service bundles
///
/// Built once per eligible package and consumed by exactly one build.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfiguration {
    pub package: String,
    pub identity: ServiceIdentity,
    pub mode: String,
    pub target: String,
    /// `None` disables source maps
    pub devtool: Option<String>,
    pub optimization: Optimization,
    pub stats: StatsOptions,
    pub entry: BTreeMap<String, PathBuf>,
    pub output: OutputOptions,
    pub module_options: ModuleOptions,
    pub wrapper_hooks: Option<ServiceWrapper>,
    pub plugins: Vec<PluginSpec>,
    pub module_rules: Vec<ModuleRule>,
    pub report: ReportOptions,
}

impl BuildConfiguration {
    /// File names the bundler is expected to write under `output.path`
    pub fn expected_outputs(&self) -> Vec<String> {
        self.entry
            .keys()
            .map(|name| OUTPUT_FILENAME.replace("[name]", name))
            .collect()
    }
}

pub struct ConfigFactory {
    project_root: PathBuf,
    transpiler_options: Value,
    report: ReportOptions,
}

impl ConfigFactory {
    /// `project_root` must be absolute; `transpiler_options` is merged into
    /// the script rule unmodified
    pub fn new(project_root: impl Into<PathBuf>, transpiler_options: Value) -> Self {
        Self {
            project_root: project_root.into(),
            transpiler_options,
            report: ReportOptions::default(),
        }
    }

    pub fn with_report_options(mut self, report: ReportOptions) -> Self {
        self.report = report;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Absolute `dist` directory for a package path relative to the project root
    pub fn output_dir(&self, relative_package_path: &Path) -> PathBuf {
        let joined = if relative_package_path.is_absolute() {
            relative_package_path.join(DIST_DIR)
        } else {
            self.project_root.join(relative_package_path).join(DIST_DIR)
        };
        normalize(&joined)
    }

    /// Builds the service configuration for an eligible package
    ///
    /// Fails only when the package has no manifest version.
    pub fn make_service_config(
        &self,
        descriptor: &PackageDescriptor,
        tiers: &RegistryTiers,
    ) -> Result<BuildConfiguration, SkipReason> {
        let version = descriptor
            .manifest_version
            .clone()
            .ok_or(SkipReason::Manifest)?;

        let module_name = descriptor.name.clone();
        let identity = ServiceIdentity::derive(&module_name, &version);
        let stem = format!("{}{}", entry_name(&module_name), SERVICE_SUFFIX);
        let main = descriptor.absolute_path.join(ENTRY_FILE);

        let mut entry = BTreeMap::new();
        entry.insert(format!("{}{}", stem, MINIFIED_SUFFIX), main.clone());
        entry.insert(stem, main);

        let module_options = ModuleOptions {
            builtin_modules: tiers.service(),
            external_builtin_modules: true,
            global_name: upper_camel_case(&module_name),
            module_name: module_name.clone(),
            version,
        };

        let mut definitions = BTreeMap::new();
        definitions.insert(
            "process.env.NODE_ENV".to_string(),
            format!("\"{}\"", MODE),
        );

        Ok(BuildConfiguration {
            package: module_name.clone(),
            wrapper_hooks: Some(ServiceWrapper::generate(&module_name, &identity)),
            identity,
            mode: MODE.to_string(),
            target: TARGET.to_string(),
            devtool: None,
            optimization: Optimization { minimize: false },
            stats: StatsOptions {
                optimization_bailout: true,
            },
            entry,
            output: OutputOptions {
                path: self.output_dir(&descriptor.relative_path),
                filename: OUTPUT_FILENAME.to_string(),
                pathinfo: false,
            },
            module_options,
            plugins: vec![
                PluginSpec::Define { definitions },
                PluginSpec::NoEmitOnErrors,
                PluginSpec::HostRuntime,
                PluginSpec::ModuleConcatenation,
                PluginSpec::Minify {
                    include: MINIFY_INCLUDE.to_string(),
                    source_map: false,
                },
            ],
            module_rules: vec![
                ModuleRule {
                    test: SCRIPT_RULE_TEST.to_string(),
                    exclude: Some(SCRIPT_RULE_EXCLUDE.to_string()),
                    loader: SCRIPT_LOADER.to_string(),
                    options: Some(self.transpiler_options.clone()),
                },
                ModuleRule {
                    test: STYLE_RULE_TEST.to_string(),
                    exclude: None,
                    loader: STYLE_LOADER.to_string(),
                    options: None,
                },
            ],
            report: self.report,
        })
    }
}

/// Lexically removes `.` and `..` components without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
