use super::{BundleReport, Bundler};
use crate::error::BundlerError;
use crate::service::BuildConfiguration;
use async_trait::async_trait;
use std::io::Write;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// Runs an external bundler program once per configuration
///
/// The configuration is written as JSON to a temporary file and passed as
/// `--config <file>`. The program may print a JSON [`BundleReport`] on
/// stdout; anything else is kept verbatim in the report log. A non-zero exit
/// status is a compile failure.
pub struct CommandBundler {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl CommandBundler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.args.extend(args);
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn write_config(config: &BuildConfiguration) -> Result<tempfile::NamedTempFile, BundlerError> {
        let json = serde_json::to_vec_pretty(config)
            .map_err(|e| BundlerError::Invocation(format!("failed to serialize configuration: {}", e)))?;

        let mut file = tempfile::Builder::new()
            .prefix("servicegen-")
            .suffix(".json")
            .tempfile()
            .map_err(|e| BundlerError::Invocation(format!("failed to create config file: {}", e)))?;
        file.write_all(&json)
            .and_then(|_| file.flush())
            .map_err(|e| BundlerError::Invocation(format!("failed to write config file: {}", e)))?;
        Ok(file)
    }
}

/// Structured report when stdout is JSON, otherwise stdout and stderr as log text
fn parse_report(stdout: &str, stderr: &str) -> BundleReport {
    let mut report = serde_json::from_str::<BundleReport>(stdout.trim()).unwrap_or_else(|_| BundleReport {
        log: stdout.to_string(),
        ..Default::default()
    });

    let stderr = stderr.trim_end();
    if !stderr.is_empty() {
        if !report.log.is_empty() && !report.log.ends_with('\n') {
            report.log.push('\n');
        }
        report.log.push_str(stderr);
    }
    report
}

#[async_trait]
impl Bundler for CommandBundler {
    async fn invoke(&self, config: &BuildConfiguration) -> Result<BundleReport, BundlerError> {
        let config_file = Self::write_config(config)?;

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg("--config").arg(config_file.path());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        debug!(
            package = %config.package,
            program = %self.program,
            config = %config_file.path().display(),
            "Invoking bundler"
        );

        let output = cmd
            .output()
            .await
            .map_err(|e| BundlerError::Invocation(format!("failed to run {}: {}", self.program, e)))?;

        let mut report = parse_report(
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
        );

        if output.status.success() && !report.has_errors() {
            return Ok(report);
        }

        if report.errors.is_empty() {
            report
                .errors
                .push(format!("{} exited with {}", self.program, output.status));
        }
        Err(BundlerError::Compile { report })
    }

    fn name(&self) -> &str {
        &self.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structured_report() {
        let report = parse_report(r#"{"assets": ["foo.service.js"], "warnings": []}"#, "");
        assert_eq!(report.assets, vec!["foo.service.js"]);
        assert!(report.log.is_empty());
    }

    #[test]
    fn test_parse_plain_output() {
        let report = parse_report("Hash: 1234\nTime: 20ms\n", "deprecation notice\n");
        assert!(report.assets.is_empty());
        assert_eq!(report.log, "Hash: 1234\nTime: 20ms\ndeprecation notice");
    }

    #[test]
    fn test_name_is_program() {
        let bundler = CommandBundler::new("webpack-service-bundler").with_args(vec!["--color".to_string()]);
        assert_eq!(bundler.name(), "webpack-service-bundler");
        assert_eq!(bundler.args, vec!["--color"]);
    }
}
