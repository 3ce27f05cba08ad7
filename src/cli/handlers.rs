use super::commands::RunArgs;
use crate::bundler::{CommandBundler, ReportOptions};
use crate::config::ServicegenConfig;
use crate::driver::BuildDriver;
use crate::fs::RealFileSystem;
use crate::pipeline::ServicePipeline;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_BUILD_FAILED: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Operator configuration from `run` arguments plus the CLI log level
///
/// `log_level` overrides `SERVICEGEN_LOG_LEVEL` so validation checks the
/// level logging actually uses.
pub fn config_from_args(args: &RunArgs, log_level: Option<&str>) -> ServicegenConfig {
    let mut config = ServicegenConfig::default();
    if let Some(level) = log_level {
        config.log_level = level.to_lowercase();
    }
    if let Some(root) = &args.project_root {
        config.project_root = root.clone();
    }
    if let Some(components) = &args.components {
        config.components_dir = components.clone();
    }
    if let Some(packages) = &args.packages {
        config.packages_dir = packages.clone();
    }
    if let Some(bundler) = &args.bundler {
        config.bundler_program = bundler.clone();
    }
    config.bundler_args = args.bundler_args.clone();
    if let Some(transpiler) = &args.transpiler_config {
        config.transpiler_config = Some(transpiler.clone());
    }
    config
}

fn build_pipeline(config: &ServicegenConfig, args: &RunArgs) -> Result<ServicePipeline> {
    config.validate().context("Invalid configuration")?;
    let transpiler_options = config
        .load_transpiler_options()
        .context("Failed to load transpiler options")?;

    let report = ReportOptions {
        colors: !args.no_color && console::colors_enabled_stderr(),
        ..Default::default()
    };

    Ok(ServicePipeline::new(
        Arc::new(RealFileSystem::new()),
        config.absolute_project_root(),
        transpiler_options,
    )
    .with_roots(config.package_roots())
    .with_report_options(report))
}

pub async fn handle_run(args: &RunArgs, log_level: Option<&str>) -> i32 {
    let config = config_from_args(args, log_level);
    let pipeline = match build_pipeline(&config, args) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            return EXIT_CONFIG_ERROR;
        }
    };

    if args.plan {
        return print_plan(&pipeline);
    }

    let bundler = CommandBundler::new(config.bundler_program.clone())
        .with_args(config.bundler_args.clone())
        .with_working_dir(pipeline.project_root().to_path_buf());
    let driver = BuildDriver::new(Arc::new(bundler));

    match pipeline.run(&driver).await {
        Ok(summary) => {
            info!(
                built = summary.built.len(),
                skipped = summary.skipped.len(),
                "Service generation complete"
            );
            EXIT_SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Service generation failed");
            eprintln!("Error: {}", e);
            EXIT_BUILD_FAILED
        }
    }
}

fn print_plan(pipeline: &ServicePipeline) -> i32 {
    let plan = pipeline.plan();
    match serde_json::to_string_pretty(&plan) {
        Ok(json) => {
            println!("{}", json);
            if plan.collisions().next().is_some() {
                EXIT_BUILD_FAILED
            } else {
                EXIT_SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: failed to serialize build plan: {}", e);
            EXIT_BUILD_FAILED
        }
    }
}
