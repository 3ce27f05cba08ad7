use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generates service bundles for every eligible monorepo package
#[derive(Parser, Debug)]
#[command(
    name = "servicegen",
    about = "Generate service-bundle build configurations for monorepo packages",
    version,
    long_about = "servicegen scans the components/ and packages/ roots of a monorepo, \
                  selects the packages that ship as standalone services and drives the \
                  bundler once per package with a generated configuration and \
                  service-registration wrapper."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

impl CliArgs {
    /// Log level requested on the command line, if any
    ///
    /// `--log-level` wins over `-v`/`-q`; `None` leaves the environment default.
    pub fn requested_log_level(&self) -> Option<String> {
        if let Some(level) = &self.log_level {
            Some(level.to_lowercase())
        } else if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Build service bundles",
        long_about = "Scans the package roots, builds every eligible package concurrently \
                      and exits non-zero if any build failed.\n\n\
                      Examples:\n  \
                      servicegen run\n  \
                      servicegen run /path/to/monorepo\n  \
                      servicegen run --plan\n  \
                      servicegen run --bundler ./scripts/bundle.js --bundler-arg --color"
    )]
    Run(RunArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[arg(
        value_name = "PROJECT_ROOT",
        help = "Monorepo root (defaults to current directory)"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Components root, relative to the project root")]
    pub components: Option<String>,

    #[arg(long, value_name = "DIR", help = "Packages root, relative to the project root")]
    pub packages: Option<String>,

    #[arg(
        short = 'b',
        long,
        value_name = "PROGRAM",
        help = "Bundler program invoked once per package with --config <file>"
    )]
    pub bundler: Option<String>,

    #[arg(
        long = "bundler-arg",
        value_name = "ARG",
        allow_hyphen_values = true,
        help = "Extra argument passed to the bundler (repeatable)"
    )]
    pub bundler_args: Vec<String>,

    #[arg(
        short = 't',
        long,
        value_name = "FILE",
        help = "JSON transpiler options merged into the script rule"
    )]
    pub transpiler_config: Option<PathBuf>,

    #[arg(long, help = "Print the build configurations as JSON instead of building")]
    pub plan: bool,

    #[arg(long, help = "Disable colors in bundler reports")]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_run_args() {
        let args = CliArgs::parse_from(["servicegen", "run"]);
        let Commands::Run(run) = args.command;
        assert!(run.project_root.is_none());
        assert!(run.bundler.is_none());
        assert!(run.bundler_args.is_empty());
        assert!(!run.plan);
        assert!(!run.no_color);
    }

    #[test]
    fn test_run_with_options() {
        let args = CliArgs::parse_from([
            "servicegen",
            "-v",
            "run",
            "/tmp/repo",
            "--bundler",
            "node",
            "--bundler-arg",
            "scripts/bundle.js",
            "--bundler-arg",
            "--color",
            "--packages",
            "libs",
            "--plan",
        ]);
        assert!(args.verbose);
        let Commands::Run(run) = args.command;
        assert_eq!(run.project_root, Some(PathBuf::from("/tmp/repo")));
        assert_eq!(run.bundler.as_deref(), Some("node"));
        assert_eq!(run.bundler_args, vec!["scripts/bundle.js", "--color"]);
        assert_eq!(run.packages.as_deref(), Some("libs"));
        assert!(run.plan);
    }

    fn level(argv: &[&str]) -> Option<String> {
        CliArgs::parse_from(argv).requested_log_level()
    }

    #[test]
    fn test_requested_log_level() {
        assert_eq!(level(&["servicegen", "run"]), None);
        assert_eq!(level(&["servicegen", "-v", "run"]).as_deref(), Some("debug"));
        assert_eq!(level(&["servicegen", "-q", "run"]).as_deref(), Some("error"));
        assert_eq!(
            level(&["servicegen", "--log-level", "WARN", "-q", "run"]).as_deref(),
            Some("warn")
        );
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = CliArgs::try_parse_from(["servicegen", "-v", "-q", "run"]);
        assert!(result.is_err());
    }
}
