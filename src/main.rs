use servicegen::cli::{handle_run, CliArgs, Commands};
use servicegen::util::{init_logging, LoggingConfig};
use servicegen::VERSION;

use clap::Parser;
use tracing::debug;

// Builds are I/O bound child processes; one thread drives them all
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = CliArgs::parse();
    init_logging(LoggingConfig::from_cli(
        args.log_level.as_deref(),
        args.verbose,
        args.quiet,
    ));

    debug!("servicegen v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Run(run_args) => {
            handle_run(run_args, args.requested_log_level().as_deref()).await
        }
    };

    std::process::exit(exit_code);
}
