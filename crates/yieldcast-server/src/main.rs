use std::process::ExitCode;

use tracing::error;
use yieldcast_server::{ServerConfig, USAGE, Verbosity, init_subscriber, parse_cli_args, run_server};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match parse_cli_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    if args.help {
        print!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    init_subscriber(Verbosity::from_flags(args.verbose, args.quiet), args.no_color);

    let config = match ServerConfig::resolve(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run_server(config).await {
        error!(error = %e, "yieldcast server exited with error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
