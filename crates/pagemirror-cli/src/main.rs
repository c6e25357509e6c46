use pagemirror_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; stderr if the state dir is unusable.
    let destination = logging::init_logging();
    tracing::debug!(?destination, "logging ready");

    // Parse CLI and dispatch. Any error here is a fatal setup failure.
    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("pagemirror error: {:#}", err);
        std::process::exit(1);
    }
}
