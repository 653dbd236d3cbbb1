//! fct: developer-environment toolbelt

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fct_cli::cli::Cli;

/// Log filter variable; wins over `-v`.
const LOG_ENV: &str = "FCT_LOG";

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "fct_cli=debug",
        _ => "fct_cli=trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
