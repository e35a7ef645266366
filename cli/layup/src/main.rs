//! layup CLI
//!
//! Object storage permissions auditor and bucket resolver.

use clap::Parser;
use tracing::Level;
use tracing_subscriber::fmt;

mod args;
mod commands;
mod input;
mod render;

use args::{Cli, Command};

/// Initialize logging.
///
/// Logs go to stderr so stdout stays clean for tables and bucket names.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Audit(args) => commands::audit::execute(args).await,
        Command::Resolve(args) => commands::resolve::execute(args).await,
        Command::Playbook(args) => commands::playbook::execute(args),
    }
}
