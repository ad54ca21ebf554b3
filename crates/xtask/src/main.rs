use clap::{Parser, Subcommand};
use snafu::{ResultExt, Snafu};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod compare;

const LOG_ENV_VAR: &str = "XTASK_LOG";

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to generate comparison fragments"))]
    Compare { source: compare::Error },
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Prints the Spec comparison fragment of every resource definition.
    Compare(compare::CompareArguments),
}

#[snafu::report]
fn main() -> Result<(), Error> {
    initialize_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Compare(arguments) => compare::run(&arguments).context(CompareSnafu),
    }
}

/// Logs go to stderr so that generated fragments on stdout stay clean.
fn initialize_logging() {
    let filter = EnvFilter::builder()
        .with_env_var(LOG_ENV_VAR)
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry().with(filter).with(fmt).init();
}
