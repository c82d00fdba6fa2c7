mod cli;
mod convert;
mod model;
mod util;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() {
    init_tracing();

    if let Err(err) = run() {
        println!("{err}");
        error!(error = %err, "conversion failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }

    println!("Done.");
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let summary = convert::run(&cli)?;

    info!(
        rows_read = summary.rows_read,
        rows_accepted = summary.rows_accepted,
        rows_rejected = summary.rows_rejected,
        groups = summary.manifest.generated.len(),
        "conversion completed"
    );

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
