use anyhow::{Context, Result};
use clap::Parser;

use disc_balloon::app::{self, CliOpts};

fn main() -> Result<()> {
    let opts = CliOpts::parse();

    let verbosity = opts.verbosity();
    stderrlog::new()
        .quiet(verbosity < 0)
        .verbosity(verbosity.max(0) as usize)
        .timestamp(opts.timestamp.clone().unwrap_or(stderrlog::Timestamp::Off))
        .init()
        .context("initializing logging")?;

    app::run(&opts)
}
