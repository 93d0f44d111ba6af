// src/bin/cli.rs
use bulletin_scrape::{cli, log};
use clap::Parser;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = cli::Cli::parse();
    log::init(args.verbose);

    // Per-month skips are reported, not fatal; only dataset/config/chart errors land here.
    cli::run(&args)?;
    Ok(())
}
