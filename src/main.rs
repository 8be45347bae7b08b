//! CLI entry point for the selective patch sampling demo

use clap::Parser;
use volpatch::io::cli::{Cli, SamplingRun};

fn main() -> volpatch::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let run = SamplingRun::new(cli);
    let summary = run.run()?;
    run.report(&summary);
    Ok(())
}
