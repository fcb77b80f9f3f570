//! CLI entry point for batch hex capture analysis

use clap::Parser;
use hexlens::io::cli::{Cli, FileProcessor};

fn main() -> hexlens::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut processor = FileProcessor::new(cli);
    let reports = processor.process()?;
    tracing::info!(count = reports.len(), "analysis complete");
    Ok(())
}
