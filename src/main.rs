//! CLI entry point for PatchMatch hole filling

use clap::Parser;
use patchfill::io::cli::{Cli, FileProcessor};

fn main() -> patchfill::Result<()> {
    let cli = Cli::parse();
    cli.init_logging();
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
