use std::process::ExitCode;

use clap::Parser;

fn main() -> anyhow::Result<ExitCode> {
    let cli = docxmark::cli::Cli::parse();
    docxmark::init(cli.verbose);

    docxmark::cli::run(cli)
}
