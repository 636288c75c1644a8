mod cli;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    cli::init_tracing(cli.verbose);
    cli::run(cli)
}
