use anyhow::Result;
use clap::Parser;

mod args;
mod cmd;
mod context;
mod io;
mod output;

fn main() -> Result<()> {
    let cli = args::Cli::parse();
    output::init(cli.json);
    cmd::dispatch(cli)
}
