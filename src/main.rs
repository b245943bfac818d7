use clap::Parser;
use inkframe::cli::{run, Args};
use inkframe::init_logging;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging()?;
    run(args)
}
