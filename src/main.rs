use clap::Parser;
use gcodegen::{init_logging, run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug)?;

    let config = cli.resolve()?;
    tracing::debug!(?config, "Resolved run configuration");

    let summary = run(&config)?;
    if cli.summary_json {
        println!("{}", summary.to_json()?);
    }

    Ok(())
}
