mod args;
mod commands;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = args::Cli::parse();
    loomcraft_observability::init(cli.log_format.into());

    let config = loomcraft_catalog::CatalogConfig::from_env()?;
    let output = commands::run(cli.command, &config)?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
