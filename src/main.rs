use clap::Parser;
use sazabi::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    match cli.command {
        Commands::Log(args) => {
            sazabi::initialize_with(&config)?;
            let logger = sazabi::global();
            args.execute(logger.as_ref())?;
            logger.sync();
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
