mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

/// `RUST_LOG` wins; otherwise library events at info, or debug with `--verbose`
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "c2data=debug" } else { "c2data=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Extract(args) => {
            let config = Config::load(config_path)?;
            if !commands::extract::handle(&args, &config)? {
                std::process::exit(1);
            }
        }

        Commands::Inspect { input, row } => {
            commands::inspect::handle(&input, row)?;
        }

        Commands::Lang {
            dir,
            locale,
            text,
            id,
        } => {
            commands::lang::handle(&dir, locale, text.as_deref(), id)?;
        }

        Commands::Configure { show, init } => {
            commands::configure::handle(config_path, show, init)?;
        }
    }

    Ok(())
}
