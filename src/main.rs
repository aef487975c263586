use std::{path::PathBuf, process::ExitCode};

use ::tracing::error;
use clap::Parser;
use seaweed_store::{ErrorKind, SeaweedClient, SeaweedError};

mod commands;
mod config;
mod tracing;
use tracing::setup_tracing;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "config file", help = "Path to config file")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "host:port", help = "Address of the seaweed master")]
    seaweed_addr: Option<String>,

    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config =
        match config::Config::load(cli.config.as_deref(), cli.seaweed_addr.as_deref()) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error loading config: {:?}", err);
                return ExitCode::FAILURE;
            }
        };

    if let Err(err) = setup_tracing(&config) {
        eprintln!("Error setting up tracing: {:?}", err);
    }

    let client = match SeaweedClient::new(config.seaweed.clone()) {
        Ok(client) => client,
        Err(err) => {
            error!("Error creating seaweed client: {:?}", err);
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = commands::run(&client, &config, cli.command).await {
        error!("Error running command: {:?}", err);
        // absent content gets its own exit status so scripts can tell it apart
        let not_found = err
            .downcast_ref::<SeaweedError>()
            .is_some_and(|e| e.kind() == ErrorKind::NotFound);
        return if not_found {
            ExitCode::from(2)
        } else {
            ExitCode::FAILURE
        };
    }
    ExitCode::SUCCESS
}
