mod cli;
mod config;
mod error;
mod logging;
mod observation;
mod parquet;
mod select;
mod slice;
mod snap;

use std::process;

use anyhow::{Error, Result};
use clap::Parser;
use cli::{command, Cli};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = cli.slice_config();
    let outcome = command::slice(&cli.query_time, &cli.in_path, &cli.out_path, config).await;

    match outcome {
        Ok(outcome) => println!("{}", outcome.to_string().trim_end()),
        Err(e) if e.is_missing_directory() => eprintln!("Warning: {}", e),
        Err(e) => {
            let e = Error::from(e).context(format!("failed to slice `{}`", cli.query_time));
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }

    Ok(())
}

