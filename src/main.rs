mod cli;
mod constants;
mod datetime;
mod error;
mod fmt;
mod models;
mod returns;
mod rules;
mod tax;
mod transactions;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { file } => cli::parse::run(&file),
        Commands::Validate { file } => cli::validate::run(&file),
        Commands::Filter { file } => cli::filter::run(&file),
        Commands::Returns {
            file,
            scheme,
            table,
        } => cli::returns::run(&file, scheme, table),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
