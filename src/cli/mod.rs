pub mod filter;
pub mod parse;
pub mod returns;
pub mod validate;

use std::io::Read;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::returns::Scheme;

#[derive(Parser)]
#[command(
    name = "roundup",
    about = "Round-up micro-investing: remanent rules, savings windows, projected returns."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive ceilings and remanents from raw expenses.
    Parse {
        /// Request JSON file (`-` for stdin)
        file: String,
    },
    /// Validate transactions: amount range, recomputed round-ups, duplicate dates.
    Validate {
        /// Request JSON file (`-` for stdin)
        file: String,
    },
    /// Apply override/overlay rules and classify transactions against reporting windows.
    Filter {
        /// Request JSON file (`-` for stdin)
        file: String,
    },
    /// Project compounded, inflation-adjusted returns per reporting window.
    Returns {
        /// Request JSON file (`-` for stdin)
        file: String,
        /// Investment scheme
        #[arg(long, value_enum, default_value = "nps")]
        scheme: Scheme,
        /// Render a table instead of JSON
        #[arg(long)]
        table: bool,
    },
}

/// Read a request body from a file path, or stdin when the path is `-`.
pub(crate) fn read_request(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}
