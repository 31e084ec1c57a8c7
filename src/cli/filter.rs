use crate::cli::read_request;
use crate::error::Result;
use crate::models::{FilterRequest, FilterResponse};
use crate::rules::filter_transactions;

pub fn run(file: &str) -> Result<()> {
    let req: FilterRequest = serde_json::from_str(&read_request(file)?)?;
    let outcome = filter_transactions(req.transactions, &req.q, &req.p, &req.k);
    let response = FilterResponse {
        valid: outcome.valid,
        invalid: outcome.invalid,
    };
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
