use crate::cli::read_request;
use crate::error::Result;
use crate::models::{ValidateRequest, ValidateResponse};
use crate::transactions::validate_transactions;

pub fn run(file: &str) -> Result<()> {
    let req: ValidateRequest = serde_json::from_str(&read_request(file)?)?;
    let outcome = validate_transactions(req.transactions);
    let response = ValidateResponse {
        valid: outcome.valid,
        invalid: outcome.invalid,
    };
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
