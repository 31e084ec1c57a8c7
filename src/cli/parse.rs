use crate::cli::read_request;
use crate::error::Result;
use crate::models::{ParseRequest, ParseResponse};
use crate::transactions::parse_expenses;

pub fn run(file: &str) -> Result<()> {
    let req: ParseRequest = serde_json::from_str(&read_request(file)?)?;
    let response = ParseResponse {
        transactions: parse_expenses(&req.expenses)?,
    };
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
