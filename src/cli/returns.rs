use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::read_request;
use crate::datetime::format_instant;
use crate::error::Result;
use crate::fmt::money;
use crate::models::{ReturnsRequest, ReturnsResponse};
use crate::returns::{calculate_returns, Scheme};

pub fn run(file: &str, scheme: Scheme, table: bool) -> Result<()> {
    let req: ReturnsRequest = serde_json::from_str(&read_request(file)?)?;
    let response = calculate_returns(
        req.transactions,
        &req.q,
        &req.p,
        &req.k,
        req.age,
        req.wage,
        req.inflation,
        scheme,
    );

    if table {
        render_table(&response, scheme);
    } else {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }
    Ok(())
}

fn render_table(response: &ReturnsResponse, scheme: Scheme) {
    let mut table = Table::new();
    table.set_header(vec!["Window start", "Window end", "Saved", "Profit", "Tax benefit"]);

    for bucket in &response.savings_by_dates {
        let profit = if bucket.profit >= 0.0 {
            Cell::new(money(bucket.profit).green())
        } else {
            Cell::new(money(bucket.profit).red())
        };
        table.add_row(vec![
            Cell::new(format_instant(&bucket.start)),
            Cell::new(format_instant(&bucket.end)),
            Cell::new(money(bucket.amount)),
            profit,
            Cell::new(money(bucket.tax_benefit)),
        ]);
    }

    let scheme_name = match scheme {
        Scheme::Nps => "NPS",
        Scheme::Index => "Index",
    };
    println!("{} returns\n{table}", scheme_name.bold());
    println!(
        "Total spent: {}   Total ceiling: {}",
        money(response.transactions_total_amount),
        money(response.transactions_total_ceiling)
    );
}
