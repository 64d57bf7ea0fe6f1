use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use microcredit_core::loan::Loan;

use crate::input;

/// Arguments for the outstanding-balance query
#[derive(Args)]
pub struct OlbArgs {
    /// Path to a JSON loan file
    #[arg(long)]
    pub input: Option<String>,

    /// Reconstruct the balance as of this date (YYYY-MM-DD); omit for the
    /// balance after every recorded repayment
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Serialize)]
struct LoanStatusOutput {
    olb: Decimal,
    last_repayment_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining_interests: Option<Decimal>,
}

pub fn run_olb(args: OlbArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: Loan = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input is required (or pipe a loan on stdin)".into());
    };
    loan.validate()?;

    let output = match args.date {
        Some(date) => LoanStatusOutput {
            olb: loan.actual_olb_as_of(date),
            last_repayment_date: loan.last_repayment_date(),
            date: Some(date),
            remaining_interests: Some(loan.remaining_interests(date)),
        },
        None => LoanStatusOutput {
            olb: loan.actual_olb(),
            last_repayment_date: loan.last_repayment_date(),
            date: None,
            remaining_interests: None,
        },
    };
    Ok(serde_json::to_value(output)?)
}
