use clap::{Args, ValueEnum};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use microcredit_core::loan::Loan;
use microcredit_core::regrading::{
    CreditContractOptions, LoanType, PassthroughScheduler, RegradingRequest,
};
use microcredit_core::settings::{
    ApplicationSettings, DaysInYearConvention, NonWorkingDates, User,
};

use crate::input;

/// Arguments for the regrading maximum-amount calculation
#[derive(Args)]
pub struct RegradeArgs {
    /// Path to a JSON request file holding loan, options, settings and date
    /// (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON loan file
    #[arg(long)]
    pub loan: Option<String>,

    /// Settlement date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Amortization profile of the contract
    #[arg(long, value_enum, default_value = "flat")]
    pub loans_type: LoansTypeArg,

    /// Replace computed interest with --manual-interests-amount
    #[arg(long)]
    pub cancel_interests: bool,

    /// Manual interest amount (used with --cancel-interests)
    #[arg(long, allow_hyphen_values = true)]
    pub manual_interests_amount: Option<Decimal>,

    /// Replace computed fees with the manual fee and commission amounts
    #[arg(long)]
    pub cancel_fees: bool,

    /// Manual fee amount (used with --cancel-fees)
    #[arg(long, allow_hyphen_values = true)]
    pub manual_fees_amount: Option<Decimal>,

    /// Manual commission amount (used with --cancel-fees)
    #[arg(long, allow_hyphen_values = true)]
    pub manual_commission_amount: Option<Decimal>,

    /// Days-in-year convention for interest accrual
    #[arg(long, value_enum, default_value = "fixed365")]
    pub days_in_year: DaysInYearArg,

    /// Decimal places used when the contract settles in cents
    #[arg(long)]
    pub decimal_places: Option<u32>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum LoansTypeArg {
    Flat,
    DecliningFixedPrincipal,
    DecliningFixedInstallments,
    DecliningFixedPrincipalWithRealInterest,
}

impl From<LoansTypeArg> for LoanType {
    fn from(arg: LoansTypeArg) -> Self {
        match arg {
            LoansTypeArg::Flat => LoanType::Flat,
            LoansTypeArg::DecliningFixedPrincipal => LoanType::DecliningFixedPrincipal,
            LoansTypeArg::DecliningFixedInstallments => LoanType::DecliningFixedInstallments,
            LoansTypeArg::DecliningFixedPrincipalWithRealInterest => {
                LoanType::DecliningFixedPrincipalWithRealInterest
            }
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum DaysInYearArg {
    Fixed360,
    Fixed365,
    Actual,
}

impl From<DaysInYearArg> for DaysInYearConvention {
    fn from(arg: DaysInYearArg) -> Self {
        match arg {
            DaysInYearArg::Fixed360 => DaysInYearConvention::Fixed360,
            DaysInYearArg::Fixed365 => DaysInYearConvention::Fixed365,
            DaysInYearArg::Actual => DaysInYearConvention::Actual,
        }
    }
}

pub fn run_regrade(args: RegradeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: RegradingRequest = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let loan_path = args
            .loan
            .ok_or("--loan is required (or provide --input)")?;
        let loan: Loan = input::file::read_json(&loan_path)?;
        let date = args
            .date
            .ok_or("--date is required (or provide --input)")?;

        RegradingRequest {
            loan,
            options: CreditContractOptions {
                loans_type: args.loans_type.into(),
                cancel_interests: args.cancel_interests,
                manual_interests_amount: args.manual_interests_amount.unwrap_or_default(),
                cancel_fees: args.cancel_fees,
                manual_fees_amount: args.manual_fees_amount.unwrap_or_default(),
                manual_commission_amount: args.manual_commission_amount.unwrap_or_default(),
            },
            user: User::default(),
            settings: ApplicationSettings {
                days_in_year: args.days_in_year.into(),
                interest_rate_decimal_places: args.decimal_places.unwrap_or(2),
            },
            non_working_dates: NonWorkingDates::default(),
            date,
        }
    };

    let output = request.execute(&PassthroughScheduler)?;
    Ok(serde_json::to_value(output)?)
}
