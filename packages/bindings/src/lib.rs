use napi::Result as NapiResult;
use napi_derive::napi;

use microcredit_core::regrading::PassthroughScheduler;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Regrading
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_regrading_amount(request_json: String) -> NapiResult<String> {
    let request: microcredit_core::regrading::RegradingRequest =
        serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let output = request
        .execute(&PassthroughScheduler)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Loan accrual
// ---------------------------------------------------------------------------

#[napi]
pub fn actual_olb(loan_json: String, date: Option<String>) -> NapiResult<String> {
    let loan: microcredit_core::loan::Loan =
        serde_json::from_str(&loan_json).map_err(to_napi_error)?;
    loan.validate().map_err(to_napi_error)?;
    let olb = match date {
        Some(d) => {
            let date: chrono::NaiveDate = d.parse().map_err(to_napi_error)?;
            loan.actual_olb_as_of(date)
        }
        None => loan.actual_olb(),
    };
    serde_json::to_string(&olb).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Provisioning
// ---------------------------------------------------------------------------

#[napi]
pub fn provisioning_rate_by_days_late(table_json: String, days_late: i32) -> NapiResult<String> {
    let table: microcredit_core::provisioning::ProvisionTable =
        serde_json::from_str(&table_json).map_err(to_napi_error)?;
    serde_json::to_string(&table.provisioning_rate_by_days_late(days_late)).map_err(to_napi_error)
}

#[napi]
pub fn provisioning_rate(table_json: String, rank: i32) -> NapiResult<String> {
    let table: microcredit_core::provisioning::ProvisionTable =
        serde_json::from_str(&table_json).map_err(to_napi_error)?;
    serde_json::to_string(&table.provisioning_rate(rank)).map_err(to_napi_error)
}
