use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::loan::Loan;
use crate::regrading::options::CreditContractOptions;
use crate::settings::{ApplicationSettings, NonWorkingDates, User};
use crate::types::Money;
use crate::MicrocreditResult;

/// The late-repayment scheduling algorithm, consumed as a collaborator.
///
/// Implementations rewrite the given loan's installments in place so the
/// schedule reflects late-fee adjustments up to `date`. This engine never
/// owns that algorithm; it only hands working copies to it.
pub trait LateRepaymentScheduler {
    fn calculate_new_installments_with_late_fees(
        &self,
        loan: &mut Loan,
        options: &CreditContractOptions,
        user: &User,
        settings: &ApplicationSettings,
        non_working_dates: &NonWorkingDates,
        date: NaiveDate,
    ) -> MicrocreditResult<()>;
}

/// Scheduler that leaves the installment list untouched. Suitable when
/// penalties are already reflected on the installments' `fees_unpaid`, and as
/// the default for tooling; deployments plug their own implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughScheduler;

impl LateRepaymentScheduler for PassthroughScheduler {
    fn calculate_new_installments_with_late_fees(
        &self,
        _loan: &mut Loan,
        _options: &CreditContractOptions,
        _user: &User,
        _settings: &ApplicationSettings,
        _non_working_dates: &NonWorkingDates,
        _date: NaiveDate,
    ) -> MicrocreditResult<()> {
        Ok(())
    }
}

/// Late and anticipated fees that would apply as of `date`.
///
/// Works on a deep copy of the loan: the scheduler recalculates the copy's
/// installments, then unpaid fees are summed across installments due on or
/// before `date`. Each consumed installment is marked settled on the copy so
/// a repeated query against the same copy could not double count; the copy is
/// dropped on return and the caller's loan is never touched.
pub fn late_and_anticipated_fees(
    loan: &Loan,
    options: &CreditContractOptions,
    user: &User,
    settings: &ApplicationSettings,
    non_working_dates: &NonWorkingDates,
    scheduler: &dyn LateRepaymentScheduler,
    date: NaiveDate,
) -> MicrocreditResult<Money> {
    let mut working = loan.deep_copy();
    scheduler.calculate_new_installments_with_late_fees(
        &mut working,
        options,
        user,
        settings,
        non_working_dates,
        date,
    )?;

    let mut fees = Decimal::ZERO;
    for installment in working.installments.iter_mut() {
        if !installment.is_repaid() && installment.expected_date <= date {
            fees += installment.fees_unpaid;
            installment.mark_settled();
        }
    }
    Ok(fees)
}
