use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::MicrocreditError;
use crate::interest::days_between;
use crate::loan::installment::Installment;
use crate::loan::ledger::RepaymentLedger;
use crate::types::{Money, Rate};
use crate::MicrocreditResult;

/// A disbursed loan contract: schedule plus repayment history.
///
/// The engine treats a loan as read-mostly. The only mutations it performs
/// are the explicit installment-interest reschedule during a real-schedule
/// regrading, and free mutation of working copies created via [`deep_copy`].
///
/// [`deep_copy`]: Loan::deep_copy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub start_date: NaiveDate,
    pub amount: Money,
    /// Periodic nominal rate, expressed as a decimal (0.03 = 3% per period).
    pub interest_rate: Rate,
    #[serde(default)]
    pub use_cents: bool,
    pub installments: Vec<Installment>,
    #[serde(default)]
    pub events: RepaymentLedger,
}

impl Loan {
    /// Outstanding balance after every active repayment on the ledger.
    pub fn actual_olb(&self) -> Money {
        self.amount - self.events.principal_repaid()
    }

    /// Outstanding balance reconstructed as of `date`: the disbursed amount
    /// less every active repayment dated on or before it.
    pub fn actual_olb_as_of(&self, date: NaiveDate) -> Money {
        self.amount - self.events.principal_repaid_on_or_before(date)
    }

    /// Date of the latest balance-reducing repayment, falling back to the
    /// start date when nothing has been repaid. Seeds the payment cursor for
    /// day-count interest accrual.
    pub fn last_repayment_date(&self) -> NaiveDate {
        self.events.last_repayment_date().unwrap_or(self.start_date)
    }

    /// Interest still owed as of `date`: the unpaid scheduled interest of
    /// every installment due on or before `date`, plus a straight-line
    /// day-proration of the running period when `date` falls between two
    /// installment dates.
    pub fn remaining_interests(&self, date: NaiveDate) -> Money {
        let mut total = Decimal::ZERO;
        for (i, installment) in self.installments.iter().enumerate() {
            if installment.is_repaid() {
                continue;
            }
            if installment.expected_date <= date {
                total += installment.unpaid_interest();
                continue;
            }
            let period_start = if i == 0 {
                self.start_date
            } else {
                self.installments[i - 1].expected_date
            };
            if period_start < date {
                let period_days = days_between(period_start, installment.expected_date);
                if period_days > 0 {
                    let elapsed = days_between(period_start, date);
                    total += installment.unpaid_interest() * Decimal::from(elapsed)
                        / Decimal::from(period_days);
                }
            }
            break;
        }
        total
    }

    /// Deterministic deep copy: fresh installment storage and a fresh ledger,
    /// sharing no state with the original. Mutations on the copy are provably
    /// invisible to `self`.
    pub fn deep_copy(&self) -> Loan {
        Loan {
            start_date: self.start_date,
            amount: self.amount,
            interest_rate: self.interest_rate,
            use_cents: self.use_cents,
            installments: self.installments.to_vec(),
            events: self.events.clone(),
        }
    }

    /// Structural integrity checks the calculation entry points rely on.
    /// A loan failing these is a data-integrity defect in the caller.
    pub fn validate(&self) -> MicrocreditResult<()> {
        if self.installments.is_empty() {
            return Err(MicrocreditError::InsufficientData(
                "loan has no installments".into(),
            ));
        }
        for (i, installment) in self.installments.iter().enumerate() {
            if installment.number as usize != i + 1 {
                return Err(MicrocreditError::InvalidInput {
                    field: "installments".into(),
                    reason: format!(
                        "installment numbers must be contiguous from 1; position {} holds number {}",
                        i, installment.number
                    ),
                });
            }
            if i > 0 && installment.expected_date < self.installments[i - 1].expected_date {
                return Err(MicrocreditError::InvalidInput {
                    field: "installments".into(),
                    reason: format!(
                        "installments must be ordered by expected date; number {} is due before number {}",
                        installment.number,
                        self.installments[i - 1].number
                    ),
                });
            }
        }
        Ok(())
    }
}
