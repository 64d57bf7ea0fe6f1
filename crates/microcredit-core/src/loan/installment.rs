use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// One scheduled period of a loan: what is due and what has actually been
/// settled. `number` is the 1-based position in the schedule and is immutable
/// once the schedule exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub number: u32,
    pub expected_date: NaiveDate,
    pub capital_repayment: Money,
    pub interests_repayment: Money,
    #[serde(default)]
    pub fees_unpaid: Money,
    #[serde(default)]
    pub paid_capital: Money,
    #[serde(default)]
    pub paid_interests: Money,
}

impl Installment {
    /// A fresh, unpaid installment.
    pub fn new(
        number: u32,
        expected_date: NaiveDate,
        capital_repayment: Money,
        interests_repayment: Money,
    ) -> Self {
        Installment {
            number,
            expected_date,
            capital_repayment,
            interests_repayment,
            fees_unpaid: Decimal::ZERO,
            paid_capital: Decimal::ZERO,
            paid_interests: Decimal::ZERO,
        }
    }

    pub fn unpaid_capital(&self) -> Money {
        self.capital_repayment - self.paid_capital
    }

    pub fn unpaid_interest(&self) -> Money {
        self.interests_repayment - self.paid_interests
    }

    /// Fully settled on both components. Paid amounts above schedule are
    /// evidence of an irregular repayment, not an error, and still count as
    /// settled here.
    pub fn is_repaid(&self) -> bool {
        self.paid_capital >= self.capital_repayment && self.paid_interests >= self.interests_repayment
    }

    /// Permanently rewrite the scheduled interest of this installment.
    ///
    /// This is the forward-looking schedule correction applied when a
    /// settlement date falls inside the installment's period: the installment
    /// will from now on carry interest accrued only up to that date. A real
    /// mutation of the contract, deliberately not hidden behind a read.
    pub fn reschedule_interest(&mut self, new_amount: Money) {
        self.interests_repayment = new_amount;
    }

    /// Mark both components settled at their scheduled amounts. Used on
    /// working copies so a consumed installment cannot be counted twice.
    pub fn mark_settled(&mut self) {
        self.paid_capital = self.capital_repayment;
        self.paid_interests = self.interests_repayment;
    }
}
