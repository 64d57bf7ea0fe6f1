use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::MicrocreditError;
use crate::types::Money;
use crate::MicrocreditResult;

/// A principal repayment recorded against a loan. Soft-deleted events stay in
/// the log for audit but are excluded from every balance reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentEvent {
    pub date: NaiveDate,
    pub principal: Money,
    #[serde(default)]
    pub deleted: bool,
}

/// Ordered, append-only log of repayment events. Entries are never removed or
/// reordered; deletion is a flag flip. The backing storage is private so the
/// append-only contract is enforced by the API, not by convention.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepaymentLedger {
    entries: Vec<RepaymentEvent>,
}

impl RepaymentLedger {
    pub fn new() -> Self {
        RepaymentLedger::default()
    }

    /// Append a repayment event.
    pub fn record(&mut self, date: NaiveDate, principal: Money) {
        self.entries.push(RepaymentEvent {
            date,
            principal,
            deleted: false,
        });
    }

    /// Soft-delete the event at `index`.
    pub fn mark_deleted(&mut self, index: usize) -> MicrocreditResult<()> {
        match self.entries.get_mut(index) {
            Some(event) => {
                event.deleted = true;
                Ok(())
            }
            None => Err(MicrocreditError::InvalidInput {
                field: "index".into(),
                reason: format!("no repayment event at position {index}"),
            }),
        }
    }

    pub fn entries(&self) -> &[RepaymentEvent] {
        &self.entries
    }

    /// Non-deleted events, in recording order.
    pub fn active(&self) -> impl Iterator<Item = &RepaymentEvent> {
        self.entries.iter().filter(|e| !e.deleted)
    }

    pub fn principal_repaid(&self) -> Money {
        self.active().map(|e| e.principal).sum()
    }

    pub fn principal_repaid_on_or_before(&self, date: NaiveDate) -> Money {
        self.active()
            .filter(|e| e.date <= date)
            .map(|e| e.principal)
            .sum()
    }

    /// Latest date among events that actually reduced the balance.
    pub fn last_repayment_date(&self) -> Option<NaiveDate> {
        self.active()
            .filter(|e| e.principal > Decimal::ZERO)
            .map(|e| e.date)
            .max()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
