pub mod contract;
pub mod installment;
pub mod ledger;

pub use contract::Loan;
pub use installment::Installment;
pub use ledger::{RepaymentEvent, RepaymentLedger};
