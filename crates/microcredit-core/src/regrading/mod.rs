pub mod late_fees;
pub mod max_amount;
pub mod options;

pub use late_fees::{late_and_anticipated_fees, LateRepaymentScheduler, PassthroughScheduler};
pub use max_amount::{
    calculate_maximum_amount_to_regrading_loan, RegradingAmountStrategy, RegradingOutput,
    RegradingPath, RegradingRequest,
};
pub use options::{CreditContractOptions, LoanType};
