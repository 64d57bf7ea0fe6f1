use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Amortization profile of a credit contract. Only
/// `DecliningFixedPrincipalWithRealInterest` changes how a regrading amount
/// is computed; every other profile settles through the standard path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanType {
    #[default]
    Flat,
    DecliningFixedPrincipal,
    DecliningFixedInstallments,
    DecliningFixedPrincipalWithRealInterest,
}

/// Regrading request parameters supplied by the operator. The cancel flags
/// let an operator substitute manual figures for the computed interest and
/// fee components; the manual amounts are ignored unless the matching flag is
/// set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreditContractOptions {
    pub loans_type: LoanType,
    #[serde(default)]
    pub cancel_interests: bool,
    #[serde(default)]
    pub manual_interests_amount: Money,
    #[serde(default)]
    pub cancel_fees: bool,
    #[serde(default)]
    pub manual_fees_amount: Money,
    #[serde(default)]
    pub manual_commission_amount: Money,
}
