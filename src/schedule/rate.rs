use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;

/// overpayment made in a single month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Overpayment {
    pub amount: Money,
    /// fee charged on the overpayment inside the provision window
    pub provision_amount: Money,
}

impl Overpayment {
    pub const NONE: Overpayment = Overpayment {
        amount: Money::ZERO,
        provision_amount: Money::ZERO,
    };

    pub fn is_applied(&self) -> bool {
        self.amount.is_positive()
    }
}

/// breakdown of one monthly payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateAmounts {
    pub capital_amount: Money,
    pub interest_amount: Money,
    /// capital plus interest, overpayment excluded
    pub installment_amount: Money,
    pub overpayment: Overpayment,
}

impl RateAmounts {
    pub fn new(capital_amount: Money, interest_amount: Money, overpayment: Overpayment) -> Self {
        Self {
            capital_amount,
            interest_amount,
            installment_amount: capital_amount + interest_amount,
            overpayment,
        }
    }

    /// principal retired this month, scheduled plus overpaid
    pub fn total_capital(&self) -> Money {
        self.capital_amount + self.overpayment.amount
    }
}

/// one scheduled month of the mortgage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    pub number: u32,
    pub date: NaiveDate,
    pub remaining_capital_before: Money,
    pub remaining_capital_after: Money,
    /// scheduled months left after this one
    pub remaining_months: u32,
    pub rate_amounts: RateAmounts,
}

impl Rate {
    pub fn is_final(&self) -> bool {
        self.remaining_capital_after.is_zero()
    }
}
