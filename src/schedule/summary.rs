use serde::{Deserialize, Serialize};

use crate::decimal::Money;

use super::rate::Rate;

/// totals over a whole schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub interest_sum: Money,
    pub overpayment_provision_sum: Money,
    /// interest plus provisions
    pub total_lost_sum: Money,
    /// scheduled capital plus overpayments
    pub total_capital_sum: Money,
}

impl Summary {
    /// true when the schedule repaid exactly the borrowed amount
    pub fn total_capital_matches(&self, amount: Money) -> bool {
        self.total_capital_sum == amount
    }
}

/// trait for schedule aggregation
pub trait SummaryService {
    fn calculate_summary(&self, rates: &[Rate]) -> Summary;
}

/// sums every record, rounding already happened per record
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSummaryService;

impl SummaryService for DefaultSummaryService {
    fn calculate_summary(&self, rates: &[Rate]) -> Summary {
        summarize(rates)
    }
}

pub fn summarize(rates: &[Rate]) -> Summary {
    let interest_sum = sum_by(rates, |rate| rate.rate_amounts.interest_amount);
    let overpayment_provision_sum = sum_by(rates, |rate| rate.rate_amounts.overpayment.provision_amount);
    let total_capital_sum = sum_by(rates, |rate| rate.rate_amounts.total_capital());

    Summary {
        interest_sum,
        overpayment_provision_sum,
        total_lost_sum: interest_sum + overpayment_provision_sum,
        total_capital_sum,
    }
}

fn sum_by<F>(rates: &[Rate], amount: F) -> Money
where
    F: Fn(&Rate) -> Money,
{
    rates.iter().map(amount).sum()
}
