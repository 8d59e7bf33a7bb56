use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::MortgageError;

/// installment type of the mortgage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateType {
    /// constant installment from the annuity formula
    Equal,
    /// straight-line principal, installment shrinks with interest
    Decreasing,
}

/// effect of an overpayment on the rest of the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverpaymentReduceWay {
    /// keep the monthly payment, finish earlier
    ReducePeriod,
    /// keep the term, lower future installments
    ReduceInstallment,
}

impl RateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateType::Equal => "EQUAL",
            RateType::Decreasing => "DECREASING",
        }
    }
}

impl OverpaymentReduceWay {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverpaymentReduceWay::ReducePeriod => "REDUCE_PERIOD",
            OverpaymentReduceWay::ReduceInstallment => "REDUCE_INSTALLMENT",
        }
    }
}

impl fmt::Display for RateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OverpaymentReduceWay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RateType {
    type Err = MortgageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "EQUAL" => Ok(RateType::Equal),
            "DECREASING" => Ok(RateType::Decreasing),
            other => Err(MortgageError::invalid_parameter(format!(
                "unknown rate type: {other}"
            ))),
        }
    }
}

impl FromStr for OverpaymentReduceWay {
    type Err = MortgageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "REDUCE_PERIOD" => Ok(OverpaymentReduceWay::ReducePeriod),
            "REDUCE_INSTALLMENT" => Ok(OverpaymentReduceWay::ReduceInstallment),
            other => Err(MortgageError::invalid_parameter(format!(
                "unknown overpayment reduce way: {other}"
            ))),
        }
    }
}
