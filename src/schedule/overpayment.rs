use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use tracing::debug;

use crate::config::{InputParameters, OverpaymentSchema};
use crate::decimal::{Money, Percent};
use crate::errors::{MortgageError, Result};
use crate::types::OverpaymentReduceWay;

use super::rate::Overpayment;

/// per-month payment kept constant when an overpayment shortens the term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentTarget {
    /// whole installment of an equal-installment loan
    Installment(Money),
    /// capital portion of a decreasing-installment loan
    Capital(Money),
}

/// overpayment handler, built once per schedule
pub struct OverpaymentHandler<'a> {
    schema: &'a OverpaymentSchema,
    start_month: u32,
    provision_percent: Percent,
    provision_months: u32,
    reduce_way: OverpaymentReduceWay,
}

impl<'a> OverpaymentHandler<'a> {
    pub fn new(params: &'a InputParameters) -> Self {
        Self {
            schema: &params.overpayment_schema,
            start_month: params.overpayment_start_month,
            provision_percent: params.overpayment_provision_percent,
            provision_months: params.overpayment_provision_months,
            reduce_way: params.overpayment_reduce_way,
        }
    }

    pub fn reduce_way(&self) -> OverpaymentReduceWay {
        self.reduce_way
    }

    /// amount scheduled for a month, zero before the start month
    pub fn scheduled(&self, month: u32) -> Money {
        match self.schema.get(&month) {
            Some(&amount) if month >= self.start_month => amount,
            Some(&amount) => {
                debug!(month, %amount, start_month = self.start_month, "overpayment before start month ignored");
                Money::ZERO
            }
            None => Money::ZERO,
        }
    }

    /// fee for an overpayment made in the given month
    pub fn provision(&self, month: u32, amount: Money) -> Money {
        if !amount.is_positive() || month > self.provision_months {
            return Money::ZERO;
        }
        amount.percentage(self.provision_percent)
    }

    /// overpayment for the month, limited to the debt left after the installment
    pub fn overpayment_for(&self, month: u32, available_capital: Money) -> Overpayment {
        let scheduled = self.scheduled(month);
        let amount = scheduled.min(available_capital.max(Money::ZERO));
        if !amount.is_positive() {
            return Overpayment::NONE;
        }

        if amount < scheduled {
            debug!(month, %scheduled, %amount, "overpayment clamped to remaining capital");
        }

        Overpayment {
            amount,
            provision_amount: self.provision(month, amount),
        }
    }

    /// months left after an overpayment, per the configured reduce way
    pub fn remaining_months_after(
        &self,
        target: PaymentTarget,
        capital_after: Money,
        monthly_rate: Decimal,
        remaining_after: u32,
    ) -> Result<u32> {
        if remaining_after == 0 || !capital_after.is_positive() {
            return Ok(remaining_after);
        }

        match self.reduce_way {
            OverpaymentReduceWay::ReduceInstallment => Ok(remaining_after),
            OverpaymentReduceWay::ReducePeriod => {
                let months = match target {
                    PaymentTarget::Installment(installment) => {
                        calculate_term_for_installment(capital_after, monthly_rate, installment)?
                    }
                    PaymentTarget::Capital(capital_part) => {
                        calculate_term_for_capital_part(capital_after, capital_part)?
                    }
                };
                Ok(months.map_or(remaining_after, |m| m.clamp(1, remaining_after)))
            }
        }
    }
}

/// annuity installment: C * r * q^n / (q^n - 1), q = 1 + r
pub fn calculate_annuity(capital: Money, monthly_rate: Decimal, months: u32) -> Result<Money> {
    if months == 0 {
        return Ok(capital);
    }

    if monthly_rate.is_zero() {
        return Ok(capital / Decimal::from(months));
    }

    let compound = (Decimal::ONE + monthly_rate)
        .checked_powu(months as u64)
        .ok_or(MortgageError::ArithmeticOverflow { iterations: months })?;

    let numerator = capital.as_decimal() * monthly_rate * compound;
    let denominator = compound - Decimal::ONE;

    Ok(Money::from_decimal(numerator / denominator))
}

/// months needed to repay capital with a fixed installment, None if it never amortizes
pub fn calculate_term_for_installment(
    capital: Money,
    monthly_rate: Decimal,
    installment: Money,
) -> Result<Option<u32>> {
    if !installment.is_positive() || !capital.is_positive() {
        return Ok(None);
    }

    if monthly_rate.is_zero() {
        return ceil_months(capital.as_decimal() / installment.as_decimal()).map(Some);
    }

    let interest_share = capital.as_decimal() * monthly_rate / installment.as_decimal();
    if interest_share >= Decimal::ONE {
        return Ok(None);
    }

    // n = -ln(1 - C*r/A) / ln(1 + r)
    let numerator = (Decimal::ONE - interest_share)
        .checked_ln()
        .ok_or_else(|| calculation_error("logarithm of installment ratio"))?;
    let denominator = (Decimal::ONE + monthly_rate)
        .checked_ln()
        .ok_or_else(|| calculation_error("logarithm of monthly rate"))?;

    ceil_months(-numerator / denominator).map(Some)
}

/// months needed to repay capital with a fixed straight-line capital part
pub fn calculate_term_for_capital_part(capital: Money, capital_part: Money) -> Result<Option<u32>> {
    if !capital_part.is_positive() || !capital.is_positive() {
        return Ok(None);
    }
    ceil_months(capital.as_decimal() / capital_part.as_decimal()).map(Some)
}

fn ceil_months(months: Decimal) -> Result<u32> {
    months
        .ceil()
        .to_u32()
        .ok_or_else(|| calculation_error("term does not fit in a month count"))
}

fn calculation_error(what: &str) -> MortgageError {
    MortgageError::CalculationError {
        message: format!("failed to compute {what}"),
    }
}
