use chrono::Months;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::InputParameters;
use crate::decimal::Money;
use crate::errors::{MortgageError, Result};
use crate::types::RateType;

use super::overpayment::{calculate_annuity, OverpaymentHandler, PaymentTarget};
use super::rate::{Rate, RateAmounts};

/// extra months allowed past the scheduled duration before giving up
pub const SAFETY_MARGIN_MONTHS: u32 = 12;

/// debt left between two months
#[derive(Debug, Clone, Copy)]
struct LoanState {
    capital: Money,
    remaining_months: u32,
}

/// amortization engine, stateless between runs
#[derive(Debug, Clone, Copy, Default)]
pub struct AmortizationEngine;

impl AmortizationEngine {
    pub fn new() -> Self {
        Self
    }

    /// calculate the full month-by-month schedule
    pub fn compute_schedule(&self, params: &InputParameters) -> Result<Vec<Rate>> {
        params.validate()?;

        let monthly_rate = params.annual_rate().monthly_fraction();
        let overpayments = OverpaymentHandler::new(params);
        let max_months = params.months_duration + SAFETY_MARGIN_MONTHS;

        let mut state = LoanState {
            capital: params.amount,
            remaining_months: params.months_duration,
        };
        let mut rates = Vec::with_capacity(params.months_duration as usize);
        let mut number = 0;

        while state.capital.is_positive() {
            number += 1;
            if number > max_months {
                return Err(MortgageError::ArithmeticOverflow {
                    iterations: max_months,
                });
            }

            let rate = self.calculate_rate(number, &mut state, params, monthly_rate, &overpayments)?;
            rates.push(rate);
        }

        info!(
            rates = rates.len(),
            months_duration = params.months_duration,
            rate_type = %params.rate_type,
            reduce_way = %params.overpayment_reduce_way,
            "schedule computed"
        );

        Ok(rates)
    }

    fn calculate_rate(
        &self,
        number: u32,
        state: &mut LoanState,
        params: &InputParameters,
        monthly_rate: Decimal,
        overpayments: &OverpaymentHandler<'_>,
    ) -> Result<Rate> {
        let capital_before = state.capital;
        let remaining_months = state.remaining_months.max(1);

        let interest_amount = Money::from_decimal(capital_before.as_decimal() * monthly_rate);

        let (nominal_capital, target) = match params.rate_type {
            RateType::Equal => {
                let installment = calculate_annuity(capital_before, monthly_rate, remaining_months)?;
                (
                    (installment - interest_amount).max(Money::ZERO),
                    PaymentTarget::Installment(installment),
                )
            }
            RateType::Decreasing => {
                let capital_part = capital_before / Decimal::from(remaining_months);
                (capital_part, PaymentTarget::Capital(capital_part))
            }
        };

        // last scheduled month takes whatever rounding left behind
        let capital_amount = if remaining_months == 1 || nominal_capital > capital_before {
            capital_before
        } else {
            nominal_capital
        };

        let overpayment = overpayments.overpayment_for(number, capital_before - capital_amount);
        let capital_after = capital_before - capital_amount - overpayment.amount;

        let mut remaining_after = remaining_months - 1;
        if capital_after.is_zero() {
            remaining_after = 0;
        } else if overpayment.is_applied() {
            remaining_after = overpayments.remaining_months_after(
                target,
                capital_after,
                monthly_rate,
                remaining_after,
            )?;
            debug!(
                month = number,
                amount = %overpayment.amount,
                provision = %overpayment.provision_amount,
                remaining_months = remaining_after,
                "overpayment applied"
            );
        }

        let date = params
            .repayment_start_date
            .checked_add_months(Months::new(number - 1))
            .ok_or_else(|| MortgageError::CalculationError {
                message: format!("payment date out of range for rate {number}"),
            })?;

        state.capital = capital_after;
        state.remaining_months = remaining_after;

        Ok(Rate {
            number,
            date,
            remaining_capital_before: capital_before,
            remaining_capital_after: capital_after,
            remaining_months: remaining_after,
            rate_amounts: RateAmounts::new(capital_amount, interest_amount, overpayment),
        })
    }
}

/// calculate the schedule with a default engine
pub fn compute_schedule(params: &InputParameters) -> Result<Vec<Rate>> {
    AmortizationEngine::new().compute_schedule(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Percent;
    use crate::types::OverpaymentReduceWay;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn params(rate_type: RateType) -> crate::config::InputParametersBuilder {
        InputParameters::builder()
            .repayment_start_date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
            .wibor_percent(Percent::new(dec!(10)))
            .margin_percent(Percent::new(dec!(2)))
            .amount(Money::from_major(100_000))
            .months_duration(12)
            .rate_type(rate_type)
    }

    fn total_capital(rates: &[Rate]) -> Money {
        rates.iter().map(|r| r.rate_amounts.total_capital()).sum()
    }

    #[test]
    fn test_equal_installments_schedule() {
        let params = params(RateType::Equal).build().unwrap();
        let rates = compute_schedule(&params).unwrap();

        assert_eq!(rates.len(), 12);

        let first = &rates[0];
        assert_eq!(first.number, 1);
        assert_eq!(first.remaining_capital_before, params.amount);
        assert_eq!(first.rate_amounts.interest_amount, Money::from_major(1_000));
        assert_eq!(first.rate_amounts.installment_amount.to_string(), "8884.88");
        assert_eq!(first.remaining_months, 11);

        for rate in &rates {
            let diff = rate.rate_amounts.installment_amount - first.rate_amounts.installment_amount;
            assert!(diff.abs() <= Money::from_decimal(dec!(0.05)));
        }

        let last = rates.last().unwrap();
        assert!(last.is_final());
        assert_eq!(last.remaining_months, 0);
        assert_eq!(total_capital(&rates), params.amount);
    }

    #[test]
    fn test_decreasing_schedule() {
        let params = params(RateType::Decreasing).build().unwrap();
        let rates = compute_schedule(&params).unwrap();

        assert_eq!(rates.len(), 12);
        assert_eq!(rates[0].rate_amounts.capital_amount.to_string(), "8333.33");
        assert_eq!(rates[0].rate_amounts.installment_amount.to_string(), "9333.33");

        for pair in rates.windows(2) {
            assert!(pair[1].rate_amounts.interest_amount < pair[0].rate_amounts.interest_amount);
            assert!(pair[1].rate_amounts.installment_amount <= pair[0].rate_amounts.installment_amount);
        }

        assert_eq!(total_capital(&rates), params.amount);
    }

    #[test]
    fn test_dates_follow_calendar_months() {
        let params = params(RateType::Equal).build().unwrap();
        let rates = compute_schedule(&params).unwrap();

        assert_eq!(rates[0].date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(rates[1].date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(rates[11].date, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_zero_interest_rate() {
        let params = params(RateType::Equal)
            .wibor_percent(Percent::ZERO)
            .margin_percent(Percent::ZERO)
            .amount(Money::from_major(1_200))
            .build()
            .unwrap();
        let rates = compute_schedule(&params).unwrap();

        assert_eq!(rates.len(), 12);
        for rate in &rates {
            assert_eq!(rate.rate_amounts.capital_amount, Money::from_major(100));
            assert_eq!(rate.rate_amounts.interest_amount, Money::ZERO);
        }
    }

    #[test]
    fn test_single_month_loan() {
        let params = params(RateType::Decreasing).months_duration(1).build().unwrap();
        let rates = compute_schedule(&params).unwrap();

        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].rate_amounts.capital_amount, params.amount);
        assert_eq!(rates[0].rate_amounts.installment_amount, Money::from_major(101_000));
    }

    #[test]
    fn test_overpayment_clearing_the_debt() {
        let params = params(RateType::Decreasing)
            .overpayment(3, Money::from_major(500_000))
            .overpayment(6, Money::from_major(1_000))
            .build()
            .unwrap();
        let rates = compute_schedule(&params).unwrap();

        assert_eq!(rates.len(), 3);
        let last = &rates[2];
        assert!(last.is_final());
        assert_eq!(
            last.rate_amounts.overpayment.amount,
            last.remaining_capital_before - last.rate_amounts.capital_amount
        );
        assert_eq!(total_capital(&rates), params.amount);
    }

    #[test]
    fn test_reduce_period_shortens_schedule() {
        let params = params(RateType::Equal)
            .months_duration(24)
            .overpayment(6, Money::from_major(20_000))
            .overpayment_reduce_way(OverpaymentReduceWay::ReducePeriod)
            .build()
            .unwrap();
        let rates = compute_schedule(&params).unwrap();

        assert!(rates.len() < 24);
        assert!(rates[5].remaining_months < 18);
        assert_eq!(total_capital(&rates), params.amount);
    }

    #[test]
    fn test_reduce_installment_keeps_schedule_length() {
        let params = params(RateType::Equal)
            .months_duration(24)
            .overpayment(6, Money::from_major(20_000))
            .overpayment_reduce_way(OverpaymentReduceWay::ReduceInstallment)
            .build()
            .unwrap();
        let rates = compute_schedule(&params).unwrap();

        assert_eq!(rates.len(), 24);
        assert!(
            rates[6].rate_amounts.installment_amount < rates[4].rate_amounts.installment_amount
        );
        assert_eq!(total_capital(&rates), params.amount);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let mut params = params(RateType::Equal).build().unwrap();
        params.overpayment_schema.insert(13, Money::from_major(1_000));

        let result = compute_schedule(&params);
        assert!(matches!(result, Err(MortgageError::InvalidSchedule { month: 13, .. })));
    }
}
