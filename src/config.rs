use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Percent};
use crate::errors::{MortgageError, Result};
use crate::types::{OverpaymentReduceWay, RateType};

/// month index (1-based) to one-time extra principal paid in that month
pub type OverpaymentSchema = BTreeMap<u32, Money>;

/// reporting flags, never read by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintOptions {
    pub print_schedule: bool,
    /// print every n-th rate, 0 and 1 both print every rate
    pub rate_number_to_print: u32,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            print_schedule: false,
            rate_number_to_print: 1,
        }
    }
}

/// validated loan configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputParameters {
    pub repayment_start_date: NaiveDate,
    pub wibor_percent: Percent,
    pub margin_percent: Percent,
    pub amount: Money,
    pub months_duration: u32,
    pub rate_type: RateType,
    pub overpayment_provision_percent: Percent,
    pub overpayment_provision_months: u32,
    pub overpayment_start_month: u32,
    pub overpayment_schema: OverpaymentSchema,
    pub overpayment_reduce_way: OverpaymentReduceWay,
    pub print_options: PrintOptions,
}

impl InputParameters {
    pub fn builder() -> InputParametersBuilder {
        InputParametersBuilder::new()
    }

    /// nominal annual rate, wibor plus margin
    pub fn annual_rate(&self) -> Percent {
        self.wibor_percent + self.margin_percent
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(MortgageError::invalid_parameter(format!(
                "amount must be positive, got {}",
                self.amount
            )));
        }

        if self.months_duration == 0 {
            return Err(MortgageError::invalid_parameter(
                "months duration must be positive",
            ));
        }

        if self.margin_percent.is_negative() {
            return Err(MortgageError::invalid_parameter(format!(
                "margin must not be negative, got {}",
                self.margin_percent
            )));
        }

        // wibor alone may go below zero, the nominal rate may not
        if self.annual_rate().is_negative() {
            return Err(MortgageError::invalid_parameter(format!(
                "annual rate must not be negative, got {}",
                self.annual_rate()
            )));
        }

        if self.overpayment_provision_percent.is_negative() {
            return Err(MortgageError::invalid_parameter(format!(
                "overpayment provision must not be negative, got {}",
                self.overpayment_provision_percent
            )));
        }

        for (&month, &amount) in &self.overpayment_schema {
            if month == 0 || month > self.months_duration {
                return Err(MortgageError::InvalidSchedule {
                    month,
                    months_duration: self.months_duration,
                });
            }
            if !amount.is_positive() {
                return Err(MortgageError::InvalidOverpaymentAmount { month, amount });
            }
        }

        Ok(())
    }

    pub fn with_amount(&self, amount: Money) -> Result<Self> {
        let mut updated = self.clone();
        updated.amount = amount;
        updated.validate()?;
        Ok(updated)
    }

    pub fn with_months_duration(&self, months_duration: u32) -> Result<Self> {
        let mut updated = self.clone();
        updated.months_duration = months_duration;
        updated.validate()?;
        Ok(updated)
    }

    pub fn with_rate_type(&self, rate_type: RateType) -> Self {
        let mut updated = self.clone();
        updated.rate_type = rate_type;
        updated
    }

    pub fn with_overpayment_reduce_way(&self, reduce_way: OverpaymentReduceWay) -> Self {
        let mut updated = self.clone();
        updated.overpayment_reduce_way = reduce_way;
        updated
    }

    pub fn with_overpayment_schema(&self, schema: OverpaymentSchema) -> Result<Self> {
        let mut updated = self.clone();
        updated.overpayment_schema = schema;
        updated.validate()?;
        Ok(updated)
    }

    pub fn with_print_options(&self, print_options: PrintOptions) -> Self {
        let mut updated = self.clone();
        updated.print_options = print_options;
        updated
    }
}

/// builder for input parameters
#[derive(Debug, Clone, Default)]
pub struct InputParametersBuilder {
    repayment_start_date: Option<NaiveDate>,
    wibor_percent: Option<Percent>,
    margin_percent: Option<Percent>,
    amount: Option<Money>,
    months_duration: Option<u32>,
    rate_type: Option<RateType>,
    overpayment_provision_percent: Option<Percent>,
    overpayment_provision_months: Option<u32>,
    overpayment_start_month: Option<u32>,
    overpayment_schema: OverpaymentSchema,
    overpayment_reduce_way: Option<OverpaymentReduceWay>,
    print_options: Option<PrintOptions>,
}

impl InputParametersBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repayment_start_date(mut self, date: NaiveDate) -> Self {
        self.repayment_start_date = Some(date);
        self
    }

    pub fn wibor_percent(mut self, percent: Percent) -> Self {
        self.wibor_percent = Some(percent);
        self
    }

    pub fn margin_percent(mut self, percent: Percent) -> Self {
        self.margin_percent = Some(percent);
        self
    }

    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn months_duration(mut self, months: u32) -> Self {
        self.months_duration = Some(months);
        self
    }

    pub fn rate_type(mut self, rate_type: RateType) -> Self {
        self.rate_type = Some(rate_type);
        self
    }

    pub fn overpayment_provision_percent(mut self, percent: Percent) -> Self {
        self.overpayment_provision_percent = Some(percent);
        self
    }

    pub fn overpayment_provision_months(mut self, months: u32) -> Self {
        self.overpayment_provision_months = Some(months);
        self
    }

    pub fn overpayment_start_month(mut self, month: u32) -> Self {
        self.overpayment_start_month = Some(month);
        self
    }

    /// add one schema entry, a repeated month replaces the earlier amount
    pub fn overpayment(mut self, month: u32, amount: Money) -> Self {
        self.overpayment_schema.insert(month, amount);
        self
    }

    pub fn overpayment_schema(mut self, schema: OverpaymentSchema) -> Self {
        self.overpayment_schema = schema;
        self
    }

    pub fn overpayment_reduce_way(mut self, reduce_way: OverpaymentReduceWay) -> Self {
        self.overpayment_reduce_way = Some(reduce_way);
        self
    }

    pub fn print_options(mut self, print_options: PrintOptions) -> Self {
        self.print_options = Some(print_options);
        self
    }

    pub fn build(self) -> Result<InputParameters> {
        let repayment_start_date = self
            .repayment_start_date
            .ok_or_else(|| MortgageError::invalid_parameter("repayment start date is required"))?;
        let amount = self
            .amount
            .ok_or_else(|| MortgageError::invalid_parameter("amount is required"))?;
        let months_duration = self
            .months_duration
            .ok_or_else(|| MortgageError::invalid_parameter("months duration is required"))?;

        let params = InputParameters {
            repayment_start_date,
            wibor_percent: self.wibor_percent.unwrap_or(Percent::ZERO),
            margin_percent: self.margin_percent.unwrap_or(Percent::ZERO),
            amount,
            months_duration,
            rate_type: self.rate_type.unwrap_or(RateType::Equal),
            overpayment_provision_percent: self
                .overpayment_provision_percent
                .unwrap_or(Percent::ZERO),
            overpayment_provision_months: self.overpayment_provision_months.unwrap_or(0),
            overpayment_start_month: self.overpayment_start_month.unwrap_or(1),
            overpayment_schema: self.overpayment_schema,
            overpayment_reduce_way: self
                .overpayment_reduce_way
                .unwrap_or(OverpaymentReduceWay::ReducePeriod),
            print_options: self.print_options.unwrap_or_default(),
        };

        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn builder() -> InputParametersBuilder {
        InputParameters::builder()
            .repayment_start_date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
            .wibor_percent(Percent::new(dec!(1.78)))
            .margin_percent(Percent::new(dec!(1.9)))
            .amount(Money::from_major(300_000))
            .months_duration(360)
    }

    #[test]
    fn test_builder_defaults() {
        let params = builder().build().unwrap();

        assert_eq!(params.rate_type, RateType::Equal);
        assert_eq!(params.overpayment_reduce_way, OverpaymentReduceWay::ReducePeriod);
        assert_eq!(params.overpayment_start_month, 1);
        assert!(params.overpayment_schema.is_empty());
        assert_eq!(params.print_options, PrintOptions::default());
        assert_eq!(params.annual_rate(), Percent::new(dec!(3.68)));
    }

    #[test]
    fn test_missing_required_field() {
        let result = InputParameters::builder()
            .amount(Money::from_major(1_000))
            .months_duration(12)
            .build();

        assert!(matches!(result, Err(MortgageError::InvalidParameter { .. })));
    }

    #[test]
    fn test_non_positive_amount_and_duration() {
        let zero_amount = builder().amount(Money::ZERO).build();
        assert!(matches!(zero_amount, Err(MortgageError::InvalidParameter { .. })));

        let zero_months = builder().months_duration(0).build();
        assert!(matches!(zero_months, Err(MortgageError::InvalidParameter { .. })));
    }

    #[test]
    fn test_negative_percents() {
        let negative_margin = builder().margin_percent(Percent::new(dec!(-0.5))).build();
        assert!(negative_margin.is_err());

        let negative_provision = builder()
            .overpayment_provision_percent(Percent::new(dec!(-1)))
            .build();
        assert!(negative_provision.is_err());

        // negative wibor is fine as long as the nominal rate stays non-negative
        let negative_wibor = builder().wibor_percent(Percent::new(dec!(-0.2))).build();
        assert!(negative_wibor.is_ok());

        let negative_total = builder().wibor_percent(Percent::new(dec!(-3))).build();
        assert!(negative_total.is_err());
    }

    #[test]
    fn test_schema_key_out_of_range() {
        let result = builder().overpayment(361, Money::from_major(1_000)).build();
        assert!(matches!(
            result,
            Err(MortgageError::InvalidSchedule { month: 361, months_duration: 360 })
        ));

        let result = builder().overpayment(0, Money::from_major(1_000)).build();
        assert!(matches!(result, Err(MortgageError::InvalidSchedule { month: 0, .. })));
    }

    #[test]
    fn test_schema_amount_must_be_positive() {
        let result = builder().overpayment(5, Money::ZERO).build();
        assert!(matches!(
            result,
            Err(MortgageError::InvalidOverpaymentAmount { month: 5, .. })
        ));
    }

    #[test]
    fn test_with_overrides_revalidate() {
        let params = builder().overpayment(300, Money::from_major(5_000)).build().unwrap();

        let shorter = params.with_months_duration(240);
        assert!(matches!(shorter, Err(MortgageError::InvalidSchedule { month: 300, .. })));

        let updated = params
            .with_amount(Money::from_str_exact("296192.11").unwrap())
            .unwrap()
            .with_rate_type(RateType::Decreasing);
        assert_eq!(updated.amount.to_string(), "296192.11");
        assert_eq!(updated.rate_type, RateType::Decreasing);
        assert_eq!(params.rate_type, RateType::Equal);
    }

    #[test]
    fn test_json_round_trip() {
        let params = builder().overpayment(5, Money::from_major(12_000)).build().unwrap();
        let json = serde_json::to_string(&params).unwrap();
        let restored: InputParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(params, restored);
    }
}
