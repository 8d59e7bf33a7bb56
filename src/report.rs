use serde::{Deserialize, Serialize};

use crate::config::{InputParameters, PrintOptions};
use crate::schedule::{Rate, Summary};

/// serializable view of one calculation
#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub parameters: InputParameters,
    pub summary: Summary,
    pub rates: Vec<Rate>,
}

impl ScheduleReport {
    /// rates are filtered with the parameters' print options
    pub fn new(parameters: &InputParameters, rates: &[Rate], summary: Summary) -> Self {
        Self {
            parameters: parameters.clone(),
            summary,
            rates: select_rates(rates, &parameters.print_options)
                .into_iter()
                .cloned()
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// rates to print, every n-th one when a schedule is requested
pub fn select_rates<'a>(rates: &'a [Rate], options: &PrintOptions) -> Vec<&'a Rate> {
    if !options.print_schedule {
        return Vec::new();
    }

    let step = options.rate_number_to_print.max(1);
    rates.iter().filter(|rate| rate.number % step == 0).collect()
}

pub fn format_input(params: &InputParameters) -> String {
    let mut lines = vec![
        format!("MORTGAGE AMOUNT: {}", params.amount),
        format!("MORTGAGE PERIOD: {} months", params.months_duration),
        format!("REPAYMENT START: {}", params.repayment_start_date),
        format!(
            "INTEREST: {} (WIBOR {} + MARGIN {})",
            params.annual_rate(),
            params.wibor_percent,
            params.margin_percent
        ),
        format!("RATE TYPE: {}", params.rate_type),
    ];

    if !params.overpayment_schema.is_empty() {
        lines.push(format!(
            "OVERPAYMENT PROVISION: {} up to month {}",
            params.overpayment_provision_percent, params.overpayment_provision_months
        ));
        lines.push(format!(
            "OVERPAYMENT: from month {}, {}",
            params.overpayment_start_month, params.overpayment_reduce_way
        ));
        let schema = params
            .overpayment_schema
            .iter()
            .map(|(month, amount)| format!("{month}: {amount}"))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("OVERPAYMENT SCHEMA: {schema}"));
    }

    lines.join("\n")
}

pub fn format_rate(rate: &Rate) -> String {
    let amounts = &rate.rate_amounts;
    format!(
        "{:>4} | {} | INSTALLMENT {:>10} | INTEREST {:>9} | CAPITAL {:>10} | OVERPAYMENT {:>10} | REMAINING {:>11} | MONTHS LEFT {:>3}",
        rate.number,
        rate.date,
        amounts.installment_amount.to_string(),
        amounts.interest_amount.to_string(),
        amounts.capital_amount.to_string(),
        amounts.overpayment.amount.to_string(),
        rate.remaining_capital_after.to_string(),
        rate.remaining_months,
    )
}

pub fn format_summary(summary: &Summary) -> String {
    [
        format!("INTEREST SUM: {}", summary.interest_sum),
        format!("OVERPAYMENT PROVISION SUM: {}", summary.overpayment_provision_sum),
        format!("TOTAL LOST: {}", summary.total_lost_sum),
        format!("TOTAL CAPITAL: {}", summary.total_capital_sum),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Money, Percent};
    use crate::schedule::calculate;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn params(print_schedule: bool, step: u32) -> InputParameters {
        InputParameters::builder()
            .repayment_start_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .wibor_percent(Percent::new(dec!(5.85)))
            .margin_percent(Percent::new(dec!(2)))
            .amount(Money::from_major(120_000))
            .months_duration(24)
            .overpayment(3, Money::from_major(5_000))
            .print_options(PrintOptions {
                print_schedule,
                rate_number_to_print: step,
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_select_rates() {
        let params = params(true, 6);
        let result = calculate(&params).unwrap();

        let numbers: Vec<u32> = select_rates(&result.rates, &params.print_options)
            .iter()
            .map(|rate| rate.number)
            .collect();
        assert_eq!(numbers.first(), Some(&6));
        assert!(numbers.iter().all(|n| n % 6 == 0));

        let every = PrintOptions { print_schedule: true, rate_number_to_print: 0 };
        assert_eq!(select_rates(&result.rates, &every).len(), result.rates.len());

        let none = PrintOptions { print_schedule: false, rate_number_to_print: 1 };
        assert!(select_rates(&result.rates, &none).is_empty());
    }

    #[test]
    fn test_text_formatting() {
        let params = params(false, 1);
        let result = calculate(&params).unwrap();

        let input = format_input(&params);
        assert!(input.contains("MORTGAGE AMOUNT: 120000.00"));
        assert!(input.contains("INTEREST: 7.85%"));
        assert!(input.contains("OVERPAYMENT SCHEMA: 3: 5000.00"));

        let line = format_rate(&result.rates[0]);
        assert!(line.starts_with("   1 | 2024-01-01"));

        let summary = format_summary(&result.summary);
        assert!(summary.contains("TOTAL CAPITAL: 120000.00"));
    }

    #[test]
    fn test_json_report() {
        let params = params(true, 12);
        let result = calculate(&params).unwrap();

        let report = ScheduleReport::new(&params, &result.rates, result.summary);
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["summary"]["total_capital_sum"], "120000.00");
        assert_eq!(value["parameters"]["rate_type"], "EQUAL");
        assert_eq!(value["rates"][0]["number"], 12);
    }
}
