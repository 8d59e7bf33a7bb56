/// quick start - decreasing mortgage shortened by overpayments
use mortgage_calculator::chrono::NaiveDate;
use mortgage_calculator::report;
use mortgage_calculator::{calculate, InputParameters, Money, OverpaymentReduceWay, Percent, RateType};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let params = InputParameters::builder()
        .repayment_start_date(NaiveDate::from_ymd_opt(2020, 1, 1).ok_or("invalid date")?)
        .wibor_percent(Percent::new(dec!(1.78)))
        .margin_percent(Percent::new(dec!(1.9)))
        .amount(Money::from_str_exact("296192.11")?)
        .months_duration(360)
        .rate_type(RateType::Decreasing)
        .overpayment_provision_percent(Percent::new(dec!(3)))
        .overpayment_provision_months(36)
        .overpayment(5, Money::from_major(12_000))
        .overpayment(19, Money::from_major(10_000))
        .overpayment(28, Money::from_major(11_000))
        .overpayment(64, Money::from_major(16_000))
        .overpayment(78, Money::from_major(18_000))
        .overpayment_reduce_way(OverpaymentReduceWay::ReducePeriod)
        .build()?;

    let result = calculate(&params)?;

    println!("{}\n", report::format_input(&params));
    for rate in result.rates.iter().filter(|rate| rate.rate_amounts.overpayment.is_applied()) {
        println!("{}", report::format_rate(rate));
    }
    println!("\nrates: {}", result.rates.len());
    println!("{}", report::format_summary(&result.summary));

    Ok(())
}
