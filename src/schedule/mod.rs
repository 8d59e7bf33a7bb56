pub mod amortization;
pub mod overpayment;
pub mod rate;
pub mod summary;

pub use amortization::{compute_schedule, AmortizationEngine, SAFETY_MARGIN_MONTHS};
pub use overpayment::{
    calculate_annuity, calculate_term_for_capital_part, calculate_term_for_installment,
    OverpaymentHandler, PaymentTarget,
};
pub use rate::{Overpayment, Rate, RateAmounts};
pub use summary::{summarize, DefaultSummaryService, Summary, SummaryService};

use crate::config::InputParameters;
use crate::errors::Result;

/// schedule together with its summary
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult {
    pub rates: Vec<Rate>,
    pub summary: Summary,
}

/// compute the schedule and fold it into a summary
pub fn calculate(params: &InputParameters) -> Result<CalculationResult> {
    calculate_with(&AmortizationEngine::new(), &DefaultSummaryService, params)
}

pub fn calculate_with<S: SummaryService>(
    engine: &AmortizationEngine,
    summary_service: &S,
    params: &InputParameters,
) -> Result<CalculationResult> {
    let rates = engine.compute_schedule(params)?;
    let summary = summary_service.calculate_summary(&rates);
    Ok(CalculationResult { rates, summary })
}
