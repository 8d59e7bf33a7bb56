pub mod config;
pub mod decimal;
pub mod errors;
pub mod input;
pub mod report;
pub mod schedule;
pub mod types;

// re-export key types
pub use config::{InputParameters, InputParametersBuilder, OverpaymentSchema, PrintOptions};
pub use decimal::{Money, Percent};
pub use errors::{MortgageError, Result};
pub use input::InputDataRepository;
pub use schedule::{
    calculate, compute_schedule, summarize, AmortizationEngine, CalculationResult,
    DefaultSummaryService, Overpayment, Rate, RateAmounts, Summary, SummaryService,
};
pub use types::{OverpaymentReduceWay, RateType};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
