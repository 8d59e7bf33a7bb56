use std::path::PathBuf;

use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug)]
pub enum MortgageError {
    #[error("invalid parameter: {message}")]
    InvalidParameter {
        message: String,
    },

    #[error("invalid overpayment schedule: month {month} outside of 1..={months_duration}")]
    InvalidSchedule {
        month: u32,
        months_duration: u32,
    },

    #[error("invalid overpayment amount in month {month}: {amount}")]
    InvalidOverpaymentAmount {
        month: u32,
        amount: Money,
    },

    #[error("schedule did not converge after {iterations} months")]
    ArithmeticOverflow {
        iterations: u32,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },

    #[error("missing input field: {key}")]
    MissingField {
        key: String,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MortgageError {
    pub(crate) fn invalid_parameter(message: impl Into<String>) -> Self {
        MortgageError::InvalidParameter {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MortgageError>;
