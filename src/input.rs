//! Loader for the flat `key;value` parameter file.
//!
//! ```text
//! repaymentStartDate;2020-01-01
//! wibor;1.78
//! overpaymentSchema;5:12000,19:10000
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{InputParameters, OverpaymentSchema, PrintOptions};
use crate::decimal::{Money, Percent};
use crate::errors::{MortgageError, Result};
use crate::types::{OverpaymentReduceWay, RateType};

pub const REPAYMENT_START_DATE: &str = "repaymentStartDate";
pub const WIBOR: &str = "wibor";
pub const MARGIN: &str = "margin";
pub const AMOUNT: &str = "amount";
pub const MONTHS_DURATION: &str = "monthsDuration";
pub const RATE_TYPE: &str = "rateType";
pub const OVERPAYMENT_PROVISION: &str = "overpaymentProvision";
pub const OVERPAYMENT_PROVISION_MONTHS: &str = "overpaymentProvisionMonths";
pub const OVERPAYMENT_START_MONTH: &str = "overpaymentStartMonth";
pub const OVERPAYMENT_SCHEMA: &str = "overpaymentSchema";
pub const OVERPAYMENT_REDUCE_WAY: &str = "overpaymentReduceWay";
pub const PRINT_SCHEDULE: &str = "mortgagePrintPayoffsSchedule";
pub const RATE_NUMBER_TO_PRINT: &str = "mortgageRateNumberToPrint";

/// reads input parameters from a file on disk
#[derive(Debug, Clone)]
pub struct InputDataRepository {
    path: PathBuf,
}

impl InputDataRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<InputParameters> {
        let content = fs::read_to_string(&self.path).map_err(|source| MortgageError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "input file loaded");
        parse_input(&content)
    }
}

/// parse the whole parameter file
pub fn parse_input(content: &str) -> Result<InputParameters> {
    let entries = parse_entries(content)?;
    let fields = Fields { entries: &entries };

    InputParameters::builder()
        .repayment_start_date(fields.parse(REPAYMENT_START_DATE, |v| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d").ok()
        })?)
        .wibor_percent(fields.parse(WIBOR, |v| Percent::from_str(v).ok())?)
        .margin_percent(fields.parse(MARGIN, |v| Percent::from_str(v).ok())?)
        .amount(fields.parse(AMOUNT, |v| Money::from_str(v).ok())?)
        .months_duration(fields.parse(MONTHS_DURATION, parse_whole_number)?)
        .rate_type(fields.parse_with(RATE_TYPE, RateType::from_str)?)
        .overpayment_provision_percent(fields.parse(OVERPAYMENT_PROVISION, |v| {
            Percent::from_str(v).ok()
        })?)
        .overpayment_provision_months(fields.parse(OVERPAYMENT_PROVISION_MONTHS, parse_whole_number)?)
        .overpayment_start_month(fields.parse(OVERPAYMENT_START_MONTH, parse_whole_number)?)
        .overpayment_schema(fields.parse_with(OVERPAYMENT_SCHEMA, parse_overpayment_schema)?)
        .overpayment_reduce_way(fields.parse_with(OVERPAYMENT_REDUCE_WAY, OverpaymentReduceWay::from_str)?)
        .print_options(PrintOptions {
            print_schedule: fields.parse(PRINT_SCHEDULE, |v| v.parse::<bool>().ok())?,
            rate_number_to_print: fields.parse(RATE_NUMBER_TO_PRINT, parse_whole_number)?,
        })
        .build()
}

/// parse `month:amount` pairs separated by commas, a later month wins
pub fn parse_overpayment_schema(value: &str) -> Result<OverpaymentSchema> {
    let mut schema = OverpaymentSchema::new();

    for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (month, amount) = entry.split_once(':').ok_or_else(|| {
            MortgageError::invalid_parameter(format!("malformed overpayment entry: {entry}"))
        })?;

        let month = parse_whole_number(month).ok_or_else(|| {
            MortgageError::invalid_parameter(format!("malformed overpayment month: {month}"))
        })?;
        let amount = Money::from_str(amount).map_err(|_| {
            MortgageError::invalid_parameter(format!("malformed overpayment amount: {amount}"))
        })?;

        schema.insert(month, amount);
    }

    Ok(schema)
}

fn parse_entries(content: &str) -> Result<HashMap<String, String>> {
    let mut entries = HashMap::new();

    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (key, value) = line.split_once(';').ok_or_else(|| {
            MortgageError::invalid_parameter(format!("malformed input line: {line}"))
        })?;
        // anything after a second separator is ignored
        let value = value.split(';').next().unwrap_or_default();

        let key = key.trim().to_string();
        if entries.insert(key.clone(), value.trim().to_string()).is_some() {
            return Err(MortgageError::invalid_parameter(format!(
                "configuration mismatch: {key} given more than once"
            )));
        }
    }

    Ok(entries)
}

/// decimal-looking integers such as "360" or "360.0" are accepted
fn parse_whole_number(value: &str) -> Option<u32> {
    let number = Decimal::from_str(value.trim()).ok()?;
    if !number.fract().is_zero() {
        return None;
    }
    number.to_u32()
}

struct Fields<'a> {
    entries: &'a HashMap<String, String>,
}

impl Fields<'_> {
    fn raw(&self, key: &str) -> Result<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| MortgageError::MissingField {
                key: key.to_string(),
            })
    }

    fn parse<T, F>(&self, key: &str, parse: F) -> Result<T>
    where
        F: FnOnce(&str) -> Option<T>,
    {
        let value = self.raw(key)?;
        parse(value).ok_or_else(|| {
            MortgageError::invalid_parameter(format!("malformed value for {key}: {value}"))
        })
    }

    fn parse_with<T, F>(&self, key: &str, parse: F) -> Result<T>
    where
        F: FnOnce(&str) -> Result<T>,
    {
        parse(self.raw(key)?)
    }
}
