use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use std::str::FromStr;

/// number of decimal places kept for currency amounts
pub const MONEY_SCALE: u32 = 2;

fn round_money(d: Decimal) -> Decimal {
    let mut rounded = d.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Money type with 2 decimal places, rounded half-to-even
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::from_parts(0, 0, 0, false, MONEY_SCALE));
    pub const ONE_CENT: Money = Money(Decimal::from_parts(1, 0, 0, false, 2));

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(round_money(d))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(round_money(Decimal::from_str(s.trim())?)))
    }

    /// create from integer amount (zloty, euros, etc)
    pub fn from_major(amount: i64) -> Self {
        Money(round_money(Decimal::from(amount)))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// calculate percentage (e.g., 3% of 12000)
    pub fn percentage(&self, percent: Percent) -> Self {
        Money(round_money(self.0 * percent.as_fraction()))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i32> for Money {
    fn from(i: i32) -> Self {
        Money::from_major(i as i64)
    }
}

impl From<u32> for Money {
    fn from(i: u32) -> Self {
        Money::from_major(i as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(round_money(self.0 + other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 = round_money(self.0 + other.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(round_money(self.0 - other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 = round_money(self.0 - other.0);
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money(round_money(self.0 * other))
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, other: Decimal) -> Money {
        Money(round_money(self.0 / other))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + *x)
    }
}

/// percentage value for interest components and fees (7.12 means 7.12%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Percent(Decimal);

impl Percent {
    pub const ZERO: Percent = Percent(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Percent(value)
    }

    /// create from string, e.g. "1.52"
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Percent(Decimal::from_str(s.trim())?))
    }

    /// raw percentage value
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// as a fraction (0.0712 for 7.12%)
    pub fn as_fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// monthly fraction of an annual percentage, unrounded
    pub fn monthly_fraction(&self) -> Decimal {
        self.0 / Decimal::from(12) / Decimal::ONE_HUNDRED
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

impl FromStr for Percent {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Percent::from_str_exact(s)
    }
}

impl From<Decimal> for Percent {
    fn from(d: Decimal) -> Self {
        Percent::new(d)
    }
}

impl Add for Percent {
    type Output = Percent;

    fn add(self, other: Percent) -> Percent {
        Percent(self.0 + other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_precision() {
        let m = Money::from_str_exact("100.123456789").unwrap();
        assert_eq!(m.to_string(), "100.12");
    }

    #[test]
    fn test_bankers_rounding() {
        assert_eq!(Money::from_decimal(dec!(0.125)), Money::from_decimal(dec!(0.12)));
        assert_eq!(Money::from_decimal(dec!(0.135)), Money::from_decimal(dec!(0.14)));
        assert_eq!(Money::from_decimal(dec!(2.5)).to_string(), "2.50");
    }

    #[test]
    fn test_percentage() {
        let overpayment = Money::from_major(12_000);
        let provision = overpayment.percentage(Percent::new(dec!(3)));
        assert_eq!(provision, Money::from_major(360));
    }

    #[test]
    fn test_monthly_fraction() {
        let annual = Percent::new(dec!(1.52)) + Percent::new(dec!(2.1));
        assert_eq!(annual.value(), dec!(3.62));
        assert_eq!((annual.monthly_fraction() * dec!(1200)).round_dp(12), dec!(3.62));
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::from_major(1), Money::ONE_CENT, Money::ONE_CENT]
            .iter()
            .sum();
        assert_eq!(total.to_string(), "1.02");
    }
}
