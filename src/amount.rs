//! Fixed-point monetary amount with exactly 2 decimal places.
//!
//! The transaction amount field of a payment code is a plain decimal string:
//! ASCII digits, a single `.` and two fractional digits. `Amount` wraps
//! `rust_decimal::Decimal` and enforces that shape at construction.

use log::warn;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Largest amount in cents. Renders as `9999999999.99`, the 13 characters the
/// amount field allows.
const MAX_CENTS: i64 = 999_999_999_999;

/// A non-negative monetary amount in the currency's major unit, scale 2.
///
/// # Rounding
///
/// Values with more than two fractional digits are rounded half away from
/// zero at the second decimal: `3.005` becomes `3.01`, `0.125` becomes `0.13`.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use pix_payload::Amount;
///
/// let amount = Amount::from_str("42.5").unwrap();
/// assert_eq!(amount.to_string(), "42.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Creates a new `Amount`, clamping negatives to zero and normalizing to
    /// 2 decimal places.
    pub fn new(value: Decimal) -> Self {
        if value.is_sign_negative() || value.is_zero() {
            return Self::ZERO;
        }

        let mut normalized =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        let max = Self::max_value();
        if normalized > max {
            warn!("Amount {} exceeds field capacity, clamping to {}", value, max);
            normalized = max;
        }
        normalized.rescale(Self::SCALE);
        Amount(normalized)
    }

    /// Converts a floating point amount.
    ///
    /// Non-finite, zero and negative inputs yield zero. Finite inputs are taken
    /// at their shortest decimal rendering before rounding, so `3.005_f64`
    /// rounds as the decimal `3.005` and not as its binary approximation.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() || value <= 0.0 {
            return Self::ZERO;
        }

        let decimal = Decimal::from_str(&value.to_string())
            .ok()
            .or_else(|| Decimal::from_f64(value));

        match decimal {
            Some(d) => Self::new(d),
            None if value < 1.0 => Self::ZERO,
            None => {
                warn!("Amount {} is not representable, clamping to maximum", value);
                Amount(Self::max_value())
            }
        }
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiplies by a whole quantity, as when pricing a line of a tab.
    pub fn times(&self, quantity: u32) -> Self {
        Amount::new(self.0 * Decimal::from(quantity))
    }

    /// Returns the underlying decimal.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    fn max_value() -> Decimal {
        Decimal::new(MAX_CENTS, Self::SCALE)
    }
}

/// Formats a numeric amount as the payment code amount field.
///
/// ```
/// assert_eq!(pix_payload::format_amount(12.0), "12.00");
/// assert_eq!(pix_payload::format_amount(-5.0), "0.00");
/// ```
pub fn format_amount(amount: f64) -> String {
    Amount::from_f64(amount).to_string()
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed)?;
        Ok(Amount::new(decimal))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount::new(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, x| acc + x)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}
