use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Neg, Sub, SubAssign},
};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const ZAR_CURRENCY_CODE: &str = "ZAR";
/// The largest amount, in rands, accepted over the wire.
pub const MAX_WIRE_RANDS: f64 = 1_000_000_000_000.0;

//--------------------------------------        Zar          ---------------------------------------------------------
/// An amount of South African rand, held as an integer number of cents.
///
/// Over the wire (JSON) amounts are expressed in rands, e.g. `1500` or `1499.99`, since that is what the front end and
/// the payment gateway deal in. In the database the raw cent value is stored.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, PartialEq, Eq, Hash)]
#[sqlx(transparent)]
pub struct Zar(i64);

op!(binary Zar, Add, add);
op!(binary Zar, Sub, sub);
op!(inplace Zar, SubAssign, sub_assign);
op!(unary Zar, Neg, neg);

impl Sum for Zar {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a rand amount: {0}")]
pub struct ZarConversionError(String);

impl Zar {
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn from_rands(rands: i64) -> Self {
        Self(rands * 100)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn checked_add(self, rhs: Zar) -> Option<Zar> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn saturating_add(self, rhs: Zar) -> Zar {
        Self(self.0.saturating_add(rhs.0))
    }

    /// The amount in rands, formatted with exactly two decimal places and no thousands separator, e.g. `"1500.00"`.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{sign}{}.{:02}", abs / 100, abs % 100)
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn as_rands(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl TryFrom<f64> for Zar {
    type Error = ZarConversionError;

    #[allow(clippy::cast_possible_truncation)]
    fn try_from(rands: f64) -> Result<Self, Self::Error> {
        if !rands.is_finite() {
            return Err(ZarConversionError(format!("{rands} is not a finite number")));
        }
        if rands.abs() > MAX_WIRE_RANDS {
            return Err(ZarConversionError(format!("{rands} is out of range")));
        }
        Ok(Self((rands * 100.0).round() as i64))
    }
}

impl Display for Zar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R{}", self.to_decimal_string())
    }
}

impl Serialize for Zar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_rands())
    }
}

impl<'de> Deserialize<'de> for Zar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rands = f64::deserialize(deserializer)?;
        Zar::try_from(rands).map_err(de::Error::custom)
    }
}
