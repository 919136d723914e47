//! Fixed-scale, non-negative quantities using decimal arithmetic.
//!
//! Every quantity in the back-office (ordered, on-hand, in production) is
//! stored as `NUMERIC(12,3)`. [`Quantity`] keeps that scale in memory so sums
//! and differences stay exact and `to_pick + to_produce == ordered` holds
//! without rounding drift.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of decimal places carried by every [`Quantity`].
pub const QUANTITY_SCALE: u32 = 3;

/// Errors raised when building a [`Quantity`] from an untrusted decimal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    /// Quantities are never negative.
    #[error("quantity must not be negative (got {0})")]
    Negative(Decimal),

    /// More fractional digits than the fixed scale allows.
    #[error("quantity {0} has more than {QUANTITY_SCALE} decimal places")]
    TooPrecise(Decimal),
}

/// A non-negative quantity at a fixed scale of [`QUANTITY_SCALE`] decimals.
///
/// Serialized as a decimal string (e.g. `"10.000"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Quantity(Decimal);

impl Quantity {
    /// The zero quantity.
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, QUANTITY_SCALE));

    /// Build a quantity from a decimal, rejecting negative values and values
    /// finer than the fixed scale.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::Negative` or `QuantityError::TooPrecise`.
    pub fn try_new(value: Decimal) -> Result<Self, QuantityError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(QuantityError::Negative(value));
        }
        let normalized = value.normalize();
        if normalized.scale() > QUANTITY_SCALE {
            return Err(QuantityError::TooPrecise(value));
        }
        let mut scaled = normalized.abs();
        scaled.rescale(QUANTITY_SCALE);
        Ok(Self(scaled))
    }

    /// Build a quantity from a whole number of units.
    #[must_use]
    pub fn from_units(units: u32) -> Self {
        let mut value = Decimal::from(units);
        value.rescale(QUANTITY_SCALE);
        Self(value)
    }

    /// Underlying decimal value (always at [`QUANTITY_SCALE`]).
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Whether this quantity is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Whether this quantity is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        !self.0.is_zero()
    }

    /// Subtract `other`, flooring at zero.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        if other >= self {
            Self::ZERO
        } else {
            Self(self.0 - other.0)
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Quantity {
    type Error = QuantityError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Quantity> for Decimal {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Quantity {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(feature = "postgres")]
impl ::sqlx::Type<::sqlx::Postgres> for Quantity {
    fn type_info() -> ::sqlx::postgres::PgTypeInfo {
        <Decimal as ::sqlx::Type<::sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
    }
}

// Negative or over-precise stored values fail decoding, so they never reach
// the production engine.
#[cfg(feature = "postgres")]
impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for Quantity {
    fn decode(
        value: ::sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, ::sqlx::error::BoxDynError> {
        let decimal = <Decimal as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
        Ok(Self::try_new(decimal)?)
    }
}

#[cfg(feature = "postgres")]
impl ::sqlx::Encode<'_, ::sqlx::Postgres> for Quantity {
    fn encode_by_ref(
        &self,
        buf: &mut ::sqlx::postgres::PgArgumentBuffer,
    ) -> Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
        <Decimal as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_try_new_rescales_to_fixed_scale() {
        let q = Quantity::try_new(dec("2.5")).unwrap();
        assert_eq!(q.to_string(), "2.500");
        assert_eq!(q.as_decimal().scale(), QUANTITY_SCALE);
    }

    #[test]
    fn test_try_new_rejects_negative() {
        let err = Quantity::try_new(dec("-1")).unwrap_err();
        assert!(matches!(err, QuantityError::Negative(_)));
    }

    #[test]
    fn test_try_new_accepts_negative_zero() {
        let q = Quantity::try_new(dec("-0.000")).unwrap();
        assert!(q.is_zero());
    }

    #[test]
    fn test_try_new_rejects_excess_precision() {
        let err = Quantity::try_new(dec("1.0005")).unwrap_err();
        assert!(matches!(err, QuantityError::TooPrecise(_)));

        // Trailing zeros beyond the scale are fine.
        assert!(Quantity::try_new(dec("1.500000")).is_ok());
    }

    #[test]
    fn test_saturating_sub_floors_at_zero() {
        let ten = Quantity::from_units(10);
        let six = Quantity::from_units(6);
        let fifteen = Quantity::from_units(15);

        assert_eq!(ten.saturating_sub(six), Quantity::from_units(4));
        assert_eq!(ten.saturating_sub(fifteen), Quantity::ZERO);
    }

    #[test]
    fn test_sum_is_exact() {
        let parts = [dec("0.1"), dec("0.2"), dec("0.7")]
            .into_iter()
            .map(|d| Quantity::try_new(d).unwrap());
        let total: Quantity = parts.sum();
        assert_eq!(total, Quantity::from_units(1));
    }

    #[test]
    fn test_serde_round_trip_uses_string() {
        let json = serde_json::to_string(&Quantity::from_units(3)).unwrap();
        assert_eq!(json, "\"3.000\"");

        let back: Quantity = serde_json::from_str("\"1.25\"").unwrap();
        assert_eq!(back.to_string(), "1.250");

        assert!(serde_json::from_str::<Quantity>("\"-4\"").is_err());
    }
}
