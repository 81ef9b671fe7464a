//! Decimal money amounts.
//!
//! Prices are stored as `NUMERIC(12, 2)` and handled as [`Decimal`] so order
//! totals add up exactly. On the wire they are plain JSON numbers
//! (`12000.0`), which is what storefront clients send and expect back.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A money amount in the shop currency (BDT).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Decimal places kept by the database.
    pub const SCALE: u32 = 2;

    /// Largest amount a `NUMERIC(12, 2)` column holds.
    pub const MAX: Self = Self(Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2));

    /// Wrap a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Build a price from whole currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Line total for `quantity` units at this price, `None` on overflow.
    #[must_use]
    pub fn checked_times(self, quantity: i32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Sum of two amounts, `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Whether the amount fits a `NUMERIC(12, 2)` column without rounding.
    #[must_use]
    pub fn is_storable(&self) -> bool {
        self.0.normalize().scale() <= Self::SCALE && self.0.abs() <= Self::MAX.0
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_json_number() {
        let json = serde_json::to_string(&Price::from_units(12_000)).unwrap();
        assert_eq!(json, "12000.0");
    }

    #[test]
    fn test_deserializes_from_json_number() {
        let price: Price = serde_json::from_str("4500.0").unwrap();
        assert_eq!(price, Price::from_units(4_500));

        let price: Price = serde_json::from_str("3000").unwrap();
        assert_eq!(price, Price::from_units(3_000));
    }

    #[test]
    fn test_line_totals_sum_exactly() {
        let lines = [
            (Price::new(Decimal::new(1_999, 2)), 3),
            (Price::new(Decimal::new(1, 1)), 7),
        ];
        let total = lines.iter().try_fold(Price::ZERO, |acc, (price, qty)| {
            acc.checked_add(price.checked_times(*qty)?)
        });
        assert_eq!(total.unwrap().amount(), Decimal::new(6_067, 2));
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let huge = Price::new(Decimal::MAX);
        assert_eq!(huge.checked_times(1000), None);
        assert_eq!(huge.checked_add(Price::from_units(1)), None);
        assert_eq!(
            Price::from_units(3_000).checked_times(2),
            Some(Price::from_units(6_000))
        );
    }

    #[test]
    fn test_max_is_largest_numeric_12_2() {
        assert_eq!(Price::MAX.amount(), Decimal::new(9_999_999_999_99, 2));
        assert!(Price::MAX.is_storable());
    }

    #[test]
    fn test_storable_rejects_extra_precision_and_size() {
        assert!(Price::new(Decimal::new(12_000_00, 2)).is_storable());
        assert!(Price::new(Decimal::new(1_005_000, 5)).is_storable());
        assert!(!Price::new(Decimal::new(5, 3)).is_storable());
        assert!(!Price::from_units(10_000_000_000).is_storable());
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from_units(16_500).to_string(), "16500.00");
    }
}
