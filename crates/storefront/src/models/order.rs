//! Checkout input and order history.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use folkmint_core::{AddressId, OrderId, Price, ProductId, VariantId};

/// One submitted checkout line.
///
/// `price` is taken from the client as-is and frozen into the order item.
/// It is not re-derived from the variant's current price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub variant_id: VariantId,
    pub quantity: i32,
    pub price: Price,
}

/// Card details captured at checkout. A fresh payment method row is written
/// for every order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodInput {
    pub card_last4: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// `YYYY-MM-DD`
    pub expiry_date: NaiveDate,
}

/// Body of `POST /api/checkout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
    /// Shipping address. Not checked against the user's addresses.
    #[serde(default)]
    pub address_id: Option<AddressId>,
    pub payment_method: PaymentMethodInput,
}

/// Why a checkout's amounts cannot be recorded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// A price has more than two decimal places or exceeds the column range.
    #[error("price of variant {0} must have at most 2 decimal places and fit the price range")]
    InvalidPrice(VariantId),

    /// The order total exceeds the largest storable amount.
    #[error("order total exceeds the maximum amount")]
    TotalTooLarge,
}

impl CheckoutRequest {
    /// Order and payment amount: sum of submitted price x quantity.
    ///
    /// Every price and the total must be storable exactly, so the recorded
    /// total always equals the sum of the recorded lines.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` for unstorable prices or an oversized total.
    pub fn total(&self) -> Result<Price, CheckoutError> {
        let mut total = Price::ZERO;
        for item in &self.items {
            if !item.price.is_storable() {
                return Err(CheckoutError::InvalidPrice(item.variant_id));
            }
            total = item
                .price
                .checked_times(item.quantity)
                .and_then(|line| total.checked_add(line))
                .ok_or(CheckoutError::TotalTooLarge)?;
        }

        if total.is_storable() {
            Ok(total)
        } else {
            Err(CheckoutError::TotalTooLarge)
        }
    }
}

/// An order as shown in the account history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub order_id: OrderId,
    pub order_date: DateTime<Utc>,
    pub total_amount: Price,
    pub status: String,
    pub items: Vec<OrderLine>,
}

/// A purchased line with product display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub quantity: i32,
    pub price_at_purchase: Price,
    pub size: Option<String>,
    pub color: Option<String>,
    pub name: String,
    pub product_id: ProductId,
    pub image: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_checkout_request_parses_client_payload() {
        let request: CheckoutRequest = serde_json::from_str(
            r#"{
                "items": [{"variant_id": 101, "quantity": 1, "price": 12000.0}],
                "address_id": 3,
                "payment_method": {"card_last4": "4242", "type": "visa", "expiry_date": "2027-08-31"}
            }"#,
        )
        .unwrap();

        assert_eq!(request.items.len(), 1);
        assert_eq!(request.address_id, Some(AddressId::new(3)));
        assert_eq!(request.payment_method.kind, "visa");
        assert_eq!(
            request.payment_method.expiry_date,
            NaiveDate::from_ymd_opt(2027, 8, 31).unwrap()
        );
    }

    #[test]
    fn test_address_is_optional() {
        let request: CheckoutRequest = serde_json::from_str(
            r#"{"items": [], "payment_method": {"card_last4": "1111", "type": "bkash", "expiry_date": "2026-01-01"}}"#,
        )
        .unwrap();
        assert_eq!(request.address_id, None);
        assert_eq!(request.total(), Ok(Price::ZERO));
    }

    #[test]
    fn test_total_uses_submitted_prices() {
        let request = CheckoutRequest {
            items: vec![
                CheckoutItem {
                    variant_id: VariantId::new(101),
                    quantity: 1,
                    price: Price::from_units(12_000),
                },
                CheckoutItem {
                    variant_id: VariantId::new(201),
                    quantity: 3,
                    price: Price::new(Decimal::new(4_499_50, 2)),
                },
            ],
            address_id: None,
            payment_method: PaymentMethodInput {
                card_last4: "4242".to_owned(),
                kind: "visa".to_owned(),
                expiry_date: NaiveDate::from_ymd_opt(2027, 1, 31).unwrap(),
            },
        };

        assert_eq!(request.total().unwrap().amount(), Decimal::new(25_498_50, 2));
    }

    fn single_line(quantity: i32, price: Decimal) -> CheckoutRequest {
        CheckoutRequest {
            items: vec![CheckoutItem {
                variant_id: VariantId::new(101),
                quantity,
                price: Price::new(price),
            }],
            address_id: None,
            payment_method: PaymentMethodInput {
                card_last4: "4242".to_owned(),
                kind: "visa".to_owned(),
                expiry_date: NaiveDate::from_ymd_opt(2027, 1, 31).unwrap(),
            },
        }
    }

    #[test]
    fn test_total_rejects_sub_cent_prices() {
        assert_eq!(
            single_line(3, Decimal::new(5, 3)).total(),
            Err(CheckoutError::InvalidPrice(VariantId::new(101)))
        );
    }

    #[test]
    fn test_total_rejects_overflow() {
        assert_eq!(
            single_line(1000, Decimal::MAX).total(),
            Err(CheckoutError::InvalidPrice(VariantId::new(101)))
        );
        assert_eq!(
            single_line(i32::MAX, Decimal::new(9_999_999_99, 2)).total(),
            Err(CheckoutError::TotalTooLarge)
        );
    }
}
