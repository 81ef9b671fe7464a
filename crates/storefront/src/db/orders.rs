//! Order repository: checkout and order history.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use folkmint_core::{
    ORDER_STATUS_PROCESSING, OrderId, PaymentId, PaymentMethodId, Price, ProductId, UserId,
};

use super::RepositoryError;
use crate::models::{CheckoutRequest, OrderLine, OrderSummary};

/// One row of the order history join: an order header plus at most one line.
///
/// Orders without items produce a single row whose line columns are NULL.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct OrderHistoryRow {
    pub order_id: OrderId,
    pub order_date: DateTime<Utc>,
    pub total_amount: Price,
    pub status: String,
    pub quantity: Option<i32>,
    pub price_at_purchase: Option<Price>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub name: Option<String>,
    pub product_id: Option<ProductId>,
    pub image: Option<String>,
}

/// Fold joined rows (already ordered by order) into summaries.
pub(crate) fn group_order_rows(rows: Vec<OrderHistoryRow>) -> Vec<OrderSummary> {
    let mut orders: Vec<OrderSummary> = Vec::new();

    for row in rows {
        if orders.last().is_none_or(|o| o.order_id != row.order_id) {
            orders.push(OrderSummary {
                order_id: row.order_id,
                order_date: row.order_date,
                total_amount: row.total_amount,
                status: row.status,
                items: Vec::new(),
            });
        }

        let (Some(quantity), Some(price_at_purchase), Some(name), Some(product_id)) =
            (row.quantity, row.price_at_purchase, row.name, row.product_id)
        else {
            continue;
        };

        if let Some(order) = orders.last_mut() {
            order.items.push(OrderLine {
                quantity,
                price_at_purchase,
                size: row.size,
                color: row.color,
                name,
                product_id,
                image: row.image,
            });
        }
    }

    orders
}

/// Repository for orders and payments.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Orders of a user, newest first, with their lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn history(&self, user_id: UserId) -> Result<Vec<OrderSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderHistoryRow>(
            r"
            SELECT o.order_id, o.order_date, o.total_amount, o.status,
                   oi.quantity, oi.price_at_purchase, pv.size, pv.color,
                   p.name, p.product_id, img.image_url AS image
            FROM orders o
            LEFT JOIN order_item oi ON oi.order_id = o.order_id
            LEFT JOIN product_variant pv ON oi.variant_id = pv.variant_id
            LEFT JOIN product p ON pv.product_id = p.product_id
            LEFT JOIN LATERAL (
                SELECT image_url FROM product_image
                WHERE product_image.variant_id = pv.variant_id
                ORDER BY image_id
                LIMIT 1
            ) img ON TRUE
            WHERE o.user_id = $1
            ORDER BY o.order_date DESC, o.order_id DESC, oi.order_item_id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(group_order_rows(rows))
    }

    /// Record a checkout: payment method, payment, order and items.
    ///
    /// Runs in a single transaction. If any statement fails the transaction
    /// is dropped without commit and nothing from this request persists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::OutOfRange` if the amounts cannot be stored.
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn place(
        &self,
        user_id: UserId,
        request: &CheckoutRequest,
    ) -> Result<OrderId, RepositoryError> {
        let total = request
            .total()
            .map_err(|e| RepositoryError::OutOfRange(e.to_string()))?;
        let mut tx = self.pool.begin().await?;

        let method_id: PaymentMethodId = sqlx::query_scalar(
            r"
            INSERT INTO payment_method (card_last4, type, expiry_date, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING method_id
            ",
        )
        .bind(&request.payment_method.card_last4)
        .bind(&request.payment_method.kind)
        .bind(request.payment_method.expiry_date)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let payment_id: PaymentId = sqlx::query_scalar(
            r"
            INSERT INTO payment (amount, payment_date, method_id)
            VALUES ($1, NOW(), $2)
            RETURNING payment_id
            ",
        )
        .bind(total)
        .bind(method_id)
        .fetch_one(&mut *tx)
        .await?;

        let order_id: OrderId = sqlx::query_scalar(
            r"
            INSERT INTO orders (order_date, total_amount, status, user_id, address_id, payment_id)
            VALUES (NOW(), $1, $2, $3, $4, $5)
            RETURNING order_id
            ",
        )
        .bind(total)
        .bind(ORDER_STATUS_PROCESSING)
        .bind(user_id)
        .bind(request.address_id)
        .bind(payment_id)
        .fetch_one(&mut *tx)
        .await?;

        for item in &request.items {
            sqlx::query(
                r"
                INSERT INTO order_item (quantity, price_at_purchase, order_id, variant_id)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(item.quantity)
            .bind(item.price)
            .bind(order_id)
            .bind(item.variant_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(%order_id, %user_id, %total, items = request.items.len(), "order placed");
        Ok(order_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn header(id: i32, day: u32) -> OrderHistoryRow {
        OrderHistoryRow {
            order_id: OrderId::new(id),
            order_date: Utc.with_ymd_and_hms(2024, 5, day, 10, 0, 0).unwrap(),
            total_amount: Price::from_units(100),
            status: "Processing".to_owned(),
            quantity: None,
            price_at_purchase: None,
            size: None,
            color: None,
            name: None,
            product_id: None,
            image: None,
        }
    }

    fn line(id: i32, day: u32, product: i32, name: &str) -> OrderHistoryRow {
        OrderHistoryRow {
            quantity: Some(1),
            price_at_purchase: Some(Price::from_units(50)),
            size: Some("Medium".to_owned()),
            color: None,
            name: Some(name.to_owned()),
            product_id: Some(ProductId::new(product)),
            image: Some(format!("/images/{product}.png")),
            ..header(id, day)
        }
    }

    #[test]
    fn test_group_order_rows_keeps_order_and_lines() {
        let rows = vec![
            line(1002, 22, 4, "Terracotta Pot"),
            line(1001, 20, 1, "Nakshi Kantha"),
            line(1001, 20, 2, "Bamboo Lamp"),
        ];

        let orders = group_order_rows(rows);

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_id, OrderId::new(1002));
        assert_eq!(orders[0].items.len(), 1);
        assert_eq!(orders[1].order_id, OrderId::new(1001));
        let names: Vec<_> = orders[1].items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Nakshi Kantha", "Bamboo Lamp"]);
    }

    #[test]
    fn test_group_order_rows_order_without_items() {
        let orders = group_order_rows(vec![header(7, 1)]);
        assert_eq!(orders.len(), 1);
        assert!(orders[0].items.is_empty());
    }

    #[test]
    fn test_group_order_rows_empty() {
        assert!(group_order_rows(Vec::new()).is_empty());
    }
}
