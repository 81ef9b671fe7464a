//! Cart lines.

use serde::Serialize;

use folkmint_core::{CartId, CartItemId, Price, VariantId};

/// One line of a user's cart with the display fields of its variant.
///
/// `price` is the variant's current price, not a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CartLine {
    pub cart_item_id: CartItemId,
    pub quantity: i32,
    pub cart_id: CartId,
    pub variant_id: VariantId,
    pub name: String,
    pub price: Price,
    pub color: Option<String>,
    pub size: Option<String>,
}
