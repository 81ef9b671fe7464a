//! Catalog types: categories, products and their variants.

use serde::Serialize;

use folkmint_core::{CategoryId, Price, ProductId, VariantId};

/// A product category. Categories nest through `parent_category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Category {
    pub category_id: CategoryId,
    pub name: String,
    pub parent_category: Option<CategoryId>,
}

/// A purchasable size/color configuration of a product.
///
/// The variant price is authoritative; `Product::base_price` is only a
/// catalog hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ProductVariant {
    pub variant_id: VariantId,
    pub product_id: ProductId,
    pub size: Option<String>,
    pub color: Option<String>,
    pub stock_quantity: i32,
    pub price: Price,
}

/// A catalog entry with its variants and thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub base_price: Price,
    pub category_id: CategoryId,
    /// First image of the first variant, `None` when there are no variants
    /// or the first variant has no images.
    pub main_image: Option<String>,
    pub variants: Vec<ProductVariant>,
}
