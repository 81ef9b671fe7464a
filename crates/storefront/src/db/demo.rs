//! Demo catalog shared by the in-memory store and `fm-cli seed`.

use folkmint_core::{CategoryId, Price, ProductId, VariantId};

use crate::models::{Category, ProductVariant};

/// Stock recorded for every demo variant.
pub const DEMO_STOCK: i32 = 25;

/// A demo product with its single variant and image.
#[derive(Debug, Clone, Copy)]
pub struct DemoProduct {
    pub product_id: i32,
    pub name: &'static str,
    pub description: &'static str,
    /// Whole BDT; also the variant price.
    pub price: i64,
    pub category_id: i32,
    pub variant_id: i32,
    pub size: &'static str,
    pub color: &'static str,
    /// File name under the images directory.
    pub image: &'static str,
}

/// Demo categories as `(id, name)`; all top level.
pub const DEMO_CATEGORIES: [(i32, &str); 4] = [
    (1, "Textiles & Fabrics"),
    (2, "Bamboo Craft"),
    (3, "Pottery"),
    (4, "Home Decor"),
];

pub const DEMO_PRODUCTS: [DemoProduct; 4] = [
    DemoProduct {
        product_id: 1,
        name: "Nakshi Kantha",
        description: "Traditional hand-embroidered quilt.",
        price: 12_000,
        category_id: 1,
        variant_id: 101,
        size: "Double",
        color: "Red",
        image: "1_lRUm2IW.webp",
    },
    DemoProduct {
        product_id: 2,
        name: "Bamboo Lamp",
        description: "Handwoven bamboo floor lamp.",
        price: 4_500,
        category_id: 2,
        variant_id: 201,
        size: "Medium",
        color: "Natural",
        image: "Gemini_Generated_Image_ty5znnty5znnty5z.png",
    },
    DemoProduct {
        product_id: 3,
        name: "Jamdani Saree",
        description: "Hand-loomed silk and cotton saree.",
        price: 25_000,
        category_id: 1,
        variant_id: 301,
        size: "Free",
        color: "Gold",
        image: "SALOAR_KAMIJ_SET_BLUE_PRINT.webp",
    },
    DemoProduct {
        product_id: 4,
        name: "Terracotta Pot",
        description: "Authentic clay pottery from Rajshahi.",
        price: 3_000,
        category_id: 3,
        variant_id: 401,
        size: "Large",
        color: "Clay",
        image: "Gemini_Generated_Image_3kkhxj3kkhxj3kkh.png",
    },
];

/// Absolute URL of a file in the images directory.
#[must_use]
pub fn image_url(images_url: &str, file: &str) -> String {
    format!("{}/{file}", images_url.trim_end_matches('/'))
}

/// Demo categories as domain rows.
#[must_use]
pub fn categories() -> Vec<Category> {
    DEMO_CATEGORIES
        .iter()
        .map(|&(id, name)| Category {
            category_id: CategoryId::new(id),
            name: name.to_owned(),
            parent_category: None,
        })
        .collect()
}

impl DemoProduct {
    /// Price of the product and its variant.
    #[must_use]
    pub fn price(&self) -> Price {
        Price::from_units(self.price)
    }

    /// The product's single variant.
    #[must_use]
    pub fn variant(&self) -> ProductVariant {
        ProductVariant {
            variant_id: VariantId::new(self.variant_id),
            product_id: ProductId::new(self.product_id),
            size: Some(self.size.to_owned()),
            color: Some(self.color.to_owned()),
            stock_quantity: DEMO_STOCK,
            price: self.price(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_joins_once() {
        assert_eq!(
            image_url("http://localhost:8000/images/", "a.png"),
            "http://localhost:8000/images/a.png"
        );
    }

    #[test]
    fn test_demo_products_reference_demo_categories() {
        for product in DEMO_PRODUCTS {
            assert!(
                DEMO_CATEGORIES
                    .iter()
                    .any(|&(id, _)| id == product.category_id)
            );
            assert_eq!(product.variant().product_id.as_i32(), product.product_id);
        }
    }
}
