//! In-memory [`Store`] used when `PostgreSQL` is unreachable.
//!
//! Holds the demo catalog, the demo account and its order history behind a
//! single mutex. Data lives for the lifetime of the process. Every write
//! checks the rows it references before touching anything, so a rejected
//! request leaves the data as it was.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;

use folkmint_core::{
    AddressId, CartId, CartItemId, CategoryId, Email, ORDER_STATUS_PROCESSING, OrderId, PaymentId,
    Price, ProductId, ReviewId, UserId, VariantId,
};

use super::demo::{self, DEMO_PRODUCTS};
use super::{RepositoryError, Store, StoreKind};
use crate::models::{
    CartLine, Category, CheckoutRequest, LoginRecord, NewReview, NewUser, OrderLine, OrderSummary,
    PaymentMethodInput, Product, ProductVariant, Profile, Review,
};

/// Demo account email.
pub const DEMO_EMAIL: &str = "demo@folkmint.com";
/// Demo account password.
pub const DEMO_PASSWORD: &str = "password123";

struct UserRecord {
    user_id: UserId,
    username: String,
    email: String,
    password: SecretString,
    first_name: String,
    last_name: String,
}

/// Only the street is kept; city, postal code and country are the defaults.
struct AddressRecord {
    address_id: AddressId,
    user_id: UserId,
    street: String,
}

struct ProductRecord {
    product_id: ProductId,
    name: String,
    description: Option<String>,
    base_price: Price,
    category_id: CategoryId,
}

struct ImageRecord {
    variant_id: VariantId,
    image_url: String,
}

struct ReviewRecord {
    review_id: ReviewId,
    rating: i32,
    comment: String,
    user_id: UserId,
    product_id: ProductId,
}

struct CartItemRecord {
    cart_item_id: CartItemId,
    cart_id: CartId,
    variant_id: VariantId,
    quantity: i32,
}

/// Payment method and payment of one checkout.
struct PaymentRecord {
    payment_id: PaymentId,
    user_id: UserId,
    method: PaymentMethodInput,
    amount: Price,
}

struct OrderRecord {
    user_id: UserId,
    summary: OrderSummary,
}

#[derive(Default)]
struct MockData {
    users: Vec<UserRecord>,
    addresses: Vec<AddressRecord>,
    categories: Vec<Category>,
    products: Vec<ProductRecord>,
    variants: Vec<ProductVariant>,
    images: Vec<ImageRecord>,
    reviews: Vec<ReviewRecord>,
    carts: HashMap<UserId, CartId>,
    cart_items: Vec<CartItemRecord>,
    payments: Vec<PaymentRecord>,
    orders: Vec<OrderRecord>,
    view_counts: HashMap<UserId, i64>,
}

/// Next serial value after the largest existing one.
fn next_id(ids: impl Iterator<Item = i32>) -> i32 {
    ids.max().unwrap_or(0) + 1
}

impl MockData {
    fn user(&self, user_id: UserId) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.user_id == user_id)
    }

    fn require_user(&self, user_id: UserId) -> Result<(), RepositoryError> {
        self.user(user_id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::InvalidReference(format!("user {user_id}")))
    }

    fn variant(&self, variant_id: VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.variant_id == variant_id)
    }

    fn product(&self, product_id: ProductId) -> Option<&ProductRecord> {
        self.products.iter().find(|p| p.product_id == product_id)
    }

    /// The user's lowest-id address.
    fn first_address(&self, user_id: UserId) -> Option<&AddressRecord> {
        self.addresses
            .iter()
            .filter(|a| a.user_id == user_id)
            .min_by_key(|a| a.address_id)
    }

    fn first_address_mut(&mut self, user_id: UserId) -> Option<&mut AddressRecord> {
        self.addresses
            .iter_mut()
            .filter(|a| a.user_id == user_id)
            .min_by_key(|a| a.address_id)
    }

    fn first_image(&self, variant_id: VariantId) -> Option<String> {
        self.images
            .iter()
            .find(|i| i.variant_id == variant_id)
            .map(|i| i.image_url.clone())
    }

    fn insert_address(&mut self, user_id: UserId, street: &str) {
        let address_id = AddressId::new(next_id(
            self.addresses.iter().map(|a| a.address_id.as_i32()),
        ));
        self.addresses.push(AddressRecord {
            address_id,
            user_id,
            street: street.to_owned(),
        });
    }

    /// Display fields of an ordered variant at checkout time.
    fn order_line(&self, variant: &ProductVariant, quantity: i32, price: Price) -> OrderLine {
        OrderLine {
            quantity,
            price_at_purchase: price,
            size: variant.size.clone(),
            color: variant.color.clone(),
            name: self
                .product(variant.product_id)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            product_id: variant.product_id,
            image: self.first_image(variant.variant_id),
        }
    }
}

/// Store backed by process memory.
pub struct MockStore {
    data: Mutex<MockData>,
}

impl MockStore {
    /// A store loaded with the demo catalog, demo account and its orders.
    ///
    /// `images_url` is the public base under which image files are served.
    #[must_use]
    pub fn seeded(images_url: &str) -> Self {
        let mut data = MockData {
            categories: demo::categories(),
            ..MockData::default()
        };

        for product in DEMO_PRODUCTS {
            data.products.push(ProductRecord {
                product_id: ProductId::new(product.product_id),
                name: product.name.to_owned(),
                description: Some(product.description.to_owned()),
                base_price: product.price(),
                category_id: CategoryId::new(product.category_id),
            });
            data.variants.push(product.variant());
            data.images.push(ImageRecord {
                variant_id: VariantId::new(product.variant_id),
                image_url: demo::image_url(images_url, product.image),
            });
        }

        let demo_user = UserId::new(1);
        data.users.push(UserRecord {
            user_id: demo_user,
            username: "demouser".to_owned(),
            email: DEMO_EMAIL.to_owned(),
            password: SecretString::from(DEMO_PASSWORD),
            first_name: "Demo".to_owned(),
            last_name: "User".to_owned(),
        });
        data.insert_address(demo_user, "123 Artisans Lane, Dhaka, Bangladesh");

        data.orders = demo_orders(demo_user, images_url);

        Self {
            data: Mutex::new(data),
        }
    }
}

fn demo_orders(user_id: UserId, images_url: &str) -> Vec<OrderRecord> {
    let line = |name: &str, price: i64, product_id: i32, size: &str, color: &str, file: &str| {
        OrderLine {
            quantity: 1,
            price_at_purchase: Price::from_units(price),
            size: Some(size.to_owned()),
            color: Some(color.to_owned()),
            name: name.to_owned(),
            product_id: ProductId::new(product_id),
            image: Some(demo::image_url(images_url, file)),
        }
    };

    let delivered = OrderSummary {
        order_id: OrderId::new(1001),
        order_date: Utc
            .with_ymd_and_hms(2024, 5, 20, 10, 30, 0)
            .single()
            .unwrap_or_default(),
        total_amount: Price::from_units(16_500),
        status: "Delivered".to_owned(),
        items: vec![
            line(
                "Nakshi Kantha",
                12_000,
                1,
                "Double (7x8ft)",
                "Red/Multicolor",
                "1_lRUm2IW.webp",
            ),
            line(
                "Handwoven Bamboo Lamp",
                4_500,
                2,
                "Medium",
                "Natural",
                "Gemini_Generated_Image_ty5znnty5znnty5z.png",
            ),
        ],
    };

    let processing = OrderSummary {
        order_id: OrderId::new(1002),
        order_date: Utc
            .with_ymd_and_hms(2024, 5, 22, 14, 45, 0)
            .single()
            .unwrap_or_default(),
        total_amount: Price::from_units(3_000),
        status: ORDER_STATUS_PROCESSING.to_owned(),
        items: vec![line(
            "Terracotta Pot",
            3_000,
            4,
            "12 inch",
            "Terracotta",
            "Gemini_Generated_Image_3kkhxj3kkhxj3kkh.png",
        )],
    };

    [delivered, processing]
        .into_iter()
        .map(|summary| OrderRecord { user_id, summary })
        .collect()
}

#[async_trait]
impl Store for MockStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Mock
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn create_user(&self, user: &NewUser) -> Result<UserId, RepositoryError> {
        let mut data = self.data.lock().await;

        if data.users.iter().any(|u| u.email == user.email.as_str()) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let user_id = UserId::new(next_id(data.users.iter().map(|u| u.user_id.as_i32())));
        data.users.push(UserRecord {
            user_id,
            username: user.email.username().to_owned(),
            email: user.email.as_str().to_owned(),
            password: SecretString::from(user.password.expose_secret().to_owned()),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        });
        data.insert_address(user_id, &user.street);

        Ok(user_id)
    }

    async fn find_login(&self, email: &Email) -> Result<Option<LoginRecord>, RepositoryError> {
        let data = self.data.lock().await;

        Ok(data
            .users
            .iter()
            .find(|u| u.email == email.as_str())
            .map(|u| LoginRecord {
                user_id: u.user_id,
                email: u.email.clone(),
                first_name: Some(u.first_name.clone()),
                last_name: Some(u.last_name.clone()),
                password: SecretString::from(u.password.expose_secret().to_owned()),
            }))
    }

    async fn find_profile(&self, user_id: UserId) -> Result<Option<Profile>, RepositoryError> {
        let data = self.data.lock().await;

        let Some(user) = data.user(user_id) else {
            return Ok(None);
        };

        Ok(Some(Profile {
            first_name: Some(user.first_name.clone()),
            last_name: Some(user.last_name.clone()),
            email: user.email.clone(),
            address: data
                .first_address(user_id)
                .map(|address| address.street.clone()),
        }))
    }

    async fn order_history(&self, user_id: UserId) -> Result<Vec<OrderSummary>, RepositoryError> {
        let data = self.data.lock().await;

        let mut orders: Vec<OrderSummary> = data
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .map(|o| o.summary.clone())
            .collect();
        orders.sort_by(|a, b| {
            b.order_date
                .cmp(&a.order_date)
                .then(b.order_id.cmp(&a.order_id))
        });

        Ok(orders)
    }

    async fn update_address(&self, user_id: UserId, street: &str) -> Result<(), RepositoryError> {
        let mut data = self.data.lock().await;

        if data.user(user_id).is_none() {
            return Err(RepositoryError::NotFound);
        }

        match data.first_address_mut(user_id) {
            Some(address) => street.clone_into(&mut address.street),
            None => data.insert_address(user_id, street),
        }

        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let data = self.data.lock().await;

        let mut categories = data.categories.clone();
        categories.sort_by_key(|c| c.category_id);
        Ok(categories)
    }

    async fn list_products(
        &self,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let data = self.data.lock().await;

        let mut products: Vec<Product> = data
            .products
            .iter()
            .filter(|p| category_id.is_none_or(|id| p.category_id == id))
            .map(|p| {
                let mut variants: Vec<ProductVariant> = data
                    .variants
                    .iter()
                    .filter(|v| v.product_id == p.product_id)
                    .cloned()
                    .collect();
                variants.sort_by_key(|v| v.variant_id);
                let main_image = variants
                    .first()
                    .and_then(|v| data.first_image(v.variant_id));

                Product {
                    product_id: p.product_id,
                    name: p.name.clone(),
                    description: p.description.clone(),
                    base_price: p.base_price,
                    category_id: p.category_id,
                    main_image,
                    variants,
                }
            })
            .collect();
        products.sort_by_key(|p| p.product_id);

        Ok(products)
    }

    async fn list_reviews(&self, product_id: ProductId) -> Result<Vec<Review>, RepositoryError> {
        let data = self.data.lock().await;

        let mut reviews: Vec<Review> = data
            .reviews
            .iter()
            .filter(|r| r.product_id == product_id)
            .filter_map(|r| {
                let author = data.user(r.user_id)?;
                Some(Review {
                    review_id: r.review_id,
                    rating: r.rating,
                    comment: Some(r.comment.clone()),
                    user_id: r.user_id,
                    product_id: r.product_id,
                    username: author.username.clone(),
                    first_name: Some(author.first_name.clone()),
                })
            })
            .collect();
        reviews.sort_by_key(|r| r.review_id);

        Ok(reviews)
    }

    async fn create_review(
        &self,
        user_id: UserId,
        review: &NewReview,
    ) -> Result<ReviewId, RepositoryError> {
        let mut data = self.data.lock().await;

        data.require_user(user_id)?;
        if data.product(review.product_id).is_none() {
            return Err(RepositoryError::InvalidReference(format!(
                "product {}",
                review.product_id
            )));
        }

        let review_id = ReviewId::new(next_id(data.reviews.iter().map(|r| r.review_id.as_i32())));
        data.reviews.push(ReviewRecord {
            review_id,
            rating: review.rating,
            comment: review.comment.clone(),
            user_id,
            product_id: review.product_id,
        });

        Ok(review_id)
    }

    async fn cart_items(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let data = self.data.lock().await;

        let Some(&cart_id) = data.carts.get(&user_id) else {
            return Ok(Vec::new());
        };

        let mut lines: Vec<CartLine> = data
            .cart_items
            .iter()
            .filter(|item| item.cart_id == cart_id)
            .filter_map(|item| {
                let variant = data.variant(item.variant_id)?;
                let product = data.product(variant.product_id)?;
                Some(CartLine {
                    cart_item_id: item.cart_item_id,
                    quantity: item.quantity,
                    cart_id,
                    variant_id: item.variant_id,
                    name: product.name.clone(),
                    price: variant.price,
                    color: variant.color.clone(),
                    size: variant.size.clone(),
                })
            })
            .collect();
        lines.sort_by_key(|l| l.cart_item_id);

        Ok(lines)
    }

    async fn add_to_cart(
        &self,
        user_id: UserId,
        variant_id: VariantId,
        quantity: i32,
    ) -> Result<CartItemId, RepositoryError> {
        let mut data = self.data.lock().await;

        data.require_user(user_id)?;
        if data.variant(variant_id).is_none() {
            return Err(RepositoryError::InvalidReference(format!(
                "variant {variant_id}"
            )));
        }

        let cart_id = match data.carts.get(&user_id) {
            Some(&cart_id) => cart_id,
            None => {
                let cart_id = CartId::new(next_id(data.carts.values().map(CartId::as_i32)));
                data.carts.insert(user_id, cart_id);
                cart_id
            }
        };

        if let Some(item) = data
            .cart_items
            .iter_mut()
            .find(|i| i.cart_id == cart_id && i.variant_id == variant_id)
        {
            item.quantity = item.quantity.checked_add(quantity).ok_or_else(|| {
                RepositoryError::OutOfRange(format!("quantity of cart item {}", item.cart_item_id))
            })?;
            return Ok(item.cart_item_id);
        }

        let cart_item_id = CartItemId::new(next_id(
            data.cart_items.iter().map(|i| i.cart_item_id.as_i32()),
        ));
        data.cart_items.push(CartItemRecord {
            cart_item_id,
            cart_id,
            variant_id,
            quantity,
        });

        Ok(cart_item_id)
    }

    async fn update_cart_item(
        &self,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let mut data = self.data.lock().await;

        if let Some(item) = data
            .cart_items
            .iter_mut()
            .find(|i| i.cart_item_id == item_id)
        {
            item.quantity = quantity;
        }

        Ok(())
    }

    async fn remove_cart_item(&self, item_id: CartItemId) -> Result<(), RepositoryError> {
        let mut data = self.data.lock().await;
        data.cart_items.retain(|i| i.cart_item_id != item_id);
        Ok(())
    }

    async fn place_order(
        &self,
        user_id: UserId,
        request: &CheckoutRequest,
    ) -> Result<OrderId, RepositoryError> {
        let mut data = self.data.lock().await;

        data.require_user(user_id)?;
        if let Some(address_id) = request.address_id
            && !data.addresses.iter().any(|a| a.address_id == address_id)
        {
            return Err(RepositoryError::InvalidReference(format!(
                "address {address_id}"
            )));
        }

        // Resolve every line before the first write.
        let mut items = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let variant = data.variant(item.variant_id).ok_or_else(|| {
                RepositoryError::InvalidReference(format!("variant {}", item.variant_id))
            })?;
            items.push(data.order_line(variant, item.quantity, item.price));
        }

        let total = request
            .total()
            .map_err(|e| RepositoryError::OutOfRange(e.to_string()))?;

        let payment_id =
            PaymentId::new(next_id(data.payments.iter().map(|p| p.payment_id.as_i32())));
        let payment = PaymentRecord {
            payment_id,
            user_id,
            method: request.payment_method.clone(),
            amount: total,
        };
        tracing::debug!(
            payment_id = %payment.payment_id,
            user_id = %payment.user_id,
            method = %payment.method.kind,
            card_last4 = %payment.method.card_last4,
            amount = %payment.amount,
            "payment recorded (in-memory)"
        );
        data.payments.push(payment);

        let order_id = OrderId::new(next_id(
            data.orders.iter().map(|o| o.summary.order_id.as_i32()),
        ));
        data.orders.push(OrderRecord {
            user_id,
            summary: OrderSummary {
                order_id,
                order_date: Utc::now(),
                total_amount: total,
                status: ORDER_STATUS_PROCESSING.to_owned(),
                items,
            },
        });

        tracing::info!(%order_id, %user_id, %total, "order placed (in-memory)");
        Ok(order_id)
    }

    async fn record_view(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        let mut data = self.data.lock().await;

        data.require_user(user_id)?;
        *data.view_counts.entry(user_id).or_insert(0) += 1;

        tracing::debug!(%user_id, %product_id, "product view recorded (in-memory)");
        Ok(())
    }
}

#[cfg(test)]
impl MockStore {
    async fn view_count(&self, user_id: UserId) -> i64 {
        self.data
            .lock()
            .await
            .view_counts
            .get(&user_id)
            .copied()
            .unwrap_or(0)
    }

    fn empty() -> Self {
        Self {
            data: Mutex::new(MockData::default()),
        }
    }

    /// `(user, card_last4, amount)` of every recorded payment.
    async fn payments(&self) -> Vec<(UserId, String, Price)> {
        self.data
            .lock()
            .await
            .payments
            .iter()
            .map(|p| (p.user_id, p.method.card_last4.clone(), p.amount))
            .collect()
    }
}
