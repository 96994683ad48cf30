use common::{Money, UserId};
use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// One line in the cart. Also snapshotted into transactions at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product id; one line per product.
    pub id: String,
    pub name: String,
    /// Unit price.
    pub price: Money,
    /// Always at least 1.
    pub quantity: u32,
    pub image: String,
    pub seller_id: UserId,
    pub seller_name: String,
}

impl CartItem {
    /// Creates a cart line. A quantity of 0 is raised to 1.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        quantity: u32,
        seller_id: impl Into<UserId>,
        seller_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            quantity: quantity.max(1),
            image: String::new(),
            seller_id: seller_id.into(),
            seller_name: seller_name.into(),
        }
    }

    /// Builds a cart line for a catalog product.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity: quantity.max(1),
            image: product.image.clone(),
            seller_id: product.seller_id.clone(),
            seller_name: product.seller_name.clone(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Returns price * quantity.
    pub fn line_total(&self) -> Money {
        self.price.multiply(self.quantity)
    }
}

/// Clamps a requested quantity to the `>= 1` range a cart line allows.
pub(crate) fn clamp_quantity(requested: i64) -> u32 {
    requested.clamp(1, u32::MAX as i64) as u32
}
