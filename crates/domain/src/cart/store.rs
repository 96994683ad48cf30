use std::sync::Arc;

use common::{Money, UserId};
use tokio::sync::RwLock;

use super::item::clamp_quantity;
use super::{CartError, CartItem};

/// Holds the session's cart lines.
///
/// The cart is session memory only; it is not mirrored to storage.
#[derive(Clone, Default)]
pub struct CartStore {
    items: Arc<RwLock<Vec<CartItem>>>,
}

impl CartStore {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a line, or grows the quantity of the existing line for the same id.
    ///
    /// Returns the resulting line.
    #[tracing::instrument(skip(self, item), fields(item_id = %item.id, quantity = item.quantity))]
    pub async fn add_item(&self, item: CartItem) -> CartItem {
        let mut items = self.items.write().await;
        let added = item.quantity.max(1);

        if let Some(existing) = items.iter_mut().find(|line| line.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(added);
            tracing::debug!(quantity = existing.quantity, "cart line quantity increased");
            return existing.clone();
        }

        let line = CartItem {
            quantity: added,
            ..item
        };
        items.push(line.clone());
        tracing::debug!("cart line added");
        line
    }

    /// Sets a line's quantity. Requests below 1 are clamped to 1.
    #[tracing::instrument(skip(self))]
    pub async fn update_quantity(&self, id: &str, quantity: i64) -> Result<CartItem, CartError> {
        let mut items = self.items.write().await;
        let line = items
            .iter_mut()
            .find(|line| line.id == id)
            .ok_or_else(|| CartError::ItemNotFound { id: id.to_string() })?;

        line.quantity = clamp_quantity(quantity);
        Ok(line.clone())
    }

    /// Removes a line. Returns the removed line, if it existed.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(&self, id: &str) -> Option<CartItem> {
        let mut items = self.items.write().await;
        let index = items.iter().position(|line| line.id == id)?;
        Some(items.remove(index))
    }

    /// Empties the cart.
    #[tracing::instrument(skip(self))]
    pub async fn clear(&self) {
        self.items.write().await.clear();
    }

    /// Returns a snapshot of the cart lines in insertion order.
    pub async fn items(&self) -> Vec<CartItem> {
        self.items.read().await.clone()
    }

    /// Returns Σ price * quantity over all lines.
    pub async fn subtotal(&self) -> Money {
        self.items.read().await.iter().map(CartItem::line_total).sum()
    }

    /// Returns the total number of units across all lines.
    pub async fn item_count(&self) -> u64 {
        self.items
            .read()
            .await
            .iter()
            .map(|line| line.quantity as u64)
            .sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Returns the distinct sellers in the cart, in order of first appearance.
    pub async fn seller_ids(&self) -> Vec<UserId> {
        let items = self.items.read().await;
        let mut sellers: Vec<UserId> = Vec::new();
        for line in items.iter() {
            if !sellers.contains(&line.seller_id) {
                sellers.push(line.seller_id.clone());
            }
        }
        sellers
    }
}
