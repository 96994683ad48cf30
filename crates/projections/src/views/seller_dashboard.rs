//! Seller dashboard read model: sales per seller over completed orders.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{Money, UserId};
use domain::Transaction;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::Result;
use crate::projection::{Projection, ProjectionPosition};

/// Sales of one product by one seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub product_id: String,
    pub name: String,
    pub units_sold: u64,
    pub revenue: Money,
}

/// A seller's totals. Only the seller's own lines count toward revenue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerDashboard {
    pub seller_id: UserId,
    pub revenue: Money,
    pub units_sold: u64,
    pub order_count: u64,
    /// Distinct buyers who completed an order with this seller.
    pub customer_count: usize,
}

impl SellerDashboard {
    fn empty(seller_id: UserId) -> Self {
        Self {
            seller_id,
            revenue: Money::zero(),
            units_sold: 0,
            order_count: 0,
            customer_count: 0,
        }
    }

    /// Mean revenue per order, rounded down to the cent.
    pub fn average_order_value(&self) -> Money {
        match i64::try_from(self.order_count) {
            Ok(orders) if orders > 0 => Money::from_cents(self.revenue.cents() / orders),
            _ => Money::zero(),
        }
    }
}

#[derive(Default)]
struct SellerEntry {
    revenue: Money,
    units_sold: u64,
    order_count: u64,
    customers: Vec<UserId>,
    products: HashMap<String, ProductSales>,
}

#[derive(Default)]
struct SellerDashboardState {
    sellers: HashMap<UserId, SellerEntry>,
    position: ProjectionPosition,
}

/// Per-seller revenue and product sales. Failed payments are ignored.
#[derive(Clone, Default)]
pub struct SellerDashboardView {
    state: Arc<RwLock<SellerDashboardState>>,
}

impl SellerDashboardView {
    /// Creates an empty dashboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a seller's totals; all zero if they have sold nothing.
    pub async fn dashboard(&self, seller_id: &UserId) -> SellerDashboard {
        let state = self.state.read().await;
        match state.sellers.get(seller_id) {
            Some(entry) => SellerDashboard {
                seller_id: seller_id.clone(),
                revenue: entry.revenue,
                units_sold: entry.units_sold,
                order_count: entry.order_count,
                customer_count: entry.customers.len(),
            },
            None => SellerDashboard::empty(seller_id.clone()),
        }
    }

    /// Returns a seller's best products by revenue, then units, then id.
    pub async fn top_products(&self, seller_id: &UserId, limit: usize) -> Vec<ProductSales> {
        let state = self.state.read().await;
        let Some(entry) = state.sellers.get(seller_id) else {
            return Vec::new();
        };

        let mut products: Vec<ProductSales> = entry.products.values().cloned().collect();
        products.sort_by(|a, b| {
            b.revenue
                .cmp(&a.revenue)
                .then_with(|| b.units_sold.cmp(&a.units_sold))
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
        products.truncate(limit);
        products
    }

    /// Returns every seller with at least one completed sale.
    pub async fn seller_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.state.read().await.sellers.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl Projection for SellerDashboardView {
    fn name(&self) -> &'static str {
        "SellerDashboardView"
    }

    async fn handle(&self, transaction: &Transaction) -> Result<()> {
        let mut state = self.state.write().await;

        if transaction.is_completed() {
            for seller_id in transaction.seller_ids() {
                let entry = state.sellers.entry(seller_id.clone()).or_default();
                entry.order_count += 1;
                if !entry.customers.contains(&transaction.user_id) {
                    entry.customers.push(transaction.user_id.clone());
                }

                for item in transaction.items_for_seller(&seller_id) {
                    let units = u64::from(item.quantity);
                    let revenue = item.line_total();
                    entry.units_sold += units;
                    entry.revenue += revenue;

                    let sales = entry
                        .products
                        .entry(item.id.clone())
                        .or_insert_with(|| ProductSales {
                            product_id: item.id.clone(),
                            name: item.name.clone(),
                            units_sold: 0,
                            revenue: Money::zero(),
                        });
                    sales.units_sold += units;
                    sales.revenue += revenue;
                }
            }
        }

        state.position = state.position.advance();
        Ok(())
    }

    async fn position(&self) -> ProjectionPosition {
        self.state.read().await.position
    }

    async fn reset(&self) -> Result<()> {
        *self.state.write().await = SellerDashboardState::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{CartItem, PaymentMethod, ShippingAddress};

    fn jane() -> UserId {
        UserId::new("seller1")
    }

    fn completed(buyer: &str, items: Vec<CartItem>) -> Transaction {
        let mut tx = Transaction::pending(
            UserId::new(buyer),
            items,
            ShippingAddress::default(),
            PaymentMethod::CreditCard,
        );
        tx.complete().unwrap();
        tx
    }

    fn mixed_order(buyer: &str) -> Transaction {
        completed(
            buyer,
            vec![
                CartItem::new("p4", "Mug", Money::from_cents(1850), 2, "seller1", "Jane"),
                CartItem::new("p1", "Headphones", Money::from_cents(12999), 1, "seller2", "Tech"),
                CartItem::new("p8", "Book", Money::from_cents(3999), 1, "seller1", "Jane"),
            ],
        )
    }

    #[tokio::test]
    async fn test_revenue_counts_only_own_lines() {
        let view = SellerDashboardView::new();
        view.handle(&mixed_order("buyer1")).await.unwrap();

        let dashboard = view.dashboard(&jane()).await;
        assert_eq!(dashboard.revenue.cents(), 3700 + 3999);
        assert_eq!(dashboard.units_sold, 3);
        assert_eq!(dashboard.order_count, 1);

        let gadgets = view.dashboard(&UserId::new("seller2")).await;
        assert_eq!(gadgets.revenue.cents(), 12999);
    }

    #[tokio::test]
    async fn test_failed_payments_are_ignored() {
        let view = SellerDashboardView::new();
        let mut failed = Transaction::pending(
            UserId::new("buyer1"),
            vec![CartItem::new("p4", "Mug", Money::from_cents(1850), 1, "seller1", "Jane")],
            ShippingAddress::default(),
            PaymentMethod::CreditCard,
        );
        failed.fail("declined").unwrap();

        view.handle(&failed).await.unwrap();

        assert_eq!(view.dashboard(&jane()).await, SellerDashboard::empty(jane()));
        assert_eq!(view.position().await.transactions_processed, 1);
        assert!(view.seller_ids().await.is_empty());
    }

    #[tokio::test]
    async fn test_top_products_ranked_by_revenue() {
        let view = SellerDashboardView::new();
        view.handle(&mixed_order("buyer1")).await.unwrap();
        view.handle(&mixed_order("buyer2")).await.unwrap();

        let top = view.top_products(&jane(), 1).await;
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].product_id, "p8");
        assert_eq!(top[0].units_sold, 2);

        let all = view.top_products(&jane(), 10).await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].revenue.cents(), 7400);
        assert!(view.top_products(&UserId::new("nobody"), 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_customers_and_average_order_value() {
        let view = SellerDashboardView::new();
        view.handle(&mixed_order("buyer1")).await.unwrap();
        view.handle(&mixed_order("buyer1")).await.unwrap();
        view.handle(&mixed_order("buyer2")).await.unwrap();

        let dashboard = view.dashboard(&jane()).await;
        assert_eq!(dashboard.order_count, 3);
        assert_eq!(dashboard.customer_count, 2);
        assert_eq!(dashboard.average_order_value().cents(), 7699);
        assert_eq!(
            SellerDashboard::empty(jane()).average_order_value(),
            Money::zero()
        );
    }
}
