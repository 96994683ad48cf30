//! Read-only product catalog.

use common::{Money, UserId};
use serde::{Deserialize, Serialize};

/// A product listed by a seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub category: String,
    pub image: String,
    pub seller_id: UserId,
    pub seller_name: String,
    pub stock: u32,
    /// Average review score, 0.0 to 5.0.
    pub rating: f32,
}

impl Product {
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// The mock product table.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Creates a catalog over the given products.
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The stock mock products, split across `seller1` and `seller2`.
    pub fn mock() -> Self {
        let jane = ("seller1", "Jane Seller");
        let gadgets = ("seller2", "Tech Gadgets Co");

        let rows: [(&str, &str, &str, i64, &str, (&str, &str), u32, f32); 10] = [
            ("p1", "Wireless Headphones", "Over-ear noise cancelling headphones with 30h battery.", 12999, "Electronics", gadgets, 25, 4.5),
            ("p2", "Smart Watch", "Fitness tracking, heart-rate monitor and notifications.", 19999, "Electronics", gadgets, 12, 4.2),
            ("p3", "USB-C Charging Cable", "Braided 2m fast-charging cable.", 1299, "Electronics", gadgets, 200, 4.7),
            ("p4", "Ceramic Coffee Mug", "Hand-glazed 350ml mug, dishwasher safe.", 1850, "Home & Kitchen", jane, 60, 4.8),
            ("p5", "Linen Throw Pillow", "Stonewashed linen cover with feather insert.", 3400, "Home & Kitchen", jane, 18, 4.1),
            ("p6", "Leather Tote Bag", "Full-grain leather tote with inner zip pocket.", 8900, "Fashion", jane, 7, 4.6),
            ("p7", "Wool Beanie", "Merino wool ribbed beanie.", 2450, "Fashion", jane, 40, 4.3),
            ("p8", "The Rust Handbook", "A practical guide to systems programming.", 3999, "Books", jane, 15, 4.9),
            ("p9", "Yoga Mat", "Non-slip 6mm mat with carry strap.", 4200, "Sports", gadgets, 30, 4.4),
            ("p10", "Insulated Water Bottle", "Keeps drinks cold for 24 hours.", 2999, "Sports", gadgets, 0, 4.0),
        ];

        let products = rows
            .into_iter()
            .map(
                |(id, name, description, cents, category, (seller_id, seller_name), stock, rating)| {
                    Product {
                        id: id.to_string(),
                        name: name.to_string(),
                        description: description.to_string(),
                        price: Money::from_cents(cents),
                        category: category.to_string(),
                        image: format!("/images/products/{id}.jpg"),
                        seller_id: UserId::new(seller_id),
                        seller_name: seller_name.to_string(),
                        stock,
                        rating,
                    }
                },
            )
            .collect();

        Self::new(products)
    }

    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Case-insensitive search over name, description and category.
    ///
    /// A blank query returns every product.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| needle.is_empty() || p.matches(&needle))
            .collect()
    }

    pub fn by_category(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category.eq_ignore_ascii_case(category))
            .collect()
    }

    pub fn by_seller(&self, seller_id: &UserId) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| &p.seller_id == seller_id)
            .collect()
    }

    /// Returns the distinct categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.products.iter().map(|p| p.category.as_str()).collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_catalog_is_split_across_sellers() {
        let catalog = Catalog::mock();
        let jane = catalog.by_seller(&UserId::new("seller1"));
        let gadgets = catalog.by_seller(&UserId::new("seller2"));

        assert!(!jane.is_empty());
        assert!(!gadgets.is_empty());
        assert_eq!(jane.len() + gadgets.len(), catalog.all().len());
    }

    #[test]
    fn search_is_case_insensitive() {
        let catalog = Catalog::mock();
        let hits = catalog.search("HEADPHONES");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "p1");

        // Matches on category too.
        assert_eq!(catalog.search("books").len(), 1);
        assert_eq!(catalog.search("  ").len(), catalog.all().len());
        assert!(catalog.search("submarine").is_empty());
    }

    #[test]
    fn categories_are_sorted_and_distinct() {
        let catalog = Catalog::mock();
        assert_eq!(
            catalog.categories(),
            vec!["Books", "Electronics", "Fashion", "Home & Kitchen", "Sports"]
        );
        assert_eq!(catalog.by_category("electronics").len(), 3);
    }

    #[test]
    fn get_and_stock() {
        let catalog = Catalog::mock();
        assert!(catalog.get("p4").unwrap().in_stock());
        assert!(!catalog.get("p10").unwrap().in_stock());
        assert!(catalog.get("p404").is_none());
    }
}
