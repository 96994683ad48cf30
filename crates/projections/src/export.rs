//! CSV downloads of ledger and directory data.
//!
//! Output follows RFC 4180: CRLF line endings, a header row, and fields
//! containing a comma, quote or line break wrapped in quotes with inner
//! quotes doubled. Every export has exactly one row per input record plus
//! the header.

use domain::{Product, Transaction, User};

const TRANSACTION_HEADER: [&str; 9] = [
    "id", "date", "userId", "status", "paymentMethod", "items", "units", "amount", "shipTo",
];
const PRODUCT_HEADER: [&str; 8] = [
    "id", "name", "category", "price", "stock", "rating", "sellerId", "sellerName",
];
const USER_HEADER: [&str; 4] = ["id", "name", "email", "role"];

/// Accumulates CSV rows into a string.
#[derive(Debug, Default)]
struct CsvWriter {
    out: String,
    rows: usize,
}

impl CsvWriter {
    fn row<I, F>(&mut self, fields: I)
    where
        I: IntoIterator<Item = F>,
        F: AsRef<str>,
    {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            push_field(&mut self.out, field.as_ref());
        }
        self.out.push_str("\r\n");
        self.rows += 1;
    }

    fn finish(self) -> String {
        tracing::debug!(rows = self.rows, bytes = self.out.len(), "csv export built");
        self.out
    }
}

fn push_field(out: &mut String, field: &str) {
    let needs_quotes = field.contains([',', '"', '\r', '\n']);
    if !needs_quotes {
        out.push_str(field);
        return;
    }
    out.push('"');
    out.push_str(&field.replace('"', "\"\""));
    out.push('"');
}

/// One row per transaction, in the order given.
pub fn transactions_csv(transactions: &[Transaction]) -> String {
    let mut csv = CsvWriter::default();
    csv.row(TRANSACTION_HEADER);

    for tx in transactions {
        let items = tx
            .items
            .iter()
            .map(|item| format!("{} x{}", item.name, item.quantity))
            .collect::<Vec<_>>()
            .join("; ");

        csv.row([
            tx.id.to_string(),
            tx.date.to_rfc3339(),
            tx.user_id.to_string(),
            tx.status.to_string(),
            tx.payment_method.to_string(),
            items,
            tx.unit_count().to_string(),
            tx.amount.to_decimal_string(),
            tx.shipping_address.to_string(),
        ]);
    }

    csv.finish()
}

pub fn products_csv(products: &[Product]) -> String {
    let mut csv = CsvWriter::default();
    csv.row(PRODUCT_HEADER);

    for product in products {
        csv.row([
            product.id.clone(),
            product.name.clone(),
            product.category.clone(),
            product.price.to_decimal_string(),
            product.stock.to_string(),
            format!("{:.1}", product.rating),
            product.seller_id.to_string(),
            product.seller_name.clone(),
        ]);
    }

    csv.finish()
}

/// Passwords are never exported.
pub fn users_csv(users: &[User]) -> String {
    let mut csv = CsvWriter::default();
    csv.row(USER_HEADER);

    for user in users {
        csv.row([
            user.id.as_str(),
            user.name.as_str(),
            user.email.as_str(),
            user.role.as_str(),
        ]);
    }

    csv.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Money, UserId};
    use domain::{CartItem, Catalog, PaymentMethod, Role, ShippingAddress};

    fn lines(csv: &str) -> Vec<&str> {
        csv.split_terminator("\r\n").collect()
    }

    #[test]
    fn test_plain_fields_are_not_quoted() {
        let mut out = String::new();
        push_field(&mut out, "Smart Watch");
        assert_eq!(out, "Smart Watch");
    }

    #[test]
    fn test_special_fields_are_quoted() {
        let cases = [
            ("a,b", "\"a,b\""),
            ("say \"hi\"", "\"say \"\"hi\"\"\""),
            ("two\nlines", "\"two\nlines\""),
        ];
        for (input, expected) in cases {
            let mut out = String::new();
            push_field(&mut out, input);
            assert_eq!(out, expected, "{input}");
        }
    }

    #[test]
    fn test_products_csv_has_header_plus_one_row_each() {
        let catalog = Catalog::mock();
        let csv = products_csv(catalog.all());
        let rows = lines(&csv);

        assert_eq!(rows.len(), catalog.all().len() + 1);
        assert_eq!(rows[0], "id,name,category,price,stock,rating,sellerId,sellerName");
        assert_eq!(
            rows[1],
            "p1,Wireless Headphones,Electronics,129.99,25,4.5,seller2,Tech Gadgets Co"
        );
    }

    #[test]
    fn test_transactions_csv_quotes_addresses() {
        let mut tx = Transaction::pending(
            UserId::new("buyer1"),
            vec![CartItem::new("p4", "Mug", Money::from_cents(1850), 2, "seller1", "Jane")],
            ShippingAddress {
                full_name: "John Buyer".into(),
                street: "1 Main St".into(),
                city: "Springfield".into(),
                state: "IL".into(),
                postal_code: "62701".into(),
                country: "US".into(),
            },
            PaymentMethod::PayPal,
        );
        tx.complete().unwrap();

        let csv = transactions_csv(std::slice::from_ref(&tx));
        let rows = lines(&csv);
        assert_eq!(rows.len(), 2);
        assert!(rows[1].starts_with(&tx.id.to_string()));
        assert!(rows[1].contains(",completed,paypal,Mug x2,2,37.00,\"John Buyer, 1 Main St"));
    }

    #[test]
    fn test_users_csv() {
        let users = vec![
            User::new("buyer1", "John Buyer", "buyer@example.com", Role::Buyer),
            User::new("seller2", "Gadgets, Inc.", "g@example.com", Role::Seller),
        ];
        let csv = users_csv(&users);

        assert_eq!(
            csv,
            "id,name,email,role\r\n\
             buyer1,John Buyer,buyer@example.com,buyer\r\n\
             seller2,\"Gadgets, Inc.\",g@example.com,seller\r\n"
        );
    }

    #[test]
    fn test_empty_input_is_header_only() {
        assert_eq!(lines(&transactions_csv(&[])).len(), 1);
        assert_eq!(lines(&users_csv(&[])).len(), 1);
    }
}
