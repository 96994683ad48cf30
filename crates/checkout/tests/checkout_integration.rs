//! Integration tests for the checkout workflow.

use std::sync::Arc;
use std::time::Duration;

use checkout::{
    CheckoutCoordinator, CheckoutError, CheckoutSettings, PaymentGateway, PaymentOutcome,
    ScriptedPaymentGateway, SimulatedPaymentGateway, TransactionLedger,
};
use common::UserId;
use domain::{
    AuthStore, CartItem, CartStore, Catalog, NotificationStore, NotificationType, PaymentMethod,
    ShippingAddress, TransactionStatus, UserDirectory,
};
use storage::InMemoryStorage;

type TestCoordinator = CheckoutCoordinator<InMemoryStorage, ScriptedPaymentGateway>;

struct TestHarness {
    coordinator: TestCoordinator,
    auth: AuthStore<InMemoryStorage>,
    cart: CartStore,
    notifications: NotificationStore<InMemoryStorage>,
    ledger: TransactionLedger,
    gateway: ScriptedPaymentGateway,
    catalog: Catalog,
}

impl TestHarness {
    fn new() -> Self {
        let storage = InMemoryStorage::new();
        let auth = AuthStore::new(storage.clone(), UserDirectory::mock());
        let cart = CartStore::new();
        let notifications = NotificationStore::new(storage);
        let ledger = TransactionLedger::new();
        let gateway = ScriptedPaymentGateway::new();

        let coordinator = CheckoutCoordinator::new(
            auth.clone(),
            cart.clone(),
            notifications.clone(),
            ledger.clone(),
            gateway.clone(),
        );

        Self {
            coordinator,
            auth,
            cart,
            notifications,
            ledger,
            gateway,
            catalog: Catalog::mock(),
        }
    }

    async fn sign_in_buyer(&self) {
        self.auth.login("buyer@example.com", "password").await.unwrap();
    }

    /// Fills the cart with lines from both sellers.
    async fn fill_cart(&self) {
        for (id, qty) in [("p4", 2), ("p1", 1), ("p8", 1)] {
            let product = self.catalog.get(id).unwrap();
            self.cart.add_item(CartItem::from_product(product, qty)).await;
        }
    }

    async fn unread(&self, user: &str) -> usize {
        self.notifications
            .unread_count(&UserId::new(user))
            .await
            .unwrap()
    }
}

fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "John Buyer".into(),
        street: "1 Main St".into(),
        city: "Springfield".into(),
        state: "IL".into(),
        postal_code: "62701".into(),
        country: "US".into(),
    }
}

#[tokio::test]
async fn test_successful_payment_completes_and_clears_cart() {
    let h = TestHarness::new();
    h.sign_in_buyer().await;
    h.fill_cart().await;
    let subtotal = h.cart.subtotal().await;

    let outcome = h
        .coordinator
        .process_payment(address(), PaymentMethod::CreditCard)
        .await
        .unwrap();

    assert!(outcome.is_success());
    let tx = outcome.transaction();
    assert_eq!(tx.status, TransactionStatus::Completed);
    assert_eq!(tx.amount, subtotal);
    assert_eq!(tx.user_id.as_str(), "buyer1");
    assert_eq!(tx.items.len(), 3);
    assert_eq!(tx.shipping_address, address());

    assert!(h.cart.is_empty().await);
    assert_eq!(h.ledger.len().await, 1);
    assert_eq!(h.gateway.charged_amounts(), vec![subtotal]);
}

#[tokio::test]
async fn test_successful_payment_fans_out_notifications() {
    let h = TestHarness::new();
    h.sign_in_buyer().await;
    h.fill_cart().await;

    h.coordinator
        .process_payment(address(), PaymentMethod::PayPal)
        .await
        .unwrap();

    assert_eq!(h.unread("buyer1").await, 1);
    assert_eq!(h.unread("seller1").await, 1);
    assert_eq!(h.unread("seller2").await, 1);
    assert_eq!(h.unread("admin1").await, 1);
    assert_eq!(h.unread("buyer2").await, 0);

    let buyer = h.notifications.list(&UserId::new("buyer1")).await.unwrap();
    assert_eq!(buyer[0].kind, NotificationType::Order);
    assert_eq!(buyer[0].title, "Order Placed");
}

#[tokio::test]
async fn test_failed_payment_leaves_cart_and_sends_nothing() {
    let h = TestHarness::new();
    h.gateway.set_decline_all(true);
    h.sign_in_buyer().await;
    h.fill_cart().await;
    let before = h.cart.items().await;

    let outcome = h
        .coordinator
        .process_payment(address(), PaymentMethod::DebitCard)
        .await
        .unwrap();

    match &outcome {
        PaymentOutcome::Failed { transaction, error } => {
            assert_eq!(transaction.status, TransactionStatus::Failed);
            assert_eq!(error, "Payment declined");
            assert_eq!(transaction.failure_reason.as_deref(), Some("Payment declined"));
        }
        other => panic!("expected failure, got {other:?}"),
    }

    assert_eq!(h.cart.items().await, before);
    assert_eq!(h.ledger.len().await, 1);
    for user in ["buyer1", "seller1", "seller2", "admin1"] {
        assert_eq!(h.unread(user).await, 0, "{user}");
    }
}

#[tokio::test]
async fn test_checkout_requires_session() {
    let h = TestHarness::new();
    h.fill_cart().await;

    let err = h
        .coordinator
        .process_payment(address(), PaymentMethod::CreditCard)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::NotAuthenticated));
    assert_eq!(h.gateway.charge_count(), 0);
    assert!(h.ledger.is_empty().await);
    assert!(!h.cart.is_empty().await);
}

#[tokio::test]
async fn test_empty_cart_is_charged_as_zero_amount() {
    let h = TestHarness::new();
    h.sign_in_buyer().await;

    let outcome = h
        .coordinator
        .process_payment(address(), PaymentMethod::CreditCard)
        .await
        .unwrap();

    let tx = outcome.transaction();
    assert!(tx.amount.is_zero());
    assert!(tx.items.is_empty());
    // Buyer and admin only; no sellers in the order.
    assert_eq!(h.unread("buyer1").await, 1);
    assert_eq!(h.unread("admin1").await, 1);
}

#[tokio::test]
async fn test_duplicate_invocation_records_two_transactions() {
    let h = TestHarness::new();
    h.sign_in_buyer().await;
    h.gateway.queue_outcomes([false, false]);
    h.fill_cart().await;

    let first = h
        .coordinator
        .process_payment(address(), PaymentMethod::CreditCard)
        .await
        .unwrap();
    let second = h
        .coordinator
        .process_payment(address(), PaymentMethod::CreditCard)
        .await
        .unwrap();

    assert_ne!(first.transaction().id, second.transaction().id);
    assert_eq!(h.ledger.len().await, 2);
    assert_eq!(h.gateway.charge_count(), 2);
}

#[tokio::test]
async fn test_retry_after_failure_succeeds() {
    let h = TestHarness::new();
    h.sign_in_buyer().await;
    h.gateway.queue_outcomes([false, true]);
    h.fill_cart().await;

    let first = h
        .coordinator
        .process_payment(address(), PaymentMethod::CreditCard)
        .await
        .unwrap();
    assert!(!first.is_success());
    assert!(!h.cart.is_empty().await);

    let second = h
        .coordinator
        .process_payment(address(), PaymentMethod::CreditCard)
        .await
        .unwrap();
    assert!(second.is_success());
    assert_eq!(first.transaction().amount, second.transaction().amount);
    assert!(h.cart.is_empty().await);

    let history = h.ledger.for_user(&UserId::new("buyer1")).await;
    assert_eq!(history[0].status, TransactionStatus::Completed);
    assert_eq!(history[1].status, TransactionStatus::Failed);
}

#[tokio::test]
async fn test_configured_admin_receives_notification() {
    let h = TestHarness::new();
    let coordinator = h.coordinator.clone().with_settings(CheckoutSettings {
        admin_id: UserId::new("ops"),
    });
    h.sign_in_buyer().await;
    h.fill_cart().await;

    coordinator
        .process_payment(address(), PaymentMethod::CreditCard)
        .await
        .unwrap();

    assert_eq!(h.unread("ops").await, 1);
    assert_eq!(h.unread("admin1").await, 0);
}

#[tokio::test]
async fn test_email_like_admin_id_completes_checkout() {
    let h = TestHarness::new();
    let coordinator = h.coordinator.clone().with_settings(CheckoutSettings {
        admin_id: UserId::new("ops@shop.test"),
    });
    h.sign_in_buyer().await;
    h.fill_cart().await;

    let outcome = coordinator
        .process_payment(address(), PaymentMethod::CreditCard)
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(h.unread("ops@shop.test").await, 1);
    assert_eq!(h.ledger.len().await, 1);
}

#[tokio::test]
async fn test_simulated_gateway_behind_shared_handle() {
    let storage = InMemoryStorage::new();
    let auth = AuthStore::new(storage.clone(), UserDirectory::mock());
    let cart = CartStore::new();
    let gateway: Arc<dyn PaymentGateway> =
        Arc::new(SimulatedPaymentGateway::new(1.0, Duration::ZERO));
    let coordinator = CheckoutCoordinator::new(
        auth.clone(),
        cart.clone(),
        NotificationStore::new(storage),
        TransactionLedger::new(),
        gateway,
    );

    auth.login("emily@example.com", "password").await.unwrap();
    cart.add_item(CartItem::from_product(
        Catalog::mock().get("p2").unwrap(),
        1,
    ))
    .await;

    let outcome = coordinator
        .process_payment(address(), PaymentMethod::CreditCard)
        .await
        .unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.into_transaction().user_id.as_str(), "buyer2");
}

#[tokio::test]
async fn test_lines_added_during_payment_are_dropped() {
    let storage = InMemoryStorage::new();
    let auth = AuthStore::new(storage.clone(), UserDirectory::mock());
    let cart = CartStore::new();
    let coordinator = CheckoutCoordinator::new(
        auth.clone(),
        cart.clone(),
        NotificationStore::new(storage),
        TransactionLedger::new(),
        SimulatedPaymentGateway::new(1.0, Duration::from_millis(100)),
    );
    let catalog = Catalog::mock();

    auth.login("buyer@example.com", "password").await.unwrap();
    cart.add_item(CartItem::from_product(catalog.get("p4").unwrap(), 1))
        .await;

    let (outcome, ()) = tokio::join!(
        coordinator.process_payment(address(), PaymentMethod::DebitCard),
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cart.add_item(CartItem::from_product(catalog.get("p8").unwrap(), 1))
                .await;
        }
    );

    let transaction = outcome.unwrap().into_transaction();
    let charged: Vec<&str> = transaction.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(charged, vec!["p4"]);
    assert!(cart.is_empty().await);
}
