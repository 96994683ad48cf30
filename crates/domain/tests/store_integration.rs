//! Integration tests for the domain stores.
//!
//! These tests exercise the stores against both storage backends, including
//! restoring state from a previously written mirror.

use common::{Money, UserId};
use domain::{
    AuthError, AuthStore, CartItem, CartStore, Catalog, DomainError, MessageStore,
    NotificationStore, Registration, Role, UserDirectory,
};
use storage::{FileStorage, InMemoryStorage, Storage, StorageExt, keys};

fn auth(storage: InMemoryStorage) -> AuthStore<InMemoryStorage> {
    AuthStore::new(storage, UserDirectory::mock())
}

mod registration {
    use super::*;

    #[tokio::test]
    async fn every_mock_list_blocks_registration() {
        let directory = UserDirectory::mock();
        let emails: Vec<String> = directory
            .buyers()
            .iter()
            .chain(directory.sellers())
            .chain(directory.admins())
            .map(|account| account.user.email.clone())
            .collect();
        assert!(emails.len() >= 3);

        let store = auth(InMemoryStorage::new());
        for email in emails {
            for role in [Role::Buyer, Role::Seller, Role::Admin] {
                let err = store
                    .register(Registration::new("Dup", email.to_uppercase(), "pw", role))
                    .await
                    .unwrap_err();
                assert!(
                    matches!(err, DomainError::Auth(AuthError::EmailAlreadyRegistered)),
                    "{email} as {role}: {err}"
                );
                assert_eq!(err.to_string(), "Email already registered");
            }
        }
    }

    #[tokio::test]
    async fn registered_email_cannot_register_twice() {
        let store = auth(InMemoryStorage::new());
        store
            .register(Registration::new("Ann", "ann@example.com", "pw", Role::Buyer))
            .await
            .unwrap();

        let err = store
            .register(Registration::new("Ann 2", "ann@example.com", "pw2", Role::Seller))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Auth(AuthError::EmailAlreadyRegistered)
        ));
    }

    #[tokio::test]
    async fn registration_signs_in_and_persists() {
        let storage = InMemoryStorage::new();
        let store = auth(storage.clone());

        let user = store
            .register(Registration::new(" Ann ", "ann@example.com", "pw", Role::Seller))
            .await
            .unwrap();

        assert_eq!(user.name, "Ann");
        assert_eq!(user.role, Role::Seller);
        assert_eq!(store.current_user().await, Some(user.clone()));
        assert!(storage.contains(keys::SESSION_USER).await.unwrap());
        assert!(storage.contains(keys::REGISTERED_USERS).await.unwrap());
    }

    #[tokio::test]
    async fn registered_user_can_log_in_after_restore() {
        let storage = InMemoryStorage::new();
        auth(storage.clone())
            .register(Registration::new("Ann", "ann@example.com", "pw", Role::Buyer))
            .await
            .unwrap();

        let mounted = auth(storage);
        mounted.restore().await.unwrap();
        mounted.logout().await.unwrap();

        let user = mounted.login("ann@example.com", "pw").await.unwrap();
        assert_eq!(user.email, "ann@example.com");
    }
}

mod session {
    use super::*;

    #[tokio::test]
    async fn session_survives_restore() {
        let storage = InMemoryStorage::new();
        auth(storage.clone())
            .login("seller@example.com", "password")
            .await
            .unwrap();

        let mounted = auth(storage);
        assert!(!mounted.is_authenticated().await);
        mounted.restore().await.unwrap();

        let user = mounted.current_user().await.unwrap();
        assert_eq!(user.id.as_str(), "seller1");
    }

    #[tokio::test]
    async fn unreadable_session_is_discarded() {
        let storage = InMemoryStorage::new();
        storage
            .set_item(keys::SESSION_USER, "{oops".to_string())
            .await
            .unwrap();

        let mounted = auth(storage);
        mounted.restore().await.unwrap();
        assert!(mounted.current_user().await.is_none());
    }

    #[tokio::test]
    async fn logout_removes_mirrored_session() {
        let storage = InMemoryStorage::new();
        let store = auth(storage.clone());
        store.login("admin@example.com", "admin123").await.unwrap();
        store.logout().await.unwrap();

        assert!(!storage.contains(keys::SESSION_USER).await.unwrap());
    }

    #[tokio::test]
    async fn latency_is_applied_to_login() {
        let store = auth(InMemoryStorage::new()).with_latency(std::time::Duration::from_millis(20));
        let started = std::time::Instant::now();
        store.login("buyer@example.com", "password").await.unwrap();
        assert!(started.elapsed() >= std::time::Duration::from_millis(20));
    }
}

mod cart {
    use super::*;

    #[tokio::test]
    async fn subtotal_matches_catalog_prices() {
        let catalog = Catalog::mock();
        let cart = CartStore::new();

        let picks = [("p1", 2u32), ("p4", 3), ("p8", 1)];
        for (id, qty) in picks {
            let product = catalog.get(id).unwrap();
            cart.add_item(CartItem::from_product(product, qty)).await;
        }

        let expected: Money = picks
            .iter()
            .map(|(id, qty)| catalog.get(id).unwrap().price.multiply(*qty))
            .sum();
        assert_eq!(cart.subtotal().await, expected);

        for line in cart.items().await {
            assert!(line.quantity >= 1);
        }
    }

    #[tokio::test]
    async fn quantity_never_drops_below_one() {
        let catalog = Catalog::mock();
        let cart = CartStore::new();
        cart.add_item(CartItem::from_product(catalog.get("p3").unwrap(), 0))
            .await;

        for requested in [-10, -1, 0, 1, 5, 0] {
            cart.update_quantity("p3", requested).await.unwrap();
            let items = cart.items().await;
            let line = &items[0];
            assert!(line.quantity >= 1);
            assert_eq!(
                cart.subtotal().await,
                line.price.multiply(line.quantity)
            );
        }
    }
}

mod messaging {
    use super::*;

    #[tokio::test]
    async fn messages_and_notifications_survive_file_storage_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let directory = UserDirectory::mock();
        let buyer = directory.find_by_id("buyer1").unwrap().clone();
        let seller = UserId::new("seller1");

        {
            let storage = FileStorage::open(dir.path()).await.unwrap();
            let notifications = NotificationStore::new(storage.clone());
            let messages = MessageStore::new(storage, notifications);
            messages.send(&buyer, &seller, "Hello!").await.unwrap();
        }

        let storage = FileStorage::open(dir.path()).await.unwrap();
        let notifications = NotificationStore::new(storage.clone());
        let messages = MessageStore::new(storage, notifications.clone());

        let conversation = messages.conversation(&buyer.id, &seller).await.unwrap();
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation[0].content, "Hello!");
        assert_eq!(notifications.unread_count(&seller).await.unwrap(), 1);

        notifications.mark_all_as_read(&seller).await.unwrap();
        assert_eq!(notifications.unread_count(&seller).await.unwrap(), 0);
    }
}
