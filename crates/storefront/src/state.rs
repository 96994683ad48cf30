//! Composition root: one browser session's worth of stores.

use std::sync::Arc;

use checkout::{
    CheckoutCoordinator, CheckoutSettings, PaymentGateway, SimulatedPaymentGateway,
    TransactionLedger,
};
use domain::{
    AuthStore, CartStore, Catalog, DomainError, MessageStore, NotificationStore, UserDirectory,
};
use projections::{
    AdminDashboardView, OrderHistoryView, ProjectionProcessor, SellerDashboardView,
};
use storage::{FileStorage, InMemoryStorage, Storage};
use tokio::sync::Mutex;

use crate::config::Config;

pub type SharedStorage = Arc<dyn Storage>;
pub type SharedGateway = Arc<dyn PaymentGateway>;

/// Shared application state accessible from all handlers.
///
/// Holds exactly one session: one current user and one cart.
pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
    pub auth: AuthStore<SharedStorage>,
    pub cart: CartStore,
    pub notifications: NotificationStore<SharedStorage>,
    pub messages: MessageStore<SharedStorage>,
    pub checkout: CheckoutCoordinator<SharedStorage, SharedGateway>,
    pub ledger: TransactionLedger,
    pub order_history: OrderHistoryView,
    pub seller_dashboard: SellerDashboardView,
    pub admin_dashboard: AdminDashboardView,
    processor: Mutex<ProjectionProcessor>,
}

impl AppState {
    /// Wires the stores over `storage` and restores the mirrored session.
    pub async fn new(
        config: Config,
        storage: SharedStorage,
        gateway: SharedGateway,
    ) -> Result<Arc<Self>, DomainError> {
        let auth = AuthStore::new(storage.clone(), UserDirectory::mock())
            .with_latency(config.auth_delay);
        auth.restore().await?;

        let cart = CartStore::new();
        let notifications = NotificationStore::new(storage.clone());
        let messages = MessageStore::new(storage, notifications.clone());
        let ledger = TransactionLedger::new();

        let checkout = CheckoutCoordinator::new(
            auth.clone(),
            cart.clone(),
            notifications.clone(),
            ledger.clone(),
            gateway,
        )
        .with_settings(CheckoutSettings {
            admin_id: config.admin_id.clone(),
        });

        let order_history = OrderHistoryView::new();
        let seller_dashboard = SellerDashboardView::new();
        let admin_dashboard = AdminDashboardView::new();

        let mut processor = ProjectionProcessor::new(ledger.clone());
        processor.register(Box::new(order_history.clone()));
        processor.register(Box::new(seller_dashboard.clone()));
        processor.register(Box::new(admin_dashboard.clone()));

        Ok(Arc::new(Self {
            config,
            catalog: Catalog::mock(),
            auth,
            cart,
            notifications,
            messages,
            checkout,
            ledger,
            order_history,
            seller_dashboard,
            admin_dashboard,
            processor: Mutex::new(processor),
        }))
    }

    /// Brings the read models up to date with the ledger.
    pub async fn refresh_views(&self) -> projections::Result<u64> {
        self.processor.lock().await.run_catch_up().await
    }
}

/// Builds the state the binary runs with: storage per `data_dir`, simulated payments.
pub async fn create_state(config: Config) -> Result<Arc<AppState>, DomainError> {
    let storage: SharedStorage = match &config.data_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "using file storage");
            Arc::new(FileStorage::open(dir).await?)
        }
        None => {
            tracing::info!("using in-memory storage");
            Arc::new(InMemoryStorage::new())
        }
    };
    let gateway: SharedGateway = Arc::new(SimulatedPaymentGateway::new(
        config.payment_success_rate,
        config.payment_delay,
    ));

    AppState::new(config, storage, gateway).await
}
