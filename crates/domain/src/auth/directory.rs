use super::{Role, User};

/// Id of the admin account that receives order fan-out notifications.
pub const DEFAULT_ADMIN_ID: &str = "admin1";

/// A fixed account with its plain-text mock password.
#[derive(Debug, Clone)]
pub struct MockAccount {
    pub user: User,
    pub password: String,
}

impl MockAccount {
    /// Pairs a user with their mock password.
    pub fn new(user: User, password: impl Into<String>) -> Self {
        Self {
            user,
            password: password.into(),
        }
    }
}

/// The three fixed credential lists: buyers, sellers and admins.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    buyers: Vec<MockAccount>,
    sellers: Vec<MockAccount>,
    admins: Vec<MockAccount>,
}

impl UserDirectory {
    /// Creates a directory from explicit lists.
    pub fn new(
        buyers: Vec<MockAccount>,
        sellers: Vec<MockAccount>,
        admins: Vec<MockAccount>,
    ) -> Self {
        Self {
            buyers,
            sellers,
            admins,
        }
    }

    /// The stock mock accounts shipped with the storefront.
    pub fn mock() -> Self {
        let buyers = vec![
            MockAccount::new(
                User::new("buyer1", "John Buyer", "buyer@example.com", Role::Buyer),
                "password",
            ),
            MockAccount::new(
                User::new("buyer2", "Emily Shopper", "emily@example.com", Role::Buyer),
                "password",
            ),
        ];
        let sellers = vec![
            MockAccount::new(
                User::new("seller1", "Jane Seller", "seller@example.com", Role::Seller),
                "password",
            ),
            MockAccount::new(
                User::new("seller2", "Tech Gadgets Co", "gadgets@example.com", Role::Seller),
                "password",
            ),
        ];
        let admins = vec![MockAccount::new(
            User::new(DEFAULT_ADMIN_ID, "Admin User", "admin@example.com", Role::Admin),
            "admin123",
        )];

        Self::new(buyers, sellers, admins)
    }

    pub fn buyers(&self) -> &[MockAccount] {
        &self.buyers
    }

    pub fn sellers(&self) -> &[MockAccount] {
        &self.sellers
    }

    pub fn admins(&self) -> &[MockAccount] {
        &self.admins
    }

    /// Iterates over all three lists, buyers first.
    pub fn accounts(&self) -> impl Iterator<Item = &MockAccount> {
        self.buyers
            .iter()
            .chain(self.sellers.iter())
            .chain(self.admins.iter())
    }

    /// Finds a mock account by email (case-insensitive).
    pub fn find_by_email(&self, email: &str) -> Option<&MockAccount> {
        self.accounts().find(|account| account.user.has_email(email))
    }

    /// Finds a mock user by id.
    pub fn find_by_id(&self, id: &str) -> Option<&User> {
        self.accounts()
            .map(|account| &account.user)
            .find(|user| user.id.as_str() == id)
    }

    /// Returns true if any of the three lists holds this email.
    pub fn contains_email(&self, email: &str) -> bool {
        self.find_by_email(email).is_some()
    }
}
