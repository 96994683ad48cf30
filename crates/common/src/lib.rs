//! Shared types for the marketplace storefront.

pub mod money;
pub mod types;

pub use money::Money;
pub use types::{RecordId, UserId};
