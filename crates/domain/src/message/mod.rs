//! Direct messages between users.

mod record;
mod store;

pub use record::{ConversationSummary, Message};
pub use store::MessageStore;
