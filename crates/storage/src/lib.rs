//! Key/value storage standing in for browser local storage.
//!
//! Stores keep their authoritative state in memory and mirror it here as
//! JSON strings, read once at mount and written on every change.

pub mod error;
pub mod file;
pub mod keys;
pub mod memory;
pub mod store;

pub use error::{Result, StorageError};
pub use file::FileStorage;
pub use memory::InMemoryStorage;
pub use store::{Storage, StorageExt, validate_key};
