//! src/storage/mod.rs
//!
//! The key-value port the persistence bridge writes through. Stands in for
//! the browser profile storage the registry originally lived in: one string
//! value per key, overwritten whole on every put.

use crate::error::Error;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Durable key-value storage for serialized registry state.
#[cfg_attr(test, mockall::automock)]
pub trait ProfileStore: Send + Sync {
    /// Read the value under `key`; `None` when the key has never been
    /// written.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Write `value` under `key`, overwriting any previous value.
    fn put(&self, key: &str, value: &str) -> Result<(), Error>;
}

/// A shared handle to a store is itself a store. Lets a caller keep a view
/// onto the same backend it hands to the service.
impl<S: ProfileStore + ?Sized> ProfileStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), Error> {
        (**self).put(key, value)
    }
}
