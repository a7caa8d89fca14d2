//! Persistent key/value storage.
//!
//! Provides [`FileKeyValueStore`], the on-disk implementation of the
//! [`KeyValueStore`](mindmingle_application::KeyValueStore) port.

mod file_store;

pub use file_store::FileKeyValueStore;
