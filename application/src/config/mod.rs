//! Application-level configuration.
//!
//! - [`StorageKeys`]: names of the persisted keys, namespaced by app name

pub mod storage_keys;

pub use storage_keys::StorageKeys;
