//! Typed wrapper with automatic JSON serialization.

use crate::store::KvStore;
use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};

/// Type-safe cache over any [`KvStore`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
#[derive(Debug, Clone)]
pub struct Cache<S> {
    store: S,
}

impl<S: KvStore> Cache<S> {
    /// Wrap a backend.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cart: Option<PersistedCart> = cache.get("aqpvet-cart:guest")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key)? {
            Some(bytes) => {
                let value: T = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.set(key, &bytes)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.store.keys()
    }
}

#[cfg(target_arch = "wasm32")]
impl Cache<crate::store::SpinStore> {
    /// Open the default Spin Key-Value store.
    pub fn open_default() -> Result<Self, CacheError> {
        Ok(Self::new(crate::store::SpinStore::open_default()?))
    }

    /// Open a named Spin Key-Value store.
    pub fn open(name: &str) -> Result<Self, CacheError> {
        Ok(Self::new(crate::store::SpinStore::open(name)?))
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```
/// let key = aqpvet_cache::cache_key!("aqpvet-cart", "guest");
/// assert_eq!(key, "aqpvet-cart:guest");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Badge {
        count: u64,
    }

    #[test]
    fn test_typed_roundtrip() {
        let cache = Cache::new(MemoryStore::new());
        cache.set("badge", &Badge { count: 3 }).unwrap();

        let badge: Option<Badge> = cache.get("badge").unwrap();
        assert_eq!(badge, Some(Badge { count: 3 }));
        assert!(cache.exists("badge").unwrap());
    }

    #[test]
    fn test_missing_key() {
        let cache = Cache::new(MemoryStore::new());
        let badge: Option<Badge> = cache.get("badge").unwrap();
        assert!(badge.is_none());
    }

    #[test]
    fn test_corrupt_value_is_serialize_error() {
        let store = MemoryStore::new();
        store.set("badge", b"not json").unwrap();

        let cache = Cache::new(store);
        let result: Result<Option<Badge>, _> = cache.get("badge");
        assert!(matches!(result, Err(CacheError::SerializeError(_))));
    }

    #[test]
    fn test_cache_key_macro() {
        let user_id = 42;
        assert_eq!(cache_key!("aqpvet-cart", user_id), "aqpvet-cart:42");
        assert_eq!(cache_key!("a", "b", "c"), "a:b:c");
    }
}
