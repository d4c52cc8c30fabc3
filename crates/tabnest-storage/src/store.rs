//! Key-value store contract

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::Result;

/// Raw string storage under string keys.
///
/// Implementations take `&self` and handle their own locking so a single
/// store can be shared between the session bridge and whoever else needs it.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Write several entries. Stores that can do so apply them atomically.
    fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// JSON helpers layered over any [`KeyValueStore`].
pub trait JsonStoreExt: KeyValueStore {
    /// Read `key` as JSON, falling back to `default` when the key is
    /// missing, unreadable, or does not deserialize into `T`.
    fn get_json_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.get(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Stored value is malformed, using default");
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read stored value, using default");
                default
            }
        }
    }

    /// Read `key` as an untyped JSON value. Missing or unparsable data is `None`.
    fn get_json_value(&self, key: &str) -> Option<serde_json::Value> {
        self.get_json_or::<Option<serde_json::Value>>(key, None)
    }

    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> JsonStoreExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[test]
    fn test_get_json_or_missing_and_corrupt() {
        let store = MemoryStore::new();
        assert_eq!(store.get_json_or("absent", vec![1, 2]), vec![1, 2]);

        store.set("corrupt", "{not json").unwrap();
        assert_eq!(store.get_json_or("corrupt", 7_i64), 7);

        // Valid JSON of the wrong shape also falls back
        store.set("wrong", "\"text\"").unwrap();
        assert_eq!(store.get_json_or("wrong", 3_i64), 3);
    }

    #[test]
    fn test_set_json_then_read() {
        let store = MemoryStore::new();
        store.set_json("ids", &["a", "b"]).unwrap();

        let ids: Vec<String> = store.get_json_or("ids", Vec::new());
        assert_eq!(ids, vec!["a", "b"]);
        assert!(store.get_json_value("ids").unwrap().is_array());
    }

    #[test]
    fn test_usable_through_trait_object() {
        let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.set_json("n", &5).unwrap();
        assert_eq!(store.get_json_or("n", 0), 5);
    }
}
