// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Process-local state store for tests and `--ephemeral` runs

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{StateStore, StorageSlot};
use crate::errors::StorageError;

/// Slots kept as serialized text, like the on-disk backend
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<StorageSlot, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write raw text into a slot without JSON encoding
    pub async fn insert_raw(&self, slot: StorageSlot, raw: &str) {
        self.slots.write().await.insert(slot, raw.to_string());
    }

    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn save(&self, slot: StorageSlot, value: &Value) -> Result<(), StorageError> {
        let text = serde_json::to_string(value).map_err(|source| StorageError::Encode { slot, source })?;
        self.slots.write().await.insert(slot, text);
        Ok(())
    }

    async fn load(&self, slot: StorageSlot) -> Result<Option<Value>, StorageError> {
        let slots = self.slots.read().await;
        match slots.get(&slot) {
            Some(text) => serde_json::from_str(text)
                .map(Some)
                .map_err(|source| StorageError::Decode { slot, source }),
            None => Ok(None),
        }
    }

    async fn remove(&self, slot: StorageSlot) -> Result<(), StorageError> {
        self.slots.write().await.remove(&slot);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_absent_slot_is_none() {
        let store = MemoryStore::new();
        assert!(store.load(StorageSlot::Profile).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let store = MemoryStore::new();
        store.save(StorageSlot::Theme, &json!("dark")).await.unwrap();
        store.save(StorageSlot::Theme, &json!("light")).await.unwrap();

        assert_eq!(store.load(StorageSlot::Theme).await.unwrap(), Some(json!("light")));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_corrupt_text_reports_decode_error() {
        let store = MemoryStore::new();
        store.insert_raw(StorageSlot::Profile, "not json").await;

        let err = store.load(StorageSlot::Profile).await.unwrap_err();
        assert!(matches!(err, StorageError::Decode { slot: StorageSlot::Profile, .. }));
    }

    #[tokio::test]
    async fn test_remove_absent_slot_is_ok() {
        let store = MemoryStore::new();
        store.remove(StorageSlot::LastMealLogged).await.unwrap();
    }
}
