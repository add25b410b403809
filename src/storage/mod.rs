// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Persistence Adapter
//!
//! Named JSON slots that survive restarts. Each slot holds one serialized
//! value; saving overwrites the whole slot, loading a slot that was never
//! written yields `None`.
//!
//! Controllers go through [`load_typed`] and [`save_typed`]. A stored blob
//! that no longer parses is logged and treated as absent, so callers fall
//! back to their defaults instead of failing.

use std::fmt;
use std::time::Instant;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::constants::storage_keys;
use crate::errors::StorageError;
use crate::logging::AppLogger;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Persisted slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageSlot {
    Profile,
    Nutrition,
    MealPlanPreferences,
    Theme,
    LastMealLogged,
}

impl StorageSlot {
    pub const ALL: [StorageSlot; 5] = [
        StorageSlot::Profile,
        StorageSlot::Nutrition,
        StorageSlot::MealPlanPreferences,
        StorageSlot::Theme,
        StorageSlot::LastMealLogged,
    ];

    /// Storage key, shared with previously persisted data
    pub fn key(&self) -> &'static str {
        match self {
            StorageSlot::Profile => storage_keys::PROFILE,
            StorageSlot::Nutrition => storage_keys::NUTRITION,
            StorageSlot::MealPlanPreferences => storage_keys::MEAL_PLAN_PREFERENCES,
            StorageSlot::Theme => storage_keys::THEME,
            StorageSlot::LastMealLogged => storage_keys::LAST_MEAL_LOGGED,
        }
    }
}

impl fmt::Display for StorageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Key-value persistence for the controller state
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Replace the slot contents with `value`
    async fn save(&self, slot: StorageSlot, value: &Value) -> Result<(), StorageError>;

    /// Read a slot; `Ok(None)` when it was never written or has been removed
    async fn load(&self, slot: StorageSlot) -> Result<Option<Value>, StorageError>;

    /// Delete a slot; removing an absent slot is not an error
    async fn remove(&self, slot: StorageSlot) -> Result<(), StorageError>;

    fn backend_name(&self) -> &'static str;
}

/// Serialize `value` into `slot`
pub async fn save_typed<T>(store: &dyn StateStore, slot: StorageSlot, value: &T) -> Result<(), StorageError>
where
    T: Serialize + Sync + ?Sized,
{
    let start = Instant::now();
    let json = serde_json::to_value(value).map_err(|source| StorageError::Encode { slot, source })?;
    let result = store.save(slot, &json).await;
    AppLogger::log_storage_operation(
        "save",
        slot.key(),
        result.is_ok(),
        start.elapsed().as_millis() as u64,
    );
    result
}

/// Load and deserialize `slot`, treating unreadable contents as absent
pub async fn load_typed<T>(store: &dyn StateStore, slot: StorageSlot) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
{
    let start = Instant::now();
    let loaded = store.load(slot).await;
    AppLogger::log_storage_operation(
        "load",
        slot.key(),
        loaded.is_ok(),
        start.elapsed().as_millis() as u64,
    );

    let value = match loaded {
        Ok(Some(value)) => value,
        Ok(None) => return Ok(None),
        Err(StorageError::Decode { slot, source }) => {
            warn!(storage.slot = %slot, error = %source, "Discarding corrupt stored value");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            warn!(storage.slot = %slot, error = %e, "Stored value has unexpected shape, using defaults");
            Ok(None)
        }
    }
}

/// Remove several slots, stopping at the first backend failure
pub async fn remove_all(store: &dyn StateStore, slots: &[StorageSlot]) -> Result<(), StorageError> {
    for slot in slots {
        store.remove(*slot).await?;
        AppLogger::log_storage_operation("remove", slot.key(), true, 0);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NutritionGoals, NutritionLog};

    #[test]
    fn test_slot_keys() {
        assert_eq!(StorageSlot::Profile.key(), "userProfile_data");
        assert_eq!(StorageSlot::Nutrition.key(), "nutritionTracker_data");
        assert_eq!(StorageSlot::MealPlanPreferences.key(), "mealPlanner_preferences");
        assert_eq!(StorageSlot::Theme.key(), "theme");
        assert_eq!(StorageSlot::LastMealLogged.key(), "lastMealLogged");
        assert_eq!(StorageSlot::Theme.to_string(), "theme");
    }

    #[tokio::test]
    async fn test_typed_round_trip() {
        let store = MemoryStore::new();
        let log = NutritionLog {
            goals: NutritionGoals {
                calories: 1800,
                ..NutritionGoals::default()
            },
            ..NutritionLog::default()
        };

        save_typed(&store, StorageSlot::Nutrition, &log).await.unwrap();
        let loaded: Option<NutritionLog> = load_typed(&store, StorageSlot::Nutrition).await.unwrap();
        assert_eq!(loaded.unwrap().goals.calories, 1800);
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_absent() {
        let store = MemoryStore::new();
        store.insert_raw(StorageSlot::Nutrition, "{\"dailyNutrition\": ").await;

        let loaded: Option<NutritionLog> = load_typed(&store, StorageSlot::Nutrition).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_wrong_shape_is_absent() {
        let store = MemoryStore::new();
        store
            .save(StorageSlot::Nutrition, &serde_json::json!({"goals": "lots"}))
            .await
            .unwrap();

        let loaded: Option<NutritionLog> = load_typed(&store, StorageSlot::Nutrition).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_remove_all() {
        let store = MemoryStore::new();
        for slot in StorageSlot::ALL {
            save_typed(&store, slot, "x").await.unwrap();
        }
        remove_all(&store, &[StorageSlot::Profile, StorageSlot::Theme]).await.unwrap();

        assert!(store.load(StorageSlot::Profile).await.unwrap().is_none());
        assert!(store.load(StorageSlot::Theme).await.unwrap().is_none());
        assert!(store.load(StorageSlot::Nutrition).await.unwrap().is_some());
    }
}
