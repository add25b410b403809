// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Error Types
//!
//! Crate-level errors returned by the controllers. Validation failures and
//! recipe API failures keep their own enums (see [`crate::validation`] and
//! [`crate::providers`]); this module wraps them together with storage and
//! filesystem failures.

use crate::providers::RecipeApiError;
use crate::storage::StorageSlot;
use crate::validation::ValidationError;

/// Persistence adapter failures
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(#[from] sqlx::Error),

    #[error("Failed to encode {slot} slot: {source}")]
    Encode {
        slot: StorageSlot,
        #[source]
        source: serde_json::Error,
    },

    #[error("Stored value for {slot} slot is not valid JSON: {source}")]
    Decode {
        slot: StorageSlot,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to prepare storage location: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by controller operations
#[derive(Debug, thiserror::Error)]
pub enum DietError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Only surfaced where no demo fallback exists (e.g. recipe details)
    #[error("Recipe service unavailable: {0}")]
    ServiceUnavailable(#[from] RecipeApiError),

    #[error("Meal {id} not found in today's log")]
    MealNotFound { id: i64 },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DietError {
    /// Validation failures are shown inline and leave state untouched
    pub fn is_validation(&self) -> bool {
        matches!(self, DietError::Validation(_))
    }
}

pub type DietResult<T> = Result<T, DietError>;
