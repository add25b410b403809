// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Controllers
//!
//! One controller per feature area. Each loads its persisted state through
//! the [`StateStore`](crate::storage::StateStore), optionally calls the
//! recipe provider, falls back to demo data when the provider fails,
//! recomputes derived values and writes the result back.
//!
//! Meal plan and recipe requests carry a [`RequestToken`]. A response whose
//! token has been overtaken by a newer request is dropped without touching
//! state.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

pub mod meal_planner;
pub mod nutrition_tracker;
pub mod profile;
pub mod recipe_browser;

pub use meal_planner::MealPlanner;
pub use nutrition_tracker::NutritionTracker;
pub use profile::{ProfileManager, ProfileSummary};
pub use recipe_browser::RecipeBrowser;

/// Issues increasing request tokens; only the newest one is current
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

/// Result of a request that a newer request may have overtaken
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Fresh(T),
    /// A newer request was issued before this one finished
    Superseded,
}

impl<T> Outcome<T> {
    pub fn is_superseded(&self) -> bool {
        matches!(self, Outcome::Superseded)
    }

    pub fn into_fresh(self) -> Option<T> {
        match self {
            Outcome::Fresh(value) => Some(value),
            Outcome::Superseded => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Demo,
}

/// Data shown to the user, with a notice when it is demo fallback data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Served<T> {
    pub data: T,
    pub source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
}

impl<T> Served<T> {
    pub fn live(data: T) -> Self {
        Self {
            data,
            source: DataSource::Live,
            notice: None,
        }
    }

    pub fn demo(data: T, notice: &'static str) -> Self {
        Self {
            data,
            source: DataSource::Demo,
            notice: Some(notice),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == DataSource::Demo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_token_is_current() {
        let sequencer = RequestSequencer::new();
        let first = sequencer.next();
        assert!(sequencer.is_current(first));

        let second = sequencer.next();
        assert!(second > first);
        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
        assert_eq!(sequencer.latest(), second.value());
    }

    #[test]
    fn test_outcome_helpers() {
        assert_eq!(Outcome::Fresh(3).into_fresh(), Some(3));
        assert!(Outcome::<u8>::Superseded.is_superseded());
        assert!(Outcome::<u8>::Superseded.into_fresh().is_none());
    }

    #[test]
    fn test_served_notice_serialization() {
        let live = serde_json::to_value(Served::live(1)).unwrap();
        assert_eq!(live, serde_json::json!({"data": 1, "source": "live"}));

        let demo = Served::demo(1, "fallback");
        assert!(demo.is_fallback());
        assert_eq!(serde_json::to_value(demo).unwrap()["notice"], "fallback");
    }
}
