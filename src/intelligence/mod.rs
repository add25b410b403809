// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Intelligence Module
//!
//! Derived metrics computed from profile and log snapshots. Everything in
//! here is pure: no storage, no network, no clock reads (callers pass `now`).
//!
//! This module includes:
//! - Body metrics: BMI, BMR (Mifflin-St Jeor), TDEE and daily calorie target
//! - Target weight projection
//! - Nutrition totals and progress against goals
//! - Logging streak estimation

pub mod metrics;
pub mod nutrition;
pub mod streak;

pub use metrics::{
    compute_bmi, compute_bmr, compute_daily_calorie_target, compute_target_weight, compute_tdee,
    weight_progress_percent, BmiCategory, BmiResult, CalorieTargetInputs,
};
pub use nutrition::{accumulate_totals, macro_progress, progress_percent, MacroProgress, MacroSource};
pub use streak::{streak_days, streak_progress};
