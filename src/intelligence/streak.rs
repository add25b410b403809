// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Logging streak estimation from the `lastMealLogged` marker

use chrono::{DateTime, Duration, Utc};

use crate::constants::limits;
use super::nutrition::progress_percent;

/// Whole days (rounded up) between the marker and `now`, capped at 30
///
/// This is an estimate: only the most recent log time is kept, so the value
/// grows with elapsed time rather than with consecutive logging days.
pub fn streak_days(last_logged: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u32 {
    let Some(last_logged) = last_logged else {
        return 0;
    };

    let elapsed_ms = (now - last_logged).num_milliseconds().unsigned_abs();
    let day_ms = Duration::days(1).num_milliseconds().unsigned_abs();
    let days = elapsed_ms.div_ceil(day_ms);

    days.min(u64::from(limits::MAX_STREAK_DAYS)) as u32
}

/// Streak as a percentage of the 30 day cap
pub fn streak_progress(streak_days: u32) -> f64 {
    progress_percent(f64::from(streak_days), f64::from(limits::MAX_STREAK_DAYS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_no_marker_means_no_streak() {
        assert_eq!(streak_days(None, now()), 0);
        assert_eq!(streak_progress(0), 0.0);
    }

    #[test]
    fn test_partial_days_round_up() {
        let marker = now() - Duration::hours(5);
        assert_eq!(streak_days(Some(marker), now()), 1);

        let marker = now() - Duration::hours(49);
        assert_eq!(streak_days(Some(marker), now()), 3);
    }

    #[test]
    fn test_same_instant_is_zero() {
        assert_eq!(streak_days(Some(now()), now()), 0);
    }

    #[test]
    fn test_streak_is_capped() {
        let marker = now() - Duration::days(90);
        assert_eq!(streak_days(Some(marker), now()), 30);
        assert_eq!(streak_progress(30), 100.0);
        assert_eq!(streak_progress(15), 50.0);
    }

    #[test]
    fn test_future_marker_uses_absolute_difference() {
        let marker = now() + Duration::hours(30);
        assert_eq!(streak_days(Some(marker), now()), 2);
    }
}
