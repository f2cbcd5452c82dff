use time::PrimitiveDateTime;

use crate::core::time::calendar_days_between;

/// Every 100 points is one level, starting at level 1.
pub(crate) fn level_for_points(total_points: i32) -> i32 {
    (total_points.div_euclid(100) + 1).max(1)
}

/// Streak bookkeeping over calendar days: activity on the following day
/// extends the streak, a gap resets it, repeated activity on the same day
/// leaves it untouched.
pub(crate) fn next_streak(
    last_activity: Option<PrimitiveDateTime>,
    now: PrimitiveDateTime,
    current_streak: i32,
) -> i32 {
    let Some(last) = last_activity else {
        return 1;
    };

    match calendar_days_between(last, now) {
        1 => current_streak + 1,
        days if days > 1 => 1,
        _ => current_streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Month, Time};

    fn day(day: u8, hour: u8) -> PrimitiveDateTime {
        let date = Date::from_calendar_date(2025, Month::May, day).unwrap();
        PrimitiveDateTime::new(date, Time::from_hms(hour, 30, 0).unwrap())
    }

    #[test]
    fn level_boundaries() {
        assert_eq!(level_for_points(0), 1);
        assert_eq!(level_for_points(99), 1);
        assert_eq!(level_for_points(100), 2);
        assert_eq!(level_for_points(199), 2);
        assert_eq!(level_for_points(200), 3);
        assert_eq!(level_for_points(1000), 11);
    }

    #[test]
    fn level_never_drops_below_one() {
        assert_eq!(level_for_points(-50), 1);
    }

    #[test]
    fn first_activity_starts_streak_at_one() {
        assert_eq!(next_streak(None, day(10, 12), 0), 1);
    }

    #[test]
    fn consecutive_day_extends_streak() {
        assert_eq!(next_streak(Some(day(9, 23)), day(10, 1), 4), 5);
    }

    #[test]
    fn gap_resets_streak() {
        assert_eq!(next_streak(Some(day(7, 12)), day(10, 12), 9), 1);
        assert_eq!(next_streak(Some(day(8, 12)), day(10, 12), 2), 1);
    }

    #[test]
    fn same_day_activity_keeps_streak() {
        assert_eq!(next_streak(Some(day(10, 8)), day(10, 20), 3), 3);
    }
}
