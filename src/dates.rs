//! Deadline and day-boundary arithmetic
//!
//! Deadlines are stored by the backend as a UTC wall-clock time
//! (`HH:MM:SS`) attached to a menu day. The canonical in-process
//! representation is the absolute UTC instant for that day; local time is
//! only used at the display edge and for computing "today" boundaries.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// Absolute instant of a menu's deadline
pub fn deadline_instant(day: NaiveDate, deadline_utc: NaiveTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(deadline_utc))
}

/// Deadline converted to local time for display
pub fn deadline_local(day: NaiveDate, deadline_utc: NaiveTime) -> DateTime<Local> {
    deadline_instant(day, deadline_utc).with_timezone(&Local)
}

/// Whether ordering is closed for the given menu
pub fn is_deadline_passed(day: NaiveDate, deadline_utc: NaiveTime) -> bool {
    Utc::now() >= deadline_instant(day, deadline_utc)
}

/// Human-readable countdown, e.g. "2h 15m"; "0m" once passed
pub fn time_until(instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = instant - now;
    if diff <= Duration::zero() {
        return "0m".to_string();
    }

    let hours = diff.num_hours();
    let minutes = diff.num_minutes() % 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Default deadline for newly created menus: 09:30 local on the menu's
/// day, stored as UTC
pub fn default_deadline_utc(day: NaiveDate) -> NaiveTime {
    let local_half_past_nine = NaiveTime::from_hms_opt(9, 30, 0).expect("valid time");
    local_time_to_utc(day, local_half_past_nine)
}

/// Convert a local wall-clock time on the given day to its UTC wall time
///
/// Anchoring to the day matters: the local offset on the menu's day can
/// differ from today's across a DST change.
pub fn local_time_to_utc(day: NaiveDate, time: NaiveTime) -> NaiveTime {
    match Local.from_local_datetime(&day.and_time(time)) {
        chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => {
            dt.with_timezone(&Utc).time()
        }
        // DST gap: fall back to treating the wall time as UTC
        chrono::LocalResult::None => time,
    }
}

/// UTC bounds of the local calendar day containing `now`
///
/// Used for "orders placed today" filters.
pub fn local_day_bounds_utc() -> (DateTime<Utc>, DateTime<Utc>) {
    let today = Local::now().date_naive();
    let start = today.and_hms_opt(0, 0, 0).expect("valid time");
    let end = today.and_hms_milli_opt(23, 59, 59, 999).expect("valid time");

    let to_utc = |naive| match Local.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => {
            dt.with_timezone(&Utc)
        }
        chrono::LocalResult::None => Utc.from_utc_datetime(&naive),
    };

    (to_utc(start), to_utc(end))
}

/// Today's date in local time, formatted the way the backend stores days
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_instant_is_utc() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let deadline = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
        let instant = deadline_instant(day, deadline);
        assert_eq!(instant.to_rfc3339(), "2025-03-03T08:30:00+00:00");
    }

    #[test]
    fn test_time_until_formatting() {
        let base = Utc.with_ymd_and_hms(2025, 3, 3, 6, 0, 0).unwrap();
        let in_two_hours = Utc.with_ymd_and_hms(2025, 3, 3, 8, 15, 0).unwrap();
        assert_eq!(time_until(in_two_hours, base), "2h 15m");

        let in_minutes = Utc.with_ymd_and_hms(2025, 3, 3, 6, 42, 0).unwrap();
        assert_eq!(time_until(in_minutes, base), "42m");

        let passed = Utc.with_ymd_and_hms(2025, 3, 3, 5, 0, 0).unwrap();
        assert_eq!(time_until(passed, base), "0m");
        assert_eq!(time_until(base, base), "0m");
    }

    #[test]
    fn test_day_bounds_cover_a_full_day() {
        let (start, end) = local_day_bounds_utc();
        let span = end - start;
        assert!(span > Duration::hours(23));
        assert!(span < Duration::hours(25));
        assert!(start < end);
    }

    fn assert_roundtrip_on(day: NaiveDate) {
        // Converting local → UTC shifts by that day's offset; applying the
        // reverse offset restores the original wall time.
        let local = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        let utc = local_time_to_utc(day, local);
        let restored = Utc
            .from_utc_datetime(&day.and_time(utc))
            .with_timezone(&Local)
            .time();
        assert_eq!(restored.format("%H:%M").to_string(), "09:30");
    }

    #[test]
    fn test_local_time_utc_roundtrip_winter_and_summer() {
        // Days on both sides of a northern-hemisphere DST change; each
        // must round-trip with its own day's offset
        assert_roundtrip_on(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_roundtrip_on(NaiveDate::from_ymd_opt(2025, 7, 15).unwrap());
    }

    #[test]
    fn test_default_deadline_is_anchored_to_the_day() {
        let winter = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let deadline = default_deadline_utc(winter);
        let restored = Utc
            .from_utc_datetime(&winter.and_time(deadline))
            .with_timezone(&Local)
            .time();
        assert_eq!(restored.format("%H:%M").to_string(), "09:30");
    }
}
