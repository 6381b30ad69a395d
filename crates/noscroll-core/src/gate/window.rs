//! Focus-window evaluation.
//!
//! Pure time-of-day interval test with overnight wraparound. A missing or
//! malformed bound means no window is configured, which never notifies.

use chrono::{Duration, NaiveDateTime, NaiveTime};

/// True when `now` falls inside the `[start, end]` window, bounds
/// inclusive.
///
/// `end <= start` (including exact equality) is an overnight window
/// spanning `start` today through `end` the next calendar day; both sides
/// of midnight are handled.
pub fn is_within_window(now: NaiveDateTime, start: Option<&str>, end: Option<&str>) -> bool {
    let (Some(start), Some(end)) = (start, end) else {
        return false;
    };
    let (Some(start), Some(end)) = (parse_hhmm(start), parse_hhmm(end)) else {
        return false;
    };

    let from = now.date().and_time(start);
    let to = now.date().and_time(end);

    if to > from {
        return from <= now && now <= to;
    }
    if now < from {
        // Past midnight: the window opened yesterday.
        let from_prev = from - Duration::days(1);
        from_prev <= now && now <= to
    } else {
        // Before midnight: the window closes tomorrow.
        let to_next = to + Duration::days(1);
        from <= now && now <= to_next
    }
}

fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn same_day_window_is_boundary_inclusive() {
        let (start, end) = (Some("09:00"), Some("17:00"));
        assert!(is_within_window(at(9, 0), start, end));
        assert!(is_within_window(at(12, 30), start, end));
        assert!(is_within_window(at(17, 0), start, end));
        assert!(!is_within_window(at(8, 59), start, end));
        assert!(!is_within_window(at(17, 1), start, end));
    }

    #[test]
    fn overnight_window_covers_both_sides_of_midnight() {
        let (start, end) = (Some("22:00"), Some("06:00"));
        assert!(is_within_window(at(23, 30), start, end));
        assert!(is_within_window(at(0, 15), start, end));
        assert!(is_within_window(at(5, 59), start, end));
        assert!(!is_within_window(at(8, 0), start, end));
        assert!(!is_within_window(at(21, 59), start, end));
    }

    #[test]
    fn overnight_window_includes_its_bounds() {
        let (start, end) = (Some("22:00"), Some("06:00"));
        assert!(is_within_window(at(22, 0), start, end));
        assert!(is_within_window(at(6, 0), start, end));
        assert!(!is_within_window(at(6, 1), start, end));
    }

    #[test]
    fn equal_bounds_span_the_whole_day() {
        let (start, end) = (Some("08:00"), Some("08:00"));
        assert!(is_within_window(at(8, 0), start, end));
        assert!(is_within_window(at(20, 0), start, end));
        assert!(is_within_window(at(3, 0), start, end));
    }

    #[test]
    fn absent_bound_means_no_window() {
        assert!(!is_within_window(at(12, 0), None, Some("17:00")));
        assert!(!is_within_window(at(12, 0), Some("09:00"), None));
        assert!(!is_within_window(at(12, 0), None, None));
    }

    #[test]
    fn malformed_bound_means_no_window() {
        assert!(!is_within_window(at(12, 0), Some(""), Some("17:00")));
        assert!(!is_within_window(at(12, 0), Some("25:00"), Some("17:00")));
        assert!(!is_within_window(at(12, 0), Some("09:60"), Some("17:00")));
        assert!(!is_within_window(at(12, 0), Some("nine"), Some("17:00")));
        assert!(!is_within_window(at(12, 0), Some("09:00:00"), Some("17:00")));
    }

    proptest! {
        #[test]
        fn same_day_membership_matches_minute_comparison(
            start_min in 0u32..1440,
            end_min in 0u32..1440,
            now_min in 0u32..1440,
        ) {
            prop_assume!(start_min < end_min);
            let fmt = |m: u32| format!("{:02}:{:02}", m / 60, m % 60);
            let inside = is_within_window(
                at(now_min / 60, now_min % 60),
                Some(&fmt(start_min)),
                Some(&fmt(end_min)),
            );
            prop_assert_eq!(inside, start_min <= now_min && now_min <= end_min);
        }
    }
}
