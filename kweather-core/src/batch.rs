use chrono::{Duration, NaiveDateTime, Timelike, Utc};
use serde::Serialize;

/// Hours (KST) at which the short-term forecast is published.
pub const ISSUANCE_HOURS: [u32; 8] = [2, 5, 8, 11, 14, 17, 20, 23];

/// Korea Standard Time has no daylight saving, so a fixed offset is exact.
const KST_OFFSET_HOURS: i64 = 9;

/// Which forecast run to query: `base_date` (YYYYMMDD) and `base_time` (HHMM).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuanceBatch {
    pub date: String,
    pub time: String,
}

/// Current wall-clock time in Korea, independent of the host time zone.
pub fn kst_now() -> NaiveDateTime {
    Utc::now().naive_utc() + Duration::hours(KST_OFFSET_HOURS)
}

/// Latest batch published at or before `now`.
///
/// Before 02:00 nothing has been issued yet today, so the previous day's
/// 23:00 run is used.
pub fn select_batch(now: NaiveDateTime) -> IssuanceBatch {
    match ISSUANCE_HOURS.iter().rev().find(|&&h| now.hour() >= h) {
        Some(hour) => IssuanceBatch {
            date: now.format("%Y%m%d").to_string(),
            time: format!("{hour:02}00"),
        },
        None => IssuanceBatch {
            date: (now - Duration::days(1)).format("%Y%m%d").to_string(),
            time: "2300".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .expect("valid test timestamp")
    }

    fn batch(date: &str, time: &str) -> IssuanceBatch {
        IssuanceBatch {
            date: date.into(),
            time: time.into(),
        }
    }

    #[test]
    fn before_first_issuance_uses_yesterdays_last_run() {
        assert_eq!(select_batch(at(2024, 3, 10, 0, 0)), batch("20240309", "2300"));
        assert_eq!(select_batch(at(2024, 3, 10, 1, 59)), batch("20240309", "2300"));
    }

    #[test]
    fn yesterday_rolls_over_month_and_year() {
        assert_eq!(select_batch(at(2024, 1, 1, 0, 30)), batch("20231231", "2300"));
        assert_eq!(select_batch(at(2024, 3, 1, 1, 0)), batch("20240229", "2300"));
    }

    #[test]
    fn early_morning_uses_two_oclock_run() {
        for hour in 2..=4 {
            assert_eq!(select_batch(at(2024, 3, 10, hour, 45)), batch("20240310", "0200"));
        }
    }

    #[test]
    fn boundary_hours_select_themselves() {
        for hour in ISSUANCE_HOURS {
            let expected = format!("{hour:02}00");
            assert_eq!(select_batch(at(2024, 3, 10, hour, 0)), batch("20240310", &expected));
        }
    }

    #[test]
    fn between_runs_uses_previous_run() {
        assert_eq!(select_batch(at(2024, 1, 1, 13, 0)), batch("20240101", "1100"));
        assert_eq!(select_batch(at(2024, 1, 1, 16, 59)), batch("20240101", "1400"));
        assert_eq!(select_batch(at(2024, 1, 1, 22, 10)), batch("20240101", "2000"));
        assert_eq!(select_batch(at(2024, 1, 1, 23, 59)), batch("20240101", "2300"));
    }
}
