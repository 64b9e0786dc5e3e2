//! Calendar helpers for the operator's time zone
//!
//! Orders carry UTC instants; every calendar question ("is this today?",
//! "when did this week start?") is answered in the zone of the `now` the
//! caller passes in.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::utils::{AppError, AppResult};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Calendar date of `instant` in the zone `tz`
pub fn local_date<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Date + wall-clock time → instant in `tz`
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Times in a
/// DST gap move forward by an hour; if that still does not exist the wall
/// clock is read as UTC.
pub fn local_instant<Tz: TimeZone>(date: NaiveDate, time: NaiveTime, tz: &Tz) -> DateTime<Tz> {
    let naive = date.and_time(time);
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

/// Start of `date` (00:00:00.000) in `tz`
pub fn day_start<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    local_instant(date, NaiveTime::MIN, tz)
}

/// Last representable millisecond of `date` (23:59:59.999) in `tz`
pub fn day_end<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    let last_milli = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    local_instant(date, last_milli, tz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-10-19").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
        );
        assert!(parse_date("19/10/2026").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        let lagos = FixedOffset::east_opt(3600).unwrap();
        let instant = Utc.with_ymd_and_hms(2026, 10, 18, 23, 30, 0).unwrap();
        assert_eq!(
            local_date(&instant, &lagos),
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
        );
        assert_eq!(
            local_date(&instant, &Utc),
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
        );
    }

    #[test]
    fn test_day_bounds() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let start = day_start(date, &tz);
        assert_eq!(
            start.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2026, 10, 18, 23, 0, 0).unwrap()
        );

        let end = day_end(date, &tz);
        assert_eq!(end - start, Duration::days(1) - Duration::milliseconds(1));
    }

    #[test]
    fn test_local_instant_across_dst_changes() {
        use chrono_tz::Europe::Madrid;

        // 02:30 does not exist on 2026-03-29; it moves to 03:30 summer time
        let gap = local_instant(
            NaiveDate::from_ymd_opt(2026, 3, 29).unwrap(),
            NaiveTime::from_hms_opt(2, 30, 0).unwrap(),
            &Madrid,
        );
        assert_eq!(
            gap.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2026, 3, 29, 1, 30, 0).unwrap()
        );

        // 02:30 happens twice on 2026-10-25; the summer-time reading wins
        let overlap = local_instant(
            NaiveDate::from_ymd_opt(2026, 10, 25).unwrap(),
            NaiveTime::from_hms_opt(2, 30, 0).unwrap(),
            &Madrid,
        );
        assert_eq!(
            overlap.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2026, 10, 25, 0, 30, 0).unwrap()
        );

        let day = NaiveDate::from_ymd_opt(2026, 10, 25).unwrap();
        assert_eq!(
            day_end(day, &Madrid) - day_start(day, &Madrid),
            Duration::hours(25) - Duration::milliseconds(1)
        );
    }
}
