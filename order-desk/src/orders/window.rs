//! Date windows
//!
//! A [`DateWindow`] is a [`DateFilter`] resolved against one `now`. It is
//! built once per filter pass so every order is judged against the same
//! calendar.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc};
use shared::view::DateFilter;

use crate::utils::time::{day_end, day_start, local_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bounds {
    Any,
    /// Admits no instant (the day before the first representable date)
    Nothing,
    /// One calendar day in the window's zone
    Day(NaiveDate),
    /// Inclusive instant range
    Span {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Creation-time predicate for one date filter mode
#[derive(Clone)]
pub struct DateWindow<Tz: TimeZone> {
    tz: Tz,
    bounds: Bounds,
}

impl<Tz: TimeZone> DateWindow<Tz> {
    /// Resolve `mode` relative to `now`, in `now`'s zone
    ///
    /// `custom_date` is only consulted for [`DateFilter::Custom`]; without one
    /// the window admits everything.
    pub fn resolve(mode: DateFilter, custom_date: Option<NaiveDate>, now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();

        let bounds = match mode {
            DateFilter::All => Bounds::Any,
            DateFilter::Today => Bounds::Day(today),
            DateFilter::Yesterday => today.pred_opt().map_or(Bounds::Nothing, Bounds::Day),
            DateFilter::ThisWeek => {
                let back = Days::new(u64::from(today.weekday().num_days_from_monday()));
                let monday = today.checked_sub_days(back).unwrap_or(NaiveDate::MIN);
                let sunday = monday.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
                Bounds::Span {
                    start: day_start(monday, &tz).with_timezone(&Utc),
                    end: day_end(sunday, &tz).with_timezone(&Utc),
                }
            }
            DateFilter::Last7Days => {
                let first = today.checked_sub_days(Days::new(6)).unwrap_or(NaiveDate::MIN);
                Bounds::Span {
                    start: day_start(first, &tz).with_timezone(&Utc),
                    end: now.with_timezone(&Utc),
                }
            }
            DateFilter::Custom => custom_date.map_or(Bounds::Any, Bounds::Day),
        };

        Self { tz, bounds }
    }

    pub fn contains(&self, created_at: &DateTime<Utc>) -> bool {
        match self.bounds {
            Bounds::Any => true,
            Bounds::Nothing => false,
            Bounds::Day(day) => local_date(created_at, &self.tz) == day,
            Bounds::Span { start, end } => start <= *created_at && *created_at <= end,
        }
    }

    /// Inclusive instant range, for span windows
    pub fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match self.bounds {
            Bounds::Span { start, end } => Some((start, end)),
            _ => None,
        }
    }

    /// The single calendar day this window admits, for day windows
    pub fn day(&self) -> Option<NaiveDate> {
        match self.bounds {
            Bounds::Day(day) => Some(day),
            _ => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.bounds == Bounds::Any
    }
}
