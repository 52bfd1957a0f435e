//! Calendar dates in the journal's time zone.
//!
//! Every "today" is computed at call time; nothing here is cached.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// The zone journal dates are reckoned in unless configured otherwise.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;

/// The calendar date of `instant` as observed in `tz`.
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
  instant.with_timezone(&tz).date_naive()
}

pub fn today_in(tz: Tz) -> NaiveDate { local_date(Utc::now(), tz) }

pub fn yesterday_in(tz: Tz) -> NaiveDate {
  let today = today_in(tz);
  today.pred_opt().unwrap_or(today)
}
