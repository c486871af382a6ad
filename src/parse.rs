use iso8601::{Date, DateTime};

use crate::DateError;
use crate::consts::{MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};
use crate::fields::days_from_civil;

/// Parses an ISO-8601 datetime (or bare date, taken as midnight) into a
/// millisecond instant, honoring any UTC offset in the input.
///
/// General ISO parsing is delegated to the `iso8601` crate; this only
/// maps its calendar representations onto the epoch timeline.
pub(crate) fn parse_iso_8601(input: &str) -> Result<i64, DateError> {
    if let Ok(DateTime { date, time }) = iso8601::datetime(input) {
        let offset_minutes =
            i64::from(time.tz_offset_hours) * 60 + i64::from(time.tz_offset_minutes);
        return Ok(days_from_date(&date) * MS_PER_DAY
            + i64::from(time.hour) * MS_PER_HOUR
            + i64::from(time.minute) * MS_PER_MINUTE
            + i64::from(time.second) * MS_PER_SECOND
            + i64::from(time.millisecond)
            - offset_minutes * MS_PER_MINUTE);
    }
    if let Ok(date) = iso8601::date(input) {
        return Ok(days_from_date(&date) * MS_PER_DAY);
    }
    Err(DateError::UnparsableIso(input.to_owned()))
}

fn days_from_date(date: &Date) -> i64 {
    match *date {
        Date::YMD { year, month, day } => {
            days_from_civil(i64::from(year), i64::from(month), i64::from(day))
        }
        Date::Week { year, ww, d } => {
            days_from_iso_week(i64::from(year), i64::from(ww), i64::from(d))
        }
        Date::Ordinal { year, ddd } => days_from_civil(i64::from(year), 1, 1) + i64::from(ddd) - 1,
    }
}

/// ISO week dates: week 1 contains January 4th, weekday 1 is Monday.
fn days_from_iso_week(year: i64, week: i64, weekday: i64) -> i64 {
    let jan4 = days_from_civil(year, 1, 4);
    let jan4_weekday = (jan4 + 3).rem_euclid(7) + 1;
    let week1_monday = jan4 - (jan4_weekday - 1);
    week1_monday + (week - 1) * 7 + (weekday - 1)
}
