use crate::consts::{
    CIVIL_EPOCH_SHIFT, DAYS_PER_ERA, DAY_NUMBER_MONTH, DAY_NUMBER_YEAR, EPOCH_WEEKDAY,
    HOURS_PER_DAY, MONTHS_PER_YEAR, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND,
    SECONDS_PER_MINUTE,
};
use serde::{Deserialize, Serialize};

/// The canonical decomposition of an instant into UTC calendar fields.
/// Every parser and formatter in the crate converts to and from this
/// shape; no format owns its own field order beyond its reorder rule.
///
/// Fields are plain `i64` so that out-of-range values (month 13, day 32)
/// can be carried and normalized arithmetically by [`DateFields::instant`],
/// matching the rollover behavior of UTC date construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateFields {
    pub year: i64,
    /// 1-based month (1 = January)
    pub month: i64,
    pub day: i64,
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
    pub millisecond: i64,
}

impl DateFields {
    /// Decomposes a millisecond instant into its UTC calendar fields.
    /// This is the source of truth for field extraction in both the
    /// format engine and the period-key engine.
    pub fn from_instant(instant: i64) -> Self {
        let days = instant.div_euclid(MS_PER_DAY);
        let ms_of_day = instant.rem_euclid(MS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        Self {
            year,
            month,
            day,
            hour: ms_of_day / MS_PER_HOUR,
            minute: ms_of_day / MS_PER_MINUTE % SECONDS_PER_MINUTE,
            second: ms_of_day / MS_PER_SECOND % SECONDS_PER_MINUTE,
            millisecond: ms_of_day % MS_PER_SECOND,
        }
    }

    /// Builds the millisecond instant for these fields, interpreted as UTC.
    ///
    /// Overflowing fields roll over: month 13 advances the year, day 32
    /// spills into the next month, hour 25 into the next day. The 1-based
    /// month is shifted to a 0-based count exactly once, here.
    pub fn instant(&self) -> i64 {
        let months = self.year * MONTHS_PER_YEAR + (self.month - 1);
        let year = months.div_euclid(MONTHS_PER_YEAR);
        let month = months.rem_euclid(MONTHS_PER_YEAR) + 1;
        days_from_civil(year, month, self.day) * MS_PER_DAY
            + self.hour * MS_PER_HOUR
            + self.minute * MS_PER_MINUTE
            + self.second * MS_PER_SECOND
            + self.millisecond
    }

    /// Returns the fields as fixed-width zero-padded strings:
    /// 4-digit year, 2-digit month through second, 3-digit millisecond.
    pub fn padded(&self) -> [String; 7] {
        [
            format!("{:04}", self.year),
            format!("{:02}", self.month),
            format!("{:02}", self.day),
            format!("{:02}", self.hour),
            format!("{:02}", self.minute),
            format!("{:02}", self.second),
            format!("{:03}", self.millisecond),
        ]
    }
}

/// Convert days since the Unix epoch to (year, month, day).
///
/// Algorithm based on `civil_from_days` by Howard Hinnant.
fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + CIVIL_EPOCH_SHIFT;
    let era = if z >= 0 { z } else { z - (DAYS_PER_ERA - 1) } / DAYS_PER_ERA;
    let doe = z - era * DAYS_PER_ERA;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    (if m <= 2 { y + 1 } else { y }, m, d)
}

/// Convert (year, month, day) to days since the Unix epoch.
///
/// Inverse of `civil_from_days`; `month` must already be normalized to
/// 1..=12, while `day` may overflow its month and extrapolates linearly.
pub(crate) fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let m = if month <= 2 { month + 9 } else { month - 3 };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let doy = (153 * m + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * DAYS_PER_ERA + doe - CIVIL_EPOCH_SHIFT
}

/// Weekday of an instant, 0 = Sunday through 6 = Saturday.
pub fn weekday(instant: i64) -> u8 {
    let days = instant.div_euclid(MS_PER_DAY);
    ((days + EPOCH_WEEKDAY).rem_euclid(7)) as u8
}

/// Encodes the calendar day of an instant as a `yyyymmdd` integer.
pub fn day_number(instant: i64) -> i64 {
    let fields = DateFields::from_instant(instant);
    fields.year * DAY_NUMBER_YEAR + fields.month * DAY_NUMBER_MONTH + fields.day
}

/// Expands a `yyyymmdd` integer into the instant at UTC midnight of
/// that calendar day.
pub fn from_day_number(number: i64) -> i64 {
    let year = number.div_euclid(DAY_NUMBER_YEAR);
    let rest = number.rem_euclid(DAY_NUMBER_YEAR);
    days_from_civil(year, rest / DAY_NUMBER_MONTH, rest % DAY_NUMBER_MONTH) * MS_PER_DAY
}

/// UTC hour of an instant shifted by a millisecond offset, wrapped into
/// 0..=23. The offset is converted to whole hours with truncation toward
/// zero, and a day's worth of hours is added before wrapping so negative
/// shifts land back in range.
pub fn hour_with_offset(instant: i64, offset_ms: i64) -> u8 {
    let hour_offset = offset_ms / MS_PER_HOUR;
    let hour = DateFields::from_instant(instant).hour;
    ((hour + HOURS_PER_DAY + hour_offset).rem_euclid(HOURS_PER_DAY)) as u8
}

/// `"HHMM"` grouping key for an instant: the offset-shifted hour joined
/// with the UTC minute of the enclosing bucket's start. Buckets are
/// aligned by flooring the instant to a multiple of `bucket_ms`; a
/// non-positive bucket size leaves the instant unfloored.
pub fn bucket_key(instant: i64, bucket_ms: i64, offset_ms: i64) -> String {
    let hour = hour_with_offset(instant, offset_ms);
    let bucket_start = if bucket_ms > 0 {
        instant.div_euclid(bucket_ms) * bucket_ms
    } else {
        instant
    };
    let minute = DateFields::from_instant(bucket_start).minute;
    format!("{hour:02}{minute:02}")
}

/// Instant at UTC midnight of the calendar day containing `instant`.
pub fn round_to_day_start(instant: i64) -> i64 {
    instant.div_euclid(MS_PER_DAY) * MS_PER_DAY
}

/// Full ISO-8601 rendering with milliseconds and a `Z` suffix.
pub fn to_iso_string(instant: i64) -> String {
    let f = DateFields::from_instant(instant);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        f.year, f.month, f.day, f.hour, f.minute, f.second, f.millisecond
    )
}

/// Advances an instant by a whole number of calendar months, keeping the
/// day and time-of-day fields and letting day overflow normalize (the
/// 31st shifted into a 30-day month spills into the following month).
pub(crate) fn shift_months(instant: i64, delta: i64) -> i64 {
    let fields = DateFields::from_instant(instant);
    DateFields {
        month: fields.month + delta,
        ..fields
    }
    .instant()
}

/// Advances an instant by a whole number of calendar years.
pub(crate) fn shift_years(instant: i64, delta: i64) -> i64 {
    let fields = DateFields::from_instant(instant);
    DateFields {
        year: fields.year + delta,
        ..fields
    }
    .instant()
}

/// Advances an instant by whole UTC calendar days.
pub(crate) fn shift_days(instant: i64, delta: i64) -> i64 {
    instant + delta * MS_PER_DAY
}
