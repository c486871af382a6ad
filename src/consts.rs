/// Milliseconds in one second
pub const MS_PER_SECOND: i64 = 1_000;

/// Milliseconds in one minute
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;

/// Milliseconds in one hour
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

/// Milliseconds in one UTC calendar day
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Milliseconds in one seven-day week
pub const MS_PER_WEEK: i64 = 7 * MS_PER_DAY;

/// Hours in one day, used when wrapping offset-shifted hours
pub const HOURS_PER_DAY: i64 = 24;

/// Seconds in one minute, used for field decomposition
pub(crate) const SECONDS_PER_MINUTE: i64 = 60;

/// Weekday of the Unix epoch, 1970-01-01 (Thursday), with 0 = Sunday
pub(crate) const EPOCH_WEEKDAY: i64 = 4;

/// Base year subtracted when deriving two-digit year keys
pub(crate) const KEY_ERA_BASE: i64 = 1900;

/// Two-digit year keys alias every century; only 2000-2099 is unambiguous
pub(crate) const KEY_CENTURY: i64 = 100;

/// Century prefix re-attached when a two-digit year key is formatted
pub(crate) const KEY_CENTURY_PREFIX: &str = "20";

/// Months per year, used to normalize month overflow during construction
pub(crate) const MONTHS_PER_YEAR: i64 = 12;

/// Day-number encoding multipliers (`yyyymmdd` as a single integer)
pub(crate) const DAY_NUMBER_YEAR: i64 = 10_000;
pub(crate) const DAY_NUMBER_MONTH: i64 = 100;

/// Days from 0000-03-01 to 1970-01-01 in the civil calendar algorithms
pub(crate) const CIVIL_EPOCH_SHIFT: i64 = 719_468;

/// Days in one 400-year Gregorian era
pub(crate) const DAYS_PER_ERA: i64 = 146_097;
